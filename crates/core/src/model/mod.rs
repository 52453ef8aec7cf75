pub mod curriculum;
mod ids;
mod insight;
mod progress;
mod question;

pub use curriculum::{Curriculum, CurriculumError, Domain, Enabler, Task};
pub use ids::{DomainId, EnablerId, QuestionId, TaskId};

pub use insight::{Insight, IttoRefs};
pub use progress::{ProgressRecord, WeaknessRecord};
pub use question::{ExamDifficulty, ProjectLifecycle, Question, QuestionError};
