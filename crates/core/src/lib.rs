#![forbid(unsafe_code)]

pub mod error;
pub mod exam;
pub mod mastery;
pub mod model;
pub mod time;

pub use error::Error;
pub use exam::{ExamError, ExamPhase, ExamProgress, ExamReport, ExamSession, SECONDS_PER_QUESTION};
pub use mastery::{MasteryTotals, domain_progress, global_progress};
pub use time::Clock;
