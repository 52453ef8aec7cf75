use thiserror::Error;

use crate::model::ids::{DomainId, EnablerId, TaskId};

mod eco;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("domain name cannot be empty")]
    EmptyDomainName,

    #[error("task name cannot be empty")]
    EmptyTaskName,

    #[error("enabler description cannot be empty")]
    EmptyEnablerDescription,

    #[error("coverage weight must be <= 100, got {0}")]
    InvalidCoverage(u8),
}

//
// ─── ENABLER ───────────────────────────────────────────────────────────────────
//

/// An atomic, checkable sub-task under a Task; the unit of completion tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enabler {
    id: EnablerId,
    description: String,
    hook: Option<String>,
    image_prompt: Option<String>,
}

impl Enabler {
    /// Creates a new Enabler.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::EmptyEnablerDescription` if the description is
    /// empty or whitespace-only.
    pub fn new(
        id: EnablerId,
        description: impl Into<String>,
        hook: Option<String>,
    ) -> Result<Self, CurriculumError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(CurriculumError::EmptyEnablerDescription);
        }

        Ok(Self {
            id,
            description: description.trim().to_owned(),
            hook: normalize_optional(hook),
            image_prompt: None,
        })
    }

    /// Attach an illustrative image-prompt string.
    #[must_use]
    pub fn with_image_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.image_prompt = normalize_optional(Some(prompt.into()));
        self
    }

    #[must_use]
    pub fn id(&self) -> &EnablerId {
        &self.id
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Memory anchor shown alongside the enabler, when the curriculum carries one.
    #[must_use]
    pub fn hook(&self) -> Option<&str> {
        self.hook.as_deref()
    }

    #[must_use]
    pub fn image_prompt(&self) -> Option<&str> {
        self.image_prompt.as_deref()
    }
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

/// A unit of competency within a Domain, made of checkable enablers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    name: String,
    hook: Option<String>,
    enablers: Vec<Enabler>,
}

impl Task {
    /// Creates a new Task.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::EmptyTaskName` if the name is empty or
    /// whitespace-only.
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        hook: Option<String>,
        enablers: Vec<Enabler>,
    ) -> Result<Self, CurriculumError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CurriculumError::EmptyTaskName);
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            hook: normalize_optional(hook),
            enablers,
        })
    }

    #[must_use]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn hook(&self) -> Option<&str> {
        self.hook.as_deref()
    }

    #[must_use]
    pub fn enablers(&self) -> &[Enabler] {
        &self.enablers
    }
}

//
// ─── DOMAIN ────────────────────────────────────────────────────────────────────
//

/// Top-level curriculum category with an exam-weight percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    id: DomainId,
    name: String,
    description: String,
    color: String,
    coverage: u8,
    tasks: Vec<Task>,
}

impl Domain {
    /// Creates a new Domain.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::EmptyDomainName` for a blank name and
    /// `CurriculumError::InvalidCoverage` when the weight exceeds 100.
    pub fn new(
        id: DomainId,
        name: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
        coverage: u8,
        tasks: Vec<Task>,
    ) -> Result<Self, CurriculumError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CurriculumError::EmptyDomainName);
        }
        if coverage > 100 {
            return Err(CurriculumError::InvalidCoverage(coverage));
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            description: description.into().trim().to_owned(),
            color: color.into(),
            coverage,
            tasks,
        })
    }

    #[must_use]
    pub fn id(&self) -> &DomainId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Color tag used by presentation layers; opaque to the core.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Percentage of exam content attributed to this domain.
    #[must_use]
    pub fn coverage(&self) -> u8 {
        self.coverage
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Total number of enablers across all tasks of the domain.
    #[must_use]
    pub fn enabler_count(&self) -> usize {
        self.tasks.iter().map(|t| t.enablers().len()).sum()
    }

    /// Iterate over every enabler in the domain, in task order.
    pub fn enablers(&self) -> impl Iterator<Item = &Enabler> {
        self.tasks.iter().flat_map(|t| t.enablers().iter())
    }
}

//
// ─── CURRICULUM ────────────────────────────────────────────────────────────────
//

/// The full, immutable domain → task → enabler tree.
///
/// Loaded once at startup; read-only for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    domains: Vec<Domain>,
}

impl Curriculum {
    #[must_use]
    pub fn new(domains: Vec<Domain>) -> Self {
        Self { domains }
    }

    /// The built-in PMP Examination Content Outline dataset.
    #[must_use]
    pub fn builtin() -> Self {
        eco::builtin()
    }

    #[must_use]
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    #[must_use]
    pub fn find_domain(&self, id: &DomainId) -> Option<&Domain> {
        self.domains.iter().find(|d| d.id() == id)
    }

    #[must_use]
    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.domains
            .iter()
            .flat_map(|d| d.tasks().iter())
            .find(|t| t.id() == id)
    }

    /// Total number of enablers across the whole curriculum.
    #[must_use]
    pub fn enabler_count(&self) -> usize {
        self.domains.iter().map(Domain::enabler_count).sum()
    }

    /// Iterate over every enabler in the curriculum, in domain/task order.
    pub fn enablers(&self) -> impl Iterator<Item = &Enabler> {
        self.domains.iter().flat_map(Domain::enablers)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabler_rejects_blank_description() {
        let err = Enabler::new(EnablerId::new("x-1"), "   ", None).unwrap_err();
        assert_eq!(err, CurriculumError::EmptyEnablerDescription);
    }

    #[test]
    fn enabler_trims_and_filters_hook() {
        let enabler =
            Enabler::new(EnablerId::new("x-1"), "  Identify risks  ", Some("  ".into())).unwrap();
        assert_eq!(enabler.description(), "Identify risks");
        assert_eq!(enabler.hook(), None);
    }

    #[test]
    fn image_prompt_is_attachable() {
        let enabler = Enabler::new(EnablerId::new("x-1"), "Identify risks", None)
            .unwrap()
            .with_image_prompt("a lighthouse scanning a stormy sea");
        assert_eq!(
            enabler.image_prompt(),
            Some("a lighthouse scanning a stormy sea")
        );
    }

    #[test]
    fn task_rejects_blank_name() {
        let err = Task::new(TaskId::new("t1"), " ", None, Vec::new()).unwrap_err();
        assert_eq!(err, CurriculumError::EmptyTaskName);
    }

    #[test]
    fn domain_rejects_coverage_above_100() {
        let err = Domain::new(
            DomainId::new("d"),
            "People",
            "desc",
            "indigo",
            101,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, CurriculumError::InvalidCoverage(101));
    }

    #[test]
    fn builtin_tree_is_well_formed() {
        let curriculum = Curriculum::builtin();
        assert_eq!(curriculum.domains().len(), 3);

        let coverage: u32 = curriculum
            .domains()
            .iter()
            .map(|d| u32::from(d.coverage()))
            .sum();
        assert_eq!(coverage, 100);

        // Every enabler id is globally unique.
        let mut seen = std::collections::HashSet::new();
        for enabler in curriculum.enablers() {
            assert!(seen.insert(enabler.id().clone()), "duplicate {:?}", enabler.id());
        }
        assert_eq!(seen.len(), curriculum.enabler_count());
    }

    #[test]
    fn builtin_lookups_resolve() {
        let curriculum = Curriculum::builtin();
        let task = curriculum.find_task(&TaskId::new("p2")).unwrap();
        assert_eq!(task.name(), "Manage conflicts");
        assert!(curriculum.find_domain(&DomainId::new("process")).is_some());
        assert!(curriculum.find_task(&TaskId::new("nope")).is_none());
    }
}
