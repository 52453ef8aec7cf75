//! Read-only curriculum queries for presentation layers.

use mastery_core::mastery::{MasteryTotals, domain_progress, global_progress};
use mastery_core::model::{Curriculum, Domain, DomainId, ProgressRecord, Task};

/// Case-insensitive substring search over task names and enabler
/// descriptions within one domain.
#[must_use]
pub fn search_tasks<'a>(domain: &'a Domain, term: &str) -> Vec<&'a Task> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return domain.tasks().iter().collect();
    }

    domain
        .tasks()
        .iter()
        .filter(|task| {
            task.name().to_lowercase().contains(&needle)
                || task
                    .enablers()
                    .iter()
                    .any(|e| e.description().to_lowercase().contains(&needle))
        })
        .collect()
}

/// One row of the per-domain summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainOverviewRow {
    pub id: DomainId,
    pub name: String,
    pub coverage: u8,
    pub total_enablers: usize,
    pub completed_enablers: usize,
    pub percentage: u8,
}

/// Per-domain progress rows plus the curriculum-wide totals.
#[must_use]
pub fn domain_overview(
    curriculum: &Curriculum,
    progress: &ProgressRecord,
) -> (Vec<DomainOverviewRow>, MasteryTotals) {
    let rows = curriculum
        .domains()
        .iter()
        .map(|domain| {
            let completed = domain
                .enablers()
                .filter(|e| progress.is_completed(e.id()))
                .count();
            DomainOverviewRow {
                id: domain.id().clone(),
                name: domain.name().to_owned(),
                coverage: domain.coverage(),
                total_enablers: domain.enabler_count(),
                completed_enablers: completed,
                percentage: domain_progress(domain, progress),
            }
        })
        .collect();

    (rows, global_progress(curriculum, progress))
}
