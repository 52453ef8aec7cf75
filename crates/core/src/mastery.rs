//! Mastery aggregation over the curriculum and a progress record.
//!
//! Pure functions: same inputs, same outputs, no side effects.

use crate::model::{Curriculum, Domain, ProgressRecord};

/// Curriculum-wide completion totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteryTotals {
    pub total: usize,
    pub completed: usize,
    pub percentage: u8,
}

/// Completion percentage for one domain, rounded to the nearest integer.
///
/// Returns 0 for a domain with no enablers.
#[must_use]
pub fn domain_progress(domain: &Domain, progress: &ProgressRecord) -> u8 {
    let total = domain.enabler_count();
    let completed = domain
        .enablers()
        .filter(|e| progress.is_completed(e.id()))
        .count();
    rounded_percentage(completed, total)
}

/// Completion totals across the whole curriculum.
#[must_use]
pub fn global_progress(curriculum: &Curriculum, progress: &ProgressRecord) -> MasteryTotals {
    let total = curriculum.enabler_count();
    let completed = curriculum
        .enablers()
        .filter(|e| progress.is_completed(e.id()))
        .count();
    MasteryTotals {
        total,
        completed,
        percentage: rounded_percentage(completed, total),
    }
}

/// Arithmetic rounding (0.5 rounds up) in integer arithmetic so results are
/// exactly reproducible across platforms.
#[must_use]
pub fn rounded_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let value = (200 * completed + total) / (2 * total);
    u8::try_from(value.min(100)).unwrap_or(100)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Curriculum, Domain, DomainId, EnablerId};

    fn builtin_with_progress(ids: &[&str]) -> (Curriculum, ProgressRecord) {
        let curriculum = Curriculum::builtin();
        let mut progress = ProgressRecord::new();
        for id in ids {
            progress.toggle(&EnablerId::new(*id));
        }
        (curriculum, progress)
    }

    #[test]
    fn empty_domain_has_zero_progress() {
        let domain = Domain::new(
            DomainId::new("hollow"),
            "Hollow",
            "no tasks",
            "slate",
            0,
            Vec::new(),
        )
        .unwrap();
        assert_eq!(domain_progress(&domain, &ProgressRecord::new()), 0);
    }

    #[test]
    fn rounding_is_arithmetic() {
        // 1/3 -> 33.33 -> 33; 2/3 -> 66.67 -> 67; 1/2 -> 50.
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 2), 50);
        // Half rounds up: 1/8 -> 12.5 -> 13.
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(0, 5), 0);
        assert_eq!(rounded_percentage(5, 5), 100);
    }

    #[test]
    fn domain_progress_counts_only_its_own_enablers() {
        let (curriculum, progress) = builtin_with_progress(&["p1-1", "p1-2", "be5-1"]);
        let people = curriculum.find_domain(&DomainId::new("people")).unwrap();
        let business = curriculum.find_domain(&DomainId::new("business")).unwrap();

        // People has 23 enablers, 2 completed -> 8.7 -> 9.
        assert_eq!(people.enabler_count(), 23);
        assert_eq!(domain_progress(people, &progress), 9);
        // Business has 5 enablers, 1 completed -> 20.
        assert_eq!(domain_progress(business, &progress), 20);
    }

    #[test]
    fn global_progress_matches_formula() {
        let (curriculum, progress) = builtin_with_progress(&["p1-1", "pr3-2", "be3-1"]);
        let totals = global_progress(&curriculum, &progress);
        assert_eq!(totals.completed, 3);
        assert_eq!(totals.total, curriculum.enabler_count());
        assert_eq!(
            totals.percentage,
            rounded_percentage(totals.completed, totals.total)
        );
        assert!(totals.percentage <= 100);
    }

    #[test]
    fn stale_ids_contribute_nothing() {
        let (curriculum, progress) = builtin_with_progress(&["removed-1", "removed-2"]);
        let totals = global_progress(&curriculum, &progress);
        assert_eq!(totals.completed, 0);
        assert_eq!(totals.percentage, 0);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let (curriculum, progress) = builtin_with_progress(&["p2-1", "p2-2"]);
        let first = global_progress(&curriculum, &progress);
        let second = global_progress(&curriculum, &progress);
        assert_eq!(first, second);
    }
}
