use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::ids::{EnablerId, TaskId};

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// The set of enabler ids the user has marked as completed.
///
/// Ids are not validated against the curriculum: toggling an unknown id is
/// legal and the entry simply never contributes to aggregation. Stale ids
/// from an older curriculum are tolerated the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    completed: HashSet<EnablerId>,
}

impl ProgressRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_completed(completed: HashSet<EnablerId>) -> Self {
        Self { completed }
    }

    /// Flips membership of `id` and returns the new completion state.
    ///
    /// Toggling twice in succession restores the prior state.
    pub fn toggle(&mut self, id: &EnablerId) -> bool {
        if self.completed.remove(id) {
            false
        } else {
            self.completed.insert(id.clone());
            true
        }
    }

    #[must_use]
    pub fn is_completed(&self, id: &EnablerId) -> bool {
        self.completed.contains(id)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnablerId> {
        self.completed.iter()
    }
}

//
// ─── WEAKNESS RECORD ───────────────────────────────────────────────────────────
//

/// Per-task counter of exam-simulation failures.
///
/// Counters only ever grow; one increment per wrong answer attributed to
/// the task. Used to flag review-priority tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaknessRecord {
    failures: HashMap<TaskId, u32>,
}

impl WeaknessRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_failures(failures: HashMap<TaskId, u32>) -> Self {
        Self { failures }
    }

    /// Increments the counter for each task id, once per occurrence.
    pub fn record_failures(&mut self, task_ids: &[TaskId]) {
        for id in task_ids {
            let counter = self.failures.entry(id.clone()).or_insert(0);
            *counter = counter.saturating_add(1);
        }
    }

    /// Failure count for a task; 0 for tasks never failed.
    #[must_use]
    pub fn failures(&self, id: &TaskId) -> u32 {
        self.failures.get(id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, u32)> {
        self.failures.iter().map(|(id, count)| (id, *count))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_prior_state() {
        let mut record = ProgressRecord::new();
        let id = EnablerId::new("p1-1");

        assert!(record.toggle(&id));
        assert!(record.is_completed(&id));
        assert!(!record.toggle(&id));
        assert!(!record.is_completed(&id));
        assert_eq!(record, ProgressRecord::new());
    }

    #[test]
    fn unknown_ids_are_legal_to_toggle() {
        let mut record = ProgressRecord::new();
        assert!(record.toggle(&EnablerId::new("does-not-exist")));
        assert_eq!(record.completed_count(), 1);
    }

    #[test]
    fn progress_record_round_trips_as_string_set() {
        let mut record = ProgressRecord::new();
        record.toggle(&EnablerId::new("p1-1"));
        record.toggle(&EnablerId::new("be5-2"));

        let json = serde_json::to_string(&record).unwrap();
        let restored: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn duplicate_failures_increment_per_occurrence() {
        let mut record = WeaknessRecord::new();
        let t = TaskId::new("p2");
        let u = TaskId::new("be5");

        record.record_failures(&[t.clone(), t.clone(), u.clone()]);

        assert_eq!(record.failures(&t), 2);
        assert_eq!(record.failures(&u), 1);
        assert_eq!(record.failures(&TaskId::new("p3")), 0);
    }

    #[test]
    fn failures_never_decrement() {
        let mut record = WeaknessRecord::new();
        let t = TaskId::new("pr1");
        record.record_failures(&[t.clone()]);
        record.record_failures(&[]);
        assert_eq!(record.failures(&t), 1);
    }
}
