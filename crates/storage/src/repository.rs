use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use mastery_core::model::{EnablerId, ProgressRecord, TaskId, WeaknessRecord};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Durable record of completed enabler ids.
///
/// Every mutation is flushed before the call returns: a load after a
/// successful `set_completed` observes the change, across process restarts.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the full completed set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` when the persisted payload
    /// cannot be decoded (callers recover by starting from an empty
    /// record), or other storage errors.
    async fn load_completed(&self) -> Result<ProgressRecord, StorageError>;

    /// Write-through membership update for a single enabler id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the mutation cannot be made durable.
    async fn set_completed(
        &self,
        id: &EnablerId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

/// Durable task-failure counters.
#[async_trait]
pub trait WeaknessRepository: Send + Sync {
    /// Load all failure counters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for undecodable payloads, or
    /// other storage errors.
    async fn load_failures(&self) -> Result<WeaknessRecord, StorageError>;

    /// Increment counters, one per occurrence in `task_ids`, atomically.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch cannot be made durable; on error
    /// no partial increments are visible.
    async fn add_failures(&self, task_ids: &[TaskId]) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    completed: Arc<Mutex<HashSet<EnablerId>>>,
    failures: Arc<Mutex<HashMap<TaskId, u32>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_completed(&self) -> Result<ProgressRecord, StorageError> {
        let guard = self
            .completed
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(ProgressRecord::from_completed(guard.clone()))
    }

    async fn set_completed(
        &self,
        id: &EnablerId,
        completed: bool,
        _at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .completed
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if completed {
            guard.insert(id.clone());
        } else {
            guard.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl WeaknessRepository for InMemoryRepository {
    async fn load_failures(&self) -> Result<WeaknessRecord, StorageError> {
        let guard = self
            .failures
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(WeaknessRecord::from_failures(guard.clone()))
    }

    async fn add_failures(&self, task_ids: &[TaskId]) -> Result<(), StorageError> {
        let mut guard = self
            .failures
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for id in task_ids {
            let counter = guard.entry(id.clone()).or_insert(0);
            *counter = counter.saturating_add(1);
        }
        Ok(())
    }
}

/// Aggregates the progress and weakness repositories behind trait objects
/// for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub weakness: Arc<dyn WeaknessRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let weakness: Arc<dyn WeaknessRepository> = Arc::new(repo);
        Self { progress, weakness }
    }
}
