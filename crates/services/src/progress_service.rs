use std::sync::Arc;

use crate::Clock;
use crate::error::ProgressServiceError;
use mastery_core::model::{EnablerId, ProgressRecord};
use storage::repository::{ProgressRepository, StorageError};

/// Write-through wrapper around the durable completed-enabler set.
///
/// The in-memory record only mutates after the repository has accepted the
/// change, so a load after any successful toggle observes it.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, repo }
    }

    /// Load the persisted progress record.
    ///
    /// A payload that cannot be decoded yields an empty record instead of
    /// blocking startup; everything else propagates.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` for storage failures other than
    /// decode errors.
    pub async fn load(&self) -> Result<ProgressRecord, ProgressServiceError> {
        match self.repo.load_completed().await {
            Ok(record) => Ok(record),
            Err(StorageError::Serialization(_)) => Ok(ProgressRecord::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Toggle one enabler id, persisting before the in-memory flip.
    ///
    /// Returns the new completion state. Unknown ids are legal; they are
    /// persisted like any other and never contribute to aggregation.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the mutation cannot be made
    /// durable; the record is left unchanged in that case.
    pub async fn toggle(
        &self,
        record: &mut ProgressRecord,
        id: &EnablerId,
    ) -> Result<bool, ProgressServiceError> {
        let target = !record.is_completed(id);
        self.repo
            .set_completed(id, target, self.clock.now())
            .await?;
        Ok(record.toggle(id))
    }
}
