use chrono::{DateTime, Utc};
use sqlx::Row;
use std::collections::HashSet;

use super::SqliteRepository;
use crate::repository::{ProgressRepository, StorageError};
use mastery_core::model::{EnablerId, ProgressRecord};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_completed(&self) -> Result<ProgressRecord, StorageError> {
        let rows = sqlx::query("SELECT enabler_id FROM completed_enablers")
            .fetch_all(self.pool())
            .await
            .map_err(conn)?;

        // Rows that fail to decode are skipped: a damaged entry must not
        // block startup, it just stops counting toward mastery.
        let completed: HashSet<EnablerId> = rows
            .iter()
            .filter_map(|row| row.try_get::<String, _>("enabler_id").ok())
            .filter(|id| !id.trim().is_empty())
            .map(EnablerId::new)
            .collect();

        Ok(ProgressRecord::from_completed(completed))
    }

    async fn set_completed(
        &self,
        id: &EnablerId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        if completed {
            sqlx::query(
                r"
                INSERT INTO completed_enablers (enabler_id, completed_at)
                VALUES (?1, ?2)
                ON CONFLICT(enabler_id) DO NOTHING
                ",
            )
            .bind(id.as_str())
            .bind(at)
            .execute(self.pool())
            .await
            .map_err(conn)?;
        } else {
            sqlx::query("DELETE FROM completed_enablers WHERE enabler_id = ?1")
                .bind(id.as_str())
                .execute(self.pool())
                .await
                .map_err(conn)?;
        }
        Ok(())
    }
}
