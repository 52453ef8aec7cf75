use sqlx::Row;
use std::collections::HashMap;

use super::SqliteRepository;
use crate::repository::{StorageError, WeaknessRepository};
use mastery_core::model::{TaskId, WeaknessRecord};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl WeaknessRepository for SqliteRepository {
    async fn load_failures(&self) -> Result<WeaknessRecord, StorageError> {
        let rows = sqlx::query("SELECT task_id, failures FROM task_failures")
            .fetch_all(self.pool())
            .await
            .map_err(conn)?;

        // Undecodable or negative counters are skipped rather than failing
        // the load; counters are strictly non-negative by contract.
        let mut failures: HashMap<TaskId, u32> = HashMap::with_capacity(rows.len());
        for row in &rows {
            let Ok(task_id) = row.try_get::<String, _>("task_id") else {
                continue;
            };
            let Ok(count) = row.try_get::<i64, _>("failures") else {
                continue;
            };
            let Ok(count) = u32::try_from(count) else {
                continue;
            };
            failures.insert(TaskId::new(task_id), count);
        }

        Ok(WeaknessRecord::from_failures(failures))
    }

    async fn add_failures(&self, task_ids: &[TaskId]) -> Result<(), StorageError> {
        if task_ids.is_empty() {
            return Ok(());
        }

        // Collapse duplicates into per-task increments, then apply the
        // whole batch in one transaction.
        let mut increments: HashMap<&TaskId, i64> = HashMap::new();
        for id in task_ids {
            *increments.entry(id).or_insert(0) += 1;
        }

        let mut tx = self.pool().begin().await.map_err(conn)?;
        for (id, delta) in increments {
            sqlx::query(
                r"
                INSERT INTO task_failures (task_id, failures)
                VALUES (?1, ?2)
                ON CONFLICT(task_id) DO UPDATE SET failures = failures + excluded.failures
                ",
            )
            .bind(id.as_str())
            .bind(delta)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;

        Ok(())
    }
}
