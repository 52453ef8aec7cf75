//! Shared error types for the services crate.

use thiserror::Error;

use mastery_core::exam::ExamError;
use mastery_core::model::QuestionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `InsightService`.
///
/// All of these stay at the insight boundary: callers surface them as
/// "insight unavailable" and never let them reach the exam engine or the
/// aggregator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InsightError {
    #[error("insight generation is not configured")]
    Disabled,
    #[error("the generator returned an empty response")]
    EmptyResponse,
    #[error("generator request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("could not parse generator response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("select at least one sub-task to synthesize")]
    EmptySelection,
    #[error("generated question batch rejected: {0}")]
    InvalidBatch(#[from] QuestionError),
    #[error("generator returned no questions")]
    EmptyBatch,
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ExamWorkflowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamWorkflowError {
    #[error(transparent)]
    Insight(#[from] InsightError),
    #[error(transparent)]
    Session(#[from] ExamError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
