use std::sync::Arc;

use crate::Clock;
use crate::error::AppServicesError;
use crate::exam_workflow::ExamWorkflowService;
use crate::insight_service::InsightService;
use crate::progress_service::ProgressService;
use mastery_core::model::Curriculum;
use storage::repository::Storage;

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    curriculum: Arc<Curriculum>,
    progress: Arc<ProgressService>,
    exams: Arc<ExamWorkflowService>,
    insights: Arc<InsightService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::new(storage, clock))
    }

    /// Build services over an already-initialized storage backend.
    #[must_use]
    pub fn new(storage: Storage, clock: Clock) -> Self {
        let insights = Arc::new(InsightService::from_env());
        let progress = Arc::new(ProgressService::new(clock, Arc::clone(&storage.progress)));
        let exams = Arc::new(ExamWorkflowService::new(
            clock,
            Arc::clone(&insights),
            Arc::clone(&storage.weakness),
        ));

        Self {
            curriculum: Arc::new(Curriculum::builtin()),
            progress,
            exams,
            insights,
        }
    }

    #[must_use]
    pub fn curriculum(&self) -> Arc<Curriculum> {
        Arc::clone(&self.curriculum)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn exams(&self) -> Arc<ExamWorkflowService> {
        Arc::clone(&self.exams)
    }

    #[must_use]
    pub fn insights(&self) -> Arc<InsightService> {
        Arc::clone(&self.insights)
    }
}
