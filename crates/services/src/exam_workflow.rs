use std::sync::Arc;

use crate::Clock;
use crate::error::ExamWorkflowError;
use crate::insight_service::InsightService;
use mastery_core::exam::{ExamReport, ExamSession};
use mastery_core::model::{ExamDifficulty, WeaknessRecord};
use storage::repository::WeaknessRepository;

/// Orchestrates the exam-simulation lifecycle: fetch a validated question
/// batch, hand out the session, and commit weakness data on close.
///
/// The session itself stays a plain value the caller drives (including
/// ticks); only `close_exam` touches persistence, and only for sessions
/// that actually finished.
#[derive(Clone)]
pub struct ExamWorkflowService {
    clock: Clock,
    insights: Arc<InsightService>,
    weakness: Arc<dyn WeaknessRepository>,
}

impl ExamWorkflowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        insights: Arc<InsightService>,
        weakness: Arc<dyn WeaknessRepository>,
    ) -> Self {
        Self {
            clock,
            insights,
            weakness,
        }
    }

    /// Request a question batch and build a session over it.
    ///
    /// A malformed batch rejects the whole request; no session is created.
    ///
    /// # Errors
    ///
    /// Returns `ExamWorkflowError::Insight` for generator/validation
    /// failures and `ExamWorkflowError::Session` if the validated batch
    /// still cannot seed a session.
    pub async fn start_exam(
        &self,
        domain_names: &[String],
        difficulty: ExamDifficulty,
    ) -> Result<ExamSession, ExamWorkflowError> {
        let questions = self
            .insights
            .exam_questions(domain_names, difficulty)
            .await?;
        let session = ExamSession::new(questions, difficulty, self.clock.now())?;
        Ok(session)
    }

    /// Close a session, committing its wrong-task list when it finished.
    ///
    /// Consumes the session on every path, so the caller's tick source dies
    /// with it. A session closed before `Finished` is an abandonment: no
    /// failures are recorded and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns `ExamWorkflowError::Storage` if the failure batch cannot be
    /// persisted.
    pub async fn close_exam(
        &self,
        session: ExamSession,
    ) -> Result<Option<ExamReport>, ExamWorkflowError> {
        let Some(report) = session.report() else {
            return Ok(None);
        };

        if !report.wrong_task_ids.is_empty() {
            self.weakness.add_failures(&report.wrong_task_ids).await?;
        }
        Ok(Some(report))
    }

    /// Current persisted failure counters, for the review-priority view.
    ///
    /// # Errors
    ///
    /// Returns `ExamWorkflowError::Storage` on load failures.
    pub async fn weakness(&self) -> Result<WeaknessRecord, ExamWorkflowError> {
        Ok(self.weakness.load_failures().await?)
    }
}
