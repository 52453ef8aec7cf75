//! Timed exam-simulation session.
//!
//! A strictly forward-moving state machine over a fixed question list:
//! `AwaitingAcknowledgement -> Answering/Reviewing -> Finished`. All
//! transitions are synchronous; the caller serializes ticks and user
//! actions on one event stream. When a tick and a user transition land in
//! the same instant, the expiry check is applied first.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::mastery::rounded_percentage;
use crate::model::{ExamDifficulty, Question, TaskId};

/// Fixed time allowance per question, in seconds.
///
/// Difficulty already scales the question count, so the per-question budget
/// stays constant across tiers.
pub const SECONDS_PER_QUESTION: u32 = 75;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("cannot start a session without questions")]
    Empty,

    #[error("session has not been acknowledged yet")]
    NotAcknowledged,

    #[error("session is already finished")]
    AlreadyFinished,

    #[error("not in the answering phase")]
    NotAnswering,

    #[error("not in the reviewing phase")]
    NotReviewing,

    #[error("no option selected")]
    NoSelection,

    #[error("option index {index} out of range for {options} options")]
    OptionOutOfRange { index: usize, options: usize },

    #[error("time budget expired")]
    TimeExpired,
}

//
// ─── PHASE & VIEWS ─────────────────────────────────────────────────────────────
//

/// Lifecycle phase of an exam session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamPhase {
    /// Pre-flight screen shown; countdown not running yet.
    AwaitingAcknowledgement,
    /// Current question visible, no answer locked in.
    Answering,
    /// Answer submitted, feedback visible.
    Reviewing,
    /// Terminal. Nothing leaves this phase except dropping the session.
    Finished,
}

/// Snapshot of session progress, useful for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining_secs: u32,
    pub is_finished: bool,
}

/// Result surface exposed once a session reaches `Finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamReport {
    /// `round(100 * correct / total)`.
    pub score: u8,
    /// Seconds left on the budget at finish (0 on expiry).
    pub time_remaining: u32,
    /// One entry per incorrectly answered question that carried a task id.
    /// Duplicates are intentional: each wrong answer is one failure event.
    pub wrong_task_ids: Vec<TaskId>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed run of simulated exam questions.
///
/// Ephemeral and in-memory only. The question list is fixed at creation;
/// the caller owns the tick source and must drop it together with the
/// session on every exit path.
pub struct ExamSession {
    questions: Vec<Question>,
    difficulty: ExamDifficulty,
    started_at: DateTime<Utc>,
    phase: ExamPhase,
    current: usize,
    answers: Vec<Option<usize>>,
    tentative: Option<usize>,
    remaining_secs: u32,
    wrong_tasks: Vec<TaskId>,
}

impl ExamSession {
    /// Creates a session over a non-empty question list.
    ///
    /// The time budget is `SECONDS_PER_QUESTION * questions.len()`; the
    /// countdown stays armed-but-idle until `acknowledge` is called.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::Empty` for an empty question list.
    pub fn new(
        questions: Vec<Question>,
        difficulty: ExamDifficulty,
        started_at: DateTime<Utc>,
    ) -> Result<Self, ExamError> {
        if questions.is_empty() {
            return Err(ExamError::Empty);
        }

        let count = questions.len();
        let budget = u32::try_from(count)
            .unwrap_or(u32::MAX)
            .saturating_mul(SECONDS_PER_QUESTION);

        Ok(Self {
            questions,
            difficulty,
            started_at,
            phase: ExamPhase::AwaitingAcknowledgement,
            current: 0,
            answers: vec![None; count],
            tentative: None,
            remaining_secs: budget,
            wrong_tasks: Vec::new(),
        })
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Confirms the pre-flight screen and starts the countdown.
    ///
    /// Calling it again while in progress is a no-op and does not restart
    /// the timer. Acknowledgement is unconditional: the pre-flight
    /// checklist is informational, not a gate.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AlreadyFinished` after the terminal state.
    pub fn acknowledge(&mut self) -> Result<(), ExamError> {
        match self.phase {
            ExamPhase::AwaitingAcknowledgement => {
                self.phase = ExamPhase::Answering;
                Ok(())
            }
            ExamPhase::Answering | ExamPhase::Reviewing => Ok(()),
            ExamPhase::Finished => Err(ExamError::AlreadyFinished),
        }
    }

    /// Sets or replaces the tentative choice for the current question.
    ///
    /// # Errors
    ///
    /// Rejects out-of-range indices and any phase other than `Answering`;
    /// the session state is left untouched on rejection.
    pub fn select_option(&mut self, index: usize) -> Result<(), ExamError> {
        self.expect_answering()?;

        let options = self.questions[self.current].options().len();
        if index >= options {
            return Err(ExamError::OptionOutOfRange { index, options });
        }

        self.tentative = Some(index);
        Ok(())
    }

    /// Locks in the tentative choice, scores it, and moves to `Reviewing`.
    ///
    /// Returns whether the submitted answer was correct. An incorrect
    /// answer on a question that carries a task id appends that id to the
    /// session's wrong-task accumulator.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NoSelection` when nothing is selected; phase
    /// errors as for `select_option`. No state changes on rejection.
    pub fn submit(&mut self) -> Result<bool, ExamError> {
        self.expect_answering()?;

        let Some(choice) = self.tentative else {
            return Err(ExamError::NoSelection);
        };

        let question = &self.questions[self.current];
        let correct = question.is_correct(choice);
        self.answers[self.current] = Some(choice);
        if !correct
            && let Some(task_id) = question.task_id()
        {
            self.wrong_tasks.push(task_id.clone());
        }

        self.phase = ExamPhase::Reviewing;
        Ok(correct)
    }

    /// Leaves the feedback view: advances to the next question, or to
    /// `Finished` from the last one.
    ///
    /// The tentative choice is restored from the answers array at the new
    /// position. Sessions are forward-only, so it is always unset in
    /// practice, but random access is tolerated by contract.
    ///
    /// # Errors
    ///
    /// Rejects any phase other than `Reviewing`.
    pub fn advance(&mut self) -> Result<(), ExamError> {
        self.check_expiry()?;
        match self.phase {
            ExamPhase::Reviewing => {}
            ExamPhase::Finished => return Err(ExamError::AlreadyFinished),
            ExamPhase::AwaitingAcknowledgement => return Err(ExamError::NotAcknowledged),
            ExamPhase::Answering => return Err(ExamError::NotReviewing),
        }

        if self.current + 1 >= self.questions.len() {
            self.phase = ExamPhase::Finished;
            self.tentative = None;
        } else {
            self.current += 1;
            self.tentative = self.answers[self.current];
            self.phase = ExamPhase::Answering;
        }
        Ok(())
    }

    /// Advances the countdown by one second.
    ///
    /// Only runs while acknowledged and in progress. Reaching zero forces
    /// the session to `Finished` regardless of sub-phase; questions not yet
    /// submitted count neither correct nor incorrect and produce no
    /// weakness entries.
    pub fn tick(&mut self) {
        if matches!(self.phase, ExamPhase::Answering | ExamPhase::Reviewing) {
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            if self.remaining_secs == 0 {
                self.phase = ExamPhase::Finished;
                self.tentative = None;
            }
        }
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> ExamPhase {
        self.phase
    }

    #[must_use]
    pub fn difficulty(&self) -> ExamDifficulty {
        self.difficulty
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question currently on screen; `None` once finished.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if matches!(self.phase, ExamPhase::Finished) {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    #[must_use]
    pub fn tentative(&self) -> Option<usize> {
        self.tentative
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_acknowledged(&self) -> bool {
        !matches!(self.phase, ExamPhase::AwaitingAcknowledgement)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, ExamPhase::Finished)
    }

    #[must_use]
    pub fn wrong_task_ids(&self) -> &[TaskId] {
        &self.wrong_tasks
    }

    /// Number of questions with a submitted answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// `round(100 * correct / total)` over submitted answers.
    #[must_use]
    pub fn score(&self) -> u8 {
        let correct = self
            .answers
            .iter()
            .zip(self.questions.iter())
            .filter(|(answer, question)| **answer == Some(question.correct_index()))
            .count();
        rounded_percentage(correct, self.questions.len())
    }

    #[must_use]
    pub fn progress(&self) -> ExamProgress {
        ExamProgress {
            total: self.questions.len(),
            answered: self.answered_count(),
            remaining_secs: self.remaining_secs,
            is_finished: self.is_finished(),
        }
    }

    /// The finish surface; `Some` only once the session is terminal.
    #[must_use]
    pub fn report(&self) -> Option<ExamReport> {
        if !self.is_finished() {
            return None;
        }
        Some(ExamReport {
            score: self.score(),
            time_remaining: self.remaining_secs,
            wrong_task_ids: self.wrong_tasks.clone(),
        })
    }

    //
    // ─── GUARDS ────────────────────────────────────────────────────────────────
    //

    /// Expiry is applied before any user transition: if the budget is
    /// already exhausted the session finishes and the transition is
    /// rejected.
    ///
    /// `tick` already finishes the session the moment the counter hits
    /// zero, so callers driving transitions after expiry observe
    /// `AlreadyFinished`; `TimeExpired` only fires if a zero-budget
    /// in-progress state is ever reached without a tick.
    fn check_expiry(&mut self) -> Result<(), ExamError> {
        if matches!(self.phase, ExamPhase::Answering | ExamPhase::Reviewing)
            && self.remaining_secs == 0
        {
            self.phase = ExamPhase::Finished;
            self.tentative = None;
            return Err(ExamError::TimeExpired);
        }
        Ok(())
    }

    fn expect_answering(&mut self) -> Result<(), ExamError> {
        self.check_expiry()?;
        match self.phase {
            ExamPhase::Answering => Ok(()),
            ExamPhase::AwaitingAcknowledgement => Err(ExamError::NotAcknowledged),
            ExamPhase::Reviewing => Err(ExamError::NotAnswering),
            ExamPhase::Finished => Err(ExamError::AlreadyFinished),
        }
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("questions_len", &self.questions.len())
            .field("difficulty", &self.difficulty)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("remaining_secs", &self.remaining_secs)
            .field("wrong_tasks_len", &self.wrong_tasks.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
