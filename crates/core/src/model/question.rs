use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{QuestionId, TaskId};

//
// ─── DIFFICULTY & LIFECYCLE ────────────────────────────────────────────────────
//

/// Difficulty tier for an exam simulation.
///
/// Difficulty scales the question count, not the per-question time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamDifficulty {
    Easy,
    Medium,
    Hard,
}

impl ExamDifficulty {
    /// Number of questions generated for a simulation at this tier.
    #[must_use]
    pub fn question_count(self) -> usize {
        match self {
            ExamDifficulty::Easy => 5,
            ExamDifficulty::Medium => 10,
            ExamDifficulty::Hard => 20,
        }
    }
}

impl fmt::Display for ExamDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExamDifficulty::Easy => "easy",
            ExamDifficulty::Medium => "medium",
            ExamDifficulty::Hard => "hard",
        };
        write!(f, "{label}")
    }
}

/// Project-lifecycle lens applied to enabler insight prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectLifecycle {
    Predictive,
    Agile,
    Hybrid,
}

impl fmt::Display for ProjectLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectLifecycle::Predictive => "predictive",
            ProjectLifecycle::Agile => "agile",
            ProjectLifecycle::Hybrid => "hybrid",
        };
        write!(f, "{label}")
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("correct answer index {index} out of range for {options} options")]
    CorrectIndexOutOfRange { index: usize, options: usize },
}

/// A single generated exam question.
///
/// The optional task id ties a wrong answer back to the Weakness Record;
/// questions without one still score but never produce a failure entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    domain: String,
    task_id: Option<TaskId>,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::TooFewOptions` for fewer than two options and
    /// `QuestionError::CorrectIndexOutOfRange` when the correct-answer index
    /// does not point into the option list.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
        domain: impl Into<String>,
        task_id: Option<TaskId>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            text: text.trim().to_owned(),
            options,
            correct_index,
            explanation: explanation.into(),
            domain: domain.into(),
            task_id,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Display label of the domain the question was generated for.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn task_id(&self) -> Option<&TaskId> {
        self.task_id.as_ref()
    }

    /// Whether the given option index is the correct answer.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
