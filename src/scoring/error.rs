// src/scoring/error.rs

use thiserror::Error;

/// Failures the scoring core can report to its callers.
///
/// Everything else that looks malformed in a submission (missing answers,
/// question ids from another quiz) is a scoring outcome, not an error.
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    /// The quiz id does not resolve to a stored quiz.
    #[error("quiz {0} not found")]
    UnknownQuiz(i64),

    /// The attempt was already finalized; a resubmission must not be applied twice.
    #[error("attempt {0} has already been completed")]
    AlreadyCompleted(i64),

    /// A category name with no matching readiness dimension.
    #[error("invalid readiness category '{0}'")]
    InvalidCategory(String),
}
