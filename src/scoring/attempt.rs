// src/scoring/attempt.rs

use chrono::{DateTime, Utc};

use super::error::ScoringError;

/// Lifecycle of an attempt: `Started` until its single completion.
///
/// A started attempt that is never submitted stays `Started`; there is no
/// expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Started,
    Completed(DateTime<Utc>),
}

impl AttemptState {
    pub fn from_completed_at(completed_at: Option<DateTime<Utc>>) -> Self {
        match completed_at {
            Some(at) => AttemptState::Completed(at),
            None => AttemptState::Started,
        }
    }
}

/// Rejects a submission against an attempt that was already finalized.
pub fn ensure_attempt_open(attempt_id: i64, state: AttemptState) -> Result<(), ScoringError> {
    match state {
        AttemptState::Started => Ok(()),
        AttemptState::Completed(_) => Err(ScoringError::AlreadyCompleted(attempt_id)),
    }
}
