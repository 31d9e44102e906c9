//! Quiz scoring and readiness bookkeeping.
//!
//! Everything in here is free of I/O: handlers load the quiz tree, scores and
//! goals, call these functions inside one transaction, and write the results
//! back.

pub mod attempt;
pub mod benchmark;
pub mod category;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod goals;
pub mod readiness;

pub use attempt::{AttemptState, ensure_attempt_open};
pub use benchmark::{PeerBenchmarkData, benchmark};
pub use category::ReadinessCategory;
pub use engine::{
    OptionDefinition, QuestionDefinition, QuestionResult, QuizDefinition, QuizResult, Submission,
    SubmittedAnswer, score_submission,
};
pub use error::ScoringError;
pub use feedback::{FeedbackDetail, build_feedback};
pub use goals::{GoalProgress, GoalUpdate, sync_goals};
pub use readiness::{ReadinessScores, ScoreImpact, apply_readiness_update};
