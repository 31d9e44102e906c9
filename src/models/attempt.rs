// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, types::Json};

use crate::scoring::{
    AttemptState, FeedbackDetail, GoalUpdate, QuestionResult, ReadinessScores, ScoreImpact,
};

/// Represents the 'quiz_attempts' table.
/// Score columns stay NULL until the single completion.
#[derive(Debug, Clone, FromRow)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub raw_score: Option<i32>,
    pub max_score: Option<i32>,
    pub score: Option<f64>,
    pub passed: Option<bool>,
    pub question_results: Option<Json<Vec<QuestionResult>>>,
}

impl QuizAttempt {
    pub fn state(&self) -> AttemptState {
        AttemptState::from_completed_at(self.completed_at)
    }
}

pub const ATTEMPT_COLUMNS: &str = "id, user_id, quiz_id, started_at, completed_at, raw_score, \
     max_score, score, passed, question_results";

#[derive(Debug, Serialize)]
pub struct StartAttemptResponse {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub started_at: DateTime<Utc>,
    pub message: String,
}

/// Response for a successful submission.
#[derive(Debug, Serialize)]
pub struct QuizSubmitResponse {
    pub success: bool,
    pub score: f64,
    pub correct: usize,
    pub total: usize,
    pub passed: bool,
    pub message: String,
    pub readiness: ReadinessScores,
    pub feedback: FeedbackDetail,
    pub question_results: Vec<QuestionResult>,
    pub score_impact: ScoreImpact,
    pub quiz_title: String,
    pub passing_score: f64,
    pub raw_score: u32,
    pub max_score: u32,
    pub updated_goals: Vec<GoalUpdate>,
}

#[derive(Debug, Serialize)]
pub struct AttemptInfo {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub passed: Option<bool>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct QuizInfo {
    pub quiz_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub passing_score: f64,
}

#[derive(Debug, Serialize)]
pub struct AttemptResultResponse {
    pub attempt: AttemptInfo,
    pub quiz: QuizInfo,
    pub readiness: ReadinessScores,
    pub question_results: Vec<QuestionResult>,
}

impl From<&QuizAttempt> for AttemptInfo {
    fn from(a: &QuizAttempt) -> Self {
        AttemptInfo {
            attempt_id: a.id,
            quiz_id: a.quiz_id,
            started_at: a.started_at,
            completed_at: a.completed_at,
            score: a.score,
            passed: a.passed,
        }
    }
}
