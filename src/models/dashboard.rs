// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::scoring::ReadinessScores;

#[derive(Debug, Serialize, FromRow)]
pub struct QuizStats {
    pub total_attempts: i64,
    pub completed_attempts: i64,
    pub passed_attempts: i64,
    /// Mean normalized score over completed attempts, 0 when there are none.
    pub average_score: f64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct QuizHistoryItem {
    pub attempt_id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: f64,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ActiveGoalItem {
    pub goal_id: i64,
    pub title: String,
    pub category: String,
    pub target_value: f64,
    pub current_value: f64,
    pub progress_percentage: f64,
}

impl ActiveGoalItem {
    /// Progress toward the target, capped at 100.
    pub fn progress(current_value: f64, target_value: f64) -> f64 {
        if target_value <= 0.0 {
            return 100.0;
        }
        (100.0 * current_value / target_value).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub specialization_name: Option<String>,
    pub readiness_scores: ReadinessScores,
    pub quiz_stats: QuizStats,
    pub recent_quizzes: Vec<QuizHistoryItem>,
    pub active_goals: Vec<ActiveGoalItem>,
    pub last_activity: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_capped() {
        assert_eq!(ActiveGoalItem::progress(40.0, 80.0), 50.0);
        assert_eq!(ActiveGoalItem::progress(95.0, 80.0), 100.0);
        assert_eq!(ActiveGoalItem::progress(10.0, 0.0), 100.0);
    }
}
