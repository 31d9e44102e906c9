// src/models/goal.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::scoring::{GoalProgress, ScoringError};

/// Represents the 'goals' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Stored as text; parsed into `ReadinessCategory` before scoring.
    pub category: String,
    pub target_value: f64,
    pub current_value: f64,
    pub is_completed: bool,
    pub target_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const GOAL_COLUMNS: &str = "id, user_id, title, description, category, target_value, \
     current_value, is_completed, target_date, created_at, updated_at";

impl TryFrom<&Goal> for GoalProgress {
    type Error = ScoringError;

    fn try_from(goal: &Goal) -> Result<Self, Self::Error> {
        Ok(GoalProgress {
            id: goal.id,
            title: goal.title.clone(),
            category: goal.category.parse()?,
            target_value: goal.target_value,
            current_value: goal.current_value,
            is_completed: goal.is_completed,
        })
    }
}

/// DTO for creating a goal.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Must name a readiness dimension.
    pub category: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub target_value: f64,
    pub target_date: Option<DateTime<Utc>>,
}

/// DTO for updating a goal. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateGoalRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub target_value: Option<f64>,
    pub target_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GoalProgressRequest {
    #[validate(range(min = 0.0, max = 100.0))]
    pub current_value: f64,
}

#[derive(Debug, Serialize)]
pub struct GoalProgressResponse {
    pub goal_id: i64,
    pub user_id: i64,
    pub title: String,
    pub current_value: f64,
    pub target_value: f64,
    pub is_completed: bool,
}
