// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::scoring::ReadinessScores;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique login email.
    pub email: String,

    pub name: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// User role: 'user' or 'admin'.
    pub role: String,

    /// Deactivated users cannot log in.
    pub is_active: bool,

    pub preferred_specialization_id: Option<i64>,

    pub readiness_score: f64,
    pub technical_score: f64,
    pub soft_skills_score: f64,
    pub leadership_score: f64,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn readiness(&self) -> ReadinessScores {
        ReadinessScores {
            overall: self.readiness_score,
            technical: self.technical_score,
            soft_skills: self.soft_skills_score,
            leadership: self.leadership_score,
        }
    }
}

/// Column list matching `User`, shared by every query that loads one.
pub const USER_COLUMNS: &str = "id, email, name, password, role, is_active, preferred_specialization_id, \
     readiness_score, technical_score, soft_skills_score, leadership_score, created_at";

/// The four readiness columns of a user row.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReadinessRow {
    pub readiness_score: f64,
    pub technical_score: f64,
    pub soft_skills_score: f64,
    pub leadership_score: f64,
}

impl From<ReadinessRow> for ReadinessScores {
    fn from(row: ReadinessRow) -> Self {
        ReadinessScores {
            overall: row.readiness_score,
            technical: row.technical_score,
            soft_skills: row.soft_skills_score,
            leadership: row.leadership_score,
        }
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name length must be between 1 and 100 characters."
    ))]
    pub name: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Password length must be between 8 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSpecializationRequest {
    pub specialization_id: i64,
}
