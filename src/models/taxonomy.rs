// src/models/taxonomy.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A row of the 'sectors' table with the number of active branches under it.
#[derive(Debug, Serialize, FromRow)]
pub struct Sector {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub branch_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Branch {
    pub id: i64,
    pub sector_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub specialization_count: i64,
}

/// A specialization and the readiness dimension its quizzes feed.
#[derive(Debug, Serialize, FromRow)]
pub struct Specialization {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// One of `overall`, `technical`, `soft_skills`, `leadership`.
    pub readiness_category: String,
    pub is_active: bool,
    pub quiz_count: i64,
}
