// src/models/journal.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'journal_entries' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: i64,
    /// Sanitized HTML.
    pub content: String,
    /// The reflection prompt the entry answers, if any.
    pub prompt: Option<String>,
    pub entry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalRequest {
    #[validate(length(
        min = 1,
        max = 10000,
        message = "Content length must be between 1 and 10000 chars"
    ))]
    pub content: String,
    #[validate(length(max = 500))]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJournalRequest {
    #[validate(length(
        min = 1,
        max = 10000,
        message = "Content length must be between 1 and 10000 chars"
    ))]
    pub content: String,
}

/// Query parameters for listing journal entries.
#[derive(Debug, Deserialize)]
pub struct JournalListParams {
    /// Cursor for pagination: the entry_date of the last entry in the previous page.
    pub cursor: Option<DateTime<Utc>>,
    /// Number of items to return (default: 20, max: 100).
    pub limit: Option<i64>,
}
