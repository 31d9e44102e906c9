// src/handlers/journal.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::journal::{
        CreateJournalRequest, JournalEntry, JournalListParams, UpdateJournalRequest,
    },
    utils::{
        html::{clean_html, clean_optional},
        jwt::Claims,
    },
};

const JOURNAL_COLUMNS: &str = "id, user_id, content, prompt, entry_date, created_at, updated_at";

/// Lists the user's journal entries, most recent first.
/// Supports cursor-based pagination on `entry_date`.
pub async fn list_entries(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<JournalListParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    let entries = sqlx::query_as::<_, JournalEntry>(&format!(
        r#"
        SELECT {}
        FROM journal_entries
        WHERE user_id = $1
          AND ($2::TIMESTAMPTZ IS NULL OR entry_date < $2)
        ORDER BY entry_date DESC
        LIMIT $3
        "#,
        JOURNAL_COLUMNS
    ))
    .bind(claims.user_id()?)
    .bind(params.cursor)
    .bind(limit)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list journal entries: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(entries))
}

pub async fn create_entry(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateJournalRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let content = clean_html(&payload.content);
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("Content cannot be empty".to_string()));
    }

    let entry = sqlx::query_as::<_, JournalEntry>(&format!(
        "INSERT INTO journal_entries (user_id, content, prompt) VALUES ($1, $2, $3) RETURNING {}",
        JOURNAL_COLUMNS
    ))
    .bind(claims.user_id()?)
    .bind(content)
    .bind(clean_optional(payload.prompt.as_deref()))
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(entry_id): Path<i64>,
    Json(payload): Json<UpdateJournalRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let content = clean_html(&payload.content);
    if content.trim().is_empty() {
        return Err(AppError::BadRequest("Content cannot be empty".to_string()));
    }

    let entry = sqlx::query_as::<_, JournalEntry>(&format!(
        r#"
        UPDATE journal_entries
        SET content = $1, updated_at = NOW()
        WHERE id = $2 AND user_id = $3
        RETURNING {}
        "#,
        JOURNAL_COLUMNS
    ))
    .bind(content)
    .bind(entry_id)
    .bind(claims.user_id()?)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Journal entry not found".to_string()))?;

    Ok(Json(entry))
}

pub async fn delete_entry(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(entry_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
        .bind(entry_id)
        .bind(claims.user_id()?)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Journal entry not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
