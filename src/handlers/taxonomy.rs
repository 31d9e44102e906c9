// src/handlers/taxonomy.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::taxonomy::{Branch, Sector, Specialization},
};

/// Lists active sectors with the number of active branches in each.
pub async fn list_sectors(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let sectors = sqlx::query_as::<_, Sector>(
        r#"
        SELECT
            s.id, s.name, s.description, s.is_active, s.created_at,
            (SELECT COUNT(*) FROM branches b WHERE b.sector_id = s.id AND b.is_active) AS branch_count
        FROM sectors s
        WHERE s.is_active = TRUE
        ORDER BY s.name
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(sectors))
}

/// Lists the active branches of one sector.
pub async fn list_branches(
    State(pool): State<PgPool>,
    Path(sector_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let sector: Option<(i64,)> = sqlx::query_as("SELECT id FROM sectors WHERE id = $1")
        .bind(sector_id)
        .fetch_optional(&pool)
        .await?;
    if sector.is_none() {
        return Err(AppError::NotFound("Sector not found".to_string()));
    }

    let branches = sqlx::query_as::<_, Branch>(
        r#"
        SELECT
            b.id, b.sector_id, b.name, b.description, b.is_active,
            (SELECT COUNT(*) FROM specializations sp WHERE sp.branch_id = b.id AND sp.is_active) AS specialization_count
        FROM branches b
        WHERE b.sector_id = $1 AND b.is_active = TRUE
        ORDER BY b.name
        "#,
    )
    .bind(sector_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(branches))
}

/// Lists the active specializations of one branch, each with the readiness
/// category its quizzes feed.
pub async fn list_specializations(
    State(pool): State<PgPool>,
    Path(branch_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let branch: Option<(i64,)> = sqlx::query_as("SELECT id FROM branches WHERE id = $1")
        .bind(branch_id)
        .fetch_optional(&pool)
        .await?;
    if branch.is_none() {
        return Err(AppError::NotFound("Branch not found".to_string()));
    }

    let specializations = sqlx::query_as::<_, Specialization>(
        r#"
        SELECT
            sp.id, sp.branch_id, sp.name, sp.description, sp.readiness_category, sp.is_active,
            (SELECT COUNT(*) FROM quizzes q WHERE q.specialization_id = sp.id) AS quiz_count
        FROM specializations sp
        WHERE sp.branch_id = $1 AND sp.is_active = TRUE
        ORDER BY sp.name
        "#,
    )
    .bind(branch_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(specializations))
}
