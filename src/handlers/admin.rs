// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{USER_COLUMNS, User},
    utils::jwt::Claims,
};

/// Platform-wide counters for the admin dashboard.
#[derive(Debug, Serialize, FromRow)]
pub struct AdminStats {
    pub total_users: i64,
    pub active_users: i64,
    pub total_quizzes: i64,
    pub total_attempts: i64,
    pub completed_attempts: i64,
    pub total_goals: i64,
    pub completed_goals: i64,
    pub average_readiness: f64,
}

/// Row of the admin user list.
#[derive(Debug, Serialize, FromRow)]
pub struct AdminUserItem {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub is_active: bool,
    pub specialization_name: Option<String>,
    pub readiness_score: f64,
    pub technical_score: f64,
    pub soft_skills_score: f64,
    pub leadership_score: f64,
    pub completed_attempts: i64,
    pub created_at: DateTime<Utc>,
}

/// DTO for updating a user. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    pub is_active: Option<bool>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    match role {
        "user" | "admin" => Ok(()),
        _ => Err(validator::ValidationError::new("role")
            .with_message("Role must be 'user' or 'admin'".into())),
    }
}

/// Admin only.
pub async fn get_stats(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let stats = sqlx::query_as::<_, AdminStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM users WHERE is_active) AS active_users,
            (SELECT COUNT(*) FROM quizzes) AS total_quizzes,
            (SELECT COUNT(*) FROM quiz_attempts) AS total_attempts,
            (SELECT COUNT(*) FROM quiz_attempts WHERE completed_at IS NOT NULL) AS completed_attempts,
            (SELECT COUNT(*) FROM goals) AS total_goals,
            (SELECT COUNT(*) FROM goals WHERE is_completed) AS completed_goals,
            (SELECT COALESCE(AVG(readiness_score), 0)::DOUBLE PRECISION FROM users WHERE is_active) AS average_readiness
        "#,
    )
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load admin stats: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(stats))
}

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, AdminUserItem>(
        r#"
        SELECT
            u.id, u.email, u.name, u.role, u.is_active,
            sp.name AS specialization_name,
            u.readiness_score, u.technical_score, u.soft_skills_score, u.leadership_score,
            (SELECT COUNT(*) FROM quiz_attempts a
             WHERE a.user_id = u.id AND a.completed_at IS NOT NULL) AS completed_attempts,
            u.created_at
        FROM users u
        LEFT JOIN specializations sp ON sp.id = u.preferred_specialization_id
        ORDER BY u.id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(users))
}

/// An admin may not lock themselves out, either by deactivating their own
/// account or by dropping their own admin role.
fn check_self_update(payload: &AdminUpdateUserRequest) -> Result<(), AppError> {
    if payload.is_active == Some(false) {
        return Err(AppError::BadRequest("Cannot deactivate yourself".to_string()));
    }
    if payload.role.as_deref().is_some_and(|role| role != "admin") {
        return Err(AppError::BadRequest(
            "Cannot remove your own admin role".to_string(),
        ));
    }
    Ok(())
}

/// Activates/deactivates a user or changes their role.
/// Admin only. An admin cannot deactivate or demote themselves.
pub async fn update_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if id == claims.user_id()? {
        check_self_update(&payload)?;
    }

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET is_active = COALESCE($1, is_active), role = COALESCE($2, role)
        WHERE id = $3
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(payload.is_active)
    .bind(payload.role.as_deref())
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    tracing::info!(
        admin_id = %claims.sub,
        user_id = id,
        is_active = user.is_active,
        role = %user.role,
        "user updated by admin"
    );

    Ok(Json(user))
}
