// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

use crate::{
    config::DASHBOARD_RECENT_QUIZZES,
    error::AppError,
    models::{
        dashboard::{ActiveGoalItem, DashboardSummary, QuizHistoryItem, QuizStats},
        goal::{GOAL_COLUMNS, Goal},
        user::{ReadinessRow, USER_COLUMNS, UpdateSpecializationRequest, User},
    },
    scoring::{ReadinessScores, benchmark},
    utils::jwt::Claims,
};

async fn fetch_user(pool: &PgPool, user_id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
}

/// Get current user's profile, including readiness scores.
pub async fn get_me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = fetch_user(&pool, claims.user_id()?).await?;
    Ok(Json(user))
}

/// Sets the user's preferred specialization (used for peer benchmarks).
pub async fn update_specialization(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateSpecializationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let exists: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM specializations WHERE id = $1 AND is_active = TRUE")
            .bind(payload.specialization_id)
            .fetch_optional(&pool)
            .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Specialization not found".to_string()));
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET preferred_specialization_id = $1 WHERE id = $2 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(payload.specialization_id)
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(json!({ "success": true, "user": user })))
}

/// Aggregated dashboard: readiness, attempt statistics, recent quizzes and
/// active goals.
pub async fn get_dashboard(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = fetch_user(&pool, claims.user_id()?).await?;

    let specialization_name: Option<String> = match user.preferred_specialization_id {
        Some(id) => sqlx::query_scalar::<_, String>("SELECT name FROM specializations WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await?,
        None => None,
    };

    let quiz_stats = sqlx::query_as::<_, QuizStats>(
        r#"
        SELECT
            COUNT(*) AS total_attempts,
            COUNT(completed_at) AS completed_attempts,
            COUNT(*) FILTER (WHERE passed) AS passed_attempts,
            COALESCE(AVG(score) FILTER (WHERE completed_at IS NOT NULL), 0)::DOUBLE PRECISION AS average_score
        FROM quiz_attempts
        WHERE user_id = $1
        "#,
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await?;

    let recent_quizzes = sqlx::query_as::<_, QuizHistoryItem>(
        r#"
        SELECT
            a.id AS attempt_id,
            a.quiz_id,
            q.title AS quiz_title,
            COALESCE(a.score, 0) AS score,
            COALESCE(a.passed, FALSE) AS passed,
            a.completed_at
        FROM quiz_attempts a
        JOIN quizzes q ON q.id = a.quiz_id
        WHERE a.user_id = $1 AND a.completed_at IS NOT NULL
        ORDER BY a.completed_at DESC
        LIMIT $2
        "#,
    )
    .bind(user.id)
    .bind(DASHBOARD_RECENT_QUIZZES)
    .fetch_all(&pool)
    .await?;

    let goals = sqlx::query_as::<_, Goal>(&format!(
        "SELECT {} FROM goals WHERE user_id = $1 AND is_completed = FALSE ORDER BY created_at DESC",
        GOAL_COLUMNS
    ))
    .bind(user.id)
    .fetch_all(&pool)
    .await?;

    let active_goals = goals
        .into_iter()
        .map(|g| ActiveGoalItem {
            progress_percentage: ActiveGoalItem::progress(g.current_value, g.target_value),
            goal_id: g.id,
            title: g.title,
            category: g.category,
            target_value: g.target_value,
            current_value: g.current_value,
        })
        .collect();

    let last_activity = sqlx::query_scalar::<_, Option<chrono::DateTime<Utc>>>(
        "SELECT MAX(COALESCE(completed_at, started_at)) FROM quiz_attempts WHERE user_id = $1",
    )
    .bind(user.id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(DashboardSummary {
        user_id: user.id,
        readiness_scores: user.readiness(),
        name: user.name,
        email: user.email,
        specialization_name,
        quiz_stats,
        recent_quizzes,
        active_goals,
        last_activity,
    }))
}

/// Compares the user's readiness with other active users in the same
/// preferred specialization.
pub async fn get_peer_benchmark(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = fetch_user(&pool, claims.user_id()?).await?;

    let specialization_id = user.preferred_specialization_id.ok_or(AppError::BadRequest(
        "Select a preferred specialization to see peer benchmarks".to_string(),
    ))?;

    let specialization_name: String =
        sqlx::query_scalar::<_, String>("SELECT name FROM specializations WHERE id = $1")
            .bind(specialization_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Specialization not found".to_string()))?;

    let peers: Vec<ReadinessScores> = sqlx::query_as::<_, ReadinessRow>(
        r#"
        SELECT readiness_score, technical_score, soft_skills_score, leadership_score
        FROM users
        WHERE preferred_specialization_id = $1 AND id <> $2 AND is_active = TRUE
        "#,
    )
    .bind(specialization_id)
    .bind(user.id)
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(ReadinessScores::from)
    .collect();

    let data = benchmark(&user.readiness(), &peers, &specialization_name, Utc::now());

    Ok(Json(json!({ "success": true, "data": data })))
}
