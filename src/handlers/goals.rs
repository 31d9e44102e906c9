// src/handlers/goals.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::goal::{
        CreateGoalRequest, GOAL_COLUMNS, Goal, GoalProgressRequest, GoalProgressResponse,
        UpdateGoalRequest,
    },
    scoring::{GoalProgress, ReadinessCategory},
    utils::{
        html::{clean_html, clean_optional},
        jwt::Claims,
    },
};

async fn fetch_goal(pool: &PgPool, goal_id: i64, user_id: i64) -> Result<Goal, AppError> {
    sqlx::query_as::<_, Goal>(&format!(
        "SELECT {} FROM goals WHERE id = $1 AND user_id = $2",
        GOAL_COLUMNS
    ))
    .bind(goal_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Goal not found".to_string()))
}

/// Lists the current user's goals, newest first.
pub async fn list_goals(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let goals = sqlx::query_as::<_, Goal>(&format!(
        "SELECT {} FROM goals WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        GOAL_COLUMNS
    ))
    .bind(claims.user_id()?)
    .fetch_all(&pool)
    .await?;

    Ok(Json(goals))
}

/// Creates a goal tracking one readiness dimension.
///
/// The category is normalized before storage, so `"Technical"` and the legacy
/// `"readiness"` are stored as `technical` and `overall`.
pub async fn create_goal(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let category: ReadinessCategory = payload.category.parse()?;

    let goal = sqlx::query_as::<_, Goal>(&format!(
        r#"
        INSERT INTO goals (user_id, title, description, category, target_value, target_date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        GOAL_COLUMNS
    ))
    .bind(claims.user_id()?)
    .bind(clean_html(payload.title.trim()))
    .bind(clean_optional(payload.description.as_deref()))
    .bind(category.as_str())
    .bind(payload.target_value)
    .bind(payload.target_date)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create goal: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn get_goal(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let goal = fetch_goal(&pool, goal_id, claims.user_id()?).await?;
    Ok(Json(goal))
}

/// Partially updates a goal.
///
/// Raising the target never reopens a completed goal; lowering it below the
/// current value completes it.
pub async fn update_goal(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<i64>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let mut goal = fetch_goal(&pool, goal_id, user_id).await?;

    if let Some(title) = payload.title.as_deref() {
        goal.title = clean_html(title.trim());
    }
    if payload.description.is_some() {
        goal.description = clean_optional(payload.description.as_deref());
    }
    if let Some(category) = payload.category.as_deref() {
        goal.category = category.parse::<ReadinessCategory>()?.as_str().to_string();
    }
    if let Some(target_value) = payload.target_value {
        goal.target_value = target_value;
    }
    if payload.target_date.is_some() {
        goal.target_date = payload.target_date;
    }

    // Completion is evaluated against the stored row so a submission that
    // completed the goal since the read above is never undone.
    let goal = sqlx::query_as::<_, Goal>(&format!(
        r#"
        UPDATE goals
        SET title = $1, description = $2, category = $3, target_value = $4,
            target_date = $5, is_completed = is_completed OR current_value >= $4,
            updated_at = NOW()
        WHERE id = $6 AND user_id = $7
        RETURNING {}
        "#,
        GOAL_COLUMNS
    ))
    .bind(&goal.title)
    .bind(&goal.description)
    .bind(&goal.category)
    .bind(goal.target_value)
    .bind(goal.target_date)
    .bind(goal_id)
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Goal not found".to_string()))?;

    Ok(Json(goal))
}

pub async fn delete_goal(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
        .bind(goal_id)
        .bind(claims.user_id()?)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Goal not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Records manual progress on a goal. Completion is sticky.
pub async fn update_goal_progress(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(goal_id): Path<i64>,
    Json(payload): Json<GoalProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let goal = fetch_goal(&pool, goal_id, user_id).await?;

    let mut progress = GoalProgress::try_from(&goal)?;
    progress.record(payload.current_value);

    let goal = sqlx::query_as::<_, Goal>(&format!(
        r#"
        UPDATE goals
        SET current_value = $1, is_completed = is_completed OR $2, updated_at = NOW()
        WHERE id = $3 AND user_id = $4
        RETURNING {}
        "#,
        GOAL_COLUMNS
    ))
    .bind(progress.current_value)
    .bind(progress.is_completed)
    .bind(goal_id)
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Goal not found".to_string()))?;

    Ok(Json(GoalProgressResponse {
        goal_id,
        user_id,
        title: goal.title,
        current_value: goal.current_value,
        target_value: goal.target_value,
        is_completed: goal.is_completed,
    }))
}
