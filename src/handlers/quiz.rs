// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgConnection, PgPool, types::Json as SqlJson};

use crate::{
    error::AppError,
    models::{
        attempt::{
            ATTEMPT_COLUMNS, AttemptInfo, AttemptResultResponse, QuizAttempt, QuizInfo,
            QuizSubmitResponse, StartAttemptResponse,
        },
        goal::{GOAL_COLUMNS, Goal},
        quiz::{OptionRow, QuestionRow, QuizListParams, QuizRow, QuizSummary, QuizTree},
        user::ReadinessRow,
    },
    scoring::{
        GoalProgress, ReadinessScores, ScoringError, Submission, apply_readiness_update,
        build_feedback, ensure_attempt_open, score_submission, sync_goals,
    },
    utils::jwt::Claims,
};

/// Loads a quiz with its ordered questions and options.
///
/// Takes a connection so the submit path can read the tree inside its
/// transaction.
pub(crate) async fn load_quiz_tree(
    conn: &mut PgConnection,
    quiz_id: i64,
) -> Result<Option<QuizTree>, AppError> {
    let quiz = sqlx::query_as::<_, QuizRow>(
        r#"
        SELECT
            q.id, q.specialization_id, q.title, q.description, q.difficulty_level,
            q.time_limit_minutes, q.passing_score, sp.readiness_category
        FROM quizzes q
        JOIN specializations sp ON sp.id = q.specialization_id
        WHERE q.id = $1
        "#,
    )
    .bind(quiz_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(quiz) = quiz else {
        return Ok(None);
    };

    let questions = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, quiz_id, question_text, question_type, points, explanation, position
        FROM questions
        WHERE quiz_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&mut *conn)
    .await?;

    let options = sqlx::query_as::<_, OptionRow>(
        r#"
        SELECT o.id, o.question_id, o.option_text, o.is_correct, o.position
        FROM question_options o
        JOIN questions q ON q.id = o.question_id
        WHERE q.quiz_id = $1
        ORDER BY o.question_id, o.position, o.id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(QuizTree {
        quiz,
        questions,
        options,
    }))
}

/// Lists quizzes, optionally restricted to one specialization.
pub async fn list_quizzes(
    State(pool): State<PgPool>,
    Query(params): Query<QuizListParams>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT
            q.id, q.title, q.description, q.specialization_id,
            sp.name AS specialization_name,
            q.difficulty_level, q.time_limit_minutes, q.passing_score,
            (SELECT COUNT(*) FROM questions qs WHERE qs.quiz_id = q.id) AS question_count
        FROM quizzes q
        JOIN specializations sp ON sp.id = q.specialization_id
        WHERE ($1::BIGINT IS NULL OR q.specialization_id = $1)
          AND sp.is_active = TRUE
        ORDER BY q.difficulty_level, q.title
        "#,
    )
    .bind(params.specialization_id)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list quizzes: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(serde_json::json!({ "quizzes": quizzes })))
}

/// Returns a quiz with its questions and options, hiding which option is
/// correct.
pub async fn get_quiz(
    State(pool): State<PgPool>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let tree = load_quiz_tree(&mut conn, quiz_id)
        .await?
        .ok_or(ScoringError::UnknownQuiz(quiz_id))?;

    Ok(Json(tree.to_public()))
}

/// Starts a new attempt for the current user.
pub async fn start_attempt(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let quiz: Option<(i64,)> = sqlx::query_as("SELECT id FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(&pool)
        .await?;
    if quiz.is_none() {
        return Err(ScoringError::UnknownQuiz(quiz_id).into());
    }

    let attempt = sqlx::query_as::<_, QuizAttempt>(&format!(
        "INSERT INTO quiz_attempts (user_id, quiz_id) VALUES ($1, $2) RETURNING {}",
        ATTEMPT_COLUMNS
    ))
    .bind(user_id)
    .bind(quiz_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to start attempt: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(user_id, quiz_id, attempt_id = attempt.id, "attempt started");

    Ok((
        StatusCode::CREATED,
        Json(StartAttemptResponse {
            attempt_id: attempt.id,
            quiz_id,
            started_at: attempt.started_at,
            message: "Quiz started".to_string(),
        }),
    ))
}

/// Submits answers for an attempt.
///
/// Runs in one transaction: the attempt row is locked, checked to still be
/// open, scored, and then the user's readiness scores, matching goals and the
/// attempt itself are written together. Any error drops the transaction and
/// nothing is applied. A second submission of the same attempt waits on the
/// row lock and is then rejected with 409.
pub async fn submit_attempt(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<i64>,
    Json(submission): Json<Submission>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let mut tx = pool.begin().await?;

    let attempt = sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {} FROM quiz_attempts WHERE id = $1 AND user_id = $2 FOR UPDATE",
        ATTEMPT_COLUMNS
    ))
    .bind(attempt_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Attempt not found".to_string()))?;

    if let Err(e) = ensure_attempt_open(attempt.id, attempt.state()) {
        tracing::warn!(attempt_id, user_id, "rejected resubmission of a completed attempt");
        return Err(e.into());
    }

    let tree = load_quiz_tree(&mut tx, attempt.quiz_id)
        .await?
        .ok_or(ScoringError::UnknownQuiz(attempt.quiz_id))?;
    let quiz = tree.to_definition().map_err(|e| {
        AppError::InternalServerError(format!("quiz {} is misconfigured: {}", attempt.quiz_id, e))
    })?;

    let result = score_submission(&quiz, &submission);

    let scores: ReadinessScores = sqlx::query_as::<_, ReadinessRow>(
        r#"
        SELECT readiness_score, technical_score, soft_skills_score, leadership_score
        FROM users
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?
    .into();

    let (new_scores, impact) = apply_readiness_update(scores, &quiz, &result);

    sqlx::query(
        r#"
        UPDATE users
        SET readiness_score = $1, technical_score = $2, soft_skills_score = $3, leadership_score = $4
        WHERE id = $5
        "#,
    )
    .bind(new_scores.overall)
    .bind(new_scores.technical)
    .bind(new_scores.soft_skills)
    .bind(new_scores.leadership)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let goals = sqlx::query_as::<_, Goal>(&format!(
        "SELECT {} FROM goals WHERE user_id = $1 ORDER BY id",
        GOAL_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    let tracked: Vec<GoalProgress> = goals
        .iter()
        .filter_map(|goal| match GoalProgress::try_from(goal) {
            Ok(progress) => Some(progress),
            Err(e) => {
                tracing::warn!(goal_id = goal.id, "skipping goal during sync: {}", e);
                None
            }
        })
        .collect();

    let updated_goals = sync_goals(&tracked, &impact);

    for update in &updated_goals {
        sqlx::query(
            "UPDATE goals SET current_value = $1, is_completed = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(update.new_value)
        .bind(update.is_completed)
        .bind(update.goal_id)
        .execute(&mut *tx)
        .await?;
    }

    let finalized = sqlx::query(
        r#"
        UPDATE quiz_attempts
        SET completed_at = NOW(), raw_score = $1, max_score = $2, score = $3, passed = $4,
            question_results = $5
        WHERE id = $6 AND completed_at IS NULL
        "#,
    )
    .bind(i32::try_from(result.raw_score).unwrap_or(i32::MAX))
    .bind(i32::try_from(result.max_score).unwrap_or(i32::MAX))
    .bind(result.normalized_score)
    .bind(result.passed)
    .bind(SqlJson(&result.question_results))
    .bind(attempt.id)
    .execute(&mut *tx)
    .await?;

    if finalized.rows_affected() != 1 {
        return Err(ScoringError::AlreadyCompleted(attempt.id).into());
    }

    tx.commit().await.map_err(|e| {
        tracing::error!("Failed to commit submission for attempt {}: {:?}", attempt.id, e);
        AppError::from(e)
    })?;

    tracing::info!(
        attempt_id = attempt.id,
        user_id,
        score = result.normalized_score,
        passed = result.passed,
        category = %impact.category,
        goals_updated = updated_goals.len(),
        "attempt completed"
    );

    let feedback = build_feedback(&result, quiz.passing_score);
    let message = if result.passed {
        "Congratulations, you passed!".to_string()
    } else {
        "Quiz submitted. Keep practicing!".to_string()
    };

    Ok(Json(QuizSubmitResponse {
        success: true,
        score: result.normalized_score,
        correct: result.correct_count(),
        total: result.total_questions(),
        passed: result.passed,
        message,
        readiness: new_scores,
        feedback,
        raw_score: result.raw_score,
        max_score: result.max_score,
        question_results: result.question_results,
        score_impact: impact,
        quiz_title: quiz.title,
        passing_score: quiz.passing_score,
        updated_goals,
    }))
}

/// Returns a stored attempt with its quiz and the user's current readiness.
///
/// An attempt that was started but never submitted is returned as is, with
/// empty results.
pub async fn get_attempt_results(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let attempt = sqlx::query_as::<_, QuizAttempt>(&format!(
        "SELECT {} FROM quiz_attempts WHERE id = $1 AND user_id = $2",
        ATTEMPT_COLUMNS
    ))
    .bind(attempt_id)
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Attempt not found".to_string()))?;

    let quiz = sqlx::query_as::<_, QuizInfo>(
        "SELECT id AS quiz_id, title, description, passing_score FROM quizzes WHERE id = $1",
    )
    .bind(attempt.quiz_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(ScoringError::UnknownQuiz(attempt.quiz_id))?;

    let readiness: ReadinessScores = sqlx::query_as::<_, ReadinessRow>(
        "SELECT readiness_score, technical_score, soft_skills_score, leadership_score FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?
    .into();

    Ok(Json(AttemptResultResponse {
        attempt: AttemptInfo::from(&attempt),
        quiz,
        readiness,
        question_results: attempt
            .question_results
            .map(|SqlJson(results)| results)
            .unwrap_or_default(),
    }))
}
