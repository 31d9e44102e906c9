// src/seed.rs

//! Startup seeding: the configured admin account and an optional JSON
//! fixture describing the taxonomy and its quizzes.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use validator::{Validate, ValidationError};

use crate::{
    config::Config, error::AppError, scoring::ReadinessCategory, utils::hash::hash_password,
};

#[derive(Debug, Deserialize)]
pub struct SeedFixture {
    pub sectors: Vec<FixtureSector>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureSector {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub branches: Vec<FixtureBranch>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureBranch {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub specializations: Vec<FixtureSpecialization>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureSpecialization {
    pub name: String,
    pub description: Option<String>,
    pub readiness_category: ReadinessCategory,
    #[serde(default)]
    pub quizzes: Vec<FixtureQuiz>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FixtureQuiz {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub difficulty_level: i32,
    #[serde(default = "default_time_limit")]
    #[validate(range(min = 1))]
    pub time_limit_minutes: i32,
    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score: f64,
    #[validate(length(min = 1), nested)]
    pub questions: Vec<FixtureQuestion>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct FixtureQuestion {
    #[validate(length(min = 1))]
    pub question_text: String,
    #[serde(default = "default_question_type")]
    pub question_type: String,
    #[serde(default = "default_points")]
    #[validate(range(min = 0))]
    pub points: i32,
    pub explanation: Option<String>,
    #[validate(
        length(min = 2, message = "A question needs at least two options"),
        custom(function = "exactly_one_correct")
    )]
    pub options: Vec<FixtureOption>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FixtureOption {
    pub option_text: String,
    #[serde(default)]
    pub is_correct: bool,
}

fn default_time_limit() -> i32 {
    30
}

fn default_question_type() -> String {
    "multiple_choice".to_string()
}

fn default_points() -> i32 {
    10
}

fn exactly_one_correct(options: &[FixtureOption]) -> Result<(), ValidationError> {
    if options.iter().filter(|o| o.is_correct).count() == 1 {
        Ok(())
    } else {
        Err(ValidationError::new("exactly_one_correct")
            .with_message("A question needs exactly one correct option".into()))
    }
}

/// What a fixture load inserted.
#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    pub specializations: usize,
    pub quizzes: usize,
    pub questions: usize,
    pub skipped_quizzes: usize,
}

pub fn parse_fixture(raw: &str) -> Result<SeedFixture, AppError> {
    Ok(serde_json::from_str(raw)?)
}

/// Creates the admin account from `ADMIN_EMAIL` / `ADMIN_PASSWORD` when both
/// are set and no user with that email exists.
pub async fn seed_admin_user(pool: &PgPool, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        tracing::info!("Seeding admin user: {}", email);
        let hashed_password = hash_password(password)?;

        sqlx::query("INSERT INTO users (email, name, password, role) VALUES ($1, 'Administrator', $2, 'admin')")
            .bind(&email)
            .bind(hashed_password)
            .execute(pool)
            .await?;
        tracing::info!("Admin user created successfully.");
    }

    Ok(())
}

/// Loads the fixture at `path` if the database has no quizzes yet.
///
/// Everything is inserted in one transaction. Quizzes failing validation are
/// skipped with a warning; the rest of the fixture still loads. Returns `None`
/// when the database already had quizzes.
pub async fn seed_fixtures(pool: &PgPool, path: &str) -> Result<Option<SeedReport>, AppError> {
    let existing: i64 = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quizzes")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!("Quizzes already present, skipping fixture {}", path);
        return Ok(None);
    }

    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::InternalServerError(format!("Failed to read seed file {}: {}", path, e))
    })?;
    let fixture = parse_fixture(&raw)?;

    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();

    for sector in &fixture.sectors {
        let sector_id: i64 = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sectors (name, description) VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET description = EXCLUDED.description
            RETURNING id
            "#,
        )
        .bind(&sector.name)
        .bind(&sector.description)
        .fetch_one(&mut *tx)
        .await?;

        for branch in &sector.branches {
            let branch_id: i64 = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO branches (sector_id, name, description) VALUES ($1, $2, $3)
                ON CONFLICT (sector_id, name) DO UPDATE SET description = EXCLUDED.description
                RETURNING id
                "#,
            )
            .bind(sector_id)
            .bind(&branch.name)
            .bind(&branch.description)
            .fetch_one(&mut *tx)
            .await?;

            for specialization in &branch.specializations {
                let specialization_id: i64 = sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO specializations (branch_id, name, description, readiness_category)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (branch_id, name) DO UPDATE
                    SET description = EXCLUDED.description,
                        readiness_category = EXCLUDED.readiness_category
                    RETURNING id
                    "#,
                )
                .bind(branch_id)
                .bind(&specialization.name)
                .bind(&specialization.description)
                .bind(specialization.readiness_category.as_str())
                .fetch_one(&mut *tx)
                .await?;
                report.specializations += 1;

                for quiz in &specialization.quizzes {
                    if let Err(e) = quiz.validate() {
                        tracing::warn!(
                            "Skipping fixture quiz '{}' in '{}': {}",
                            quiz.title,
                            specialization.name,
                            e
                        );
                        report.skipped_quizzes += 1;
                        continue;
                    }

                    report.questions += insert_quiz(&mut tx, specialization_id, quiz).await?;
                    report.quizzes += 1;
                }
            }
        }
    }

    tx.commit().await?;

    tracing::info!(
        specializations = report.specializations,
        quizzes = report.quizzes,
        questions = report.questions,
        skipped = report.skipped_quizzes,
        "fixture loaded from {}",
        path
    );

    Ok(Some(report))
}

async fn insert_quiz(
    conn: &mut PgConnection,
    specialization_id: i64,
    quiz: &FixtureQuiz,
) -> Result<usize, AppError> {
    let quiz_id: i64 = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO quizzes
        (specialization_id, title, description, difficulty_level, time_limit_minutes, passing_score)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(specialization_id)
    .bind(&quiz.title)
    .bind(&quiz.description)
    .bind(quiz.difficulty_level)
    .bind(quiz.time_limit_minutes)
    .bind(quiz.passing_score)
    .fetch_one(&mut *conn)
    .await?;

    for (position, question) in quiz.questions.iter().enumerate() {
        let question_id: i64 = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO questions (quiz_id, question_text, question_type, points, explanation, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(quiz_id)
        .bind(&question.question_text)
        .bind(&question.question_type)
        .bind(question.points)
        .bind(&question.explanation)
        .bind(position as i32)
        .fetch_one(&mut *conn)
        .await?;

        for (option_position, option) in question.options.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO question_options (question_id, option_text, is_correct, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(question_id)
            .bind(&option.option_text)
            .bind(option.is_correct)
            .bind(option_position as i32)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(quiz.questions.len())
}
