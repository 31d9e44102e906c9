// tests/common/mod.rs

#![allow(dead_code)]

use readiness_backend::{config::Config, routes, state::AppState, utils::hash::hash_password};
use sqlx::{PgPool, postgres::PgPoolOptions};

pub struct TestApp {
    pub address: String,
    pub pool: PgPool,
    pub client: reqwest::Client,
}

pub fn test_config(database_url: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_refresh_secret: "test_refresh_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        jwt_refresh_expiration: 3600,
        rust_log: "error".to_string(),
        admin_email: None,
        admin_password: None,
        seed_file: None,
        bind_addr: "127.0.0.1:0".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
    }
}

/// Spawns the app on a random port against `DATABASE_URL`.
///
/// Returns `None` when `DATABASE_URL` is not set so database tests can be
/// skipped on machines without Postgres.
pub async fn spawn_app() -> Option<TestApp> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let app = routes::create_router(AppState::new(pool.clone(), test_config(&database_url)));

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some(TestApp {
        address: format!("http://127.0.0.1:{}", port),
        pool,
        client: reqwest::Client::new(),
    })
}

pub fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register_and_login(&self) -> TestUser {
        let email = format!("{}@example.com", unique("user"));
        let password = "password123";

        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "email": email,
                "name": "Test User",
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 201);

        self.login(&email, password).await
    }

    /// Inserts an admin directly and logs in as them.
    pub async fn admin(&self) -> TestUser {
        let email = format!("{}@example.com", unique("admin"));
        let password = "password123";

        sqlx::query("INSERT INTO users (email, name, password, role) VALUES ($1, 'Admin', $2, 'admin')")
            .bind(&email)
            .bind(hash_password(password).unwrap())
            .execute(&self.pool)
            .await
            .unwrap();

        self.login(&email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestUser {
        let body: serde_json::Value = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .unwrap();

        TestUser {
            id: body["user"]["id"].as_i64().expect("login returned no user id"),
            email: email.to_string(),
            token: body["tokens"]["access_token"]
                .as_str()
                .expect("login returned no token")
                .to_string(),
        }
    }
}

/// A quiz inserted for one test, with the option ids needed to answer it.
pub struct SeededQuiz {
    pub specialization_id: i64,
    pub quiz_id: i64,
    /// (question_id, correct_option_id, wrong_option_id), in question order.
    pub questions: Vec<(i64, i64, i64)>,
}

/// Inserts a fresh sector/branch/specialization chain and a quiz with
/// `points.len()` questions, each with one correct and one wrong option.
pub async fn seed_quiz(pool: &PgPool, category: &str, passing_score: f64, points: &[i32]) -> SeededQuiz {
    let sector_id: i64 = sqlx::query_scalar("INSERT INTO sectors (name) VALUES ($1) RETURNING id")
        .bind(unique("sector"))
        .fetch_one(pool)
        .await
        .unwrap();

    let branch_id: i64 =
        sqlx::query_scalar("INSERT INTO branches (sector_id, name) VALUES ($1, $2) RETURNING id")
            .bind(sector_id)
            .bind(unique("branch"))
            .fetch_one(pool)
            .await
            .unwrap();

    let specialization_id: i64 = sqlx::query_scalar(
        "INSERT INTO specializations (branch_id, name, readiness_category) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(branch_id)
    .bind(unique("spec"))
    .bind(category)
    .fetch_one(pool)
    .await
    .unwrap();

    let quiz_id: i64 = sqlx::query_scalar(
        "INSERT INTO quizzes (specialization_id, title, passing_score) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(specialization_id)
    .bind(unique("quiz"))
    .bind(passing_score)
    .fetch_one(pool)
    .await
    .unwrap();

    let mut questions = Vec::new();
    for (position, pts) in points.iter().enumerate() {
        let question_id: i64 = sqlx::query_scalar(
            "INSERT INTO questions (quiz_id, question_text, points, explanation, position) VALUES ($1, $2, $3, 'because', $4) RETURNING id",
        )
        .bind(quiz_id)
        .bind(format!("Question {}", position + 1))
        .bind(*pts)
        .bind(position as i32)
        .fetch_one(pool)
        .await
        .unwrap();

        let correct: i64 = sqlx::query_scalar(
            "INSERT INTO question_options (question_id, option_text, is_correct, position) VALUES ($1, 'right', TRUE, 0) RETURNING id",
        )
        .bind(question_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let wrong: i64 = sqlx::query_scalar(
            "INSERT INTO question_options (question_id, option_text, is_correct, position) VALUES ($1, 'wrong', FALSE, 1) RETURNING id",
        )
        .bind(question_id)
        .fetch_one(pool)
        .await
        .unwrap();

        questions.push((question_id, correct, wrong));
    }

    SeededQuiz {
        specialization_id,
        quiz_id,
        questions,
    }
}
