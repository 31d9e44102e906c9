// tests/api_tests.rs

mod common;

use common::{seed_quiz, spawn_app, unique};
use serde_json::{Value, json};

fn answers(pairs: &[(i64, i64)]) -> Value {
    json!({
        "answers": pairs
            .iter()
            .map(|(q, o)| json!({ "question_id": q, "selected_answer": o }))
            .collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn unknown_path_is_404() {
    let Some(app) = spawn_app().await else { return };

    let response = app
        .client
        .get(app.url("/random_path_that_does_not_exist"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_login_and_refresh() {
    let Some(app) = spawn_app().await else { return };
    let email = format!("{}@Example.com", unique("Reg"));

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({ "email": email, "name": "Ada", "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], email.to_lowercase());
    assert!(body["user"].get("password").is_none());

    // Same address, different case
    let duplicate = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({ "email": email.to_uppercase(), "name": "Ada", "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status().as_u16(), 409);

    let wrong_password = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_password.status().as_u16(), 401);

    let login: Value = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&json!({ "email": email, "password": "password123" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(login["tokens"]["token_type"], "bearer");
    let refresh_token = login["tokens"]["refresh_token"].as_str().unwrap();

    let refreshed = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(refreshed.status().as_u16(), 200);

    // An access token is not a refresh token
    let access_token = login["tokens"]["access_token"].as_str().unwrap();
    let rejected = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&json!({ "refresh_token": access_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status().as_u16(), 401);
}

#[tokio::test]
async fn register_fails_validation() {
    let Some(app) = spawn_app().await else { return };

    let response = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&json!({ "email": "not-an-email", "name": "Ada", "password": "short" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn quiz_detail_hides_correct_answers() {
    let Some(app) = spawn_app().await else { return };
    let quiz = seed_quiz(&app.pool, "technical", 70.0, &[10, 10]).await;

    let response = app
        .client
        .get(app.url(&format!("/api/quizzes/{}", quiz.quiz_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let text = response.text().await.unwrap();
    assert!(!text.contains("is_correct"));

    let list: Value = app
        .client
        .get(app.url(&format!("/api/quizzes?specialization_id={}", quiz.specialization_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["quizzes"].as_array().unwrap().len(), 1);
    assert_eq!(list["quizzes"][0]["question_count"], 2);

    let missing = app
        .client
        .get(app.url("/api/quizzes/999999999"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn submission_updates_readiness_and_goals_once() {
    let Some(app) = spawn_app().await else { return };
    let user = app.register_and_login().await;
    let quiz = seed_quiz(&app.pool, "technical", 70.0, &[10, 10]).await;

    // A technical goal that one perfect attempt completes, and an unrelated one.
    let goal: Value = app
        .client
        .post(app.url("/api/goals"))
        .bearer_auth(&user.token)
        .json(&json!({ "title": "Technical 20", "category": "Technical", "target_value": 20.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(goal["category"], "technical");
    let goal_id = goal["id"].as_i64().unwrap();

    app.client
        .post(app.url("/api/goals"))
        .bearer_auth(&user.token)
        .json(&json!({ "title": "Lead", "category": "leadership", "target_value": 50.0 }))
        .send()
        .await
        .unwrap();

    let started = app
        .client
        .post(app.url(&format!("/api/quizzes/{}/start", quiz.quiz_id)))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(started.status().as_u16(), 201);
    let attempt_id = started.json::<Value>().await.unwrap()["attempt_id"].as_i64().unwrap();

    let all_correct: Vec<(i64, i64)> = quiz.questions.iter().map(|(q, c, _)| (*q, *c)).collect();

    let response = app
        .client
        .post(app.url(&format!("/api/attempts/{}/submit", attempt_id)))
        .bearer_auth(&user.token)
        .json(&answers(&all_correct))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 100.0);
    assert_eq!(body["passed"], true);
    assert_eq!(body["correct"], 2);
    assert_eq!(body["raw_score"], 20);
    assert_eq!(body["max_score"], 20);
    assert_eq!(body["score_impact"]["category"], "technical");

    // 0.7 * 0 + 0.3 * 100
    let technical = body["readiness"]["technical"].as_f64().unwrap();
    assert!((technical - 30.0).abs() < 1e-9);
    // 0.4 * 30
    let overall = body["readiness"]["overall"].as_f64().unwrap();
    assert!((overall - 12.0).abs() < 1e-9);

    let updated = body["updated_goals"].as_array().unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0]["goal_id"], goal_id);
    assert_eq!(updated[0]["is_completed"], true);

    // Second submission is rejected and changes nothing
    let again = app
        .client
        .post(app.url(&format!("/api/attempts/{}/submit", attempt_id)))
        .bearer_auth(&user.token)
        .json(&answers(&all_correct))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 409);

    let me: Value = app
        .client
        .get(app.url("/api/users/me"))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!((me["technical_score"].as_f64().unwrap() - 30.0).abs() < 1e-9);

    let results: Value = app
        .client
        .get(app.url(&format!("/api/attempts/{}/results", attempt_id)))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["question_results"].as_array().unwrap().len(), 2);
    assert!(!results["attempt"]["completed_at"].is_null());

    let stored_goal: Value = app
        .client
        .get(app.url(&format!("/api/goals/{}", goal_id)))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored_goal["is_completed"], true);
    assert!((stored_goal["current_value"].as_f64().unwrap() - 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn failed_attempt_scores_by_points() {
    let Some(app) = spawn_app().await else { return };
    let user = app.register_and_login().await;
    let quiz = seed_quiz(&app.pool, "soft_skills", 70.0, &[30, 10]).await;

    let attempt_id = app
        .client
        .post(app.url(&format!("/api/quizzes/{}/start", quiz.quiz_id)))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap()["attempt_id"]
        .as_i64()
        .unwrap();

    let (q1, _, wrong1) = quiz.questions[0];
    let (q2, correct2, _) = quiz.questions[1];

    let body: Value = app
        .client
        .post(app.url(&format!("/api/attempts/{}/submit", attempt_id)))
        .bearer_auth(&user.token)
        .json(&answers(&[(q1, wrong1), (q2, correct2), (987654321, 1)]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["score"], 25.0);
    assert_eq!(body["passed"], false);
    assert_eq!(body["total"], 2);
    assert_eq!(body["question_results"][0]["is_correct"], false);
    assert_eq!(body["question_results"][0]["correct_answer"], quiz.questions[0].1);
    assert!(!body["feedback"]["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_submissions_complete_once() {
    let Some(app) = spawn_app().await else { return };
    let user = app.register_and_login().await;
    let quiz = seed_quiz(&app.pool, "leadership", 50.0, &[10]).await;

    let attempt_id = app
        .client
        .post(app.url(&format!("/api/quizzes/{}/start", quiz.quiz_id)))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap()["attempt_id"]
        .as_i64()
        .unwrap();

    let (q, correct, _) = quiz.questions[0];
    let payload = answers(&[(q, correct)]);
    let submit = || {
        app.client
            .post(app.url(&format!("/api/attempts/{}/submit", attempt_id)))
            .bearer_auth(&user.token)
            .json(&payload)
            .send()
    };

    let (a, b) = tokio::join!(submit(), submit());
    let mut statuses = [a.unwrap().status().as_u16(), b.unwrap().status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, [200, 409]);

    let leadership: f64 = sqlx::query_scalar("SELECT leadership_score FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!((leadership - 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn attempts_are_scoped_to_their_owner() {
    let Some(app) = spawn_app().await else { return };
    let owner = app.register_and_login().await;
    let other = app.register_and_login().await;
    let quiz = seed_quiz(&app.pool, "technical", 70.0, &[10]).await;

    let attempt_id = app
        .client
        .post(app.url(&format!("/api/quizzes/{}/start", quiz.quiz_id)))
        .bearer_auth(&owner.token)
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap()["attempt_id"]
        .as_i64()
        .unwrap();

    let results = app
        .client
        .get(app.url(&format!("/api/attempts/{}/results", attempt_id)))
        .bearer_auth(&other.token)
        .send()
        .await
        .unwrap();
    assert_eq!(results.status().as_u16(), 404);

    let submit = app
        .client
        .post(app.url(&format!("/api/attempts/{}/submit", attempt_id)))
        .bearer_auth(&other.token)
        .json(&json!({ "answers": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(submit.status().as_u16(), 404);

    let start_missing = app
        .client
        .post(app.url("/api/quizzes/999999999/start"))
        .bearer_auth(&owner.token)
        .send()
        .await
        .unwrap();
    assert_eq!(start_missing.status().as_u16(), 404);
}
