// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, goals, health, journal, profile, quiz, taxonomy},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public routes: health, auth, taxonomy, quiz catalogue.
/// * User routes sit behind `auth_middleware`; admin routes additionally
///   behind `admin_middleware`.
/// * Applies global middleware (Trace, CORS) and injects `AppState`.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let require_user = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh));

    let user_routes = Router::new()
        .route("/me", get(profile::get_me))
        .route("/me/specialization", put(profile::update_specialization))
        .route("/me/dashboard", get(profile::get_dashboard))
        .route("/me/peer-benchmark", get(profile::get_peer_benchmark))
        .route_layer(require_user.clone());

    let taxonomy_routes = Router::new()
        .route("/api/sectors", get(taxonomy::list_sectors))
        .route("/api/sectors/{id}/branches", get(taxonomy::list_branches))
        .route(
            "/api/branches/{id}/specializations",
            get(taxonomy::list_specializations),
        );

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz))
        // Protected quiz routes
        .merge(
            Router::new()
                .route("/{id}/start", post(quiz::start_attempt))
                .route_layer(require_user.clone()),
        );

    let attempt_routes = Router::new()
        .route("/{id}/submit", post(quiz::submit_attempt))
        .route("/{id}/results", get(quiz::get_attempt_results))
        .route_layer(require_user.clone());

    let goal_routes = Router::new()
        .route("/", get(goals::list_goals).post(goals::create_goal))
        .route(
            "/{id}",
            get(goals::get_goal)
                .put(goals::update_goal)
                .delete(goals::delete_goal),
        )
        .route("/{id}/progress", put(goals::update_goal_progress))
        .route_layer(require_user.clone());

    let journal_routes = Router::new()
        .route("/", get(journal::list_entries).post(journal::create_entry))
        .route(
            "/{id}",
            put(journal::update_entry).delete(journal::delete_entry),
        )
        .route_layer(require_user.clone());

    let admin_routes = Router::new()
        .route("/stats", get(admin::get_stats))
        .route("/users", get(admin::list_users))
        .route("/users/{id}", put(admin::update_user))
        // Double middleware protection: Auth first, then Admin check
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(require_user);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .merge(taxonomy_routes)
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/attempts", attempt_routes)
        .nest("/api/goals", goal_routes)
        .nest("/api/journal", journal_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
