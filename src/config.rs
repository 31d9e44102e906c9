// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Weight of a new attempt in the damped readiness update:
/// `new = (1 - w) * old + w * attempt_score`.
pub const READINESS_UPDATE_WEIGHT: f64 = 0.3;

// Overall readiness = weighted sum of the sub-dimensions. Must add up to 1.
pub const OVERALL_TECHNICAL_WEIGHT: f64 = 0.4;
pub const OVERALL_SOFT_SKILLS_WEIGHT: f64 = 0.3;
pub const OVERALL_LEADERSHIP_WEIGHT: f64 = 0.3;

pub const EXCELLENT_SCORE_THRESHOLD: f64 = 90.0;
pub const FEEDBACK_MAX_RECOMMENDATIONS: usize = 3;

pub const BENCHMARK_STATUS_MARGIN: f64 = 5.0;
pub const BENCHMARK_STRENGTH_AT: f64 = 70.0;
pub const BENCHMARK_GAP_BELOW: f64 = 50.0;

pub const DASHBOARD_RECENT_QUIZZES: i64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    /// Access token lifetime in seconds.
    pub jwt_expiration: u64,
    /// Refresh token lifetime in seconds.
    pub jwt_refresh_expiration: u64,
    pub rust_log: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    /// JSON fixture loaded into an empty database at startup.
    pub seed_file: Option<String>,
    pub bind_addr: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_refresh_secret = env::var("JWT_REFRESH_SECRET")
            .unwrap_or_else(|_| format!("{}-refresh", jwt_secret));

        let jwt_expiration = parse_or("JWT_EXPIRATION", 3600);
        let jwt_refresh_expiration = parse_or("JWT_REFRESH_EXPIRATION", 7 * 24 * 3600);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ]
            });

        Self {
            database_url,
            jwt_secret,
            jwt_refresh_secret,
            jwt_expiration,
            jwt_refresh_expiration,
            rust_log,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            seed_file: env::var("SEED_FILE").ok(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            cors_origins,
        }
    }
}

fn parse_or(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("{} is not a number ({}), using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
