use anyhow::{Context, Result, anyhow};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub lock_timeout: Duration,
    pub transaction_timeout: Duration,
    pub otel_endpoint: String,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Missing environment variable: JWT_SECRET")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = parse_bool("RUN_MIGRATIONS", &run_migrations_str)?;

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_max_conn = env_or("DB_MAX_CONNECTION", "5")
            .parse::<u32>()
            .context("Unable to parse DB_MAX_CONNECTION as u32")?;

        let db_min_conn = env_or("DB_MIN_CONNECTION", "1")
            .parse::<u32>()
            .context("Unable to parse DB_MIN_CONNECTION as u32")?;

        let lock_timeout_ms = env_or("ORDER_LOCK_TIMEOUT_MS", "5000")
            .parse::<u64>()
            .context("Unable to parse ORDER_LOCK_TIMEOUT_MS as u64")?;

        let transaction_timeout_ms = env_or("ORDER_TX_TIMEOUT_MS", "10000")
            .parse::<u64>()
            .context("Unable to parse ORDER_TX_TIMEOUT_MS as u64")?;

        let otel_endpoint = env_or("OTEL_ENDPOINT", "http://otel-collector:4317");

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            db_max_conn,
            db_min_conn,
            lock_timeout: Duration::from_millis(lock_timeout_ms),
            transaction_timeout: Duration::from_millis(transaction_timeout_ms),
            otel_endpoint,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(anyhow!("{key} must be 'true' or 'false', got '{other}'")),
    }
}
