use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    /// Unset = run on the in-memory store (demo / local development).
    pub database_url: Option<String>,
    pub server_addr: String,

    /// Hours a PENDING exception may sit before the stale sweep escalates it.
    pub exception_escalation_hours: i64,
    /// Upper bound on items touched by a single sweep run.
    pub sweep_batch_limit: usize,

    // Rate limiting
    pub rate_punch_per_min: u32,
    pub rate_default_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: env::var("DATABASE_URL").ok(),

            exception_escalation_hours: env::var("EXCEPTION_ESCALATION_HOURS")
                .unwrap_or_else(|_| "48".to_string()) // default 48h SLA window
                .parse()
                .unwrap(),
            sweep_batch_limit: env::var("SWEEP_BATCH_LIMIT")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap(),

            rate_punch_per_min: env::var("RATE_PUNCH_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),
            rate_default_per_min: env::var("RATE_DEFAULT_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
        }
    }
}
