use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Page ceiling for the store feed; it refuses anything past page 10.
pub const DEFAULT_STORE_MAX_PAGES: u32 = 10;

/// Marketplace fetch size; large enough to cover twelve weeks for a busy app.
pub const DEFAULT_MARKETPLACE_FETCH_SIZE: u32 = 200;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let gemini_api_key = require("GEMINI_API_KEY")?;

    let env = parse_environment(&or_default("PULSE_ENV", "development"))?;
    let bind_addr = parse_or_default(&lookup, "PULSE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PULSE_LOG_LEVEL", "info");
    let profile_path = PathBuf::from(or_default("PULSE_PROFILE_PATH", "./config/pulse.yaml"));

    let llm_base_url = or_default(
        "PULSE_LLM_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let llm_model = or_default("PULSE_LLM_MODEL", "gemini-flash-lite-latest");
    let llm_timeout_secs = parse_or_default(&lookup, "PULSE_LLM_TIMEOUT_SECS", "60")?;
    let llm_max_retries = parse_or_default(&lookup, "PULSE_LLM_MAX_RETRIES", "2")?;
    let llm_retry_backoff_ms = parse_or_default(&lookup, "PULSE_LLM_RETRY_BACKOFF_MS", "1000")?;

    let window_days = parse_or_default(&lookup, "PULSE_WINDOW_DAYS", "84")?;
    let review_limit = parse_or_default(&lookup, "PULSE_REVIEW_LIMIT", "250")?;
    let batch_size: usize = parse_or_default(&lookup, "PULSE_BATCH_SIZE", "20")?;
    if batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PULSE_BATCH_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let store_base_url = or_default("PULSE_STORE_BASE_URL", "https://itunes.apple.com");
    let store_max_pages = parse_or_default(
        &lookup,
        "PULSE_STORE_MAX_PAGES",
        &DEFAULT_STORE_MAX_PAGES.to_string(),
    )?;
    let marketplace_base_url =
        or_default("PULSE_MARKETPLACE_BASE_URL", "http://localhost:8787");
    let marketplace_fetch_size = parse_or_default(
        &lookup,
        "PULSE_MARKETPLACE_FETCH_SIZE",
        &DEFAULT_MARKETPLACE_FETCH_SIZE.to_string(),
    )?;
    let source_timeout_secs = parse_or_default(&lookup, "PULSE_SOURCE_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PULSE_USER_AGENT", "review-pulse/0.1");

    let cron_secret = optional("PULSE_CRON_SECRET");
    let cron_schedule = optional("PULSE_CRON_SCHEDULE");
    let report_recipient = optional("PULSE_REPORT_RECIPIENT");
    let resend_api_key = optional("RESEND_API_KEY");
    let email_from = or_default("PULSE_EMAIL_FROM", "Weekly Pulse <onboarding@resend.dev>");
    let email_base_url = or_default("PULSE_EMAIL_BASE_URL", "https://api.resend.com");

    let export_enabled = parse_or_default(&lookup, "PULSE_EXPORT_ENABLED", "true")?;
    let export_dir = PathBuf::from(or_default("PULSE_EXPORT_DIR", "./output"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        profile_path,
        gemini_api_key,
        llm_base_url,
        llm_model,
        llm_timeout_secs,
        llm_max_retries,
        llm_retry_backoff_ms,
        window_days,
        review_limit,
        batch_size,
        store_base_url,
        store_max_pages,
        marketplace_base_url,
        marketplace_fetch_size,
        source_timeout_secs,
        user_agent,
        cron_secret,
        cron_schedule,
        report_recipient,
        resend_api_key,
        email_from,
        email_base_url,
        export_enabled,
        export_dir,
    })
}

/// Parse `var` into `T`, falling back to `default` when the variable is unset.
fn parse_or_default<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PULSE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
