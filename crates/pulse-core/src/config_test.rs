use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GEMINI_API_KEY", "test-gemini-key");
    m
}

#[test]
fn parse_environment_accepts_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn build_app_config_rejects_unknown_environment() {
    let mut map = full_env();
    map.insert("PULSE_ENV", "staging");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PULSE_ENV"),
        "expected InvalidEnvVar(PULSE_ENV), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_without_gemini_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GEMINI_API_KEY"),
        "expected MissingEnvVar(GEMINI_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_gemini_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.llm_model, "gemini-flash-lite-latest");
    assert_eq!(cfg.llm_max_retries, 2);
    assert_eq!(cfg.window_days, 84);
    assert_eq!(cfg.review_limit, 250);
    assert_eq!(cfg.batch_size, 20);
    assert_eq!(cfg.store_max_pages, DEFAULT_STORE_MAX_PAGES);
    assert_eq!(cfg.marketplace_fetch_size, DEFAULT_MARKETPLACE_FETCH_SIZE);
    assert!(cfg.cron_secret.is_none());
    assert!(cfg.resend_api_key.is_none());
    assert!(cfg.export_enabled);
    assert_eq!(cfg.export_dir.to_string_lossy(), "./output");
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("PULSE_WINDOW_DAYS", "28");
    map.insert("PULSE_REVIEW_LIMIT", "100");
    map.insert("PULSE_CRON_SECRET", "shh");
    map.insert("PULSE_EXPORT_ENABLED", "false");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.window_days, 28);
    assert_eq!(cfg.review_limit, 100);
    assert_eq!(cfg.cron_secret.as_deref(), Some("shh"));
    assert!(!cfg.export_enabled);
}

#[test]
fn build_app_config_rejects_zero_batch_size() {
    let mut map = full_env();
    map.insert("PULSE_BATCH_SIZE", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PULSE_BATCH_SIZE"),
        "expected InvalidEnvVar(PULSE_BATCH_SIZE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_window() {
    let mut map = full_env();
    map.insert("PULSE_WINDOW_DAYS", "twelve weeks");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PULSE_WINDOW_DAYS"),
        "expected InvalidEnvVar(PULSE_WINDOW_DAYS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("PULSE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PULSE_BIND_ADDR"),
        "expected InvalidEnvVar(PULSE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn blank_optional_secret_is_treated_as_unset() {
    let mut map = full_env();
    map.insert("PULSE_CRON_SECRET", "");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert!(cfg.cron_secret.is_none());
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = full_env();
    map.insert("RESEND_API_KEY", "re_live_secret");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-gemini-key"));
    assert!(!rendered.contains("re_live_secret"));
    assert!(rendered.contains("[redacted]"));
}
