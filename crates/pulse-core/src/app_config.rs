use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings, built once at startup and passed down by reference.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub profile_path: PathBuf,
    pub gemini_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_retry_backoff_ms: u64,
    pub window_days: u32,
    pub review_limit: usize,
    pub batch_size: usize,
    pub store_base_url: String,
    pub store_max_pages: u32,
    pub marketplace_base_url: String,
    pub marketplace_fetch_size: u32,
    pub source_timeout_secs: u64,
    pub user_agent: String,
    pub cron_secret: Option<String>,
    pub cron_schedule: Option<String>,
    pub report_recipient: Option<String>,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub email_base_url: String,
    pub export_enabled: bool,
    pub export_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("profile_path", &self.profile_path)
            .field("gemini_api_key", &"[redacted]")
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("llm_retry_backoff_ms", &self.llm_retry_backoff_ms)
            .field("window_days", &self.window_days)
            .field("review_limit", &self.review_limit)
            .field("batch_size", &self.batch_size)
            .field("store_base_url", &self.store_base_url)
            .field("store_max_pages", &self.store_max_pages)
            .field("marketplace_base_url", &self.marketplace_base_url)
            .field("marketplace_fetch_size", &self.marketplace_fetch_size)
            .field("source_timeout_secs", &self.source_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "cron_secret",
                &self.cron_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("cron_schedule", &self.cron_schedule)
            .field("report_recipient", &self.report_recipient)
            .field(
                "resend_api_key",
                &self.resend_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("email_from", &self.email_from)
            .field("email_base_url", &self.email_base_url)
            .field("export_enabled", &self.export_enabled)
            .field("export_dir", &self.export_dir)
            .finish()
    }
}
