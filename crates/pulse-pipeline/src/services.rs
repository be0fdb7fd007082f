//! Wiring from configuration to ready-to-use services.

use std::sync::Arc;

use pulse_core::{AppConfig, AppProfile};
use pulse_llm::{GeminiClient, LlmClient};
use pulse_sources::{MarketplaceClient, SourceAdapter, StoreClient};

use crate::email::{Mailer, ResendMailer};
use crate::error::BuildError;
use crate::export::Exporter;
use crate::pipeline::{Pipeline, PipelineSettings};

/// Mail requests are small; they get a fixed timeout rather than a knob.
const MAIL_TIMEOUT_SECS: u64 = 15;

/// Long-lived services shared by every request or job.
#[derive(Clone)]
pub struct Services {
    pub pipeline: Arc<Pipeline>,
    pub mailer: Arc<dyn Mailer>,
}

/// Build the pipeline and mailer described by `config` and `profile`.
///
/// Adapters are registered marketplace first, then store; that order is
/// the tie-break for reviews with equal timestamps.
///
/// # Errors
///
/// Returns [`BuildError`] if any HTTP client cannot be constructed or a
/// configured base URL is invalid.
pub fn build_services(config: &AppConfig, profile: &AppProfile) -> Result<Services, BuildError> {
    let marketplace = MarketplaceClient::new(
        &config.marketplace_base_url,
        &profile.marketplace.app_id,
        &profile.lang,
        &profile.country,
        config.marketplace_fetch_size,
        config.source_timeout_secs,
        &config.user_agent,
    )?;
    let store = StoreClient::new(
        &config.store_base_url,
        &profile.store.app_id,
        &profile.country,
        config.store_max_pages,
        config.source_timeout_secs,
        &config.user_agent,
    )?;
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(marketplace), Arc::new(store)];

    let llm: Arc<dyn LlmClient> = Arc::new(
        GeminiClient::with_base_url(
            &config.gemini_api_key,
            &config.llm_model,
            config.llm_timeout_secs,
            &config.llm_base_url,
        )?
        .with_retry(config.llm_max_retries, config.llm_retry_backoff_ms),
    );

    let settings = PipelineSettings {
        app_name: profile.app_name.clone(),
        taxonomy: profile.taxonomy(),
        window_days: config.window_days,
        review_limit: config.review_limit,
        batch_size: config.batch_size,
    };

    let mut pipeline = Pipeline::new(adapters, llm, settings);
    if config.export_enabled {
        pipeline = pipeline.with_exporter(Exporter::new(&config.export_dir));
    }

    let mailer = ResendMailer::new(
        config.resend_api_key.clone(),
        &config.email_from,
        &config.email_base_url,
        MAIL_TIMEOUT_SECS,
    )?;

    tracing::info!(
        app = %profile.app_name,
        themes = profile.themes.len(),
        export = config.export_enabled,
        "services built"
    );

    Ok(Services {
        pipeline: Arc::new(pipeline),
        mailer: Arc::new(mailer),
    })
}
