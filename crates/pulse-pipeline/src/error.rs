use thiserror::Error;

/// Fatal failures of a pipeline run. Source and per-batch classification
/// failures are absorbed earlier and never show up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pulse synthesis failed: {0}")]
    Synthesis(#[from] pulse_llm::LlmError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write export artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum MailError {
    /// No provider API key is configured.
    #[error("email delivery is not configured (RESEND_API_KEY is unset)")]
    NotConfigured,

    #[error("invalid recipient address: {0:?}")]
    InvalidRecipient(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the message.
    #[error("email provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

/// Failures of the weekly run-and-email flow.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("no report recipient configured (PULSE_REPORT_RECIPIENT is unset)")]
    NoRecipient,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("failed to deliver report: {0}")]
    Mail(#[from] MailError),
}

/// Failures while constructing services from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to build review source: {0}")]
    Source(#[from] pulse_sources::SourceError),

    #[error("failed to build LLM client: {0}")]
    Llm(#[from] pulse_llm::LlmError),

    #[error("failed to build mailer: {0}")]
    Mail(#[from] MailError),
}
