use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("LLM provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered 2xx but without any candidate text.
    #[error("LLM response contained no text")]
    EmptyResponse,

    /// The model text could not be turned into the expected structure.
    #[error("invalid LLM payload for {context}: {reason}")]
    InvalidPayload { context: String, reason: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
