//! LLM-backed review classification and pulse synthesis.
//!
//! [`classify`] tags reviews with one theme each, batch by batch, and never
//! fails as a whole. [`synthesize`] ranks the themes, asks the model for the
//! weekly pulse, validates the loosely shaped reply, and renders it as HTML
//! and Markdown.

pub mod classifier;
pub mod client;
pub mod error;
pub mod json;
pub mod prompts;
pub mod render;
pub mod synthesizer;

mod retry;
#[cfg(test)]
mod testing;

pub use classifier::{classify, DEFAULT_BATCH_SIZE};
pub use client::{GeminiClient, LlmClient};
pub use error::LlmError;
pub use render::PulseSections;
pub use synthesizer::{rank_themes, resolve_assignments, synthesize, MAX_TOP_THEMES};
