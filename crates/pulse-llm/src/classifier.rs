use std::collections::HashSet;

use pulse_core::{Review, Taxonomy, ThemeAssignment};
use serde::Deserialize;
use serde_json::Value;

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::json::strip_code_fences;
use crate::prompts::classification_prompt;

/// Reviews per classification request.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Models echo ids back as strings or bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAssignment {
    review_id: RawId,
    chosen_theme: String,
    #[serde(default)]
    short_reason: Option<String>,
}

/// Tag every review with one theme, `batch_size` reviews per request.
///
/// Batches run one after another in input order. A batch whose request or
/// reply fails is logged and contributes nothing; the other batches are
/// unaffected. The result may therefore be shorter than `reviews`, and the
/// model may repeat an id, so callers must tolerate both.
pub async fn classify(
    llm: &dyn LlmClient,
    reviews: &[Review],
    taxonomy: &Taxonomy,
    batch_size: usize,
) -> Vec<ThemeAssignment> {
    let batch_size = batch_size.max(1);
    let batch_count = reviews.len().div_ceil(batch_size);
    let mut assignments = Vec::with_capacity(reviews.len());

    for (index, batch) in reviews.chunks(batch_size).enumerate() {
        let batch_no = index + 1;
        match classify_batch(llm, batch, taxonomy).await {
            Ok(batch_assignments) => {
                tracing::debug!(
                    batch = batch_no,
                    batch_count,
                    assigned = batch_assignments.len(),
                    "classified review batch"
                );
                assignments.extend(batch_assignments);
            }
            Err(e) => {
                tracing::error!(
                    batch = batch_no,
                    batch_count,
                    size = batch.len(),
                    error = %e,
                    "review batch classification failed"
                );
            }
        }
    }

    assignments
}

async fn classify_batch(
    llm: &dyn LlmClient,
    batch: &[Review],
    taxonomy: &Taxonomy,
) -> Result<Vec<ThemeAssignment>, LlmError> {
    let prompt = classification_prompt(batch, taxonomy);
    let text = llm.generate(&prompt).await?;
    parse_assignments(&text, batch, taxonomy)
}

/// Parse one batch reply into validated assignments.
///
/// The reply must be a JSON array. Elements that do not look like an
/// assignment, or that name an id outside `batch`, are skipped. Labels are
/// canonicalized against `taxonomy`.
pub(crate) fn parse_assignments(
    text: &str,
    batch: &[Review],
    taxonomy: &Taxonomy,
) -> Result<Vec<ThemeAssignment>, LlmError> {
    let cleaned = strip_code_fences(text);
    let items: Vec<Value> =
        serde_json::from_str(&cleaned).map_err(|e| LlmError::InvalidPayload {
            context: "classification batch".to_owned(),
            reason: e.to_string(),
        })?;

    let batch_ids: HashSet<&str> = batch.iter().map(|r| r.id.as_str()).collect();
    let mut assignments = Vec::with_capacity(items.len());

    for item in items {
        let raw: RawAssignment = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed assignment");
                continue;
            }
        };

        let review_id = raw.review_id.into_string();
        if !batch_ids.contains(review_id.as_str()) {
            tracing::debug!(review_id = %review_id, "dropping assignment for id outside the batch");
            continue;
        }

        assignments.push(ThemeAssignment {
            chosen_theme: taxonomy.canonicalize(&raw.chosen_theme).to_owned(),
            short_reason: raw.short_reason.unwrap_or_default(),
            review_id,
        });
    }

    Ok(assignments)
}

#[cfg(test)]
#[path = "classifier_test.rs"]
mod tests;
