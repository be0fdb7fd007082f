use std::collections::{HashMap, HashSet};

use pulse_core::{PulseReport, Review, Taxonomy, ThemeAssignment, OTHER_THEME};
use serde::Deserialize;

use crate::client::LlmClient;
use crate::error::LlmError;
use crate::json::strip_code_fences;
use crate::prompts::pulse_prompt;
use crate::render::PulseSections;

/// Themes carried into the pulse, and the cap on each model-supplied list.
pub const MAX_TOP_THEMES: usize = 3;

/// A list field the model sometimes collapses into a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_capped(self) -> Vec<String> {
        let items = match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        };
        items
            .into_iter()
            .map(|item| item.trim().to_owned())
            .filter(|item| !item.is_empty())
            .take(MAX_TOP_THEMES)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RawPulse {
    title: String,
    overview: String,
    top_themes: OneOrMany,
    user_quotes: OneOrMany,
    action_ideas: OneOrMany,
}

/// Resolve each review id to one theme; the first assignment for an id wins.
///
/// Labels are canonicalized, so anything outside `taxonomy` reads as
/// [`OTHER_THEME`]. Returns `(review_id, theme)` pairs in first-seen order.
#[must_use]
pub fn resolve_assignments<'a>(
    assignments: &'a [ThemeAssignment],
    taxonomy: &'a Taxonomy,
) -> Vec<(&'a str, &'a str)> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(assignments.len());
    let mut resolved = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let id = assignment.review_id.as_str();
        if seen.insert(id) {
            resolved.push((id, taxonomy.canonicalize(&assignment.chosen_theme)));
        }
    }
    resolved
}

/// The most frequent themes among resolved assignments, "Other" excluded.
///
/// At most [`MAX_TOP_THEMES`]. Equal counts keep the order in which each
/// theme was first seen.
#[must_use]
pub fn rank_themes(resolved: &[(&str, &str)]) -> Vec<String> {
    // (theme, count) in first-seen order
    let mut tally: Vec<(&str, usize)> = Vec::new();
    for &(_, theme) in resolved {
        if theme == OTHER_THEME {
            continue;
        }
        match tally.iter_mut().find(|(t, _)| *t == theme) {
            Some((_, count)) => *count += 1,
            None => tally.push((theme, 1)),
        }
    }

    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
        .into_iter()
        .take(MAX_TOP_THEMES)
        .map(|(theme, _)| theme.to_owned())
        .collect()
}

/// Build the weekly pulse for `app_name`.
///
/// Exactly one model request is made, even when no review falls under a
/// top theme.
///
/// # Errors
///
/// Returns the [`LlmError`] from the request, or
/// [`LlmError::InvalidPayload`] when the reply is not a JSON object with
/// `title`, `overview`, `top_themes`, `user_quotes`, and `action_ideas`.
pub async fn synthesize(
    llm: &dyn LlmClient,
    app_name: &str,
    reviews: &[Review],
    assignments: &[ThemeAssignment],
    taxonomy: &Taxonomy,
) -> Result<PulseReport, LlmError> {
    let resolved = resolve_assignments(assignments, taxonomy);
    let top_themes = rank_themes(&resolved);
    let theme_by_id: HashMap<&str, &str> = resolved.into_iter().collect();

    let selected: Vec<(&Review, &str)> = reviews
        .iter()
        .filter_map(|review| {
            let theme = *theme_by_id.get(review.id.as_str())?;
            top_themes
                .iter()
                .any(|t| t == theme)
                .then_some((review, theme))
        })
        .collect();

    tracing::info!(
        top_themes = ?top_themes,
        evidence = selected.len(),
        "requesting pulse synthesis"
    );

    let prompt = pulse_prompt(app_name, &top_themes, &selected);
    let text = llm.generate(&prompt).await?;
    let sections = parse_pulse(&text)?;
    Ok(sections.into_report())
}

pub(crate) fn parse_pulse(text: &str) -> Result<PulseSections, LlmError> {
    let cleaned = strip_code_fences(text);
    let raw: RawPulse = serde_json::from_str(&cleaned).map_err(|e| LlmError::InvalidPayload {
        context: "pulse".to_owned(),
        reason: e.to_string(),
    })?;

    Ok(PulseSections {
        title: raw.title.trim().to_owned(),
        overview: raw.overview.trim().to_owned(),
        top_themes: raw.top_themes.into_capped(),
        user_quotes: raw.user_quotes.into_capped(),
        action_ideas: raw.action_ideas.into_capped(),
    })
}

#[cfg(test)]
#[path = "synthesizer_test.rs"]
mod tests;
