//! Prompt builders. Pure functions so the exact wording is unit tested.

use pulse_core::{Review, Taxonomy, OTHER_THEME};
use serde_json::{json, Value};

/// Word budget requested from the model for the whole pulse.
pub const PULSE_WORD_LIMIT: usize = 250;

/// Prompt asking the model to tag each review in `batch` with one theme.
///
/// Only `id` and `text` of each review are sent.
#[must_use]
pub fn classification_prompt(batch: &[Review], taxonomy: &Taxonomy) -> String {
    let reviews: Vec<Value> = batch
        .iter()
        .map(|r| json!({ "id": r.id, "text": r.text }))
        .collect();

    let allowed = taxonomy.labels().join(", ");
    let choice_rule = if taxonomy.include_other() {
        format!("exactly one from the list, or \"{OTHER_THEME}\" if none fit")
    } else {
        "exactly one from the list".to_owned()
    };

    format!(
        "You are tagging app store reviews into at most {count} fixed themes.\n\
         Allowed themes: {allowed}\n\
         \n\
         Reviews:\n\
         {reviews:#}\n\
         \n\
         For each review, output a JSON array of objects with:\n\
         - review_id (the review's id, unchanged)\n\
         - chosen_theme ({choice_rule})\n\
         - short_reason (one short sentence)\n\
         Return only the JSON array.",
        count = taxonomy.labels().len(),
        reviews = Value::Array(reviews),
    )
}

/// Prompt asking for the weekly pulse of `app_name`.
///
/// `selected` pairs each evidence review with its resolved theme.
#[must_use]
pub fn pulse_prompt(app_name: &str, top_themes: &[String], selected: &[(&Review, &str)]) -> String {
    let evidence: Vec<Value> = selected
        .iter()
        .map(|(review, theme)| json!({ "text": review.text, "theme": theme }))
        .collect();

    format!(
        "You are creating a weekly product pulse for {app_name} leadership.\n\
         \n\
         Top {n} Themes: {themes}\n\
         \n\
         Reviews for these themes:\n\
         {evidence:#}\n\
         \n\
         Tasks:\n\
         1. Create a short title.\n\
         2. Write a 60-word overview.\n\
         3. Bullet points for the top themes.\n\
         4. Select 3 vivid user quotes (anonymized, no names or handles).\n\
         5. Suggest 3 specific action ideas.\n\
         \n\
         Constraint: total length at most {PULSE_WORD_LIMIT} words. Professional, objective tone.\n\
         Output as JSON with keys: title, overview, top_themes (array of strings), \
         user_quotes (array of strings), action_ideas (array of strings).",
        n = top_themes.len(),
        themes = top_themes.join(", "),
        evidence = Value::Array(evidence),
    )
}
