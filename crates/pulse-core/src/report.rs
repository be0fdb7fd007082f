use serde::{Deserialize, Serialize};

/// The weekly pulse: validated model output plus both renderings.
///
/// The overall word budget is only requested in the prompt; nothing here
/// counts words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseReport {
    pub title: String,
    pub overview: String,
    pub top_themes: Vec<String>,
    pub user_quotes: Vec<String>,
    pub action_ideas: Vec<String>,
    pub html_report: String,
    pub markdown_report: String,
}
