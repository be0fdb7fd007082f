use serde::{Deserialize, Serialize};

/// Overflow bucket for reviews that fit none of the configured themes.
pub const OTHER_THEME: &str = "Other";

/// One classifier verdict. `review_id` refers to [`crate::Review::id`] by value only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeAssignment {
    pub review_id: String,
    pub chosen_theme: String,
    pub short_reason: String,
}

impl ThemeAssignment {
    #[must_use]
    pub fn is_other(&self) -> bool {
        self.chosen_theme == OTHER_THEME
    }
}

/// Closed set of theme labels reviews are classified into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    labels: Vec<String>,
    include_other: bool,
}

impl Taxonomy {
    #[must_use]
    pub fn new(labels: Vec<String>, include_other: bool) -> Self {
        Self {
            labels: labels.into_iter().map(|l| l.trim().to_owned()).collect(),
            include_other,
        }
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Whether prompts advertise "Other" as an allowed answer.
    #[must_use]
    pub fn include_other(&self) -> bool {
        self.include_other
    }

    /// Maps a model-supplied label onto its canonical spelling.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything outside the taxonomy (including "Other") resolves to
    /// [`OTHER_THEME`].
    #[must_use]
    pub fn canonicalize(&self, label: &str) -> &str {
        let wanted = label.trim();
        self.labels
            .iter()
            .find(|l| l.eq_ignore_ascii_case(wanted))
            .map_or(OTHER_THEME, String::as_str)
    }
}
