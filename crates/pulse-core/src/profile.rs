//! Deployment profile: which app to watch and how to theme its reviews.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::theme::{Taxonomy, OTHER_THEME};
use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct StoreProfile {
    /// Numeric App Store identifier.
    pub app_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceProfile {
    /// Package name, e.g. `com.example.app`.
    pub app_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppProfile {
    pub app_name: String,
    pub store: StoreProfile,
    pub marketplace: MarketplaceProfile,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    pub themes: Vec<String>,
    #[serde(default = "default_include_other")]
    pub include_other: bool,
}

fn default_country() -> String {
    "us".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_include_other() -> bool {
    true
}

impl AppProfile {
    #[must_use]
    pub fn taxonomy(&self) -> Taxonomy {
        Taxonomy::new(self.themes.clone(), self.include_other)
    }
}

/// Load and validate the app profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profile(path: &Path) -> Result<AppProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_profile(&content)
}

/// Parse and validate profile YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_profile(content: &str) -> Result<AppProfile, ConfigError> {
    let mut profile: AppProfile = serde_yaml::from_str(content)?;
    for theme in &mut profile.themes {
        *theme = theme.trim().to_owned();
    }
    validate_profile(&profile)?;
    Ok(profile)
}

fn validate_profile(profile: &AppProfile) -> Result<(), ConfigError> {
    if profile.app_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "app_name must be non-empty".to_string(),
        ));
    }
    if profile.store.app_id.trim().is_empty() || profile.marketplace.app_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store.app_id and marketplace.app_id must be non-empty".to_string(),
        ));
    }
    if profile.themes.is_empty() {
        return Err(ConfigError::Validation(
            "themes must list at least one label".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for theme in &profile.themes {
        let trimmed = theme.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Validation(
                "theme labels must be non-empty".to_string(),
            ));
        }
        if trimmed.eq_ignore_ascii_case(OTHER_THEME) {
            return Err(ConfigError::Validation(format!(
                "'{OTHER_THEME}' is reserved; use include_other instead"
            )));
        }
        if !seen.insert(trimmed.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate theme label: '{trimmed}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
