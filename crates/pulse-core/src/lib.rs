//! Shared domain types and configuration for the review pulse workspace.

pub mod app_config;
pub mod config;
pub mod error;
pub mod profile;
pub mod report;
pub mod review;
pub mod theme;

pub use app_config::{AppConfig, Environment};
pub use config::{
    load_app_config, load_app_config_from_env, DEFAULT_MARKETPLACE_FETCH_SIZE,
    DEFAULT_STORE_MAX_PAGES,
};
pub use error::ConfigError;
pub use profile::{load_profile, parse_profile, AppProfile, MarketplaceProfile, StoreProfile};
pub use report::PulseReport;
pub use review::{Review, ReviewSource, ReviewWindow};
pub use theme::{Taxonomy, ThemeAssignment, OTHER_THEME};
