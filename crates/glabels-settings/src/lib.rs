//! gLabels Settings Crate
//!
//! User preferences: defaults for new objects, display units and view
//! setup, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{ConfigFormat, Preferences, ViewSettings, APP_DIR, PREFERENCES_FILE};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
