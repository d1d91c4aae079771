//! User preferences for gLabels
//!
//! Preferences are stored as JSON or TOML (picked by file extension) in the
//! platform configuration directory. They cover:
//! - display units
//! - default colors and line width for new objects
//! - the size given to objects created without dragging
//! - view setup (background layers, grid)

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use glabels_core::{Rgba, Size, Units};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the platform config dir holding gLabels files.
pub const APP_DIR: &str = "glabels";

/// Default preferences file name.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// File format of a preferences file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnknownExtension(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// View setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Reserved layers a new view creates beneath all objects (label
    /// outline and markup).
    pub background_layers: usize,
    /// Draw the alignment grid
    pub grid_visible: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            background_layers: 2,
            grid_visible: true,
        }
    }
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Units lengths are displayed in
    pub units: Units,
    /// Fill color of new objects
    #[serde(with = "hex_color")]
    pub default_fill_color: Rgba,
    /// Line color of new objects
    #[serde(with = "hex_color")]
    pub default_line_color: Rgba,
    /// Line width of new objects, in points
    pub default_line_width: f64,
    /// Size of objects created with a click instead of a drag, in points
    pub default_object_size: Size,
    pub view: ViewSettings,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            units: Units::default(),
            default_fill_color: Rgba::new(0, 255, 0, 255),
            default_line_color: Rgba::BLACK,
            default_line_width: 1.0,
            default_object_size: Size::new(72.0, 72.0),
            view: ViewSettings::default(),
        }
    }
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/glabels/preferences.json`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(dir.join(APP_DIR).join(PREFERENCES_FILE))
    }

    /// Load preferences from a `.json` or `.toml` file and validate them.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let prefs: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        prefs.validate()?;
        tracing::debug!("Loaded preferences from {}", path.display());
        Ok(prefs)
    }

    /// Load preferences, falling back to defaults when the file does not
    /// exist. Any other failure is reported.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::info!("No preferences at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Validate and save to a `.json` or `.toml` file, creating the parent
    /// directory if needed.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Saved preferences to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.default_line_width.is_finite() || self.default_line_width < 0.0 {
            return Err(out_of_range("default_line_width", self.default_line_width));
        }

        let size = self.default_object_size;
        if !(size.w.is_finite() && size.w > 0.0) {
            return Err(out_of_range("default_object_size.w", size.w));
        }
        if !(size.h.is_finite() && size.h >= 0.0) {
            return Err(out_of_range("default_object_size.h", size.h));
        }

        // Outline, markup and grid are the layers a label can have.
        if self.view.background_layers > 3 {
            return Err(out_of_range("view.background_layers", self.view.background_layers));
        }

        Ok(())
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::OutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Colors are written as `#RRGGBBAA` text.
mod hex_color {
    use glabels_core::Rgba;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgba, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(color)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgba, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let prefs = Preferences::default();
        assert!(prefs.validate().is_ok());
        assert_eq!(prefs.view.background_layers, 2);
        assert_eq!(prefs.default_fill_color.to_string(), "#00FF00FF");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/prefs.toml")),
            Ok(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("prefs.yaml")),
            Err(ConfigError::UnknownExtension("yaml".to_string()))
        );
        assert!(ConfigFormat::from_path(Path::new("prefs")).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut prefs = Preferences::default();
        prefs.default_line_width = f64::NAN;
        assert!(matches!(
            prefs.validate(),
            Err(ConfigError::OutOfRange { key, .. }) if key == "default_line_width"
        ));

        let mut prefs = Preferences::default();
        prefs.default_object_size = Size::new(0.0, 10.0);
        assert!(prefs.validate().is_err());

        let mut prefs = Preferences::default();
        prefs.view.background_layers = 9;
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_colors_serialize_as_hex() {
        let json = serde_json::to_string(&Preferences::default()).unwrap();
        assert!(json.contains("\"default_line_color\":\"#000000FF\""));
        assert!(json.contains("\"units\":\"inch\""));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"units":"mm"}"#).unwrap();
        assert_eq!(prefs.units, Units::Mm);
        assert_eq!(prefs.default_object_size, Size::new(72.0, 72.0));
    }
}
