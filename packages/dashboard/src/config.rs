//! Dashboard settings.
//!
//! The defaults live in `dashboard.toml`, embedded at compile time via
//! [`include_str!`]. A config file given on the command line replaces them
//! wholesale; any field it omits falls back to the built-in value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use velo_dash_accident_models::{CodeKey, Label, tables};

use crate::ConfigError;

/// Environment variable overriding [`DashboardConfig::data_path`].
pub const DATA_PATH_ENV: &str = "VELO_DASH_DATA";

const DEFAULT_CONFIG: &str = include_str!("../dashboard.toml");

/// Initial view of the accident map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Latitude the map is centered on.
    pub center_latitude: f64,
    /// Longitude the map is centered on.
    pub center_longitude: f64,
    /// Initial zoom level.
    pub zoom: f64,
    /// Marker radius in meters.
    pub point_radius: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_latitude: 46.603_354,
            center_longitude: 1.888_334,
            zoom: 4.5,
            point_radius: 1000.0,
        }
    }
}

/// Settings for one dashboard run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Accident CSV to load.
    pub data_path: PathBuf,
    /// Map view settings.
    pub map: MapConfig,
    /// Number of vehicle categories listed after the most frequent one.
    pub top_vehicles: usize,
    /// Trip purpose codes stacked in the monthly chart.
    pub trip_purpose_order: Vec<i32>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("accidentsVelo.csv"),
            map: MapConfig::default(),
            top_vehicles: 10,
            trip_purpose_order: vec![5, 4, 0, 3, 1, 2, 9],
        }
    }
}

impl DashboardConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// The built-in config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the embedded file is invalid.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_CONFIG)
    }

    /// Reads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Loads `path` (or the built-in config) and applies the
    /// [`DATA_PATH_ENV`] override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                log::info!("Loading dashboard config from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::embedded()?,
        };
        Ok(config.with_data_override(std::env::var(DATA_PATH_ENV).ok()))
    }

    /// Replaces the data path when `data_path` is a non-empty value.
    #[must_use]
    pub fn with_data_override(mut self, data_path: Option<String>) -> Self {
        if let Some(data_path) = data_path.filter(|p| !p.trim().is_empty()) {
            log::debug!("Using data path {data_path} from {DATA_PATH_ENV}");
            self.data_path = PathBuf::from(data_path);
        }
        self
    }

    /// Trip purpose labels in configured order, unknown codes dropped.
    #[must_use]
    pub fn trip_purpose_labels(&self) -> Vec<Label> {
        self.trip_purpose_order
            .iter()
            .map(|&code| tables::TRIP_PURPOSE.lookup(Some(CodeKey::Int(code))))
            .filter(|label| !label.is_unlabeled())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        assert_eq!(DashboardConfig::embedded().unwrap(), DashboardConfig::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = DashboardConfig::parse(
            r#"
            data_path = "/data/velo.csv"

            [map]
            zoom = 6.0
            "#,
        )
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/data/velo.csv"));
        assert!((config.map.zoom - 6.0).abs() < f64::EPSILON);
        assert!((config.map.point_radius - 1000.0).abs() < f64::EPSILON);
        assert_eq!(config.top_vehicles, 10);
    }

    #[test]
    fn invalid_config_is_a_parse_error() {
        let err = DashboardConfig::parse("top_vehicles = \"ten\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = DashboardConfig::from_file(Path::new("/no/such/dashboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn data_override_ignores_blank_values() {
        let config = DashboardConfig::default().with_data_override(Some("  ".to_string()));
        assert_eq!(config.data_path, PathBuf::from("accidentsVelo.csv"));

        let config = config.with_data_override(Some("other.csv".to_string()));
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
    }

    #[test]
    fn trip_purpose_labels_follow_configured_codes() {
        let config = DashboardConfig {
            trip_purpose_order: vec![9, 42, 1],
            ..DashboardConfig::default()
        };
        assert_eq!(
            config.trip_purpose_labels(),
            vec![Label::Known("Autre"), Label::Known("Domicile - Travail")]
        );
    }
}
