#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal dashboard over the French bicycle accident dataset (2005-2021).
//!
//! The [`Selection`] made on the command line or in the interactive prompts
//! drives [`Dashboard::build`], which runs the `velo_dash_pipeline` stages
//! over the loaded records. The resulting sections are rendered by
//! [`report`] as text, JSON or a `GeoJSON` map layer.

pub mod config;
pub mod interactive;
pub mod report;
pub mod sections;
pub mod selection;

use std::path::PathBuf;

use thiserror::Error;
use velo_dash_accident_models::Attribute;
use velo_dash_pipeline::DataLoadError;

pub use config::{DATA_PATH_ENV, DashboardConfig, MapConfig};
pub use sections::Dashboard;
pub use selection::{Dimension, Selection};

/// Errors raised while reading dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config is not valid TOML for [`DashboardConfig`].
    #[error("Invalid dashboard config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised while resolving a user selection.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The text does not name any label of the attribute.
    #[error("Unknown {attribute} label: {label:?}")]
    UnknownLabel {
        /// Attribute the label was looked up in.
        attribute: Attribute,
        /// Text that failed to resolve.
        label: String,
    },
}

/// Top-level error for dashboard runs.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Dataset loading failed.
    #[error(transparent)]
    Load(#[from] DataLoadError),

    /// Configuration loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A selection could not be resolved.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing report output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An interactive prompt failed.
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}
