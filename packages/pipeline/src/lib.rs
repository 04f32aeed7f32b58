#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Recode-and-aggregate pipeline for the bicycle accident dataset.
//!
//! The loaded dataset is immutable once prepared. Every stage is a pure
//! function returning a new collection: [`load`] reads the CSV,
//! [`coerce_coordinates`] and [`apply_label_table`] build the labeled
//! records, and [`filter_by`], [`group_count`] and [`cumulative_by_time`]
//! produce the inputs for the dashboard charts.

pub mod aggregate;
pub mod load;
pub mod map;
pub mod parsing;
pub mod recode;
pub mod series;

use std::path::PathBuf;

use thiserror::Error;
use velo_dash_accident_models::Attribute;

pub use aggregate::{AggregatedCount, filter_by, group_count, labels_present, split_top, without_labels};
pub use load::{REQUIRED_COLUMNS, load, load_dataset, load_from_reader};
pub use map::{MapPoint, feature_collection, map_points};
pub use recode::{apply_label_table, coerce_coordinates, recode_all, try_apply_label_table};
pub use series::{CategoryOrder, CategorySeries, CumulativeSeries, cumulative_by_time};

/// Errors that can occur while loading the accident dataset.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The file could not be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The header row lacks one or more required columns.
    #[error("Missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Names of the absent columns, in required order.
        columns: Vec<String>,
    },

    /// The file is not valid delimited data.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised by the recoding stage.
#[derive(Debug, Error)]
pub enum RecodeError {
    /// A label table was applied to an attribute it does not describe.
    #[error("Label table for {table} cannot recode {attribute}")]
    AttributeMismatch {
        /// Attribute that was requested.
        attribute: Attribute,
        /// Attribute the table belongs to.
        table: Attribute,
    },
}
