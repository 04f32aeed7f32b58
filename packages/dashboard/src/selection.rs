//! User filter state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use velo_dash_accident_models::{AccidentRecord, Attribute, Label};
use velo_dash_pipeline::labels_present;

use crate::SelectionError;

/// Road condition examined by the severity breakdown.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Dimension {
    /// Weather (`atm`).
    Atmosphere,
    /// Road surface (`surf`).
    Surface,
    /// Lighting (`lum`).
    Light,
}

impl Dimension {
    /// All dimensions in menu order.
    pub const ALL: &[Self] = &[Self::Atmosphere, Self::Surface, Self::Light];

    /// The record attribute this dimension reads.
    #[must_use]
    pub const fn attribute(self) -> Attribute {
        match self {
            Self::Atmosphere => Attribute::Atmosphere,
            Self::Surface => Attribute::Surface,
            Self::Light => Attribute::Light,
        }
    }

    /// Menu title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Atmosphere => "Atmosphère",
            Self::Surface => "Surface",
            Self::Light => "Luminosité",
        }
    }
}

/// Filters and the studied condition for one dashboard view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Severity labels shown on the map.
    pub severities: BTreeSet<Label>,
    /// Sex labels shown on the map.
    pub sexes: BTreeSet<Label>,
    /// Condition examined by the severity breakdown.
    pub dimension: Dimension,
    /// Label of `dimension` whose records are broken down. `None` when the
    /// dataset has no record to pick one from.
    pub category: Option<Label>,
}

impl Selection {
    /// Every severity and sex present in `records`, and the first
    /// atmosphere label seen.
    #[must_use]
    pub fn defaults(records: &[AccidentRecord]) -> Self {
        let dimension = Dimension::Atmosphere;
        Self {
            severities: labels_present(records, Attribute::Severity).into_iter().collect(),
            sexes: labels_present(records, Attribute::Sex).into_iter().collect(),
            dimension,
            category: first_category(records, dimension),
        }
    }

    /// Switches the breakdown to `dimension`, resetting the category to the
    /// first label seen for it.
    pub fn switch_dimension(&mut self, dimension: Dimension, records: &[AccidentRecord]) {
        if self.dimension != dimension {
            self.dimension = dimension;
            self.category = first_category(records, dimension);
        }
    }

    /// Sets the breakdown category from its display text.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::UnknownLabel`] if `text` is not a label of
    /// the current dimension.
    pub fn set_category(&mut self, text: &str) -> Result<(), SelectionError> {
        self.category = Some(resolve_label(self.dimension.attribute(), text)?);
        Ok(())
    }
}

fn first_category(records: &[AccidentRecord], dimension: Dimension) -> Option<Label> {
    labels_present(records, dimension.attribute()).into_iter().next()
}

/// Resolves display text to a label of `attribute`.
///
/// The unlabeled marker text is accepted for every attribute.
///
/// # Errors
///
/// Returns [`SelectionError::UnknownLabel`] if no label matches.
pub fn resolve_label(attribute: Attribute, text: &str) -> Result<Label, SelectionError> {
    let text = text.trim();
    attribute
        .table()
        .find_label(text)
        .ok_or_else(|| SelectionError::UnknownLabel {
            attribute,
            label: text.to_string(),
        })
}

/// Resolves every text in `texts`, failing on the first unknown one.
///
/// # Errors
///
/// Returns [`SelectionError::UnknownLabel`] for the first unknown text.
pub fn resolve_labels<S: AsRef<str>>(
    attribute: Attribute,
    texts: &[S],
) -> Result<BTreeSet<Label>, SelectionError> {
    texts
        .iter()
        .map(|text| resolve_label(attribute, text.as_ref()))
        .collect()
}
