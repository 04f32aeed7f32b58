#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bicycle accident record types and categorical taxonomy.
//!
//! This crate defines the fixed-shape [`AccidentRecord`] produced by the
//! loader, the [`Attribute`] taxonomy of categorical columns, and the static
//! code-to-label tables (see [`tables`]) used to turn raw numeric codes into
//! display labels. Raw codes are never overwritten: a record always carries
//! both its source code and, once recoded, its [`Label`].

pub mod tables;

use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

pub use tables::{CodeKey, CodeLabelTable};

/// Display text for [`Label::Unlabeled`].
pub const UNLABELED_TEXT: &str = "Non répertorié";

/// A categorical column of the accident dataset that can be recoded.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Attribute {
    /// Injury outcome (`grav`).
    Severity,
    /// Sex of the person involved (`sexe`).
    Sex,
    /// Weather at the time of the accident (`atm`).
    Atmosphere,
    /// Road surface condition (`surf`).
    Surface,
    /// Ambient lighting (`lum`).
    Light,
    /// Vehicle category (`typevehicules`), a string-keyed code space.
    VehicleType,
    /// Stated purpose of the trip (`trajet`).
    TripPurpose,
}

impl Attribute {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Severity,
            Self::Sex,
            Self::Atmosphere,
            Self::Surface,
            Self::Light,
            Self::VehicleType,
            Self::TripPurpose,
        ]
    }

    /// Source CSV column holding the raw code for this attribute.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Severity => "grav",
            Self::Sex => "sexe",
            Self::Atmosphere => "atm",
            Self::Surface => "surf",
            Self::Light => "lum",
            Self::VehicleType => "typevehicules",
            Self::TripPurpose => "trajet",
        }
    }

    /// Human-readable heading used in reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Severity => "Gravité",
            Self::Sex => "Sexe",
            Self::Atmosphere => "Atmosphère",
            Self::Surface => "Surface",
            Self::Light => "Luminosité",
            Self::VehicleType => "Type de véhicule",
            Self::TripPurpose => "Trajet",
        }
    }

    /// The standard label table for this attribute.
    #[must_use]
    pub fn table(self) -> &'static CodeLabelTable {
        match self {
            Self::Severity => &tables::SEVERITY,
            Self::Sex => &tables::SEX,
            Self::Atmosphere => &tables::ATMOSPHERE,
            Self::Surface => &tables::SURFACE,
            Self::Light => &tables::LIGHT,
            Self::VehicleType => &tables::VEHICLE_TYPE,
            Self::TripPurpose => &tables::TRIP_PURPOSE,
        }
    }
}

/// A date component usable as a time axis.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeField {
    /// Accident year (`an`).
    Year,
    /// Accident month, 1-12 (`mois`).
    Month,
}

impl TimeField {
    /// Source CSV column for this time field.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Year => "an",
            Self::Month => "mois",
        }
    }

    /// Human-readable axis title used in reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Year => "Année",
            Self::Month => "Mois",
        }
    }
}

/// Display label attached to a record for one [`Attribute`].
///
/// Known labels order alphabetically and [`Label::Unlabeled`] sorts after
/// all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// A label taken from a [`CodeLabelTable`].
    Known(&'static str),
    /// The code had no entry in the table (or there was no code at all).
    Unlabeled,
}

impl Label {
    /// Returns the display text of this label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Known(text) => text,
            Self::Unlabeled => UNLABELED_TEXT,
        }
    }

    /// Whether this is the unlabeled marker.
    #[must_use]
    pub const fn is_unlabeled(self) -> bool {
        matches!(self, Self::Unlabeled)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One geographic coordinate as it moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Coordinate {
    /// Text exactly as read from the source file, not yet coerced.
    Unparsed(String),
    /// A finite parsed value.
    Value(f64),
    /// The source value was blank or not a number.
    #[default]
    Missing,
}

impl Coordinate {
    /// Returns the parsed value, if this coordinate has been coerced to one.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Unparsed(_) | Self::Missing => None,
        }
    }

    /// Whether this coordinate is the explicit missing marker.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Labels applied to a record, one slot per [`Attribute`].
///
/// `None` means the attribute is still in its raw state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeLabels {
    severity: Option<Label>,
    sex: Option<Label>,
    atmosphere: Option<Label>,
    surface: Option<Label>,
    light: Option<Label>,
    vehicle_type: Option<Label>,
    trip_purpose: Option<Label>,
}

impl AttributeLabels {
    /// Returns the applied label for `attribute`, if any.
    #[must_use]
    pub const fn get(&self, attribute: Attribute) -> Option<Label> {
        match attribute {
            Attribute::Severity => self.severity,
            Attribute::Sex => self.sex,
            Attribute::Atmosphere => self.atmosphere,
            Attribute::Surface => self.surface,
            Attribute::Light => self.light,
            Attribute::VehicleType => self.vehicle_type,
            Attribute::TripPurpose => self.trip_purpose,
        }
    }

    /// Sets the label for `attribute`.
    pub const fn set(&mut self, attribute: Attribute, label: Label) {
        let slot = match attribute {
            Attribute::Severity => &mut self.severity,
            Attribute::Sex => &mut self.sex,
            Attribute::Atmosphere => &mut self.atmosphere,
            Attribute::Surface => &mut self.surface,
            Attribute::Light => &mut self.light,
            Attribute::VehicleType => &mut self.vehicle_type,
            Attribute::TripPurpose => &mut self.trip_purpose,
        };
        *slot = Some(label);
    }
}

/// One person involved in a bicycle accident.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccidentRecord {
    /// Latitude (`lat`).
    pub latitude: Coordinate,
    /// Longitude (`long`).
    pub longitude: Coordinate,
    /// Raw `grav` code, 1-4.
    pub severity_code: Option<i32>,
    /// Raw `sexe` code, -1, 1 or 2.
    pub sex_code: Option<i32>,
    /// Raw `atm` code, -1 or 1-9.
    pub atmosphere_code: Option<i32>,
    /// Raw `surf` code, -1 or 1-9.
    pub surface_code: Option<i32>,
    /// Raw `lum` code, 1-5.
    pub light_code: Option<i32>,
    /// Raw `typevehicules` code.
    pub vehicle_type_code: Option<String>,
    /// Raw `trajet` code, 0-5 or 9.
    pub trip_purpose_code: Option<i32>,
    /// Accident year (`an`).
    pub year: Option<i32>,
    /// Accident month, 1-12 (`mois`).
    pub month: Option<i32>,
    /// Labels applied so far.
    pub labels: AttributeLabels,
}

impl AccidentRecord {
    /// Returns the raw source code for `attribute`.
    #[must_use]
    pub fn raw_code(&self, attribute: Attribute) -> Option<CodeKey<'_>> {
        match attribute {
            Attribute::Severity => self.severity_code.map(CodeKey::Int),
            Attribute::Sex => self.sex_code.map(CodeKey::Int),
            Attribute::Atmosphere => self.atmosphere_code.map(CodeKey::Int),
            Attribute::Surface => self.surface_code.map(CodeKey::Int),
            Attribute::Light => self.light_code.map(CodeKey::Int),
            Attribute::VehicleType => self.vehicle_type_code.as_deref().map(CodeKey::Text),
            Attribute::TripPurpose => self.trip_purpose_code.map(CodeKey::Int),
        }
    }

    /// Returns the label applied for `attribute`, or `None` if the attribute
    /// has not been recoded yet.
    #[must_use]
    pub const fn label(&self, attribute: Attribute) -> Option<Label> {
        self.labels.get(attribute)
    }

    /// Returns the applied label, treating a raw attribute as
    /// [`Label::Unlabeled`].
    #[must_use]
    pub fn effective_label(&self, attribute: Attribute) -> Label {
        self.label(attribute).unwrap_or(Label::Unlabeled)
    }

    /// Returns the value of a date component.
    #[must_use]
    pub const fn time_value(&self, field: TimeField) -> Option<i32> {
        match field {
            TimeField::Year => self.year,
            TimeField::Month => self.month,
        }
    }

    /// Returns `(latitude, longitude)` when both coordinates hold a value.
    #[must_use]
    pub const fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude.value(), self.longitude.value()) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}
