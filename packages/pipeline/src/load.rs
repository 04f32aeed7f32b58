//! CSV loader for the accident dataset.
//!
//! Reads the header row, resolves the position of every required column and
//! builds one [`AccidentRecord`] per data row, in file order. Coordinates
//! are kept as [`Coordinate::Unparsed`] text until
//! [`coerce_coordinates`](crate::coerce_coordinates) runs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use velo_dash_accident_models::{AccidentRecord, AttributeLabels, Coordinate};

use crate::DataLoadError;
use crate::parsing::{parse_code, parse_month, parse_text_code};
use crate::recode::{coerce_coordinates, recode_all};

/// Columns the loader requires, matched case-sensitively.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "lat",
    "long",
    "grav",
    "sexe",
    "atm",
    "surf",
    "lum",
    "typevehicules",
    "trajet",
    "an",
    "mois",
];

/// Positions of the required columns within a row.
struct ColumnIndex {
    lat: usize,
    long: usize,
    grav: usize,
    sexe: usize,
    atm: usize,
    surf: usize,
    lum: usize,
    typevehicules: usize,
    trajet: usize,
    an: usize,
    mois: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, DataLoadError> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .map(str::to_owned)
            .collect();
        if !missing.is_empty() {
            return Err(DataLoadError::MissingColumns { columns: missing });
        }

        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            lat: at("lat"),
            long: at("long"),
            grav: at("grav"),
            sexe: at("sexe"),
            atm: at("atm"),
            surf: at("surf"),
            lum: at("lum"),
            typevehicules: at("typevehicules"),
            trajet: at("trajet"),
            an: at("an"),
            mois: at("mois"),
        })
    }

    fn build(&self, row: &csv::StringRecord) -> AccidentRecord {
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        AccidentRecord {
            latitude: Coordinate::Unparsed(cell(self.lat).to_owned()),
            longitude: Coordinate::Unparsed(cell(self.long).to_owned()),
            severity_code: parse_code(cell(self.grav)),
            sex_code: parse_code(cell(self.sexe)),
            atmosphere_code: parse_code(cell(self.atm)),
            surface_code: parse_code(cell(self.surf)),
            light_code: parse_code(cell(self.lum)),
            vehicle_type_code: parse_text_code(cell(self.typevehicules)),
            trip_purpose_code: parse_code(cell(self.trajet)),
            year: parse_code(cell(self.an)),
            month: parse_month(cell(self.mois)),
            labels: AttributeLabels::default(),
        }
    }
}

/// Loads accident records from a comma-delimited file.
///
/// # Errors
///
/// Returns [`DataLoadError`] if the file cannot be opened, lacks a required
/// column, or is not valid CSV.
pub fn load(path: &Path) -> Result<Vec<AccidentRecord>, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let records = load_from_reader(file)?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Loads accident records from any reader producing comma-delimited text.
///
/// # Errors
///
/// Returns [`DataLoadError`] if a required column is absent or the data is
/// not valid CSV (for example a row with the wrong number of fields).
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<AccidentRecord>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
        .collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    let mut row = csv::StringRecord::new();
    while reader.read_record(&mut row)? {
        records.push(index.build(&row));
    }

    log::debug!("Parsed {} CSV rows", records.len());
    Ok(records)
}

/// Loads the dataset and prepares it for the dashboard: coordinates coerced
/// and every standard label table applied.
///
/// # Errors
///
/// Returns [`DataLoadError`] under the same conditions as [`load`].
pub fn load_dataset(path: &Path) -> Result<Vec<AccidentRecord>, DataLoadError> {
    let records = recode_all(coerce_coordinates(load(path)?));

    let unmapped = records.iter().filter(|r| r.position().is_none()).count();
    if unmapped > 0 {
        log::warn!(
            "{unmapped} of {} records have no usable coordinates and will be left off the map",
            records.len()
        );
    }

    Ok(records)
}
