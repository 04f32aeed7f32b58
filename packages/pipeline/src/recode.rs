//! Record-level transforms: coordinate coercion and code labeling.
//!
//! Each transform consumes a record set and returns a new one of the same
//! length. Labels are always derived from the retained raw code, so
//! re-applying a table yields the same result.

use velo_dash_accident_models::{AccidentRecord, Attribute, CodeLabelTable, Coordinate};

use crate::RecodeError;
use crate::parsing::parse_coordinate;

fn coerce(coordinate: Coordinate) -> Coordinate {
    match coordinate {
        Coordinate::Unparsed(raw) => parse_coordinate(&raw),
        other => other,
    }
}

/// Parses every unparsed latitude and longitude.
///
/// Text that is not a finite number becomes [`Coordinate::Missing`]; this
/// never fails.
#[must_use]
pub fn coerce_coordinates(records: Vec<AccidentRecord>) -> Vec<AccidentRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.latitude = coerce(std::mem::take(&mut record.latitude));
            record.longitude = coerce(std::mem::take(&mut record.longitude));
            record
        })
        .collect()
}

/// Labels `attribute` on every record using `table`.
///
/// # Errors
///
/// Returns [`RecodeError::AttributeMismatch`] if `table` belongs to a
/// different attribute.
pub fn try_apply_label_table(
    records: Vec<AccidentRecord>,
    attribute: Attribute,
    table: &CodeLabelTable,
) -> Result<Vec<AccidentRecord>, RecodeError> {
    if table.attribute() != attribute {
        return Err(RecodeError::AttributeMismatch {
            attribute,
            table: table.attribute(),
        });
    }

    Ok(records
        .into_iter()
        .map(|mut record| {
            let label = table.lookup(record.raw_code(attribute));
            record.labels.set(attribute, label);
            record
        })
        .collect())
}

/// Labels `attribute` on every record using `table`.
///
/// A table that belongs to another attribute is logged and the records are
/// returned unchanged.
#[must_use]
pub fn apply_label_table(
    records: Vec<AccidentRecord>,
    attribute: Attribute,
    table: &CodeLabelTable,
) -> Vec<AccidentRecord> {
    if table.attribute() != attribute {
        log::warn!(
            "Skipping recode of {attribute}: label table belongs to {}",
            table.attribute()
        );
        return records;
    }

    try_apply_label_table(records, attribute, table).unwrap_or_default()
}

/// Applies the standard label table of every [`Attribute`].
#[must_use]
pub fn recode_all(records: Vec<AccidentRecord>) -> Vec<AccidentRecord> {
    let records: Vec<AccidentRecord> = records
        .into_iter()
        .map(|mut record| {
            for &attribute in Attribute::all() {
                let label = attribute.table().lookup(record.raw_code(attribute));
                record.labels.set(attribute, label);
            }
            record
        })
        .collect();

    log::debug!(
        "Recoded {} records across {} attributes",
        records.len(),
        Attribute::all().len()
    );
    records
}

#[cfg(test)]
mod tests {
    use velo_dash_accident_models::{Label, tables};

    use super::*;

    fn with_severity(code: Option<i32>) -> AccidentRecord {
        AccidentRecord {
            severity_code: code,
            ..AccidentRecord::default()
        }
    }

    #[test]
    fn coercion_never_fails() {
        let raw = ["48.85", "abc", "", "1e3", " 2.5 ", "--1"];
        let records: Vec<AccidentRecord> = raw
            .iter()
            .map(|text| AccidentRecord {
                latitude: Coordinate::Unparsed((*text).to_string()),
                longitude: Coordinate::Unparsed((*text).to_string()),
                ..AccidentRecord::default()
            })
            .collect();

        let coerced = coerce_coordinates(records);
        assert_eq!(coerced.len(), raw.len());
        for record in &coerced {
            assert!(matches!(
                record.latitude,
                Coordinate::Value(_) | Coordinate::Missing
            ));
        }
        assert_eq!(coerced[0].latitude, Coordinate::Value(48.85));
        assert_eq!(coerced[1].latitude, Coordinate::Missing);
        assert_eq!(coerced[3].longitude, Coordinate::Value(1000.0));
    }

    #[test]
    fn coercion_keeps_parsed_values() {
        let record = AccidentRecord {
            latitude: Coordinate::Value(1.0),
            longitude: Coordinate::Missing,
            ..AccidentRecord::default()
        };
        let coerced = coerce_coordinates(vec![record.clone()]);
        assert_eq!(coerced, vec![record]);
    }

    #[test]
    fn labeling_preserves_count_and_raw_code() {
        let records = vec![
            with_severity(Some(1)),
            with_severity(Some(9)),
            with_severity(None),
        ];
        let labeled = apply_label_table(records, Attribute::Severity, &tables::SEVERITY);

        assert_eq!(labeled.len(), 3);
        assert_eq!(labeled[0].label(Attribute::Severity), Some(Label::Known("Indemne")));
        assert_eq!(labeled[1].label(Attribute::Severity), Some(Label::Unlabeled));
        assert_eq!(labeled[2].label(Attribute::Severity), Some(Label::Unlabeled));
        assert_eq!(labeled[1].severity_code, Some(9));
    }

    #[test]
    fn labeling_twice_is_a_no_op() {
        let records = vec![with_severity(Some(2)), with_severity(Some(3))];
        let once = apply_label_table(records, Attribute::Severity, &tables::SEVERITY);
        let twice = apply_label_table(once.clone(), Attribute::Severity, &tables::SEVERITY);
        assert_eq!(once, twice);
    }

    #[test]
    fn mismatched_table_is_rejected() {
        let records = vec![with_severity(Some(2))];
        let err =
            try_apply_label_table(records.clone(), Attribute::Severity, &tables::SEX).unwrap_err();
        assert!(matches!(
            err,
            RecodeError::AttributeMismatch {
                attribute: Attribute::Severity,
                table: Attribute::Sex,
            }
        ));

        let unchanged = apply_label_table(records.clone(), Attribute::Severity, &tables::SEX);
        assert_eq!(unchanged, records);
    }

    #[test]
    fn recode_all_labels_every_attribute() {
        let record = AccidentRecord {
            severity_code: Some(3),
            sex_code: Some(2),
            atmosphere_code: Some(2),
            surface_code: Some(2),
            light_code: Some(1),
            vehicle_type_code: Some("7".to_string()),
            trip_purpose_code: Some(5),
            ..AccidentRecord::default()
        };
        let recoded = recode_all(vec![record]);
        let labels: Vec<&str> = Attribute::all()
            .iter()
            .map(|a| recoded[0].effective_label(*a).as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Blessé hospitalisé",
                "Féminin",
                "Pluie légère",
                "Mouillée",
                "Plein jour",
                "VL seul",
                "Promenade - Loisirs",
            ]
        );
    }
}
