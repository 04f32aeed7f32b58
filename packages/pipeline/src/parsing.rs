//! Lenient cell parsers for the accident CSV.
//!
//! Source files mix integer codes, integral floats (`"5.0"`) and blank
//! cells depending on the year of publication. A cell that cannot be read
//! becomes `None` (or [`Coordinate::Missing`]) instead of an error.

use velo_dash_accident_models::Coordinate;

/// French month names, accent-stripped, in calendar order.
const MONTH_NAMES: &[&str] = &[
    "janvier",
    "fevrier",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "aout",
    "septembre",
    "octobre",
    "novembre",
    "decembre",
];

/// Parses an integer code. Integral floats are accepted.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_code(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(code) = raw.parse::<i32>() {
        return Some(code);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite()
        && value.fract() == 0.0
        && value >= f64::from(i32::MIN)
        && value <= f64::from(i32::MAX)
    {
        Some(value as i32)
    } else {
        None
    }
}

/// Parses a string-typed code, normalizing integral floats (`"7.0"` -> `"7"`).
#[must_use]
pub fn parse_text_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(parse_code(raw).map_or_else(|| raw.to_owned(), |code| code.to_string()))
}

/// Parses a month given either as `1..=12` or as a French month name.
#[must_use]
pub fn parse_month(raw: &str) -> Option<i32> {
    if let Some(month) = parse_code(raw) {
        return (1..=12).contains(&month).then_some(month);
    }

    let folded: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' => 'e',
            'û' | 'ù' => 'u',
            'à' | 'â' => 'a',
            other => other,
        })
        .collect();

    MONTH_NAMES
        .iter()
        .position(|name| *name == folded)
        .and_then(|idx| i32::try_from(idx + 1).ok())
}

/// Coerces raw coordinate text to a finite value or the missing marker.
#[must_use]
pub fn parse_coordinate(raw: &str) -> Coordinate {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Coordinate::Value(value),
        _ => Coordinate::Missing,
    }
}
