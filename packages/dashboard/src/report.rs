//! Text, JSON and `GeoJSON` rendering of a [`Dashboard`].

use std::fmt::Write as _;
use std::path::Path;

use velo_dash_pipeline::{AggregatedCount, CumulativeSeries};

use crate::DashboardError;
use crate::sections::Dashboard;

const LABEL_WIDTH: usize = 44;

/// Renders every section as aligned plain-text tables.
#[must_use]
pub fn render_text(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let selection = &dashboard.selection;

    heading(&mut out, "Carte des accidents");
    let map = &dashboard.map;
    let _ = writeln!(
        out,
        "{} personnes retenues sur {}, {} positionnées (centre {:.6}, {:.6}, zoom {})",
        map.filtered_records,
        dashboard.total_records,
        map.points.len(),
        map.view.center_latitude,
        map.view.center_longitude,
        map.view.zoom,
    );
    let _ = writeln!(out, "Gravité : {}", join(selection.severities.iter()));
    let _ = writeln!(out, "Sexe : {}", join(selection.sexes.iter()));

    heading(&mut out, "Évolution du nombre de personnes accidentées");
    series_table(&mut out, &dashboard.severity_by_year);

    let breakdown = &dashboard.condition_breakdown;
    heading(
        &mut out,
        &format!(
            "Gravité des blessures, {} : {}",
            breakdown.dimension.title(),
            breakdown
                .category
                .map_or("aucune catégorie", |label| label.as_str())
        ),
    );
    count_table(&mut out, &breakdown.counts, true);

    heading(&mut out, "Véhicules impliqués");
    match &dashboard.vehicles.most_frequent {
        Some(top) => {
            let _ = writeln!(out, "Le plus fréquent : {} ({})", top.label, top.count);
        }
        None => out.push_str("Aucune donnée\n"),
    }
    if !dashboard.vehicles.next.is_empty() {
        out.push_str("Suivants :\n");
        count_table(&mut out, &dashboard.vehicles.next, false);
    }

    heading(&mut out, "Répartition des accidents en fonction du sexe");
    count_table(&mut out, &dashboard.sex_split, false);

    heading(&mut out, "Motif du trajet par mois");
    series_table(&mut out, &dashboard.trip_purpose_by_month);

    out
}

/// Serializes the dashboard as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`DashboardError::Json`] if serialization fails.
pub fn render_json(dashboard: &Dashboard) -> Result<String, DashboardError> {
    Ok(serde_json::to_string_pretty(dashboard)?)
}

/// Writes the map layer to `path` as a `GeoJSON` feature collection.
///
/// # Errors
///
/// Returns [`DashboardError`] if serialization or the write fails.
pub fn write_geojson(dashboard: &Dashboard, path: &Path) -> Result<(), DashboardError> {
    let collection = dashboard.map_geojson();
    let json = serde_json::to_string(&collection)?;
    std::fs::write(path, json)?;
    log::info!(
        "Wrote {} map points to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

fn heading(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}

fn join<'a>(labels: impl Iterator<Item = &'a velo_dash_accident_models::Label>) -> String {
    let texts: Vec<&str> = labels.map(|l| l.as_str()).collect();
    if texts.is_empty() {
        "aucun".to_string()
    } else {
        texts.join(", ")
    }
}

fn count_table(out: &mut String, counts: &[AggregatedCount], with_log: bool) {
    if counts.is_empty() {
        out.push_str("Aucune donnée\n");
        return;
    }
    for count in counts {
        let _ = write!(
            out,
            "{:<LABEL_WIDTH$} {:>8} {:>6.1}%",
            count.label.as_str(),
            count.count,
            count.percentage
        );
        if with_log {
            let _ = write!(out, "  ln={:.2}", count.log_count());
        }
        out.push('\n');
    }
}

fn series_table(out: &mut String, series: &CumulativeSeries) {
    if series.is_empty() {
        out.push_str("Aucune donnée\n");
        return;
    }

    let _ = write!(out, "{:<LABEL_WIDTH$}", series.time_field.title());
    for bucket in &series.buckets {
        let _ = write!(out, " {bucket:>6}");
    }
    out.push('\n');

    for category in &series.series {
        let _ = write!(out, "{:<LABEL_WIDTH$}", category.label.as_str());
        for value in &category.cumulative {
            let _ = write!(out, " {value:>6}");
        }
        out.push('\n');
    }
}
