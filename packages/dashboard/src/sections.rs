//! Chart inputs for every dashboard section.
//!
//! [`Dashboard::build`] only computes data: counts, stacked series and map
//! points. Presentation is left to [`crate::report`].

use std::collections::BTreeSet;

use geojson::FeatureCollection;
use serde::Serialize;
use velo_dash_accident_models::{AccidentRecord, Attribute, Label, TimeField};
use velo_dash_pipeline::{
    AggregatedCount, CategoryOrder, CumulativeSeries, MapPoint, cumulative_by_time,
    feature_collection, filter_by, group_count, map_points, split_top, without_labels,
};

use crate::config::{DashboardConfig, MapConfig};
use crate::selection::{Dimension, Selection};

/// Sex label left out of the sex split.
pub const UNREPORTED_SEX: Label = Label::Known("Non renseigné");

/// Scatter layer of the filtered accidents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSection {
    /// Initial view settings.
    pub view: MapConfig,
    /// Records passing the severity and sex filters, before dropping those
    /// without coordinates.
    pub filtered_records: usize,
    /// Points with usable coordinates.
    pub points: Vec<MapPoint>,
}

/// Severity counts for records of one condition category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionBreakdown {
    /// Condition examined.
    pub dimension: Dimension,
    /// Category the records were restricted to.
    pub category: Option<Label>,
    /// Severity counts, largest first.
    pub counts: Vec<AggregatedCount>,
}

/// Vehicle categories ranked by involvement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRanking {
    /// Most frequent vehicle category.
    pub most_frequent: Option<AggregatedCount>,
    /// The categories that follow it.
    pub next: Vec<AggregatedCount>,
}

/// Every computed section of one dashboard view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Size of the loaded dataset.
    pub total_records: usize,
    /// Selection the view was built from.
    pub selection: Selection,
    /// Accident map.
    pub map: MapSection,
    /// Stacked severity counts per year.
    pub severity_by_year: CumulativeSeries,
    /// Severity breakdown for the selected condition.
    pub condition_breakdown: ConditionBreakdown,
    /// Vehicle ranking.
    pub vehicles: VehicleRanking,
    /// Sex split, unreported sex excluded.
    pub sex_split: Vec<AggregatedCount>,
    /// Stacked trip purpose counts per month.
    pub trip_purpose_by_month: CumulativeSeries,
}

impl Dashboard {
    /// Computes every section for `selection`.
    ///
    /// Only the map honors the severity and sex filters; the other sections
    /// describe the whole dataset.
    #[must_use]
    pub fn build(
        records: &[AccidentRecord],
        selection: &Selection,
        config: &DashboardConfig,
    ) -> Self {
        let filtered = filter_by(
            filter_by(records, Attribute::Severity, &selection.severities),
            Attribute::Sex,
            &selection.sexes,
        );
        let points = map_points(filtered.iter().copied());
        log::debug!(
            "{} of {} records pass the filters, {} are mapped",
            filtered.len(),
            records.len(),
            points.len()
        );

        let vehicle_counts = group_count(records, Attribute::VehicleType);
        let (top, next) = split_top(&vehicle_counts, 1, config.top_vehicles);

        Self {
            total_records: records.len(),
            selection: selection.clone(),
            map: MapSection {
                view: config.map.clone(),
                filtered_records: filtered.len(),
                points,
            },
            severity_by_year: cumulative_by_time(
                records,
                Attribute::Severity,
                TimeField::Year,
                &CategoryOrder::FirstSeen,
            ),
            condition_breakdown: condition_breakdown(records, selection),
            vehicles: VehicleRanking {
                most_frequent: top.into_iter().next(),
                next,
            },
            sex_split: without_labels(
                &group_count(records, Attribute::Sex),
                &BTreeSet::from([UNREPORTED_SEX]),
            ),
            trip_purpose_by_month: cumulative_by_time(
                records,
                Attribute::TripPurpose,
                TimeField::Month,
                &CategoryOrder::Explicit(trip_purpose_order(records, config)),
            ),
        }
    }

    /// The map layer as `GeoJSON`.
    #[must_use]
    pub fn map_geojson(&self) -> FeatureCollection {
        feature_collection(&self.map.points, self.map.view.point_radius)
    }
}

fn condition_breakdown(records: &[AccidentRecord], selection: &Selection) -> ConditionBreakdown {
    let attribute = selection.dimension.attribute();
    let counts = selection.category.map_or_else(Vec::new, |category| {
        group_count(
            filter_by(records, attribute, &BTreeSet::from([category])),
            Attribute::Severity,
        )
    });

    ConditionBreakdown {
        dimension: selection.dimension,
        category: selection.category,
        counts,
    }
}

/// Configured trip purposes, stably re-sorted by descending record count.
fn trip_purpose_order(records: &[AccidentRecord], config: &DashboardConfig) -> Vec<Label> {
    let counts = group_count(records, Attribute::TripPurpose);
    let count_of = |label: &Label| {
        counts
            .iter()
            .find(|c| c.label == *label)
            .map_or(0, |c| c.count)
    };

    let mut labels = config.trip_purpose_labels();
    labels.sort_by_key(|label| std::cmp::Reverse(count_of(label)));
    labels
}

#[cfg(test)]
mod tests {
    use velo_dash_accident_models::Coordinate;
    use velo_dash_pipeline::{coerce_coordinates, recode_all};

    use super::*;

    struct Row {
        lat: &'static str,
        grav: i32,
        sexe: i32,
        atm: i32,
        vehicle: &'static str,
        trajet: i32,
        an: i32,
        mois: i32,
    }

    fn dataset(rows: &[Row]) -> Vec<AccidentRecord> {
        recode_all(coerce_coordinates(
            rows.iter()
                .map(|row| AccidentRecord {
                    latitude: Coordinate::Unparsed(row.lat.to_string()),
                    longitude: Coordinate::Unparsed("2.35".to_string()),
                    severity_code: Some(row.grav),
                    sex_code: Some(row.sexe),
                    atmosphere_code: Some(row.atm),
                    surface_code: Some(1),
                    light_code: Some(1),
                    vehicle_type_code: Some(row.vehicle.to_string()),
                    trip_purpose_code: Some(row.trajet),
                    year: Some(row.an),
                    month: Some(row.mois),
                    ..AccidentRecord::default()
                })
                .collect(),
        ))
    }

    fn sample() -> Vec<AccidentRecord> {
        let row = |lat, grav, sexe, atm, vehicle, trajet, an, mois| Row {
            lat,
            grav,
            sexe,
            atm,
            vehicle,
            trajet,
            an,
            mois,
        };
        dataset(&[
            row("48.85", 1, 1, 1, "1", 5, 2019, 6),
            row("45.76", 2, 2, 2, "1", 5, 2019, 7),
            row("abc", 2, 1, 2, "7", 1, 2020, 6),
            row("43.30", 3, -1, 1, "1", 1, 2020, 7),
            row("44.83", 4, 2, 1, "99", 1, 2021, 8),
            row("50.63", 4, 1, 1, "7", 9, 2021, 8),
        ])
    }

    fn config() -> DashboardConfig {
        DashboardConfig::default()
    }

    #[test]
    fn map_applies_severity_and_sex_filters() {
        let data = sample();
        let mut selection = Selection::defaults(&data);
        selection.sexes = BTreeSet::from([Label::Known("Masculin")]);

        let dashboard = Dashboard::build(&data, &selection, &config());
        assert_eq!(dashboard.total_records, 6);
        assert_eq!(dashboard.map.filtered_records, 3);
        assert_eq!(dashboard.map.points.len(), 2);
        assert!((dashboard.map.view.center_latitude - 46.603_354).abs() < 1e-9);
    }

    #[test]
    fn empty_selection_empties_the_map_only() {
        let data = sample();
        let mut selection = Selection::defaults(&data);
        selection.severities.clear();

        let dashboard = Dashboard::build(&data, &selection, &config());
        assert_eq!(dashboard.map.filtered_records, 0);
        assert!(dashboard.map.points.is_empty());
        assert!(dashboard.map_geojson().features.is_empty());
        assert_eq!(dashboard.severity_by_year.buckets, vec![2019, 2020, 2021]);
    }

    #[test]
    fn severity_by_year_stacks_in_first_seen_order() {
        let data = sample();
        let dashboard = Dashboard::build(&data, &Selection::defaults(&data), &config());
        let series = &dashboard.severity_by_year;

        let labels: Vec<Label> = series.series.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                Label::Known("Indemne"),
                Label::Known("Tué"),
                Label::Known("Blessé hospitalisé"),
                Label::Known("Blessé léger"),
            ]
        );
        assert_eq!(series.top().unwrap().cumulative, vec![2, 2, 2]);
    }

    #[test]
    fn condition_breakdown_covers_the_selected_category() {
        let data = sample();
        let mut selection = Selection::defaults(&data);
        assert_eq!(selection.category, Some(Label::Known("Normale")));

        let dashboard = Dashboard::build(&data, &selection, &config());
        let counts = &dashboard.condition_breakdown.counts;
        assert_eq!(counts[0].label, Label::Known("Blessé léger"));
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 4);

        selection.set_category("Pluie légère").unwrap();
        let dashboard = Dashboard::build(&data, &selection, &config());
        let counts = &dashboard.condition_breakdown.counts;
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].label, Label::Known("Tué"));
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn missing_category_gives_empty_breakdown() {
        let data = sample();
        let mut selection = Selection::defaults(&data);
        selection.category = None;
        let dashboard = Dashboard::build(&data, &selection, &config());
        assert!(dashboard.condition_breakdown.counts.is_empty());
    }

    #[test]
    fn vehicles_rank_top_and_next() {
        let data = sample();
        let config = DashboardConfig {
            top_vehicles: 1,
            ..DashboardConfig::default()
        };
        let dashboard = Dashboard::build(&data, &Selection::defaults(&data), &config);

        let top = dashboard.vehicles.most_frequent.unwrap();
        assert_eq!(top.label.as_str(), "Bicyclette");
        assert_eq!(top.count, 3);
        assert_eq!(dashboard.vehicles.next.len(), 1);
        assert_eq!(dashboard.vehicles.next[0].label.as_str(), "VL seul");
    }

    #[test]
    fn sex_split_excludes_unreported() {
        let data = sample();
        let dashboard = Dashboard::build(&data, &Selection::defaults(&data), &config());
        let labels: Vec<Label> = dashboard.sex_split.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec![Label::Known("Masculin"), Label::Known("Féminin")]);
        let total: f64 = dashboard.sex_split.iter().map(|c| c.percentage).sum();
        assert!((total - 100.0).abs() < 1e-6);
    }

    #[test]
    fn trip_purposes_are_resorted_by_total() {
        let data = sample();
        let dashboard = Dashboard::build(&data, &Selection::defaults(&data), &config());
        let series = &dashboard.trip_purpose_by_month;

        let labels: Vec<&str> = series.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Domicile - Travail",
                "Promenade - Loisirs",
                "Autre",
                "Utilisation professionnelle",
                "Non renseigné",
                "Courses - Achats",
                "Domicile - École",
            ]
        );
        assert_eq!(series.buckets, vec![6, 7, 8]);
        assert_eq!(series.top().unwrap().cumulative, series.totals());
    }
}
