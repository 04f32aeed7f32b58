//! Stacked (cumulative) time series.
//!
//! A [`CumulativeSeries`] holds one per-bucket count vector per category on a
//! shared time axis, plus the running sum of that category and every
//! category stacked below it. The last series in the stack therefore equals
//! the bucket totals.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use velo_dash_accident_models::{AccidentRecord, Attribute, Label, TimeField};

/// How categories are ordered from the bottom of the stack to the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Largest category first, ties by label.
    TotalDescending,
    /// Order in which each label first appears in the records.
    FirstSeen,
    /// The given labels first (zero series for absent ones), then any other
    /// label found in the data by descending total.
    Explicit(Vec<Label>),
}

/// Counts of one category across the time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeries {
    /// Category label.
    pub label: Label,
    /// Records of this category per bucket.
    pub counts: Vec<u64>,
    /// Running sum of this category and all categories before it.
    pub cumulative: Vec<u64>,
}

/// Per-category counts stacked over a common time axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeSeries {
    /// Attribute whose labels form the categories.
    pub attribute: Attribute,
    /// Date component used as the time axis.
    pub time_field: TimeField,
    /// Time buckets, ascending.
    pub buckets: Vec<i32>,
    /// One series per category, bottom of the stack first.
    pub series: Vec<CategorySeries>,
}

impl CumulativeSeries {
    /// Sum of all category counts per bucket.
    #[must_use]
    pub fn totals(&self) -> Vec<u64> {
        (0..self.buckets.len())
            .map(|i| self.series.iter().map(|s| s.counts[i]).sum())
            .collect()
    }

    /// The top of the stack.
    #[must_use]
    pub fn top(&self) -> Option<&CategorySeries> {
        self.series.last()
    }

    /// Whether the series has no time buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Builds the stacked time series of `attribute` over `time_field`.
///
/// The time axis is every distinct `time_field` value among `records`;
/// records without one are left out of the counts. Categories with no
/// record in a bucket get an explicit zero there.
#[must_use]
pub fn cumulative_by_time<'a>(
    records: impl IntoIterator<Item = &'a AccidentRecord>,
    attribute: Attribute,
    time_field: TimeField,
    order: &CategoryOrder,
) -> CumulativeSeries {
    let mut buckets = BTreeSet::new();
    let mut by_label: BTreeMap<Label, BTreeMap<i32, u64>> = BTreeMap::new();
    let mut totals: BTreeMap<Label, u64> = BTreeMap::new();
    let mut first_seen = Vec::new();

    for record in records {
        let label = record.effective_label(attribute);
        let total = totals.entry(label).or_default();
        if *total == 0 {
            first_seen.push(label);
        }
        *total += 1;

        if let Some(bucket) = record.time_value(time_field) {
            buckets.insert(bucket);
            *by_label.entry(label).or_default().entry(bucket).or_default() += 1;
        }
    }

    let buckets: Vec<i32> = buckets.into_iter().collect();
    let labels = stack_order(order, &totals, first_seen);

    log::debug!(
        "Stacking {} categories of {attribute} over {} {time_field} buckets",
        labels.len(),
        buckets.len()
    );

    let mut below = vec![0u64; buckets.len()];
    let series = labels
        .into_iter()
        .map(|label| {
            let per_bucket = by_label.get(&label);
            let counts: Vec<u64> = buckets
                .iter()
                .map(|b| per_bucket.and_then(|m| m.get(b)).copied().unwrap_or(0))
                .collect();
            for (acc, count) in below.iter_mut().zip(&counts) {
                *acc += count;
            }
            CategorySeries {
                label,
                counts,
                cumulative: below.clone(),
            }
        })
        .collect();

    CumulativeSeries {
        attribute,
        time_field,
        buckets,
        series,
    }
}

fn stack_order(
    order: &CategoryOrder,
    totals: &BTreeMap<Label, u64>,
    first_seen: Vec<Label>,
) -> Vec<Label> {
    let by_total = || {
        let mut labels: Vec<(Label, u64)> = totals.iter().map(|(l, c)| (*l, *c)).collect();
        labels.sort_by(|(la, ca), (lb, cb)| cb.cmp(ca).then_with(|| la.cmp(lb)));
        labels.into_iter().map(|(l, _)| l)
    };

    match order {
        CategoryOrder::TotalDescending => by_total().collect(),
        CategoryOrder::FirstSeen => first_seen,
        CategoryOrder::Explicit(explicit) => {
            let mut seen = BTreeSet::new();
            let mut labels: Vec<Label> = explicit
                .iter()
                .copied()
                .filter(|l| seen.insert(*l))
                .collect();
            labels.extend(by_total().filter(|l| !seen.contains(l)));
            labels
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::recode::recode_all;

    use super::*;

    fn record(grav: i32, year: Option<i32>) -> AccidentRecord {
        AccidentRecord {
            severity_code: Some(grav),
            year,
            ..AccidentRecord::default()
        }
    }

    fn dataset() -> Vec<AccidentRecord> {
        recode_all(vec![
            record(4, Some(2019)),
            record(3, Some(2019)),
            record(4, Some(2019)),
            record(2, Some(2020)),
            record(4, Some(2021)),
            record(3, Some(2021)),
            record(3, None),
        ])
    }

    fn labels(series: &CumulativeSeries) -> Vec<Label> {
        series.series.iter().map(|s| s.label).collect()
    }

    #[test]
    fn zero_fills_missing_buckets() {
        let data = dataset();
        let series = cumulative_by_time(
            &data,
            Attribute::Severity,
            TimeField::Year,
            &CategoryOrder::FirstSeen,
        );

        assert_eq!(series.buckets, vec![2019, 2020, 2021]);
        assert_eq!(
            labels(&series),
            vec![
                Label::Known("Blessé léger"),
                Label::Known("Blessé hospitalisé"),
                Label::Known("Tué"),
            ]
        );
        for s in &series.series {
            assert_eq!(s.counts.len(), series.buckets.len());
            assert_eq!(s.cumulative.len(), series.buckets.len());
        }
        assert_eq!(series.series[0].counts, vec![2, 0, 1]);
        assert_eq!(series.series[1].counts, vec![1, 0, 1]);
        assert_eq!(series.series[1].cumulative, vec![3, 0, 2]);
        assert_eq!(series.series[2].counts, vec![0, 1, 0]);
    }

    #[test]
    fn top_of_stack_equals_bucket_totals() {
        let data = dataset();
        for order in [
            CategoryOrder::FirstSeen,
            CategoryOrder::TotalDescending,
            CategoryOrder::Explicit(vec![Label::Known("Tué")]),
        ] {
            let series = cumulative_by_time(&data, Attribute::Severity, TimeField::Year, &order);
            let top = series.top().unwrap();
            assert_eq!(top.cumulative, series.totals(), "{order:?}");
            assert_eq!(top.cumulative, vec![3, 1, 2]);
        }
    }

    #[test]
    fn orders_by_total_descending() {
        let data = dataset();
        let series = cumulative_by_time(
            &data,
            Attribute::Severity,
            TimeField::Year,
            &CategoryOrder::TotalDescending,
        );
        assert_eq!(
            labels(&series),
            vec![
                Label::Known("Blessé hospitalisé"),
                Label::Known("Blessé léger"),
                Label::Known("Tué"),
            ]
        );
    }

    #[test]
    fn explicit_order_keeps_absent_and_appends_unlisted() {
        let data = dataset();
        let order = CategoryOrder::Explicit(vec![
            Label::Known("Indemne"),
            Label::Known("Tué"),
            Label::Known("Tué"),
        ]);
        let series = cumulative_by_time(&data, Attribute::Severity, TimeField::Year, &order);

        assert_eq!(
            labels(&series),
            vec![
                Label::Known("Indemne"),
                Label::Known("Tué"),
                Label::Known("Blessé hospitalisé"),
                Label::Known("Blessé léger"),
            ]
        );
        assert_eq!(series.series[0].counts, vec![0, 0, 0]);
        assert_eq!(series.series[1].cumulative, vec![0, 1, 0]);
    }

    #[test]
    fn empty_input_has_no_buckets() {
        let none: Vec<AccidentRecord> = Vec::new();
        let series = cumulative_by_time(
            &none,
            Attribute::TripPurpose,
            TimeField::Month,
            &CategoryOrder::TotalDescending,
        );
        assert!(series.is_empty());
        assert!(series.series.is_empty());
        assert!(series.totals().is_empty());
    }
}
