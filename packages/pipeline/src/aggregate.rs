//! Label filters and grouped counts.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use velo_dash_accident_models::{AccidentRecord, Attribute, Label};

/// Number of records sharing one label, with their share of the grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedCount {
    /// Group label.
    pub label: Label,
    /// Records in this group.
    pub count: u64,
    /// Share of the grouped total, in percent.
    pub percentage: f64,
}

impl AggregatedCount {
    /// Natural logarithm of the count, as used by log-scaled bar charts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn log_count(&self) -> f64 {
        (self.count as f64).ln()
    }
}

/// Keeps the records whose label for `attribute` is in `allowed`.
///
/// An empty `allowed` set yields an empty result. Chain calls to combine
/// filters over several attributes.
#[must_use]
pub fn filter_by<'a>(
    records: impl IntoIterator<Item = &'a AccidentRecord>,
    attribute: Attribute,
    allowed: &BTreeSet<Label>,
) -> Vec<&'a AccidentRecord> {
    if allowed.is_empty() {
        return Vec::new();
    }
    records
        .into_iter()
        .filter(|r| allowed.contains(&r.effective_label(attribute)))
        .collect()
}

/// Counts records per label of `attribute`.
///
/// Results are sorted by descending count, ties broken by label order
/// (unlabeled last).
#[must_use]
pub fn group_count<'a>(
    records: impl IntoIterator<Item = &'a AccidentRecord>,
    attribute: Attribute,
) -> Vec<AggregatedCount> {
    let mut counts: BTreeMap<Label, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.effective_label(attribute)).or_default() += 1;
    }

    with_percentages(counts.into_iter().collect())
}

/// Distinct labels of `attribute` in order of first appearance.
#[must_use]
pub fn labels_present<'a>(
    records: impl IntoIterator<Item = &'a AccidentRecord>,
    attribute: Attribute,
) -> Vec<Label> {
    let mut seen = BTreeSet::new();
    records
        .into_iter()
        .map(|r| r.effective_label(attribute))
        .filter(|label| seen.insert(*label))
        .collect()
}

/// Splits a ranking into its first `head` entries and the `tail` entries
/// that follow them.
#[must_use]
pub fn split_top(
    counts: &[AggregatedCount],
    head: usize,
    tail: usize,
) -> (Vec<AggregatedCount>, Vec<AggregatedCount>) {
    let head_len = head.min(counts.len());
    let top = counts[..head_len].to_vec();
    let next = counts[head_len..].iter().take(tail).cloned().collect();
    (top, next)
}

/// Drops the given labels from a grouping and recomputes percentages over
/// what remains.
#[must_use]
pub fn without_labels(counts: &[AggregatedCount], excluded: &BTreeSet<Label>) -> Vec<AggregatedCount> {
    with_percentages(
        counts
            .iter()
            .filter(|c| !excluded.contains(&c.label))
            .map(|c| (c.label, c.count))
            .collect(),
    )
}

#[allow(clippy::cast_precision_loss)]
fn with_percentages(mut pairs: Vec<(Label, u64)>) -> Vec<AggregatedCount> {
    pairs.sort_by(|(la, ca), (lb, cb)| cb.cmp(ca).then_with(|| la.cmp(lb)));

    let total: u64 = pairs.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    pairs
        .into_iter()
        .map(|(label, count)| AggregatedCount {
            label,
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect()
}
