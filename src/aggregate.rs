/// Per-group summary statistics over historical records.
/// Absent cells are left out of a mean entirely; an empty column has no mean.

use serde::Serialize;

use crate::sheet::HistoricalRecord;
use crate::wbs::WbsGrouping;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAggregate {
    pub group: String,
    /// Records mapped to the group, whether or not their numeric cells are present
    pub count: usize,
    pub mean_weight_lbs: Option<f64>,
    pub mean_dd_cost: Option<f64>,
    pub mean_flight_unit_cost: Option<f64>,
    /// Mean of the raw historical total-cost column
    pub mean_historical_total_cost: Option<f64>,
}

impl GroupAggregate {
    /// Mean total cost as the sum of the D&D and flight-unit means.
    /// A missing component contributes nothing.
    pub fn mean_total_cost(&self) -> f64 {
        self.mean_dd_cost.unwrap_or(0.0) + self.mean_flight_unit_cost.unwrap_or(0.0)
    }

    /// Whether either cost component has any historical value.
    pub fn has_cost_data(&self) -> bool {
        self.mean_dd_cost.is_some() || self.mean_flight_unit_cost.is_some()
    }
}

/// Arithmetic mean of the present values, `None` when nothing is present.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Records whose WBS label maps to `group` under `grouping`.
pub fn records_in_group<'a>(
    records: &'a [HistoricalRecord],
    grouping: &WbsGrouping,
    group: &str,
) -> Vec<&'a HistoricalRecord> {
    records
        .iter()
        .filter(|r| grouping.group_of(&r.wbs) == Some(group))
        .collect()
}

/// Summarize the records belonging to `group`.
pub fn aggregate(records: &[HistoricalRecord], grouping: &WbsGrouping, group: &str) -> GroupAggregate {
    let rows = records_in_group(records, grouping, group);
    summarize(group, &rows)
}

/// Summarize an already-filtered set of records.
pub fn summarize(group: &str, rows: &[&HistoricalRecord]) -> GroupAggregate {
    GroupAggregate {
        group: group.to_string(),
        count: rows.len(),
        mean_weight_lbs: mean(rows.iter().map(|r| r.weight_lbs)),
        mean_dd_cost: mean(rows.iter().map(|r| r.dd_cost)),
        mean_flight_unit_cost: mean(rows.iter().map(|r| r.flight_unit_cost)),
        mean_historical_total_cost: mean(rows.iter().map(|r| r.total_cost)),
    }
}
