/// Per-sheet analysis: grouping, aggregation and scaling for one subsystem
/// sheet, driven entirely by the caller's configuration snapshot.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aggregate::{aggregate, records_in_group};
use crate::allocation::MassAllocation;
use crate::config::CurrencyConfig;
use crate::errors::{AllocationError, EstimateError};
use crate::inflation::Escalation;
use crate::scaler::{scale, AdjustedCosts, CostEstimate};
use crate::sheet::{HistoricalRecord, HistoricalSheet};
use crate::units::MassUnit;
use crate::wbs::{MergeDefinition, WbsGroup, WbsGrouping, WbsSelection};

/// Session-scoped settings for one subsystem sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubsystemConfig {
    pub merges: Vec<MergeDefinition>,
    pub selection: WbsSelection,
    pub allocation: MassAllocation,
}

impl SubsystemConfig {
    pub fn new(unit: MassUnit) -> Self {
        Self {
            allocation: MassAllocation::new(0.0, unit),
            ..Default::default()
        }
    }

    /// Rebuild the grouping for `sheet` by replaying the merge definitions.
    pub fn grouping(&self, sheet: &HistoricalSheet) -> Result<WbsGrouping, EstimateError> {
        let mut grouping = WbsGrouping::new(sheet.distinct_labels());
        for merge in &self.merges {
            grouping.add_merge(&merge.name, &merge.members)?;
        }
        Ok(grouping)
    }
}

/// Non-fatal findings attached to an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Caveat {
    /// A year was missing from the inflation index; no escalation applied
    NeutralInflation { base_year: i32, target_year: i32 },
    /// Per-group masses do not add up to the entered total
    MassImbalance { sum: f64, total: f64, unit: MassUnit },
}

/// All result records for one subsystem sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetAnalysis {
    pub sheet: String,
    pub escalation: Escalation,
    pub grouping: WbsGrouping,
    pub groups: Vec<WbsGroup>,
    pub estimates: Vec<CostEstimate>,
    pub caveats: Vec<Caveat>,
}

/// Adjusted estimates of one group in a secondary currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedEstimate {
    pub group: String,
    pub currency: String,
    pub costs: AdjustedCosts,
}

impl SheetAnalysis {
    pub fn estimate(&self, group: &str) -> Option<&CostEstimate> {
        self.estimates.iter().find(|e| e.group == group)
    }

    /// Historical rows behind one group, for drill-down.
    pub fn breakdown<'a>(&self, sheet: &'a HistoricalSheet, group: &str) -> Vec<&'a HistoricalRecord> {
        records_in_group(&sheet.records, &self.grouping, group)
    }

    /// Adjusted estimates re-expressed in `currency`.
    pub fn in_currency(&self, currency: &CurrencyConfig) -> Vec<ConvertedEstimate> {
        self.estimates
            .iter()
            .map(|e| ConvertedEstimate {
                group: e.group.clone(),
                currency: currency.code.clone(),
                costs: e.adjusted.in_currency(currency.rate_per_usd),
            })
            .collect()
    }

    pub fn total_cost_new(&self) -> f64 {
        self.estimates.iter().map(|e| e.total_cost_new).sum()
    }

    pub fn adjusted_total_cost_new(&self) -> f64 {
        self.estimates.iter().map(|e| e.adjusted.total_cost_new).sum()
    }
}

/// Analyse one sheet. Validation failures skip the sheet; a mass imbalance
/// or an unresolved inflation year is recorded as a caveat and the
/// estimate still goes ahead.
pub fn analyze_sheet(
    sheet: &HistoricalSheet,
    config: &SubsystemConfig,
    escalation: Escalation,
    mass_tolerance: f64,
) -> Result<SheetAnalysis, EstimateError> {
    let grouping = config.grouping(sheet)?;
    let groups = grouping.selected_groups(&config.selection);
    if groups.is_empty() {
        return Err(EstimateError::NothingSelected(sheet.name.clone()));
    }
    config.allocation.validate()?;

    let mut caveats = Vec::new();
    if !escalation.resolved {
        caveats.push(Caveat::NeutralInflation {
            base_year: escalation.base_year,
            target_year: escalation.target_year,
        });
    }
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    if let Err(AllocationError::Mismatch { sum, total, unit }) =
        config.allocation.check_balance(&names, mass_tolerance)
    {
        warn!(sheet = %sheet.name, "continuing with unbalanced mass allocation");
        caveats.push(Caveat::MassImbalance { sum, total, unit });
    }

    let estimates: Vec<CostEstimate> = groups
        .iter()
        .map(|group| {
            let agg = aggregate(&sheet.records, &grouping, &group.name);
            let mass = config.allocation.mass_for(&group.name, groups.len());
            scale(&agg, mass, escalation.factor)
        })
        .collect();

    debug!(sheet = %sheet.name, groups = estimates.len(), caveats = caveats.len(), "sheet analysed");
    Ok(SheetAnalysis {
        sheet: sheet.name.clone(),
        escalation,
        grouping,
        groups,
        estimates,
        caveats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inflation::InflationIndex;

    fn structure_sheet() -> HistoricalSheet {
        HistoricalSheet::new(
            "Structural/Mechanical Group",
            vec![
                HistoricalRecord::new("Structure")
                    .with_mission("Apollo")
                    .with_weight(100.0)
                    .with_dd_cost(10.0)
                    .with_flight_unit_cost(5.0),
                HistoricalRecord::new("Structure")
                    .with_mission("Gemini")
                    .with_weight(200.0)
                    .with_dd_cost(20.0)
                    .with_flight_unit_cost(15.0),
            ],
        )
    }

    fn two_group_sheet() -> HistoricalSheet {
        let mut sheet = structure_sheet();
        sheet.records.push(
            HistoricalRecord::new("Mechanisms")
                .with_weight(50.0)
                .with_dd_cost(4.0)
                .with_flight_unit_cost(1.0),
        );
        sheet
    }

    #[test]
    fn test_end_to_end_structure() {
        let config = SubsystemConfig {
            allocation: MassAllocation::new(150.0, MassUnit::Pounds),
            ..Default::default()
        };
        let analysis = analyze_sheet(&structure_sheet(), &config, Escalation::neutral(1999), 1e-3).unwrap();
        assert!(analysis.caveats.is_empty());

        let est = analysis.estimate("Structure").unwrap();
        assert_eq!(est.count, 2);
        assert_eq!(est.mean_weight_lbs, Some(150.0));
        assert_eq!(est.mean_dd_cost, Some(15.0));
        assert_eq!(est.mean_flight_unit_cost, Some(10.0));
        assert!((est.dd_cost_new.unwrap() - 15.0).abs() < 1e-9);
        assert!((est.flight_unit_cost_new.unwrap() - 10.0).abs() < 1e-9);
        assert!((est.total_cost_new - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_escalation_flows_into_estimates() {
        let config = SubsystemConfig {
            allocation: MassAllocation::new(150.0, MassUnit::Pounds),
            ..Default::default()
        };
        let esc = InflationIndex::fallback().escalation(1999, 2025);
        let analysis = analyze_sheet(&structure_sheet(), &config, esc, 1e-3).unwrap();
        assert!((analysis.adjusted_total_cost_new() - 25.0 * 1.906).abs() < 1e-9);
    }

    #[test]
    fn test_unresolved_year_is_caveat() {
        let config = SubsystemConfig {
            allocation: MassAllocation::new(150.0, MassUnit::Pounds),
            ..Default::default()
        };
        let esc = InflationIndex::fallback().escalation(1999, 2077);
        let analysis = analyze_sheet(&structure_sheet(), &config, esc, 1e-3).unwrap();
        assert_eq!(
            analysis.caveats,
            vec![Caveat::NeutralInflation { base_year: 1999, target_year: 2077 }]
        );
        assert_eq!(analysis.adjusted_total_cost_new(), analysis.total_cost_new());
    }

    #[test]
    fn test_mass_imbalance_is_not_fatal() {
        let config = SubsystemConfig {
            allocation: MassAllocation::new(100.0, MassUnit::Kilograms)
                .with_group("Structure", 70.0)
                .with_group("Mechanisms", 20.0),
            ..Default::default()
        };
        let analysis = analyze_sheet(&two_group_sheet(), &config, Escalation::neutral(1999), 1e-3).unwrap();
        assert_eq!(analysis.estimates.len(), 2);
        assert_eq!(
            analysis.caveats,
            vec![Caveat::MassImbalance { sum: 90.0, total: 100.0, unit: MassUnit::Kilograms }]
        );
        let mech = analysis.estimate("Mechanisms").unwrap();
        assert!((mech.user_mass_lbs - 20.0 * 2.20462).abs() < 1e-9);
    }

    #[test]
    fn test_merged_group_with_selection() {
        let mut config = SubsystemConfig {
            merges: vec![MergeDefinition {
                name: "Primary".to_string(),
                members: vec!["Structure".to_string(), "Mechanisms".to_string()],
            }],
            allocation: MassAllocation::new(350.0, MassUnit::Pounds),
            ..Default::default()
        };
        let analysis = analyze_sheet(&two_group_sheet(), &config, Escalation::neutral(1999), 1e-3).unwrap();
        assert_eq!(analysis.groups.len(), 1);
        let primary = analysis.estimate("Primary").unwrap();
        assert_eq!(primary.count, 3);
        assert_eq!(primary.user_mass_lbs, 350.0);
        assert_eq!(analysis.breakdown(&two_group_sheet(), "Primary").len(), 3);

        config.selection.exclude("Primary");
        assert_eq!(
            analyze_sheet(&two_group_sheet(), &config, Escalation::neutral(1999), 1e-3),
            Err(EstimateError::NothingSelected("Structural/Mechanical Group".to_string()))
        );
    }

    #[test]
    fn test_stale_merge_skips_sheet() {
        let config = SubsystemConfig {
            merges: vec![MergeDefinition {
                name: "Ghost".to_string(),
                members: vec!["Antennas".to_string()],
            }],
            ..Default::default()
        };
        let err = analyze_sheet(&structure_sheet(), &config, Escalation::neutral(1999), 1e-3).unwrap_err();
        assert!(matches!(err, EstimateError::Wbs(_)));
    }

    #[test]
    fn test_invalid_mass_skips_sheet() {
        let config = SubsystemConfig {
            allocation: MassAllocation::new(-5.0, MassUnit::Pounds),
            ..Default::default()
        };
        let err = analyze_sheet(&structure_sheet(), &config, Escalation::neutral(1999), 1e-3).unwrap_err();
        assert!(matches!(err, EstimateError::Allocation(AllocationError::InvalidMass { .. })));
    }

    #[test]
    fn test_currency_view() {
        let config = SubsystemConfig {
            allocation: MassAllocation::new(150.0, MassUnit::Pounds),
            ..Default::default()
        };
        let analysis = analyze_sheet(&structure_sheet(), &config, Escalation::neutral(1999), 1e-3).unwrap();
        let eur = analysis.in_currency(&CurrencyConfig::default());
        assert_eq!(eur.len(), 1);
        assert_eq!(eur[0].currency, "EUR");
        assert!((eur[0].costs.total_cost_new - 25.0 * 0.86).abs() < 1e-9);
    }

    #[test]
    fn test_reanalysis_is_bit_identical() {
        let config = SubsystemConfig {
            allocation: MassAllocation::new(123.4, MassUnit::Kilograms),
            ..Default::default()
        };
        let esc = InflationIndex::fallback().escalation(2000, 2024);
        let a = analyze_sheet(&structure_sheet(), &config, esc, 1e-3).unwrap();
        let b = analyze_sheet(&structure_sheet(), &config, esc, 1e-3).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }
}
