/// Cross-subsystem cost rollup: reference-year and escalated totals per
/// analysed sheet, plus grand totals.

use serde::Serialize;

use crate::estimate::SheetAnalysis;

/// Totals for one subsystem sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsystemTotal {
    pub sheet: String,
    pub mass_lbs: f64,
    /// D&D cost of the user system (undefined parts count as zero)
    pub dd_cost: f64,
    pub flight_unit_cost: f64,
    pub total_cost: f64,
    pub adjusted_total_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostRollup {
    pub subsystems: Vec<SubsystemTotal>,
}

impl CostRollup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the totals of one analysed sheet
    pub fn add_sheet(&mut self, analysis: &SheetAnalysis) {
        let estimates = &analysis.estimates;
        self.subsystems.push(SubsystemTotal {
            sheet: analysis.sheet.clone(),
            mass_lbs: estimates.iter().map(|e| e.user_mass_lbs).sum(),
            dd_cost: estimates.iter().filter_map(|e| e.dd_cost_new).sum(),
            flight_unit_cost: estimates.iter().filter_map(|e| e.flight_unit_cost_new).sum(),
            total_cost: analysis.total_cost_new(),
            adjusted_total_cost: analysis.adjusted_total_cost_new(),
        });
    }

    pub fn total_mass_lbs(&self) -> f64 {
        self.subsystems.iter().map(|s| s.mass_lbs).sum()
    }

    /// Reference-year total across subsystems
    pub fn total_cost(&self) -> f64 {
        self.subsystems.iter().map(|s| s.total_cost).sum()
    }

    /// Escalated total across subsystems
    pub fn adjusted_total_cost(&self) -> f64 {
        self.subsystems.iter().map(|s| s.adjusted_total_cost).sum()
    }

    /// Share of the reference-year total carried by `sheet`, 0 when the total is 0
    pub fn share(&self, sheet: &str) -> f64 {
        let total = self.total_cost();
        if total == 0.0 {
            return 0.0;
        }
        self.subsystems
            .iter()
            .filter(|s| s.sheet == sheet)
            .map(|s| s.total_cost)
            .sum::<f64>()
            / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::MassAllocation;
    use crate::estimate::{analyze_sheet, SubsystemConfig};
    use crate::inflation::{Escalation, InflationIndex};
    use crate::sheet::{HistoricalRecord, HistoricalSheet};
    use crate::units::MassUnit;

    fn analysis(name: &str, mass_lbs: f64, escalation: Escalation) -> SheetAnalysis {
        let sheet = HistoricalSheet::new(
            name,
            vec![HistoricalRecord::new("Item")
                .with_weight(100.0)
                .with_dd_cost(40.0)
                .with_flight_unit_cost(10.0)],
        );
        let config = SubsystemConfig {
            allocation: MassAllocation::new(mass_lbs, MassUnit::Pounds),
            ..Default::default()
        };
        analyze_sheet(&sheet, &config, escalation, 1e-3).unwrap()
    }

    #[test]
    fn test_rollup_new() {
        let rollup = CostRollup::new();
        assert_eq!(rollup.total_cost(), 0.0);
        assert_eq!(rollup.adjusted_total_cost(), 0.0);
        assert_eq!(rollup.share("Anything"), 0.0);
    }

    #[test]
    fn test_rollup_totals() {
        let mut rollup = CostRollup::new();
        rollup.add_sheet(&analysis("Power", 100.0, Escalation::neutral(1999)));
        rollup.add_sheet(&analysis("Thermal", 300.0, Escalation::neutral(1999)));

        assert_eq!(rollup.subsystems.len(), 2);
        assert!((rollup.total_cost() - 200.0).abs() < 1e-9);
        assert!((rollup.total_mass_lbs() - 400.0).abs() < 1e-9);
        assert!((rollup.subsystems[1].dd_cost - 120.0).abs() < 1e-9);
        assert!((rollup.subsystems[1].flight_unit_cost - 30.0).abs() < 1e-9);
        assert!((rollup.share("Thermal") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_rollup_adjusted_totals() {
        let esc = InflationIndex::fallback().escalation(1999, 2020);
        let mut rollup = CostRollup::new();
        rollup.add_sheet(&analysis("Power", 100.0, esc));
        assert!((rollup.adjusted_total_cost() - 50.0 * 1.666).abs() < 1e-9);
    }
}
