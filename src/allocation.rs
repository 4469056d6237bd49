/// User mass allocation for one subsystem sheet: an entered total plus
/// per-group masses, all in the same unit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AllocationError;
use crate::units::{Mass, MassUnit};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MassAllocation {
    pub unit: MassUnit,
    /// Independently entered subsystem total
    pub total: f64,
    per_group: BTreeMap<String, f64>,
}

impl MassAllocation {
    pub fn new(total: f64, unit: MassUnit) -> Self {
        Self {
            unit,
            total,
            per_group: BTreeMap::new(),
        }
    }

    /// Builder-style per-group entry
    pub fn with_group(mut self, group: &str, mass: f64) -> Self {
        self.set_group(group, mass);
        self
    }

    pub fn set_group(&mut self, group: &str, mass: f64) {
        self.per_group.insert(group.to_string(), mass);
    }

    pub fn set_total(&mut self, total: f64) {
        self.total = total;
    }

    pub fn set_unit(&mut self, unit: MassUnit) {
        self.unit = unit;
    }

    pub fn group_mass(&self, group: &str) -> Option<f64> {
        self.per_group.get(group).copied()
    }

    /// Every entered value must be finite and non-negative.
    pub fn validate(&self) -> Result<(), AllocationError> {
        let entries = std::iter::once(("total", self.total))
            .chain(self.per_group.iter().map(|(g, m)| (g.as_str(), *m)));
        for (group, value) in entries {
            if !value.is_finite() || value < 0.0 {
                return Err(AllocationError::InvalidMass {
                    group: group.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Mass to scale `group` by. With a single analysed group the entered
    /// total is that group's mass; otherwise an unset group counts as zero.
    pub fn mass_for(&self, group: &str, group_count: usize) -> Mass {
        let value = if group_count == 1 {
            self.total
        } else {
            self.group_mass(group).unwrap_or(0.0)
        };
        Mass::new(value, self.unit)
    }

    /// Sum of the per-group masses for the analysed groups.
    pub fn allocated<S: AsRef<str>>(&self, groups: &[S]) -> f64 {
        groups
            .iter()
            .map(|g| self.group_mass(g.as_ref()).unwrap_or(0.0))
            .sum()
    }

    /// With more than one group the per-group masses must add up to the
    /// total within `tolerance`, compared in the entered unit.
    pub fn check_balance<S: AsRef<str>>(&self, groups: &[S], tolerance: f64) -> Result<(), AllocationError> {
        if groups.len() <= 1 {
            return Ok(());
        }
        let sum = self.allocated(groups);
        if (sum - self.total).abs() > tolerance {
            warn!(sum, total = self.total, unit = %self.unit, "mass allocation does not balance");
            return Err(AllocationError::Mismatch {
                sum,
                total: self.total,
                unit: self.unit,
            });
        }
        Ok(())
    }
}
