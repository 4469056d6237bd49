/// Inflation index: a sparse year -> cost index table.
/// Escalation between two years is the ratio of their indices.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::calibration::{FALLBACK_INFLATION, PREFERRED_BASE_YEARS, PREFERRED_TARGET_YEAR};
use crate::errors::InflationError;
use crate::sheet::Cell;

/// Row holding year labels in the source grid
pub const YEAR_ROW: usize = 5;
/// Row holding index values in the source grid
pub const INDEX_ROW: usize = 7;
/// First data column in the source grid
pub const FIRST_DATA_COLUMN: usize = 1;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InflationIndex {
    indices: BTreeMap<i32, f64>,
}

impl InflationIndex {
    /// Build from (year, index) pairs. Non-positive or non-finite indices are
    /// dropped; a repeated year keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let mut indices = BTreeMap::new();
        for (year, index) in pairs {
            if !(index.is_finite() && index > 0.0) {
                debug!(year, index, "dropping non-positive inflation index");
                continue;
            }
            if indices.insert(year, index).is_some() {
                debug!(year, "duplicate inflation year, keeping last value");
            }
        }
        Self { indices }
    }

    /// Build from raw cell pairs. Year cells that are not numbers
    /// (partial-year markers such as "TQ") are discarded.
    pub fn from_cells<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a Cell, &'a Cell)>,
    {
        Self::from_pairs(pairs.into_iter().filter_map(|(year, index)| {
            let Some(year) = year.as_strict_number() else {
                debug!(?year, "skipping non-numeric inflation year");
                return None;
            };
            Some((year as i32, index.as_number()?))
        }))
    }

    /// Build from the inflation workbook grid: years on row 5, indices on
    /// row 7, both starting at column 1.
    pub fn from_grid(grid: &[Vec<Cell>]) -> Result<Self, InflationError> {
        if grid.len() <= INDEX_ROW {
            return Err(InflationError::GridTooShort {
                rows: grid.len(),
                needed: INDEX_ROW + 1,
            });
        }
        let years = grid[YEAR_ROW].iter().skip(FIRST_DATA_COLUMN);
        let values = grid[INDEX_ROW].iter().skip(FIRST_DATA_COLUMN);
        let index = Self::from_cells(years.zip(values));
        if index.is_empty() {
            return Err(InflationError::Empty);
        }
        Ok(index)
    }

    /// Built-in NASA New Start subset used when no table is available.
    pub fn fallback() -> Self {
        Self::from_pairs(FALLBACK_INFLATION)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.indices.contains_key(&year)
    }

    pub fn index(&self, year: i32) -> Option<f64> {
        self.indices.get(&year).copied()
    }

    /// Known years, ascending
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.indices.keys().copied()
    }

    /// Escalation factor when both years are known.
    pub fn try_factor(&self, base_year: i32, target_year: i32) -> Option<f64> {
        Some(self.index(target_year)? / self.index(base_year)?)
    }

    /// Escalation factor, degrading to 1.0 when either year is unknown.
    pub fn factor(&self, base_year: i32, target_year: i32) -> f64 {
        self.escalation(base_year, target_year).factor
    }

    /// Escalation with a record of whether the factor was actually looked up.
    pub fn escalation(&self, base_year: i32, target_year: i32) -> Escalation {
        match self.try_factor(base_year, target_year) {
            Some(factor) => Escalation {
                base_year,
                target_year,
                factor,
                resolved: true,
            },
            None => {
                warn!(base_year, target_year, "inflation year not in index, using neutral factor");
                Escalation {
                    base_year,
                    target_year,
                    factor: 1.0,
                    resolved: false,
                }
            }
        }
    }

    /// 1999 if present, else 2024, else the earliest year.
    pub fn default_base_year(&self) -> Option<i32> {
        PREFERRED_BASE_YEARS
            .iter()
            .copied()
            .find(|y| self.contains(*y))
            .or_else(|| self.years().next())
    }

    /// 2025 if present, else the latest year.
    pub fn default_target_year(&self) -> Option<i32> {
        if self.contains(PREFERRED_TARGET_YEAR) {
            Some(PREFERRED_TARGET_YEAR)
        } else {
            self.indices.keys().next_back().copied()
        }
    }
}

/// A resolved base -> target escalation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Escalation {
    pub base_year: i32,
    pub target_year: i32,
    pub factor: f64,
    /// False when a year was missing and the neutral factor was used
    pub resolved: bool,
}

impl Escalation {
    pub fn neutral(year: i32) -> Self {
        Self {
            base_year: year,
            target_year: year,
            factor: 1.0,
            resolved: true,
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor
    }
}
