/// Boundary stage between loosely-named tabular input and the numeric core.
/// Resolves column names once; the rest of the engine only sees `HistoricalRecord`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::SheetError;

// ==========================================
// Column Names
// ==========================================

/// Accepted WBS column headers (compared trimmed, lowercase)
pub const WBS_COLUMN_ALIASES: [&str; 3] = ["wbs item", "wbs element", "wbs"];

pub const MISSION_COLUMN: &str = "Mission";
pub const WEIGHT_COLUMN: &str = "Higher Weight Range (lbs)";
pub const DD_COST_COLUMN: &str = "Higher D&D Cost Range";
pub const TOTAL_COST_COLUMN: &str = "Higher Total Cost Range";
pub const FLIGHT_UNIT_COST_COLUMN: &str = "Higher Flight Unit Cost Range";

// ==========================================
// Cells
// ==========================================

/// A single parsed spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(s: &str) -> Self {
        Cell::Text(s.to_string())
    }

    /// Numeric value with coercion: numeric text parses, anything else is absent.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Empty => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Strict numeric value: only real number cells count.
    pub fn as_strict_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Cell rendered as a label, `None` when blank.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) if n.is_nan() => None,
            Cell::Number(n) => Some(n.to_string()),
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::text(s)
    }
}

// ==========================================
// Raw and Resolved Sheets
// ==========================================

/// One subsystem sheet as delivered by the loading collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Mission and row counts for a sheet preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub missions: usize,
    pub rows: usize,
}

impl RawSheet {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    fn cell(&self, row: usize, col: usize) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Index of the first header matching `name`, trimmed and case-insensitive.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    /// Index of the WBS column, if the sheet has one.
    pub fn wbs_column(&self) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| WBS_COLUMN_ALIASES.contains(&h.trim().to_lowercase().as_str()))
    }

    /// Distinct missions are counted in the first column.
    pub fn summary(&self) -> SheetSummary {
        let missions = if self.headers.is_empty() {
            0
        } else {
            (0..self.rows.len())
                .filter_map(|r| self.cell(r, 0).as_label())
                .collect::<BTreeSet<_>>()
                .len()
        };
        SheetSummary {
            missions,
            rows: self.rows.len(),
        }
    }

    /// Resolve columns and produce typed historical records.
    pub fn resolve(&self) -> Result<HistoricalSheet, SheetError> {
        let wbs_col = self.wbs_column().ok_or_else(|| SheetError::MissingWbsColumn {
            sheet: self.name.clone(),
        })?;
        let mission_col = self
            .column(MISSION_COLUMN)
            .or_else(|| (wbs_col != 0).then_some(0));
        let weight_col = self.column(WEIGHT_COLUMN);
        let dd_col = self.column(DD_COST_COLUMN);
        let total_col = self.column(TOTAL_COST_COLUMN);
        let fu_col = self.column(FLIGHT_UNIT_COST_COLUMN);

        let number = |row: usize, col: Option<usize>| col.and_then(|c| self.cell(row, c).as_number());

        let records = (0..self.rows.len())
            .filter_map(|r| {
                let wbs = self.cell(r, wbs_col).as_label()?;
                Some(HistoricalRecord {
                    mission: mission_col.and_then(|c| self.cell(r, c).as_label()),
                    wbs,
                    weight_lbs: number(r, weight_col),
                    dd_cost: number(r, dd_col),
                    flight_unit_cost: number(r, fu_col),
                    total_cost: number(r, total_col),
                })
            })
            .collect();

        Ok(HistoricalSheet {
            name: self.name.clone(),
            records,
        })
    }
}

/// One row of historical mission cost data.
/// Absent or non-numeric cells are `None`, never zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistoricalRecord {
    pub mission: Option<String>,
    pub wbs: String,
    pub weight_lbs: Option<f64>,
    pub dd_cost: Option<f64>,
    pub flight_unit_cost: Option<f64>,
    pub total_cost: Option<f64>,
}

impl HistoricalRecord {
    pub fn new(wbs: &str) -> Self {
        Self {
            wbs: wbs.to_string(),
            ..Default::default()
        }
    }

    pub fn with_mission(mut self, mission: &str) -> Self {
        self.mission = Some(mission.to_string());
        self
    }

    pub fn with_weight(mut self, lbs: f64) -> Self {
        self.weight_lbs = Some(lbs);
        self
    }

    pub fn with_dd_cost(mut self, cost: f64) -> Self {
        self.dd_cost = Some(cost);
        self
    }

    pub fn with_flight_unit_cost(mut self, cost: f64) -> Self {
        self.flight_unit_cost = Some(cost);
        self
    }

    pub fn with_total_cost(mut self, cost: f64) -> Self {
        self.total_cost = Some(cost);
        self
    }
}

/// A resolved subsystem sheet with a fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoricalSheet {
    pub name: String,
    pub records: Vec<HistoricalRecord>,
}

impl HistoricalSheet {
    pub fn new(name: &str, records: Vec<HistoricalRecord>) -> Self {
        Self {
            name: name.to_string(),
            records,
        }
    }

    /// Sorted, de-duplicated WBS labels present in the sheet.
    pub fn distinct_labels(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.wbs.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
