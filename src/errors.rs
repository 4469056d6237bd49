/// Error types for the estimation engine.
/// One enum per subsystem; `EstimateError` wraps the ones a sheet analysis can hit.

use crate::units::MassUnit;

/// Errors raised while resolving a raw sheet into historical records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SheetError {
    #[error("No WBS column found in sheet '{sheet}'")]
    MissingWbsColumn { sheet: String },
}

/// Errors raised while building an inflation index from a grid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InflationError {
    #[error("Inflation grid has {rows} rows, need at least {needed}")]
    GridTooShort { rows: usize, needed: usize },

    #[error("Inflation grid contains no usable (year, index) pairs")]
    Empty,
}

/// Merge-definition validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WbsError {
    #[error("Merge group name must not be blank")]
    BlankName,

    #[error("Merge group '{0}' needs at least one WBS item")]
    NoMembers(String),

    #[error("Merge group '{0}' already exists")]
    GroupExists(String),

    #[error("Merge group name '{0}' clashes with an unmerged WBS item")]
    NameClash(String),

    #[error("Unknown WBS item '{0}'")]
    UnknownLabel(String),

    #[error("WBS item '{label}' is already merged into '{group}'")]
    AlreadyMerged { label: String, group: String },
}

/// Mass allocation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("Invalid mass {value} for '{group}'")]
    InvalidMass { group: String, value: f64 },

    #[error("Sum of WBS masses ({sum:.2} {unit}) does not equal total mass ({total:.2} {unit})")]
    Mismatch { sum: f64, total: f64, unit: MassUnit },
}

/// AMCM input validation failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmcmError {
    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    #[error("Dry mass must be positive, got {0}")]
    NonPositiveMass(f64),

    #[error("Mission type index {index} out of range (0..{len})")]
    MissionTypeOutOfRange { index: usize, len: usize },

    #[error("IOC year must be after 1900, got {0}")]
    IocYear(i32),

    #[error("Block number must be at least 1")]
    ZeroBlock,
}

/// Configuration loading and resolution failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(String),

    #[error("{role} year {year} is not in the inflation index")]
    UnknownYear { role: &'static str, year: i32 },

    #[error("Inflation index has no years")]
    NoYears,

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Reasons a subsystem sheet analysis is skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Wbs(#[from] WbsError),

    #[error("No WBS components selected in sheet '{0}'")]
    NothingSelected(String),
}
