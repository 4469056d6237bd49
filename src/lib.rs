pub mod aggregate;
pub mod allocation;
pub mod amcm;
pub mod calibration;
pub mod config;
pub mod errors;
pub mod estimate;
pub mod inflation;
pub mod rollup;
pub mod scaler;
pub mod session;
pub mod sheet;
pub mod units;
pub mod wbs;

pub use amcm::{AmcmInput, AmcmModel, AmcmResult, Difficulty};
pub use config::EstimatorConfig;
pub use errors::{AllocationError, AmcmError, ConfigError, EstimateError, InflationError, SheetError, WbsError};
pub use estimate::{analyze_sheet, Caveat, SheetAnalysis, SubsystemConfig};
pub use inflation::{Escalation, InflationIndex};
pub use session::{AnalysisSession, SessionReport};
pub use sheet::{Cell, HistoricalRecord, HistoricalSheet, RawSheet};
pub use units::{Mass, MassUnit};
