/// Mass units accepted at the input boundary.
/// Everything downstream of the scaler works in pounds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pounds per kilogram
pub const LBS_PER_KG: f64 = 2.20462;

/// Unit a user mass was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    #[default]
    #[serde(alias = "lbs", alias = "lb")]
    Pounds,
    #[serde(alias = "kg")]
    Kilograms,
}

impl MassUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Pounds => "lbs",
            MassUnit::Kilograms => "kg",
        }
    }

    /// Parse "lbs"/"lb"/"kg" (case-insensitive).
    pub fn from_symbol(symbol: &str) -> Option<MassUnit> {
        match symbol.trim().to_ascii_lowercase().as_str() {
            "lbs" | "lb" | "pounds" => Some(MassUnit::Pounds),
            "kg" | "kilograms" => Some(MassUnit::Kilograms),
            _ => None,
        }
    }

    /// Convert a value in this unit to pounds
    pub fn to_pounds(&self, value: f64) -> f64 {
        match self {
            MassUnit::Pounds => value,
            MassUnit::Kilograms => value * LBS_PER_KG,
        }
    }

    /// Convert a value in pounds to this unit
    pub fn from_pounds(&self, lbs: f64) -> f64 {
        match self {
            MassUnit::Pounds => lbs,
            MassUnit::Kilograms => lbs / LBS_PER_KG,
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A mass value tagged with the unit it was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    pub value: f64,
    pub unit: MassUnit,
}

impl Mass {
    pub fn new(value: f64, unit: MassUnit) -> Self {
        Self { value, unit }
    }

    pub fn pounds(value: f64) -> Self {
        Self::new(value, MassUnit::Pounds)
    }

    pub fn kilograms(value: f64) -> Self {
        Self::new(value, MassUnit::Kilograms)
    }

    pub fn to_pounds(&self) -> f64 {
        self.unit.to_pounds(self.value)
    }

    pub fn to_kilograms(&self) -> f64 {
        MassUnit::Kilograms.from_pounds(self.to_pounds())
    }
}
