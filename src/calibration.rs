/// Fixed calibration data: AMCM constants, the mission-type profile table,
/// and engine-wide defaults. The formula code reads these; it never embeds them.

// ==========================================
// AMCM Constants
// ==========================================

/// Empirical constants of the AMCM cost-estimating relationship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmcmConstants {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub g: f64,
}

/// Published calibration, costs in millions of 1999 dollars.
pub const AMCM_1999: AmcmConstants = AmcmConstants {
    a: 0.000504839,
    b: 0.594183076,
    c: 0.653947922,
    d: 76.99939424,
    e: 1.68051e-52,
    f: -0.355322218,
    g: 1.554982942,
};

/// Currency year the AMCM constants are calibrated in
pub const AMCM_REFERENCE_YEAR: i32 = 1999;

/// IOC years are measured from this epoch
pub const IOC_EPOCH: i32 = 1900;

// ==========================================
// Mission-Type Profiles
// ==========================================

/// One row of the AMCM mission-type table.
/// Only `spec` enters the formula; the rest is informational.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissionProfile {
    pub name: &'static str,
    pub data_points: u32,
    pub spec: f64,
    pub std_dev: f64,
}

const fn profile(name: &'static str, data_points: u32, spec: f64, std_dev: f64) -> MissionProfile {
    MissionProfile { name, data_points, spec, std_dev }
}

pub const MISSION_PROFILE_COUNT: usize = 16;

/// Space-related mission types, in selection order
pub const MISSION_PROFILES: [MissionProfile; MISSION_PROFILE_COUNT] = [
    profile("Spacecraft - Planetary Lander", 3, 2.46, 0.0664),
    profile("Spacecraft - Planetary", 11, 2.39, 0.0733),
    profile("Spacecraft - Manned Reentry", 6, 2.27, 0.0815),
    profile("Spacecraft - Communication", 9, 2.22, 0.0454),
    profile("Spacecraft - Weather", 6, 2.18, 0.1381),
    profile("Spacecraft - Physics & Astronomy", 11, 2.17, 0.1109),
    profile("Spacecraft - Earth Observation", 3, 2.16, 0.0817),
    profile("Spacecraft - Lunar Rover", 1, 2.14, 0.0),
    profile("Spacecraft - Manned Habitat", 4, 2.13, 0.0759),
    profile("Space Transport - Unmanned Reentry", 4, 1.91, 0.0987),
    profile("Space Transport - Launch Vehicle Stage", 3, 2.01, 0.1128),
    profile("Space Transport - Upper Stage", 5, 2.07, 0.1147),
    profile("Space Transport - Liquid Rocket Engine - Lox/Lh", 3, 2.19, 0.1195),
    profile("Space Transport - Liquid Rocket Engine - Lox/RP-1", 2, 1.84, 0.0189),
    profile("Space Transport - Payload Fairing", 3, 1.15, 0.0242),
    profile("Space Transport - Centaur Fairing", 2, 1.6, 0.0692),
];

// ==========================================
// Engine Defaults
// ==========================================

/// Allowed gap between the per-group mass sum and the entered total
pub const MASS_BALANCE_TOLERANCE: f64 = 1e-3;

/// Default secondary currency for adjusted estimates
pub const DEFAULT_CURRENCY_CODE: &str = "EUR";

/// Units of the secondary currency per US dollar
pub const DEFAULT_CURRENCY_RATE: f64 = 0.86;

/// Preferred base years, first present wins
pub const PREFERRED_BASE_YEARS: [i32; 2] = [1999, 2024];

/// Preferred target year when present
pub const PREFERRED_TARGET_YEAR: i32 = 2025;

/// NASA New Start index used when no inflation table is supplied
pub const FALLBACK_INFLATION: [(i32, f64); 6] = [
    (1999, 1.0),
    (2000, 1.040),
    (2010, 1.384),
    (2020, 1.666),
    (2024, 1.857),
    (2025, 1.906),
];
