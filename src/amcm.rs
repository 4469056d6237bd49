/// Advanced Missions Cost Model: a parametric power-law estimate from
/// quantity, dry mass, mission type, IOC year, block number and difficulty.
///
/// cost = A * Q^B * W^C * D^S * E^(1/(IOC-1900)) * Block^F * G^(difficulty-2)
///
/// Costs come out in millions of 1999 dollars; escalation is a separate step.

use serde::Serialize;

use crate::calibration::{AmcmConstants, MissionProfile, AMCM_1999, AMCM_REFERENCE_YEAR, IOC_EPOCH, MISSION_PROFILES};
use crate::errors::AmcmError;
use crate::inflation::{Escalation, InflationIndex};
use crate::units::Mass;

// ==========================================
// Difficulty
// ==========================================

/// Five-point programmatic/technical difficulty, `Average` is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Difficulty {
    VeryLow,
    Low,
    #[default]
    Average,
    High,
    VeryHigh,
}

pub const ALL_DIFFICULTIES: [Difficulty; 5] = [
    Difficulty::VeryLow,
    Difficulty::Low,
    Difficulty::Average,
    Difficulty::High,
    Difficulty::VeryHigh,
];

impl Difficulty {
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::VeryLow => "Very Low",
            Difficulty::Low => "Low",
            Difficulty::Average => "Average",
            Difficulty::High => "High",
            Difficulty::VeryHigh => "Very High",
        }
    }

    /// Ordinal 0..=4
    pub fn index(&self) -> usize {
        match self {
            Difficulty::VeryLow => 0,
            Difficulty::Low => 1,
            Difficulty::Average => 2,
            Difficulty::High => 3,
            Difficulty::VeryHigh => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Difficulty> {
        ALL_DIFFICULTIES.get(i).copied()
    }

    /// Exponent on G: -2..=2
    pub fn exponent(&self) -> i32 {
        self.index() as i32 - 2
    }
}

// ==========================================
// Inputs and Results
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmcmInput {
    pub quantity: u32,
    pub mass: Mass,
    /// Index into the mission profile table
    pub mission_type: usize,
    pub ioc_year: i32,
    pub block: u32,
    pub difficulty: Difficulty,
}

impl Default for AmcmInput {
    fn default() -> Self {
        Self {
            quantity: 1,
            mass: Mass::pounds(1000.0),
            mission_type: 0,
            ioc_year: 2025,
            block: 1,
            difficulty: Difficulty::Average,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmcmResult {
    pub mission_type: &'static str,
    pub weight_lbs: f64,
    pub weight_kg: f64,
    /// Millions of reference-year dollars
    pub base_cost: f64,
    pub reference_year: i32,
    pub escalation: Escalation,
    pub adjusted_cost: f64,
}

impl AmcmResult {
    /// Adjusted minus base cost
    pub fn inflation_adjustment(&self) -> f64 {
        self.adjusted_cost - self.base_cost
    }
}

// ==========================================
// Evaluator
// ==========================================

/// Formula evaluator over a constant set and a profile table.
#[derive(Debug, Clone, Copy)]
pub struct AmcmModel<'a> {
    pub constants: AmcmConstants,
    pub profiles: &'a [MissionProfile],
    pub reference_year: i32,
}

impl Default for AmcmModel<'static> {
    fn default() -> Self {
        Self {
            constants: AMCM_1999,
            profiles: &MISSION_PROFILES,
            reference_year: AMCM_REFERENCE_YEAR,
        }
    }
}

impl<'a> AmcmModel<'a> {
    pub fn new(constants: AmcmConstants, profiles: &'a [MissionProfile], reference_year: i32) -> Self {
        Self {
            constants,
            profiles,
            reference_year,
        }
    }

    pub fn profile(&self, mission_type: usize) -> Option<&'a MissionProfile> {
        self.profiles.get(mission_type)
    }

    /// Check an input against the model's domain.
    pub fn validate(&self, input: &AmcmInput) -> Result<&'a MissionProfile, AmcmError> {
        if input.quantity == 0 {
            return Err(AmcmError::ZeroQuantity);
        }
        let lbs = input.mass.to_pounds();
        if !(lbs.is_finite() && lbs > 0.0) {
            return Err(AmcmError::NonPositiveMass(lbs));
        }
        if input.ioc_year <= IOC_EPOCH {
            return Err(AmcmError::IocYear(input.ioc_year));
        }
        if input.block == 0 {
            return Err(AmcmError::ZeroBlock);
        }
        self.profile(input.mission_type)
            .ok_or(AmcmError::MissionTypeOutOfRange {
                index: input.mission_type,
                len: self.profiles.len(),
            })
    }

    /// Base cost in the model's reference-year dollars.
    pub fn evaluate(&self, input: &AmcmInput) -> Result<f64, AmcmError> {
        let profile = self.validate(input)?;
        Ok(self.cost(input, profile))
    }

    fn cost(&self, input: &AmcmInput, profile: &MissionProfile) -> f64 {
        let k = &self.constants;
        let years = f64::from(input.ioc_year - IOC_EPOCH);

        k.a * f64::from(input.quantity).powf(k.b)
            * input.mass.to_pounds().powf(k.c)
            * k.d.powf(profile.spec)
            * k.e.powf(1.0 / years)
            * f64::from(input.block).powf(k.f)
            * k.g.powi(input.difficulty.exponent())
    }

    /// Evaluate and escalate from the reference year to `target_year`.
    pub fn estimate(
        &self,
        input: &AmcmInput,
        inflation: &InflationIndex,
        target_year: i32,
    ) -> Result<AmcmResult, AmcmError> {
        self.estimate_from(input, inflation, self.reference_year, target_year)
    }

    /// Evaluate, treating the base cost as `base_year` dollars.
    pub fn estimate_from(
        &self,
        input: &AmcmInput,
        inflation: &InflationIndex,
        base_year: i32,
        target_year: i32,
    ) -> Result<AmcmResult, AmcmError> {
        let profile = self.validate(input)?;
        let base_cost = self.cost(input, profile);
        let escalation = inflation.escalation(base_year, target_year);
        Ok(AmcmResult {
            mission_type: profile.name,
            weight_lbs: input.mass.to_pounds(),
            weight_kg: input.mass.to_kilograms(),
            base_cost,
            reference_year: base_year,
            escalation,
            adjusted_cost: escalation.apply(base_cost),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMUNICATION: usize = 3;

    fn comm_input() -> AmcmInput {
        AmcmInput {
            quantity: 1,
            mass: Mass::pounds(1000.0),
            mission_type: COMMUNICATION,
            ioc_year: 2025,
            block: 1,
            difficulty: Difficulty::Average,
        }
    }

    #[test]
    fn test_closed_form_communication() {
        let model = AmcmModel::default();
        let cost = model.evaluate(&comm_input()).unwrap();

        let expected = 0.000504839_f64
            * 1.0_f64.powf(0.594183076)
            * 1000.0_f64.powf(0.653947922)
            * 76.99939424_f64.powf(2.22)
            * 1.68051e-52_f64.powf(1.0 / 125.0)
            * 1.0_f64.powf(-0.355322218)
            * 1.554982942_f64.powi(0);
        assert!((cost - expected).abs() < 1e-9 * expected);
        assert!((cost - 274.664175).abs() < 1e-4, "got {cost}");
    }

    #[test]
    fn test_difficulty_scales_by_g() {
        let model = AmcmModel::default();
        let avg = model.evaluate(&comm_input()).unwrap();
        let mut input = comm_input();
        input.difficulty = Difficulty::VeryLow;
        let easy = model.evaluate(&input).unwrap();
        assert!((avg / easy - AMCM_1999.g.powi(2)).abs() < 1e-9);
        assert!((easy - 113.592788).abs() < 1e-4);
    }

    #[test]
    fn test_kilogram_input() {
        let model = AmcmModel::default();
        let input = AmcmInput {
            quantity: 10,
            mass: Mass::kilograms(500.0),
            mission_type: 0,
            ioc_year: 2030,
            block: 2,
            difficulty: Difficulty::VeryHigh,
        };
        let cost = model.evaluate(&input).unwrap();
        assert!((cost - 6394.781966).abs() < 1e-3, "got {cost}");
    }

    #[test]
    fn test_validation_errors() {
        let model = AmcmModel::default();
        let mut input = comm_input();
        input.ioc_year = 1900;
        assert_eq!(model.evaluate(&input), Err(AmcmError::IocYear(1900)));

        let mut input = comm_input();
        input.mission_type = 16;
        assert_eq!(
            model.evaluate(&input),
            Err(AmcmError::MissionTypeOutOfRange { index: 16, len: 16 })
        );

        let mut input = comm_input();
        input.quantity = 0;
        assert_eq!(model.evaluate(&input), Err(AmcmError::ZeroQuantity));

        let mut input = comm_input();
        input.block = 0;
        assert_eq!(model.evaluate(&input), Err(AmcmError::ZeroBlock));

        let mut input = comm_input();
        input.mass = Mass::pounds(0.0);
        assert_eq!(model.evaluate(&input), Err(AmcmError::NonPositiveMass(0.0)));
    }

    #[test]
    fn test_estimate_escalates_from_1999() {
        let model = AmcmModel::default();
        let index = InflationIndex::fallback();
        let result = model.estimate(&comm_input(), &index, 2025).unwrap();
        assert_eq!(result.mission_type, "Spacecraft - Communication");
        assert_eq!(result.reference_year, 1999);
        assert!((result.adjusted_cost - result.base_cost * 1.906).abs() < 1e-9);
        assert!((result.inflation_adjustment() - result.base_cost * 0.906).abs() < 1e-9);
        assert!((result.weight_kg - 1000.0 / 2.20462).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_unknown_year_is_neutral() {
        let model = AmcmModel::default();
        let index = InflationIndex::fallback();
        let result = model.estimate(&comm_input(), &index, 2099).unwrap();
        assert_eq!(result.adjusted_cost, result.base_cost);
        assert!(!result.escalation.resolved);
    }

    #[test]
    fn test_custom_profile_table() {
        let profiles = [MissionProfile { name: "Test", data_points: 1, spec: 0.0, std_dev: 0.0 }];
        let model = AmcmModel::new(AMCM_1999, &profiles, AMCM_REFERENCE_YEAR);
        let mut input = comm_input();
        input.mission_type = 0;
        let flat = model.evaluate(&input).unwrap();
        let comm = AmcmModel::default().evaluate(&comm_input()).unwrap();
        assert!((comm / flat - AMCM_1999.d.powf(2.22)).abs() < 1e-6 * comm / flat);
    }

    #[test]
    fn test_difficulty_ordinals() {
        assert_eq!(Difficulty::from_index(0), Some(Difficulty::VeryLow));
        assert_eq!(Difficulty::from_index(5), None);
        let exps: Vec<i32> = ALL_DIFFICULTIES.iter().map(|d| d.exponent()).collect();
        assert_eq!(exps, vec![-2, -1, 0, 1, 2]);
        assert_eq!(Difficulty::default().display_name(), "Average");
    }
}
