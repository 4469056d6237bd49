/// Cost scaling: historical per-pound rates applied to the user's mass,
/// then escalated by the inflation factor.
///
/// Ratios propagate "no value" when an operand is missing. The headline
/// `total_cost_new` is a sum of parts and treats a missing part as zero.

use serde::Serialize;

use crate::aggregate::GroupAggregate;
use crate::units::Mass;

/// Result record for one analysis group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub group: String,
    pub count: usize,

    // Historical averages
    pub mean_weight_lbs: Option<f64>,
    pub mean_dd_cost: Option<f64>,
    pub mean_flight_unit_cost: Option<f64>,
    pub mean_total_cost: f64,
    pub mean_historical_total_cost: Option<f64>,

    // User system, reference year
    pub user_mass_lbs: f64,
    pub price_per_lb: Option<f64>,
    pub estimated_price: Option<f64>,
    pub dd_cost_per_lb: Option<f64>,
    pub flight_unit_cost_per_lb: Option<f64>,
    pub dd_cost_new: Option<f64>,
    pub flight_unit_cost_new: Option<f64>,
    pub total_cost_new: f64,

    pub adjusted: AdjustedCosts,
}

/// Inflation-adjusted variants of every absolute cost and per-pound rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustedCosts {
    pub factor: f64,
    pub mean_dd_cost: Option<f64>,
    pub mean_total_cost: f64,
    pub mean_historical_total_cost: Option<f64>,
    pub price_per_lb: Option<f64>,
    pub estimated_price: Option<f64>,
    pub dd_cost_per_lb: Option<f64>,
    pub flight_unit_cost_per_lb: Option<f64>,
    pub dd_cost_new: Option<f64>,
    pub flight_unit_cost_new: Option<f64>,
    pub total_cost_new: f64,
}

impl AdjustedCosts {
    /// Re-express every amount in another currency at `rate` units per dollar.
    pub fn in_currency(&self, rate: f64) -> AdjustedCosts {
        let conv = |v: Option<f64>| v.map(|x| x * rate);
        AdjustedCosts {
            factor: self.factor,
            mean_dd_cost: conv(self.mean_dd_cost),
            mean_total_cost: self.mean_total_cost * rate,
            mean_historical_total_cost: conv(self.mean_historical_total_cost),
            price_per_lb: conv(self.price_per_lb),
            estimated_price: conv(self.estimated_price),
            dd_cost_per_lb: conv(self.dd_cost_per_lb),
            flight_unit_cost_per_lb: conv(self.flight_unit_cost_per_lb),
            dd_cost_new: conv(self.dd_cost_new),
            flight_unit_cost_new: conv(self.flight_unit_cost_new),
            total_cost_new: self.total_cost_new * rate,
        }
    }
}

/// `numerator / weight`, undefined for a missing operand or a zero weight.
fn per_lb(numerator: Option<f64>, weight: Option<f64>) -> Option<f64> {
    match (numerator, weight) {
        (Some(n), Some(w)) if w != 0.0 => Some(n / w),
        _ => None,
    }
}

/// Sum of parts: a missing part contributes zero.
fn sum_parts(a: Option<f64>, b: Option<f64>) -> f64 {
    a.unwrap_or(0.0) + b.unwrap_or(0.0)
}

/// Scale a group aggregate to the user's mass. The mass is converted to
/// pounds here and nowhere else.
pub fn scale(aggregate: &GroupAggregate, mass: Mass, inflation_factor: f64) -> CostEstimate {
    let user_mass_lbs = mass.to_pounds();
    let weight = aggregate.mean_weight_lbs;

    let mean_total_cost = aggregate.mean_total_cost();
    let price_per_lb = if aggregate.has_cost_data() {
        per_lb(Some(mean_total_cost), weight)
    } else {
        None
    };
    let estimated_price = price_per_lb.map(|rate| rate * user_mass_lbs);

    let dd_cost_per_lb = per_lb(aggregate.mean_dd_cost, weight);
    let flight_unit_cost_per_lb = per_lb(aggregate.mean_flight_unit_cost, weight);
    let dd_cost_new = dd_cost_per_lb.map(|rate| rate * user_mass_lbs);
    let flight_unit_cost_new = flight_unit_cost_per_lb.map(|rate| rate * user_mass_lbs);
    let total_cost_new = sum_parts(flight_unit_cost_new, dd_cost_new);

    let adj = |v: Option<f64>| v.map(|x| x * inflation_factor);
    let adjusted = AdjustedCosts {
        factor: inflation_factor,
        mean_dd_cost: adj(aggregate.mean_dd_cost),
        mean_total_cost: mean_total_cost * inflation_factor,
        mean_historical_total_cost: adj(aggregate.mean_historical_total_cost),
        price_per_lb: adj(price_per_lb),
        estimated_price: adj(estimated_price),
        dd_cost_per_lb: adj(dd_cost_per_lb),
        flight_unit_cost_per_lb: adj(flight_unit_cost_per_lb),
        dd_cost_new: adj(dd_cost_new),
        flight_unit_cost_new: adj(flight_unit_cost_new),
        total_cost_new: total_cost_new * inflation_factor,
    };

    CostEstimate {
        group: aggregate.group.clone(),
        count: aggregate.count,
        mean_weight_lbs: weight,
        mean_dd_cost: aggregate.mean_dd_cost,
        mean_flight_unit_cost: aggregate.mean_flight_unit_cost,
        mean_total_cost,
        mean_historical_total_cost: aggregate.mean_historical_total_cost,
        user_mass_lbs,
        price_per_lb,
        estimated_price,
        dd_cost_per_lb,
        flight_unit_cost_per_lb,
        dd_cost_new,
        flight_unit_cost_new,
        total_cost_new,
        adjusted,
    }
}
