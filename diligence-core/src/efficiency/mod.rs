//! Physics-bounded efficiency modeling.
//!
//! Every model is a pure function of a parameter struct. It returns the
//! modeled (typical) value, the theoretical ceiling for the same boundary, an
//! uncertainty band, a named decomposition, limiting factors and the
//! assumptions used. Physically invalid parameters are rejected with a
//! [`PhysicsError`] instead of producing a misleading ratio.
//!
//! Efficiencies are reported in percent; heat pumps report a coefficient of
//! performance. Component efficiencies passed *in* are fractions in (0, 1].

pub mod electrochemical;
pub mod solar;
pub mod storage;
pub mod thermal;
pub mod thermochemical;
pub mod wind;

use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

pub use electrochemical::{ElectrolyzerParams, FuelCellParams, electrolyzer, fuel_cell};
pub use solar::{DetailedBalanceParams, detailed_balance};
pub use storage::{
    BatteryParams, CaesKind, CaesParams, Chemistry, FlywheelParams, PumpedHydroParams,
    battery_round_trip, compressed_air, flywheel, pumped_hydro,
};
pub use thermal::{
    BraytonParams, CombinedCycleParams, HeatEngineParams, HeatPumpParams, RankineParams,
    StageEfficiency, brayton, carnot, combined_cycle, heat_pump_cop, multi_stage, rankine,
};
pub use thermochemical::{ConversionProcess, ThermochemicalParams, thermochemical_conversion};
pub use wind::{WindTurbineParams, wind_turbine};

/// Unit used by percentage-based models.
pub const PERCENT: &str = "%";
/// Unit used by heat pump models.
pub const COP: &str = "COP";

/// Lower and upper bound around a modeled value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyBand {
    pub lower: f64,
    pub upper: f64,
}

/// One named contribution to a modeled result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyComponent {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

/// Output of an efficiency model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyResult {
    /// Model identifier, e.g. `"carnot"`.
    pub model: String,
    /// Best-estimate (typical achievable) value.
    pub value: f64,
    /// Ceiling for the same system boundary.
    pub theoretical_max: f64,
    pub unit: String,
    pub uncertainty: UncertaintyBand,
    pub components: Vec<EfficiencyComponent>,
    pub limiting_factors: Vec<String>,
    pub assumptions: Vec<String>,
}

impl EfficiencyResult {
    pub(crate) fn new(model: &str, value: f64, theoretical_max: f64, unit: &str) -> Self {
        Self {
            model: model.to_string(),
            value,
            theoretical_max,
            unit: unit.to_string(),
            uncertainty: UncertaintyBand {
                lower: value,
                upper: value,
            },
            components: Vec::new(),
            limiting_factors: Vec::new(),
            assumptions: Vec::new(),
        }
    }

    /// Symmetric relative band, clipped to `[0, theoretical_max]`.
    pub(crate) fn with_relative_band(mut self, relative: f64) -> Self {
        self.uncertainty = UncertaintyBand {
            lower: (self.value * (1.0 - relative)).max(0.0),
            upper: (self.value * (1.0 + relative)).min(self.theoretical_max),
        };
        self
    }

    pub(crate) fn component(mut self, name: &str, value: f64, unit: &str) -> Self {
        self.components.push(EfficiencyComponent {
            name: name.to_string(),
            value,
            unit: unit.to_string(),
        });
        self
    }

    pub(crate) fn limiting(mut self, factor: impl Into<String>) -> Self {
        self.limiting_factors.push(factor.into());
        self
    }

    pub(crate) fn assume(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }
}

/// Outcome of comparing a claimed efficiency with a modeled result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlausibilityVerdict {
    pub plausible: bool,
    pub claimed: f64,
    /// Highest value the model considers plausible.
    pub max_plausible: f64,
    pub reason: String,
}

/// Default tolerance of a claim over the modeled typical value (50%).
pub const DEFAULT_TYPICAL_EXCESS: f64 = 0.5;

/// Compare a claimed efficiency against a modeled result.
///
/// Rejects the claim when it exceeds `theoretical_max × (1 + margin_of_error)`
/// or exceeds the modeled typical value by more than 50%.
pub fn validate_claimed_efficiency(
    claimed: f64,
    result: &EfficiencyResult,
    margin_of_error: f64,
) -> PlausibilityVerdict {
    validate_claimed_efficiency_with(claimed, result, margin_of_error, DEFAULT_TYPICAL_EXCESS)
}

/// [`validate_claimed_efficiency`] with an explicit typical-value tolerance.
pub fn validate_claimed_efficiency_with(
    claimed: f64,
    result: &EfficiencyResult,
    margin_of_error: f64,
    typical_excess: f64,
) -> PlausibilityVerdict {
    let ceiling = result.theoretical_max * (1.0 + margin_of_error);
    let typical_bound = result.value * (1.0 + typical_excess);
    let max_plausible = ceiling.min(typical_bound);
    let unit = &result.unit;

    if !claimed.is_finite() {
        return PlausibilityVerdict {
            plausible: false,
            claimed,
            max_plausible,
            reason: format!("Claimed value {claimed} is not a finite number"),
        };
    }

    if claimed > ceiling {
        return PlausibilityVerdict {
            plausible: false,
            claimed,
            max_plausible,
            reason: format!(
                "Claimed {claimed:.1}{unit} exceeds the {} theoretical maximum of {:.1}{unit} (margin {:.0}%)",
                result.model,
                result.theoretical_max,
                margin_of_error * 100.0
            ),
        };
    }

    if claimed > typical_bound {
        return PlausibilityVerdict {
            plausible: false,
            claimed,
            max_plausible,
            reason: format!(
                "Claimed {claimed:.1}{unit} exceeds the modeled typical value of {:.1}{unit} by more than {:.0}%",
                result.value,
                typical_excess * 100.0
            ),
        };
    }

    PlausibilityVerdict {
        plausible: true,
        claimed,
        max_plausible,
        reason: format!(
            "Claimed {claimed:.1}{unit} is within the {} bound of {max_plausible:.1}{unit}",
            result.model
        ),
    }
}

/// A model a claim rule can run when the caller supplies its parameters.
///
/// Parameter names are the keys looked up in the caller's data context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EfficiencyModel {
    HeatEngine,
    DetailedBalance,
    WindTurbine,
    Electrolyzer,
    FuelCell,
    Thermochemical(ConversionProcess),
}

impl EfficiencyModel {
    /// Parameters that must be present for the model to run.
    pub fn required_parameters(&self) -> &'static [&'static str] {
        match self {
            EfficiencyModel::HeatEngine => &["hot_temperature_k", "cold_temperature_k"],
            EfficiencyModel::DetailedBalance => &["bandgap_ev"],
            EfficiencyModel::WindTurbine => &["wind_speed_ms", "rotor_diameter_m"],
            EfficiencyModel::Electrolyzer | EfficiencyModel::FuelCell => &["cell_voltage_v"],
            EfficiencyModel::Thermochemical(_) => &[
                "feedstock_hhv_mj_kg",
                "product_yield",
                "product_hhv_mj_kg",
                "process_energy_mj_per_kg",
            ],
        }
    }

    /// Run the model against a parameter lookup.
    ///
    /// Returns `None` when a required parameter is missing.
    pub fn evaluate<F>(&self, lookup: F) -> Option<Result<EfficiencyResult, PhysicsError>>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let mut required = Vec::with_capacity(4);
        for name in self.required_parameters() {
            required.push(lookup(name)?);
        }

        let result = match self {
            EfficiencyModel::HeatEngine => carnot(&HeatEngineParams {
                hot_k: required[0],
                cold_k: required[1],
            }),
            EfficiencyModel::DetailedBalance => {
                let mut params = DetailedBalanceParams::new(required[0]);
                if let Some(t) = lookup("cell_temperature_k") {
                    params.cell_temperature_k = t;
                }
                if let Some(c) = lookup("concentration") {
                    params.concentration = c;
                }
                detailed_balance(&params)
            }
            EfficiencyModel::WindTurbine => {
                let mut params = WindTurbineParams::new(required[0], required[1]);
                if let Some(tsr) = lookup("tip_speed_ratio") {
                    params.tip_speed_ratio = tsr;
                }
                if let Some(pitch) = lookup("pitch_deg") {
                    params.pitch_deg = pitch;
                }
                wind_turbine(&params)
            }
            EfficiencyModel::Electrolyzer => {
                electrolyzer(&ElectrolyzerParams::new(required[0]))
            }
            EfficiencyModel::FuelCell => fuel_cell(&FuelCellParams::new(required[0])),
            EfficiencyModel::Thermochemical(process) => {
                thermochemical_conversion(&ThermochemicalParams {
                    process: *process,
                    feedstock_hhv_mj_kg: required[0],
                    product_yield: required[1],
                    product_hhv_mj_kg: required[2],
                    process_energy_mj_per_kg: required[3],
                    coproduct_energy_mj_per_kg: lookup("coproduct_energy_mj_per_kg")
                        .unwrap_or(0.0),
                })
            }
        };
        Some(result)
    }
}

/// Require `value` to be finite and strictly positive.
pub(crate) fn require_positive(parameter: &str, value: f64) -> Result<f64, PhysicsError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PhysicsError::non_positive(parameter, value))
    }
}

/// Require `value` to be finite and inside `[min, max]`.
pub(crate) fn require_range(
    parameter: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, PhysicsError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(PhysicsError::out_of_range(parameter, value, min, max))
    }
}

/// Require a component efficiency fraction in (0, 1].
pub(crate) fn require_fraction(parameter: &str, value: f64) -> Result<f64, PhysicsError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(PhysicsError::out_of_range(parameter, value, 0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample(value: f64, max: f64) -> EfficiencyResult {
        EfficiencyResult::new("sample", value, max, PERCENT).with_relative_band(0.1)
    }

    #[test]
    fn test_claim_at_theoretical_max_is_accepted() {
        let result = sample(90.0, 98.0);
        let verdict = validate_claimed_efficiency(98.0, &result, 0.0);
        assert!(verdict.plausible, "{}", verdict.reason);
    }

    #[test]
    fn test_claim_one_unit_above_max_is_rejected() {
        let result = sample(90.0, 98.0);
        let verdict = validate_claimed_efficiency(99.0, &result, 0.0);
        assert!(!verdict.plausible);
        assert!(verdict.reason.contains("theoretical maximum"));
        assert_eq!(verdict.max_plausible, 98.0);
    }

    #[test]
    fn test_margin_of_error_extends_ceiling() {
        let result = sample(90.0, 98.0);
        assert!(validate_claimed_efficiency(99.0, &result, 0.05).plausible);
    }

    #[test]
    fn test_claim_far_above_typical_is_rejected() {
        let result = sample(20.0, 60.0);
        let verdict = validate_claimed_efficiency(35.0, &result, 0.05);
        assert!(!verdict.plausible);
        assert!(verdict.reason.contains("typical"));
        assert_eq!(verdict.max_plausible, 30.0);
    }

    #[test]
    fn test_non_finite_claim_is_rejected() {
        let result = sample(20.0, 60.0);
        assert!(!validate_claimed_efficiency(f64::NAN, &result, 0.05).plausible);
    }

    #[test]
    fn test_relative_band_is_clipped_to_ceiling() {
        let result = sample(95.0, 98.0);
        assert_eq!(result.uncertainty.upper, 98.0);
        assert!((result.uncertainty.lower - 85.5).abs() < 1e-9);
    }

    #[test]
    fn test_model_hook_missing_parameter() {
        let params: HashMap<&str, f64> = HashMap::from([("hot_temperature_k", 800.0)]);
        let outcome = EfficiencyModel::HeatEngine.evaluate(|k| params.get(k).copied());
        assert!(outcome.is_none());
    }

    #[test]
    fn test_model_hook_runs_heat_engine() {
        let params: HashMap<&str, f64> =
            HashMap::from([("hot_temperature_k", 800.0), ("cold_temperature_k", 300.0)]);
        let result = EfficiencyModel::HeatEngine
            .evaluate(|k| params.get(k).copied())
            .unwrap()
            .unwrap();
        assert!((result.theoretical_max - 62.5).abs() < 1e-9);
    }

    #[test]
    fn test_model_hook_propagates_invalid_parameters() {
        let params: HashMap<&str, f64> =
            HashMap::from([("hot_temperature_k", 300.0), ("cold_temperature_k", 800.0)]);
        let outcome = EfficiencyModel::HeatEngine
            .evaluate(|k| params.get(k).copied())
            .unwrap();
        assert!(matches!(outcome, Err(PhysicsError::InvalidTemperatures { .. })));
    }
}
