//! Heat-engine, power-cycle, and heat-pump models.

use serde::{Deserialize, Serialize};

use super::{
    COP, EfficiencyResult, PERCENT, require_fraction, require_positive, require_range,
};
use crate::error::PhysicsError;

/// Reservoir temperatures of a heat engine, in kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatEngineParams {
    pub hot_k: f64,
    pub cold_k: f64,
}

fn check_reservoirs(hot_k: f64, cold_k: f64) -> Result<(), PhysicsError> {
    require_positive("hot_k", hot_k)?;
    require_positive("cold_k", cold_k)?;
    if hot_k <= cold_k {
        return Err(PhysicsError::InvalidTemperatures { hot_k, cold_k });
    }
    Ok(())
}

fn carnot_fraction(hot_k: f64, cold_k: f64) -> f64 {
    1.0 - cold_k / hot_k
}

/// Carnot ceiling with the Curzon–Ahlborn endoreversible estimate as the
/// typical value.
pub fn carnot(params: &HeatEngineParams) -> Result<EfficiencyResult, PhysicsError> {
    check_reservoirs(params.hot_k, params.cold_k)?;

    let limit = carnot_fraction(params.hot_k, params.cold_k) * 100.0;
    let endoreversible = (1.0 - (params.cold_k / params.hot_k).sqrt()) * 100.0;

    Ok(EfficiencyResult::new("carnot", endoreversible, limit, PERCENT)
        .with_relative_band(0.15)
        .component("carnot_limit", limit, PERCENT)
        .component("finite_rate_heat_transfer_loss", limit - endoreversible, PERCENT)
        .limiting("finite-rate heat transfer at both reservoirs")
        .limiting("internal irreversibilities (friction, heat leak)")
        .assume(format!(
            "reservoirs at {:.1} K and {:.1} K held constant",
            params.hot_k, params.cold_k
        ))
        .assume("typical value is the Curzon–Ahlborn efficiency at maximum power"))
}

/// A steam (Rankine) cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankineParams {
    /// Live steam temperature in K.
    pub boiler_k: f64,
    /// Condensing temperature in K.
    pub condenser_k: f64,
    pub turbine_isentropic_efficiency: f64,
    pub boiler_efficiency: f64,
}

impl RankineParams {
    pub fn new(boiler_k: f64, condenser_k: f64) -> Self {
        Self {
            boiler_k,
            condenser_k,
            turbine_isentropic_efficiency: 0.88,
            boiler_efficiency: 0.90,
        }
    }
}

/// Rankine cycle using the thermodynamic mean temperature of heat addition.
///
/// Heat is taken in across the span from condenser to boiler temperature;
/// the log-mean of that span replaces the hot reservoir temperature.
pub fn rankine(params: &RankineParams) -> Result<EfficiencyResult, PhysicsError> {
    check_reservoirs(params.boiler_k, params.condenser_k)?;
    let turbine = require_fraction(
        "turbine_isentropic_efficiency",
        params.turbine_isentropic_efficiency,
    )?;
    let boiler = require_fraction("boiler_efficiency", params.boiler_efficiency)?;

    let (th, tc) = (params.boiler_k, params.condenser_k);
    let mean_addition_k = (th - tc) / (th / tc).ln();
    let ideal = carnot_fraction(mean_addition_k, tc);
    let limit = carnot_fraction(th, tc) * 100.0;
    let value = ideal * turbine * boiler * 100.0;

    Ok(EfficiencyResult::new("rankine", value, limit, PERCENT)
        .with_relative_band(0.1)
        .component("ideal_cycle", ideal * 100.0, PERCENT)
        .component("turbine_isentropic", turbine * 100.0, PERCENT)
        .component("boiler", boiler * 100.0, PERCENT)
        .limiting("heat added below peak temperature (feedwater heating)")
        .limiting("turbine expansion losses")
        .assume(format!(
            "mean heat-addition temperature {mean_addition_k:.1} K (log-mean, constant heat capacity)"
        ))
        .assume("pump work neglected"))
}

/// A gas-turbine (Brayton) cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BraytonParams {
    pub pressure_ratio: f64,
    /// Ratio of specific heats, cp/cv.
    pub gamma: f64,
    pub compressor_efficiency: f64,
    pub turbine_efficiency: f64,
    pub turbine_inlet_k: f64,
    pub ambient_k: f64,
}

impl BraytonParams {
    pub fn new(pressure_ratio: f64, turbine_inlet_k: f64) -> Self {
        Self {
            pressure_ratio,
            gamma: 1.4,
            compressor_efficiency: 0.88,
            turbine_efficiency: 0.90,
            turbine_inlet_k,
            ambient_k: 288.15,
        }
    }
}

/// Brayton cycle with non-ideal compressor and turbine.
pub fn brayton(params: &BraytonParams) -> Result<EfficiencyResult, PhysicsError> {
    let r = require_range("pressure_ratio", params.pressure_ratio, 1.0 + 1e-9, 100.0)?;
    let gamma = require_range("gamma", params.gamma, 1.0 + 1e-9, 5.0 / 3.0)?;
    let eta_c = require_fraction("compressor_efficiency", params.compressor_efficiency)?;
    let eta_t = require_fraction("turbine_efficiency", params.turbine_efficiency)?;
    check_reservoirs(params.turbine_inlet_k, params.ambient_k)?;

    let k = (gamma - 1.0) / gamma;
    let t1 = params.ambient_k;
    let t3 = params.turbine_inlet_k;
    let t2s = t1 * r.powf(k);
    let t2 = t1 + (t2s - t1) / eta_c;
    if t3 <= t2 {
        return Err(PhysicsError::out_of_range("turbine_inlet_k", t3, t2, f64::INFINITY));
    }
    let t4s = t3 / r.powf(k);
    let t4 = t3 - eta_t * (t3 - t4s);

    let net_work = (t3 - t4) - (t2 - t1);
    let heat_in = t3 - t2;
    let value = (net_work / heat_in).max(0.0) * 100.0;
    let ideal = (1.0 - r.powf(-k)) * 100.0;
    let limit = ideal.min(carnot_fraction(t3, t1) * 100.0);

    Ok(EfficiencyResult::new("brayton", value, limit, PERCENT)
        .with_relative_band(0.08)
        .component("ideal_brayton", ideal, PERCENT)
        .component("compressor_exit_k", t2, "K")
        .component("turbine_exit_k", t4, "K")
        .limiting("compressor and turbine isentropic losses")
        .limiting("turbine inlet temperature (material limit)")
        .assume(format!("air-standard cycle, gamma = {gamma}"))
        .assume("constant specific heats, no pressure losses"))
}

/// Gas turbine topping cycle with a steam bottoming cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedCycleParams {
    pub topping_efficiency: f64,
    pub bottoming_efficiency: f64,
    /// Fraction of the topping cycle's rejected heat the HRSG delivers.
    pub recovery_effectiveness: f64,
    pub firing_k: f64,
    pub ambient_k: f64,
}

/// Combined-cycle efficiency: η = ηt + ε·ηb·(1 − ηt).
pub fn combined_cycle(params: &CombinedCycleParams) -> Result<EfficiencyResult, PhysicsError> {
    let top = require_fraction("topping_efficiency", params.topping_efficiency)?;
    let bottom = require_fraction("bottoming_efficiency", params.bottoming_efficiency)?;
    let recovery = require_fraction("recovery_effectiveness", params.recovery_effectiveness)?;
    check_reservoirs(params.firing_k, params.ambient_k)?;

    let bottoming_share = recovery * bottom * (1.0 - top);
    let combined = top + bottoming_share;
    let limit = carnot_fraction(params.firing_k, params.ambient_k) * 100.0;
    if combined * 100.0 > limit {
        return Err(PhysicsError::out_of_range(
            "combined_efficiency",
            combined * 100.0,
            0.0,
            limit,
        ));
    }

    Ok(
        EfficiencyResult::new("combined_cycle", combined * 100.0, limit, PERCENT)
            .with_relative_band(0.05)
            .component("topping_cycle", top * 100.0, PERCENT)
            .component("bottoming_cycle_contribution", bottoming_share * 100.0, PERCENT)
            .limiting("heat recovery steam generator pinch point")
            .limiting("stack losses")
            .assume("bottoming cycle driven only by topping cycle exhaust"),
    )
}

/// A vapor-compression heat pump.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpParams {
    pub sink_k: f64,
    pub source_k: f64,
    /// Fraction of the Carnot COP achieved.
    pub second_law_efficiency: f64,
}

impl HeatPumpParams {
    pub fn new(sink_k: f64, source_k: f64) -> Self {
        Self {
            sink_k,
            source_k,
            second_law_efficiency: 0.45,
        }
    }
}

/// Heating coefficient of performance.
pub fn heat_pump_cop(params: &HeatPumpParams) -> Result<EfficiencyResult, PhysicsError> {
    check_reservoirs(params.sink_k, params.source_k)?;
    let second_law = require_fraction("second_law_efficiency", params.second_law_efficiency)?;

    let carnot_cop = params.sink_k / (params.sink_k - params.source_k);
    let value = carnot_cop * second_law;

    Ok(EfficiencyResult::new("heat_pump", value, carnot_cop, COP)
        .with_relative_band(0.15)
        .component("carnot_cop", carnot_cop, COP)
        .component("second_law_efficiency", second_law * 100.0, PERCENT)
        .limiting("temperature lift between source and sink")
        .limiting("compressor and heat-exchanger irreversibilities")
        .assume("steady-state heating mode"))
}

/// One stage in a conversion chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEfficiency {
    pub name: String,
    /// Typical efficiency as a fraction.
    pub typical: f64,
    /// Best achievable efficiency as a fraction; defaults to `typical`.
    pub ceiling: Option<f64>,
}

impl StageEfficiency {
    pub fn new(name: impl Into<String>, typical: f64) -> Self {
        Self {
            name: name.into(),
            typical,
            ceiling: None,
        }
    }

    pub fn with_ceiling(mut self, ceiling: f64) -> Self {
        self.ceiling = Some(ceiling);
        self
    }
}

/// Series conversion chain: overall efficiency is the product of its stages.
pub fn multi_stage(stages: &[StageEfficiency]) -> Result<EfficiencyResult, PhysicsError> {
    if stages.is_empty() {
        return Err(PhysicsError::EmptyChain {
            model: "multi_stage".to_string(),
        });
    }

    let mut typical = 1.0;
    let mut ceiling = 1.0;
    let mut weakest: Option<&StageEfficiency> = None;
    for stage in stages {
        let t = require_fraction(&stage.name, stage.typical)?;
        let c = match stage.ceiling {
            Some(c) => require_fraction(&stage.name, c)?,
            None => t,
        };
        if c < t {
            return Err(PhysicsError::out_of_range(&stage.name, t, 0.0, c));
        }
        typical *= t;
        ceiling *= c;
        if weakest.is_none_or(|w| t < w.typical) {
            weakest = Some(stage);
        }
    }

    let mut result = EfficiencyResult::new("multi_stage", typical * 100.0, ceiling * 100.0, PERCENT)
        .with_relative_band(0.05 * (stages.len() as f64).sqrt());
    for stage in stages {
        result = result.component(&stage.name, stage.typical * 100.0, PERCENT);
    }
    if let Some(w) = weakest {
        result = result.limiting(format!("weakest stage: {}", w.name));
    }
    Ok(result.assume("stages are in series with no recycle"))
}
