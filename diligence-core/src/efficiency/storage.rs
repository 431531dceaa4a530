//! Energy storage round-trip efficiency.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EfficiencyResult, PERCENT, require_fraction, require_positive, require_range};
use crate::error::PhysicsError;

/// Electrochemical storage chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chemistry {
    Nmc,
    Lfp,
    LeadAcid,
    VanadiumFlow,
    ZincBromine,
    SodiumSulfur,
}

/// Per-chemistry characteristics: charge and discharge efficiency, best
/// reported round trip (percent) and the resistive penalty per unit C-rate.
struct ChemistryProfile {
    charge: f64,
    discharge: f64,
    ceiling: f64,
    rate_penalty: f64,
}

impl Chemistry {
    pub const ALL: [Chemistry; 6] = [
        Chemistry::Nmc,
        Chemistry::Lfp,
        Chemistry::LeadAcid,
        Chemistry::VanadiumFlow,
        Chemistry::ZincBromine,
        Chemistry::SodiumSulfur,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chemistry::Nmc => "nmc",
            Chemistry::Lfp => "lfp",
            Chemistry::LeadAcid => "lead-acid",
            Chemistry::VanadiumFlow => "vanadium-flow",
            Chemistry::ZincBromine => "zinc-bromine",
            Chemistry::SodiumSulfur => "sodium-sulfur",
        }
    }

    fn profile(&self) -> ChemistryProfile {
        let (charge, discharge, ceiling, rate_penalty) = match self {
            Chemistry::Nmc => (0.975, 0.975, 98.0, 0.02),
            Chemistry::Lfp => (0.97, 0.97, 98.0, 0.015),
            Chemistry::LeadAcid => (0.90, 0.90, 90.0, 0.05),
            Chemistry::VanadiumFlow => (0.88, 0.88, 90.0, 0.04),
            Chemistry::ZincBromine => (0.85, 0.85, 85.0, 0.05),
            Chemistry::SodiumSulfur => (0.92, 0.92, 92.0, 0.02),
        };
        ChemistryProfile {
            charge,
            discharge,
            ceiling,
            rate_penalty,
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chemistry {
    type Err = PhysicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "nmc" | "nca" | "liion" | "lithiumion" | "nickelmanganesecobalt" => Ok(Chemistry::Nmc),
            "lfp" | "lifepo4" | "lithiumironphosphate" => Ok(Chemistry::Lfp),
            "leadacid" | "pbacid" => Ok(Chemistry::LeadAcid),
            "vanadiumflow" | "vanadium" | "vrfb" | "vanadiumredox" => Ok(Chemistry::VanadiumFlow),
            "zincbromine" | "znbr" | "zincbromide" => Ok(Chemistry::ZincBromine),
            "sodiumsulfur" | "nas" | "sodiumsulphur" => Ok(Chemistry::SodiumSulfur),
            _ => Err(PhysicsError::UnknownChemistry(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryParams {
    pub chemistry: Chemistry,
    /// Charge/discharge rate as a multiple of capacity per hour.
    pub c_rate: f64,
    pub temperature_c: f64,
    pub inverter_efficiency: f64,
}

impl BatteryParams {
    pub fn new(chemistry: Chemistry) -> Self {
        Self {
            chemistry,
            c_rate: 0.5,
            temperature_c: 25.0,
            inverter_efficiency: 0.975,
        }
    }
}

/// AC-to-AC battery round-trip efficiency.
pub fn battery_round_trip(params: &BatteryParams) -> Result<EfficiencyResult, PhysicsError> {
    let c_rate = require_range("c_rate", params.c_rate, f64::MIN_POSITIVE, 10.0)?;
    let temperature = require_range("temperature_c", params.temperature_c, -40.0, 60.0)?;
    let inverter = require_fraction("inverter_efficiency", params.inverter_efficiency)?;
    let profile = params.chemistry.profile();

    let rate_factor = (1.0 - profile.rate_penalty * (c_rate - 0.5).max(0.0)).max(0.5);
    let temperature_factor = (1.0 - 0.002 * (temperature - 25.0).abs()).max(0.5);
    let dc_round_trip = profile.charge * profile.discharge;
    let round_trip = dc_round_trip * rate_factor * temperature_factor * inverter * inverter;

    let mut result = EfficiencyResult::new(
        "battery_round_trip",
        round_trip * 100.0,
        profile.ceiling,
        PERCENT,
    )
    .with_relative_band(0.03)
    .component("charge", profile.charge * 100.0, PERCENT)
    .component("discharge", profile.discharge * 100.0, PERCENT)
    .component("c_rate_factor", rate_factor * 100.0, PERCENT)
    .component("temperature_factor", temperature_factor * 100.0, PERCENT)
    .component("inverter_two_way", inverter * inverter * 100.0, PERCENT)
    .limiting("internal resistance losses")
    .limiting("power conversion in both directions");
    if c_rate > 1.0 {
        result = result.limiting(format!("high C-rate ({c_rate:.1}C) raises resistive losses"));
    }
    if (temperature - 25.0).abs() > 15.0 {
        result = result.limiting(format!("operating temperature {temperature:.0} °C away from 25 °C"));
    }

    Ok(result
        .assume(format!("{} chemistry", params.chemistry))
        .assume("ceiling is the best reported round trip for the chemistry (DC)"))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpedHydroParams {
    pub head_m: f64,
    pub penstock_length_m: f64,
    pub pump_efficiency: f64,
    pub turbine_efficiency: f64,
    pub motor_generator_efficiency: f64,
}

impl PumpedHydroParams {
    pub fn new(head_m: f64, penstock_length_m: f64) -> Self {
        Self {
            head_m,
            penstock_length_m,
            pump_efficiency: 0.91,
            turbine_efficiency: 0.92,
            motor_generator_efficiency: 0.98,
        }
    }
}

/// Pumped hydro round trip with friction losses from the penstock length-to-head ratio.
pub fn pumped_hydro(params: &PumpedHydroParams) -> Result<EfficiencyResult, PhysicsError> {
    let head = require_positive("head_m", params.head_m)?;
    let length = require_positive("penstock_length_m", params.penstock_length_m)?;
    let pump = require_fraction("pump_efficiency", params.pump_efficiency)?;
    let turbine = require_fraction("turbine_efficiency", params.turbine_efficiency)?;
    let machine = require_fraction(
        "motor_generator_efficiency",
        params.motor_generator_efficiency,
    )?;

    let hydraulic_loss = (0.008 * length / head).min(0.25);
    let conveyance = 1.0 - hydraulic_loss;
    let machinery = pump * turbine * machine * machine;
    let round_trip = machinery * conveyance * conveyance;

    let mut result = EfficiencyResult::new(
        "pumped_hydro",
        round_trip * 100.0,
        machinery * 100.0,
        PERCENT,
    )
    .with_relative_band(0.04)
    .component("pump", pump * 100.0, PERCENT)
    .component("turbine", turbine * 100.0, PERCENT)
    .component("motor_generator_two_way", machine * machine * 100.0, PERCENT)
    .component("hydraulic_loss_per_direction", hydraulic_loss * 100.0, PERCENT)
    .limiting("pump and turbine hydraulic efficiency");
    if length / head > 10.0 {
        result = result.limiting(format!(
            "long waterway (L/H = {:.1}) increases friction losses",
            length / head
        ));
    }

    Ok(result
        .assume(format!("gross head {head:.0} m"))
        .assume("evaporation and seepage neglected"))
}

/// How compression heat is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaesKind {
    /// Compression heat rejected; expansion reheated by fuel.
    Diabatic,
    /// Compression heat stored and returned on expansion.
    Adiabatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaesParams {
    pub kind: CaesKind,
    pub pressure_ratio: f64,
    pub compressor_efficiency: f64,
    pub expander_efficiency: f64,
    /// Share of stored compression heat returned (adiabatic only).
    pub thermal_storage_efficiency: f64,
}

impl CaesParams {
    pub fn new(kind: CaesKind, pressure_ratio: f64) -> Self {
        Self {
            kind,
            pressure_ratio,
            compressor_efficiency: 0.85,
            expander_efficiency: 0.88,
            thermal_storage_efficiency: 0.85,
        }
    }
}

/// Compressed-air energy storage round trip.
pub fn compressed_air(params: &CaesParams) -> Result<EfficiencyResult, PhysicsError> {
    const GAMMA: f64 = 1.4;
    let ratio = require_range("pressure_ratio", params.pressure_ratio, 1.0 + 1e-9, 300.0)?;
    let compressor = require_fraction("compressor_efficiency", params.compressor_efficiency)?;
    let expander = require_fraction("expander_efficiency", params.expander_efficiency)?;

    let (model, round_trip, limit, mut result_factors) = match params.kind {
        CaesKind::Diabatic => {
            // Isothermal storage work recovered from adiabatic compression work
            let k = (GAMMA - 1.0) / GAMMA;
            let recoverable = ratio.ln() / ((ratio.powf(k) - 1.0) / k);
            (
                "caes_diabatic",
                compressor * expander * recoverable,
                recoverable * 100.0,
                vec![("heat_recovery_ratio", recoverable * 100.0)],
            )
        }
        CaesKind::Adiabatic => {
            let tes = require_fraction(
                "thermal_storage_efficiency",
                params.thermal_storage_efficiency,
            )?;
            (
                "caes_adiabatic",
                compressor * expander * tes,
                tes * 100.0,
                vec![("thermal_storage", tes * 100.0)],
            )
        }
    };
    result_factors.insert(0, ("expander", expander * 100.0));
    result_factors.insert(0, ("compressor", compressor * 100.0));

    let mut result = EfficiencyResult::new(model, round_trip * 100.0, limit, PERCENT)
        .with_relative_band(0.08);
    for (name, value) in result_factors {
        result = result.component(name, value, PERCENT);
    }
    result = match params.kind {
        CaesKind::Diabatic => result
            .limiting("compression heat rejected to ambient")
            .assume("fuel used for reheat is excluded from the electrical round trip"),
        CaesKind::Adiabatic => result
            .limiting("thermal storage losses")
            .assume("stored heat returned at compressor outlet temperature"),
    };

    Ok(result.assume(format!("ideal gas, gamma = {GAMMA}, pressure ratio {ratio:.0}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlywheelParams {
    /// One-way motor/generator and power electronics efficiency.
    pub motor_efficiency: f64,
    /// Self-discharge as a fraction of stored energy per hour.
    pub standby_loss_per_hour: f64,
    pub storage_hours: f64,
}

impl FlywheelParams {
    pub fn new(storage_hours: f64) -> Self {
        Self {
            motor_efficiency: 0.95,
            standby_loss_per_hour: 0.02,
            storage_hours,
        }
    }
}

/// Flywheel round trip including standby losses over the holding period.
pub fn flywheel(params: &FlywheelParams) -> Result<EfficiencyResult, PhysicsError> {
    let motor = require_fraction("motor_efficiency", params.motor_efficiency)?;
    let loss = require_range("standby_loss_per_hour", params.standby_loss_per_hour, 0.0, 0.99)?;
    let hours = require_range("storage_hours", params.storage_hours, 0.0, 24.0 * 365.0)?;

    let retention = (1.0 - loss).powf(hours);
    let conversion = motor * motor;
    let round_trip = conversion * retention;

    let mut result = EfficiencyResult::new(
        "flywheel",
        round_trip * 100.0,
        conversion * 100.0,
        PERCENT,
    )
    .with_relative_band(0.05)
    .component("conversion_two_way", conversion * 100.0, PERCENT)
    .component("standby_retention", retention * 100.0, PERCENT)
    .limiting("bearing and windage losses while spinning");
    if hours > 4.0 {
        result = result.limiting(format!("{hours:.0} h holding period; flywheels suit short durations"));
    }

    Ok(result.assume(format!(
        "constant standby loss of {:.1}%/h",
        loss * 100.0
    )))
}
