//! Horizontal-axis wind turbine power extraction.

use serde::{Deserialize, Serialize};

use super::{EfficiencyResult, PERCENT, require_fraction, require_range};
use crate::error::PhysicsError;
use crate::reference::constants::{AIR_DENSITY, BETZ_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindTurbineParams {
    pub wind_speed_ms: f64,
    pub rotor_diameter_m: f64,
    /// Blade tip speed over free-stream wind speed.
    pub tip_speed_ratio: f64,
    pub pitch_deg: f64,
    pub air_density_kg_m3: f64,
    pub drivetrain_efficiency: f64,
    pub generator_efficiency: f64,
}

impl WindTurbineParams {
    pub fn new(wind_speed_ms: f64, rotor_diameter_m: f64) -> Self {
        Self {
            wind_speed_ms,
            rotor_diameter_m,
            tip_speed_ratio: 8.1,
            pitch_deg: 0.0,
            air_density_kg_m3: AIR_DENSITY,
            drivetrain_efficiency: 0.94,
            generator_efficiency: 0.96,
        }
    }
}

/// Empirical power coefficient Cp(λ, β) (Heier), clamped to `[0, Betz]`.
pub fn power_coefficient(tip_speed_ratio: f64, pitch_deg: f64) -> f64 {
    let inv_lambda_i =
        1.0 / (tip_speed_ratio + 0.08 * pitch_deg) - 0.035 / (pitch_deg.powi(3) + 1.0);
    let cp = 0.5176 * (116.0 * inv_lambda_i - 0.4 * pitch_deg - 5.0) * (-21.0 * inv_lambda_i).exp()
        + 0.0068 * tip_speed_ratio;
    cp.clamp(0.0, BETZ_LIMIT)
}

/// Wind-to-grid conversion efficiency bounded by the Betz limit.
pub fn wind_turbine(params: &WindTurbineParams) -> Result<EfficiencyResult, PhysicsError> {
    let speed = require_range("wind_speed_ms", params.wind_speed_ms, f64::MIN_POSITIVE, 70.0)?;
    let diameter =
        require_range("rotor_diameter_m", params.rotor_diameter_m, f64::MIN_POSITIVE, 300.0)?;
    let tsr = require_range("tip_speed_ratio", params.tip_speed_ratio, 1.0, 20.0)?;
    let pitch = require_range("pitch_deg", params.pitch_deg, 0.0, 30.0)?;
    let rho = require_range("air_density_kg_m3", params.air_density_kg_m3, 0.5, 1.5)?;
    let drivetrain = require_fraction("drivetrain_efficiency", params.drivetrain_efficiency)?;
    let generator = require_fraction("generator_efficiency", params.generator_efficiency)?;

    let cp = power_coefficient(tsr, pitch);
    let value = cp * drivetrain * generator * 100.0;
    let limit = BETZ_LIMIT * 100.0;

    let swept_area = std::f64::consts::PI * diameter * diameter / 4.0;
    let available_kw = 0.5 * rho * swept_area * speed.powi(3) / 1000.0;
    let extracted_kw = available_kw * value / 100.0;

    let mut result = EfficiencyResult::new("wind_turbine", value, limit, PERCENT)
        .with_relative_band(0.1)
        .component("power_coefficient", cp * 100.0, PERCENT)
        .component("drivetrain", drivetrain * 100.0, PERCENT)
        .component("generator", generator * 100.0, PERCENT)
        .component("available_power", available_kw, "kW")
        .component("extracted_power", extracted_kw, "kW")
        .limiting("Betz limit on momentum extraction from an open stream")
        .limiting("wake rotation and blade tip losses");
    if !(6.0..=10.0).contains(&tsr) {
        result = result.limiting(format!("tip speed ratio {tsr:.1} is away from the Cp optimum"));
    }
    if pitch > 0.0 {
        result = result.limiting(format!("blade pitch {pitch:.1}° reduces aerodynamic capture"));
    }

    Ok(result
        .assume(format!("steady uniform inflow at {speed:.1} m/s"))
        .assume(format!("air density {rho} kg/m3"))
        .assume("Heier power-coefficient curve"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::efficiency::validate_claimed_efficiency;

    #[test]
    fn test_power_coefficient_peak() {
        let cp = power_coefficient(8.1, 0.0);
        assert!((cp - 0.48).abs() < 0.005, "{cp}");
        assert!(power_coefficient(4.0, 0.0) < cp);
        assert!(power_coefficient(8.1, 10.0) < cp);
    }

    #[test]
    fn test_power_coefficient_never_exceeds_betz() {
        for tsr in 1..=20 {
            for pitch in [0.0, 2.0, 5.0, 15.0, 30.0] {
                let cp = power_coefficient(f64::from(tsr), pitch);
                assert!((0.0..=BETZ_LIMIT).contains(&cp));
            }
        }
    }

    #[test]
    fn test_wind_turbine_result() {
        let result = wind_turbine(&WindTurbineParams::new(10.0, 100.0)).unwrap();
        assert!((result.theoretical_max - 59.259).abs() < 0.01);
        assert!(result.value > 40.0 && result.value < 45.0, "{}", result.value);

        let available = result
            .components
            .iter()
            .find(|c| c.name == "available_power")
            .unwrap();
        assert!((available.value - 4810.6).abs() < 1.0, "{}", available.value);
    }

    #[test]
    fn test_wind_turbine_rejects_invalid_inputs() {
        assert!(wind_turbine(&WindTurbineParams::new(0.0, 100.0)).is_err());
        assert!(wind_turbine(&WindTurbineParams::new(10.0, -5.0)).is_err());
        let mut params = WindTurbineParams::new(10.0, 100.0);
        params.generator_efficiency = 1.2;
        assert!(wind_turbine(&params).is_err());
    }

    #[test]
    fn test_claim_at_betz_accepted_above_rejected() {
        let result = wind_turbine(&WindTurbineParams::new(10.0, 100.0)).unwrap();
        let at_limit = validate_claimed_efficiency(result.theoretical_max, &result, 0.0);
        assert!(at_limit.plausible, "{}", at_limit.reason);
        let above = validate_claimed_efficiency(60.3, &result, 0.0);
        assert!(!above.plausible);
    }
}
