//! Water electrolysis and hydrogen fuel cells, on a higher-heating-value basis.

use serde::{Deserialize, Serialize};

use super::{EfficiencyResult, PERCENT, require_fraction, require_range};
use crate::error::PhysicsError;
use crate::reference::constants::{WATER_REVERSIBLE_VOLTAGE, WATER_THERMONEUTRAL_VOLTAGE};

/// Highest cell voltage treated as a working electrolyzer.
const MAX_ELECTROLYZER_VOLTAGE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectrolyzerParams {
    pub cell_voltage_v: f64,
    pub faradaic_efficiency: f64,
    /// Rectifier, pumps, gas conditioning.
    pub balance_of_plant_efficiency: f64,
}

impl ElectrolyzerParams {
    pub fn new(cell_voltage_v: f64) -> Self {
        Self {
            cell_voltage_v,
            faradaic_efficiency: 0.99,
            balance_of_plant_efficiency: 0.90,
        }
    }
}

/// Electrolyzer system efficiency (HHV) from the operating cell voltage.
///
/// Cells below the thermoneutral voltage absorb heat from the surroundings,
/// so the electrical-only ceiling sits above 100% at the reversible voltage.
pub fn electrolyzer(params: &ElectrolyzerParams) -> Result<EfficiencyResult, PhysicsError> {
    let voltage = require_range(
        "cell_voltage_v",
        params.cell_voltage_v,
        WATER_REVERSIBLE_VOLTAGE,
        MAX_ELECTROLYZER_VOLTAGE,
    )?;
    let faradaic = require_fraction("faradaic_efficiency", params.faradaic_efficiency)?;
    let bop = require_fraction(
        "balance_of_plant_efficiency",
        params.balance_of_plant_efficiency,
    )?;

    let voltage_efficiency = WATER_THERMONEUTRAL_VOLTAGE / voltage;
    let value = voltage_efficiency * faradaic * bop * 100.0;
    let limit = WATER_THERMONEUTRAL_VOLTAGE / WATER_REVERSIBLE_VOLTAGE * 100.0;
    let overpotential = voltage - WATER_REVERSIBLE_VOLTAGE;

    let mut result = EfficiencyResult::new("electrolyzer", value, limit, PERCENT)
        .with_relative_band(0.05)
        .component("voltage_efficiency", voltage_efficiency * 100.0, PERCENT)
        .component("faradaic", faradaic * 100.0, PERCENT)
        .component("balance_of_plant", bop * 100.0, PERCENT)
        .component("overpotential", overpotential, "V")
        .limiting("activation and ohmic overpotentials")
        .limiting("balance-of-plant parasitic loads");
    if voltage < WATER_THERMONEUTRAL_VOLTAGE {
        result = result.limiting("operation below thermoneutral voltage requires external heat");
    }

    Ok(result
        .assume(format!("thermoneutral voltage {WATER_THERMONEUTRAL_VOLTAGE} V (HHV basis)"))
        .assume("ceiling counts electrical input only at the reversible voltage"))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelCellParams {
    pub cell_voltage_v: f64,
    pub fuel_utilization: f64,
    pub system_efficiency: f64,
}

impl FuelCellParams {
    pub fn new(cell_voltage_v: f64) -> Self {
        Self {
            cell_voltage_v,
            fuel_utilization: 0.95,
            system_efficiency: 0.90,
        }
    }
}

/// Hydrogen fuel cell electrical efficiency (HHV); the ceiling is ΔG/ΔH.
pub fn fuel_cell(params: &FuelCellParams) -> Result<EfficiencyResult, PhysicsError> {
    let voltage = require_range(
        "cell_voltage_v",
        params.cell_voltage_v,
        f64::MIN_POSITIVE,
        WATER_REVERSIBLE_VOLTAGE,
    )?;
    let utilization = require_fraction("fuel_utilization", params.fuel_utilization)?;
    let system = require_fraction("system_efficiency", params.system_efficiency)?;

    let voltage_efficiency = voltage / WATER_THERMONEUTRAL_VOLTAGE;
    let value = voltage_efficiency * utilization * system * 100.0;
    let limit = WATER_REVERSIBLE_VOLTAGE / WATER_THERMONEUTRAL_VOLTAGE * 100.0;

    Ok(EfficiencyResult::new("fuel_cell", value, limit, PERCENT)
        .with_relative_band(0.05)
        .component("voltage_efficiency", voltage_efficiency * 100.0, PERCENT)
        .component("fuel_utilization", utilization * 100.0, PERCENT)
        .component("system", system * 100.0, PERCENT)
        .component("voltage_loss", WATER_REVERSIBLE_VOLTAGE - voltage, "V")
        .limiting("cathode activation losses")
        .limiting("ohmic and mass-transport losses at high current")
        .assume("pure hydrogen feed at standard conditions")
        .assume("ceiling is the Gibbs-to-enthalpy ratio of water formation"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_electrolyzer_typical_cell() {
        let result = electrolyzer(&ElectrolyzerParams::new(1.9)).unwrap();
        let expected = 1.481 / 1.9 * 0.99 * 0.90 * 100.0;
        assert!((result.value - expected).abs() < 1e-9);
        assert!((result.theoretical_max - 120.5).abs() < 0.1);
    }

    #[test]
    fn test_electrolyzer_below_thermoneutral_flags_heat() {
        let result = electrolyzer(&ElectrolyzerParams::new(1.4)).unwrap();
        assert!(
            result
                .limiting_factors
                .iter()
                .any(|f| f.contains("external heat"))
        );
    }

    #[test]
    fn test_electrolyzer_rejects_sub_reversible_voltage() {
        let err = electrolyzer(&ElectrolyzerParams::new(1.0)).unwrap_err();
        assert!(matches!(err, PhysicsError::OutOfRange { .. }));
    }

    #[test]
    fn test_fuel_cell() {
        let result = fuel_cell(&FuelCellParams::new(0.7)).unwrap();
        assert!((result.theoretical_max - 82.98).abs() < 0.01);
        let expected = 0.7 / 1.481 * 0.95 * 0.90 * 100.0;
        assert!((result.value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_fuel_cell_rejects_voltage_above_reversible() {
        assert!(fuel_cell(&FuelCellParams::new(1.3)).is_err());
        assert!(fuel_cell(&FuelCellParams::new(0.0)).is_err());
    }
}
