//! Net energy efficiency of thermochemical biomass conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EfficiencyResult, PERCENT, require_positive, require_range};
use crate::error::PhysicsError;
use crate::reference::{self, Technology};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionProcess {
    /// Hydrothermal liquefaction to biocrude.
    Htl,
    /// Fast pyrolysis to bio-oil.
    Pyrolysis,
    /// Gasification to syngas.
    Gasification,
}

impl ConversionProcess {
    pub fn technology(&self) -> Technology {
        match self {
            ConversionProcess::Htl => Technology::HydrothermalLiquefaction,
            ConversionProcess::Pyrolysis => Technology::Pyrolysis,
            ConversionProcess::Gasification => Technology::Gasification,
        }
    }

    fn product(&self) -> &'static str {
        match self {
            ConversionProcess::Htl => "biocrude",
            ConversionProcess::Pyrolysis => "bio-oil",
            ConversionProcess::Gasification => "syngas",
        }
    }
}

impl fmt::Display for ConversionProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.technology().as_str())
    }
}

/// Mass and energy balance per kg of dry feedstock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermochemicalParams {
    pub process: ConversionProcess,
    pub feedstock_hhv_mj_kg: f64,
    /// kg of product per kg of dry feedstock.
    pub product_yield: f64,
    pub product_hhv_mj_kg: f64,
    /// External heat and power consumed, MJ per kg feedstock.
    pub process_energy_mj_per_kg: f64,
    /// Energy in recovered co-products (char, gas, steam), MJ per kg feedstock.
    pub coproduct_energy_mj_per_kg: f64,
}

/// Net energy efficiency:
/// `(yield × product HHV + co-products − process energy) / feedstock HHV`.
///
/// A balance that recovers more energy than the feedstock carries is rejected.
/// The reported value never exceeds the reference ceiling for the process.
pub fn thermochemical_conversion(
    params: &ThermochemicalParams,
) -> Result<EfficiencyResult, PhysicsError> {
    let feed = require_positive("feedstock_hhv_mj_kg", params.feedstock_hhv_mj_kg)?;
    let product_yield = require_range("product_yield", params.product_yield, 0.0, 1.0)?;
    let product_hhv = require_positive("product_hhv_mj_kg", params.product_hhv_mj_kg)?;
    let process_energy = require_range(
        "process_energy_mj_per_kg",
        params.process_energy_mj_per_kg,
        0.0,
        f64::MAX,
    )?;
    let coproduct = require_range(
        "coproduct_energy_mj_per_kg",
        params.coproduct_energy_mj_per_kg,
        0.0,
        f64::MAX,
    )?;

    let product_energy = product_yield * product_hhv;
    let gross = (product_energy + coproduct) / feed;
    if gross > 1.0 {
        return Err(PhysicsError::out_of_range(
            "gross_energy_recovery",
            gross,
            0.0,
            1.0,
        ));
    }
    let net = (product_energy + coproduct - process_energy) / feed;

    let ceiling = &reference::benchmarks(params.process.technology()).ceiling;
    let limit = (gross * 100.0).min(ceiling.value);
    let value = (net * 100.0).clamp(0.0, limit);

    let mut result = EfficiencyResult::new(
        &format!("thermochemical_{}", params.process.technology().as_str()),
        value,
        limit,
        PERCENT,
    )
    .with_relative_band(0.1)
    .component(
        &format!("{}_energy_recovery", params.process.product()),
        product_energy / feed * 100.0,
        PERCENT,
    )
    .component("coproduct_recovery", coproduct / feed * 100.0, PERCENT)
    .component("process_energy_share", process_energy / feed * 100.0, PERCENT)
    .limiting("heat of reaction and process heat demand");

    if net <= 0.0 {
        result = result.limiting("process energy exceeds recovered product energy (net-negative)");
    }
    if net * 100.0 > ceiling.value {
        result = result.limiting(format!(
            "balance implies {:.1}%, above the {:.0}% reference ceiling ({})",
            net * 100.0,
            ceiling.value,
            ceiling.citation
        ));
    }

    Ok(result
        .assume(format!("feedstock HHV {feed:.1} MJ/kg (dry basis)"))
        .assume(format!("{} process", params.process)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn htl(product_yield: f64, process_energy: f64) -> ThermochemicalParams {
        ThermochemicalParams {
            process: ConversionProcess::Htl,
            feedstock_hhv_mj_kg: 20.0,
            product_yield,
            product_hhv_mj_kg: 35.0,
            process_energy_mj_per_kg: process_energy,
            coproduct_energy_mj_per_kg: 0.0,
        }
    }

    #[test]
    fn test_htl_net_efficiency() {
        let result = thermochemical_conversion(&htl(0.4, 2.0)).unwrap();
        // (0.4 × 35 − 2) / 20 = 60%
        assert!((result.value - 60.0).abs() < 1e-9);
        assert!((result.theoretical_max - 70.0).abs() < 1e-9);
        assert_eq!(result.model, "thermochemical_hydrothermal-liquefaction");
    }

    #[test]
    fn test_ceiling_caps_theoretical_max() {
        let result = thermochemical_conversion(&htl(0.55, 0.5)).unwrap();
        assert_eq!(result.theoretical_max, 85.0);
        assert_eq!(result.value, 85.0);
        assert!(
            result
                .limiting_factors
                .iter()
                .any(|f| f.contains("reference ceiling"))
        );
    }

    #[test]
    fn test_net_negative_clamped() {
        let result = thermochemical_conversion(&htl(0.1, 10.0)).unwrap();
        assert_eq!(result.value, 0.0);
        assert!(
            result
                .limiting_factors
                .iter()
                .any(|f| f.contains("net-negative"))
        );
    }

    #[test]
    fn test_rejects_energy_creation() {
        let err = thermochemical_conversion(&htl(0.7, 0.0)).unwrap_err();
        assert!(matches!(err, PhysicsError::OutOfRange { .. }));
    }

    #[test]
    fn test_rejects_invalid_yield() {
        assert!(thermochemical_conversion(&htl(1.5, 0.0)).is_err());
        assert!(thermochemical_conversion(&htl(-0.1, 0.0)).is_err());
    }
}
