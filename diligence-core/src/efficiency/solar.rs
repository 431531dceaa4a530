//! Detailed-balance single-junction photovoltaic limit.

use serde::{Deserialize, Serialize};

use super::{EfficiencyResult, PERCENT, require_fraction, require_range};
use crate::error::PhysicsError;
use crate::reference::constants::{
    AMBIENT_TEMPERATURE_K, BOLTZMANN_EV, ELEMENTARY_CHARGE, PLANCK_EV, SOLAR_DILUTION, SPEED_OF_LIGHT,
    STEFAN_BOLTZMANN, SUN_TEMPERATURE_K,
};

const MAX_SERIES_TERMS: u32 = 20_000;
const GOLDEN_ITERATIONS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetailedBalanceParams {
    pub bandgap_ev: f64,
    pub cell_temperature_k: f64,
    pub sun_temperature_k: f64,
    /// Optical concentration, from 1 (one sun) up to the full-sky limit.
    pub concentration: f64,
    /// Share of the detailed-balance limit a commercial device reaches.
    pub practical_fraction: f64,
}

impl DetailedBalanceParams {
    pub fn new(bandgap_ev: f64) -> Self {
        Self {
            bandgap_ev,
            cell_temperature_k: AMBIENT_TEMPERATURE_K,
            sun_temperature_k: SUN_TEMPERATURE_K,
            concentration: 1.0,
            practical_fraction: 0.75,
        }
    }
}

/// Hemispherical blackbody photon flux above `bandgap_ev` at `temperature_k`
/// in photons per m² per second.
fn photon_flux_above(bandgap_ev: f64, temperature_k: f64) -> f64 {
    let kt = BOLTZMANN_EV * temperature_k;
    let xg = bandgap_ev / kt;

    // ∫ x²/(eˣ-1) dx from xg to ∞ expanded as Σ e^{-k·xg}(xg²/k + 2xg/k² + 2/k³)
    let mut sum = 0.0;
    for k in 1..=MAX_SERIES_TERMS {
        let k = f64::from(k);
        let term = (-k * xg).exp() * (xg * xg / k + 2.0 * xg / (k * k) + 2.0 / (k * k * k));
        sum += term;
        if term < sum * 1e-14 {
            break;
        }
    }

    let prefactor =
        2.0 * std::f64::consts::PI * kt.powi(3) / (PLANCK_EV.powi(3) * SPEED_OF_LIGHT.powi(2));
    prefactor * sum
}

/// Maximize `f` on `[lo, hi]` by golden-section search. `f` must be unimodal.
fn golden_section_max<F: Fn(f64) -> f64>(f: F, mut lo: f64, mut hi: f64) -> (f64, f64) {
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let mut a = hi - ratio * (hi - lo);
    let mut b = lo + ratio * (hi - lo);
    let (mut fa, mut fb) = (f(a), f(b));

    for _ in 0..GOLDEN_ITERATIONS {
        if (hi - lo).abs() < 1e-12 {
            break;
        }
        if fa < fb {
            lo = a;
            a = b;
            fa = fb;
            b = lo + ratio * (hi - lo);
            fb = f(b);
        } else {
            hi = b;
            b = a;
            fb = fa;
            a = hi - ratio * (hi - lo);
            fa = f(a);
        }
    }
    let x = (lo + hi) / 2.0;
    (x, f(x))
}

/// Shockley–Queisser style detailed-balance efficiency.
///
/// The sun is a blackbody diluted by its solid angle (times concentration),
/// recombination is purely radiative, and every absorbed photon above the gap
/// yields one electron. The theoretical maximum is the detailed-balance
/// efficiency; the typical value scales it by `practical_fraction`.
pub fn detailed_balance(params: &DetailedBalanceParams) -> Result<EfficiencyResult, PhysicsError> {
    let eg = require_range("bandgap_ev", params.bandgap_ev, 0.2, 4.0)?;
    let tc = require_range("cell_temperature_k", params.cell_temperature_k, 150.0, 500.0)?;
    let ts = require_range("sun_temperature_k", params.sun_temperature_k, 1000.0, 10_000.0)?;
    let concentration =
        require_range("concentration", params.concentration, 1.0, 1.0 / SOLAR_DILUTION)?;
    let practical = require_fraction("practical_fraction", params.practical_fraction)?;
    if tc >= ts {
        return Err(PhysicsError::InvalidTemperatures {
            hot_k: ts,
            cold_k: tc,
        });
    }

    let incident_fraction = SOLAR_DILUTION * concentration;
    let absorbed = incident_fraction * photon_flux_above(eg, ts);
    let dark = photon_flux_above(eg, tc);
    let thermal_voltage = BOLTZMANN_EV * tc;

    // Current density in units of q: generation minus net radiative emission.
    let current = |v: f64| absorbed - dark * ((v / thermal_voltage).exp() - 1.0);
    let open_circuit_v = thermal_voltage * (absorbed / dark + 1.0).ln();

    let (v_mp, p_max_per_q) = golden_section_max(|v| current(v) * v, 0.0, open_circuit_v);
    // photons/m²/s × V, times q gives W/m²
    let p_max = p_max_per_q * ELEMENTARY_CHARGE;
    let p_in = incident_fraction * STEFAN_BOLTZMANN * ts.powi(4);

    let limit = (p_max / p_in * 100.0).clamp(0.0, 100.0);
    let value = limit * practical;
    let fill_factor = p_max_per_q / (absorbed * open_circuit_v);

    let mut result = EfficiencyResult::new("detailed_balance", value, limit, PERCENT)
        .with_relative_band(0.1)
        .component("detailed_balance_limit", limit, PERCENT)
        .component("open_circuit_voltage", open_circuit_v, "V")
        .component("max_power_voltage", v_mp, "V")
        .component("fill_factor", fill_factor * 100.0, PERCENT)
        .component("incident_power", p_in, "W/m2");

    if eg < 1.1 {
        result = result.limiting("thermalization of high-energy photons (low band gap)");
    } else if eg > 1.5 {
        result = result.limiting("sub-bandgap transmission (high band gap)");
    } else {
        result = result.limiting("thermalization and sub-bandgap transmission (near-optimal gap)");
    }

    Ok(result
        .limiting("radiative recombination")
        .limiting("non-radiative recombination, resistive and optical losses (practical devices)")
        .assume(format!("blackbody sun at {ts:.0} K, cell at {tc:.0} K"))
        .assume(format!("concentration {concentration:.0}x"))
        .assume(format!(
            "typical value is {:.0}% of the detailed-balance limit",
            practical * 100.0
        )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_gap_near_thirty_percent() {
        let result = detailed_balance(&DetailedBalanceParams::new(1.34)).unwrap();
        assert!(
            result.theoretical_max > 29.0 && result.theoretical_max < 33.0,
            "{}",
            result.theoretical_max
        );
        assert!((result.value - result.theoretical_max * 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_limit_falls_off_away_from_optimum() {
        let optimal = detailed_balance(&DetailedBalanceParams::new(1.3)).unwrap();
        let narrow = detailed_balance(&DetailedBalanceParams::new(0.5)).unwrap();
        let wide = detailed_balance(&DetailedBalanceParams::new(2.5)).unwrap();
        assert!(narrow.theoretical_max < optimal.theoretical_max);
        assert!(wide.theoretical_max < optimal.theoretical_max);
    }

    #[test]
    fn test_concentration_raises_limit() {
        let one_sun = detailed_balance(&DetailedBalanceParams::new(1.1)).unwrap();
        let mut params = DetailedBalanceParams::new(1.1);
        params.concentration = 1000.0;
        let concentrated = detailed_balance(&params).unwrap();
        assert!(concentrated.theoretical_max > one_sun.theoretical_max);
    }

    #[test]
    fn test_open_circuit_voltage_below_gap() {
        let result = detailed_balance(&DetailedBalanceParams::new(1.4)).unwrap();
        let voc = result
            .components
            .iter()
            .find(|c| c.name == "open_circuit_voltage")
            .unwrap()
            .value;
        assert!(voc > 0.8 && voc < 1.4, "{voc}");
    }

    #[test]
    fn test_rejects_invalid_bandgap() {
        assert!(detailed_balance(&DetailedBalanceParams::new(0.0)).is_err());
        assert!(detailed_balance(&DetailedBalanceParams::new(f64::NAN)).is_err());
        assert!(detailed_balance(&DetailedBalanceParams::new(7.0)).is_err());
    }

    #[test]
    fn test_photon_flux_decreases_with_gap() {
        assert!(photon_flux_above(1.0, 5778.0) > photon_flux_above(2.0, 5778.0));
    }
}
