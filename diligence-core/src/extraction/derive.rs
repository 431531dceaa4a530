//! Metrics calculated from other values when no stage reports them.

use serde_json::Value;
use tracing::debug;

use super::search::{SearchHit, deep_search};
use super::{AnalysisStage, ExtractionMethod, ExtractionResult, MetricKey, MetricsExtractor};
use crate::schema::{MetricConfidence, MetricOptions, create_metric};
use crate::units;

const HOURS_PER_YEAR: f64 = 8760.0;

const NET_CASH_FLOW: &[&str] = &["annualnetcashflow", "netcashflow", "annualcashflow"];
const REVENUE: &[&str] = &["annualrevenue", "revenue"];
const ANNUAL_ENERGY: &[&str] = &[
    "annualenergyproduction",
    "annualenergyoutput",
    "annualgeneration",
    "annualenergy",
];
const NAMEPLATE: &[&str] = &[
    "nameplatecapacity",
    "nameplatepower",
    "installedcapacity",
    "ratedpower",
    "ratedcapacity",
];

/// Try to calculate `key` from values already present in `doc`.
pub(super) fn derive(
    extractor: &MetricsExtractor,
    stage: AnalysisStage,
    doc: &Value,
    key: MetricKey,
) -> Option<ExtractionResult> {
    let (value, derivation) = match key {
        MetricKey::PaybackPeriod => payback_period(extractor, stage, doc)?,
        MetricKey::CapacityFactor => capacity_factor(extractor, doc)?,
        _ => return None,
    };
    debug!(stage = %stage, metric = %key, value, "derived missing metric");
    let metric = create_metric(
        key.as_str(),
        value,
        MetricOptions::new()
            .with_confidence(MetricConfidence::Low)
            .with_source(format!("{stage}:calculated"))
            .with_derivation(derivation),
    );
    Some(ExtractionResult::found(key, metric, None, ExtractionMethod::Calculated))
}

/// Payback in years: capex over annual net cash flow (or revenue less opex).
fn payback_period(
    extractor: &MetricsExtractor,
    stage: AnalysisStage,
    doc: &Value,
) -> Option<(f64, String)> {
    let capex = extractor.locate(stage, doc, MetricKey::Capex).value?;
    let capex_musd = in_unit(capex.value, Some(&capex.unit), &["$M"])?;

    let (cash_flow, basis) = match auxiliary(extractor, doc, NET_CASH_FLOW) {
        Some(hit) => (
            in_unit(hit.value, hit.unit.as_deref(), &["$M/yr", "$M"])?,
            format!("net cash flow at {}", hit.path),
        ),
        None => {
            let revenue = auxiliary(extractor, doc, REVENUE)?;
            let revenue_musd = in_unit(revenue.value, revenue.unit.as_deref(), &["$M/yr", "$M"])?;
            let opex = extractor.locate(stage, doc, MetricKey::Opex).value?;
            let opex_musd = in_unit(opex.value, Some(&opex.unit), &["$M/yr", "$M"])?;
            (
                revenue_musd - opex_musd,
                format!("revenue at {} less opex", revenue.path),
            )
        }
    };

    if capex_musd <= 0.0 || cash_flow <= 0.0 {
        debug!(capex_musd, cash_flow, "payback not derivable from non-positive inputs");
        return None;
    }
    Some((
        capex_musd / cash_flow,
        format!("capex {capex_musd} $M / {basis} {cash_flow} $M/yr"),
    ))
}

/// Capacity factor in percent: annual energy over nameplate power × 8760 h.
fn capacity_factor(extractor: &MetricsExtractor, doc: &Value) -> Option<(f64, String)> {
    let energy = auxiliary(extractor, doc, ANNUAL_ENERGY)?;
    let energy_mwh = in_unit(energy.value, energy.unit.as_deref(), &["MWh/yr", "MWh"])?;
    let power = auxiliary(extractor, doc, NAMEPLATE)?;
    let power_mw = in_unit(power.value, power.unit.as_deref(), &["MW"])?;
    if energy_mwh <= 0.0 || power_mw <= 0.0 {
        return None;
    }

    let factor = energy_mwh / (power_mw * HOURS_PER_YEAR) * 100.0;
    if factor > 100.0 {
        debug!(factor, "derived capacity factor above 100%; discarded");
        return None;
    }
    Some((
        factor,
        format!(
            "{energy_mwh} MWh/yr at {} / ({power_mw} MW at {} x 8760 h)",
            energy.path, power.path
        ),
    ))
}

fn auxiliary(extractor: &MetricsExtractor, doc: &Value, aliases: &[&str]) -> Option<SearchHit> {
    deep_search(doc, aliases, extractor.search_limits())
}

/// Express `value` in the first target unit its declared unit converts to.
/// Undeclared units are assumed to already be in the first target.
fn in_unit(value: f64, unit: Option<&str>, targets: &[&str]) -> Option<f64> {
    let Some(unit) = unit else {
        return Some(value);
    };
    let converted = targets
        .iter()
        .find_map(|target| units::convert(value, unit, target).ok());
    if converted.is_none() {
        debug!(unit, ?targets, "unit not convertible for derivation");
    }
    converted
}
