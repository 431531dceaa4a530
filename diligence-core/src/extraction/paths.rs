//! Stage-specific fallback locations, kept as data.
//!
//! Each analysis stage has historically placed metrics in its own spots. The
//! tables below list those spots per stage in priority order; the extraction
//! algorithm itself is the same for every stage.

use serde_json::Value;

use super::{AnalysisStage, MetricKey};

/// Adjustment applied to a value found on a fallback path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    None,
    /// Values in `[-1, 1]` are read as fractions and scaled to percent.
    FractionToPercent,
    Scale(f64),
    Round,
}

impl Transform {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Transform::None => value,
            Transform::FractionToPercent if value.abs() <= 1.0 => value * 100.0,
            Transform::FractionToPercent => value,
            Transform::Scale(factor) => value * factor,
            Transform::Round => value.round(),
        }
    }
}

/// One alternate location for a metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSpec {
    pub metric: MetricKey,
    /// Field names from the document root; numeric steps index into arrays.
    pub path: &'static [&'static str],
    /// Unit the stored value is in; converted to the metric's default unit.
    pub unit: Option<&'static str>,
    pub transform: Transform,
}

impl PathSpec {
    const fn at(metric: MetricKey, path: &'static [&'static str]) -> Self {
        Self {
            metric,
            path,
            unit: None,
            transform: Transform::None,
        }
    }

    const fn with_unit(self, unit: &'static str) -> Self {
        Self {
            unit: Some(unit),
            ..self
        }
    }

    const fn with_transform(self, transform: Transform) -> Self {
        Self { transform, ..self }
    }

    /// Dotted form of the path, e.g. `assumptions.efficiency`.
    pub fn display_path(&self) -> String {
        self.path.join(".")
    }
}

use MetricKey as M;
use Transform::{FractionToPercent as PCT, Round as ROUND};

const HOURS_TO_CAPACITY_FACTOR: Transform = Transform::Scale(100.0 / 8760.0);

static TECHNOLOGY_OVERVIEW: &[PathSpec] = &[
    PathSpec::at(M::Efficiency, &["technicalSpecs", "efficiency"]).with_transform(PCT),
    PathSpec::at(M::Efficiency, &["performance", "efficiency"]).with_transform(PCT),
    PathSpec::at(M::Efficiency, &["keyMetrics", "efficiency"]).with_transform(PCT),
    PathSpec::at(M::Trl, &["maturity", "trl"]).with_transform(ROUND),
    PathSpec::at(M::Trl, &["technologyReadiness", "level"]).with_transform(ROUND),
    PathSpec::at(M::Trl, &["trl"]).with_transform(ROUND),
    PathSpec::at(M::CapacityFactor, &["performance", "capacityFactor"]).with_transform(PCT),
    PathSpec::at(M::Lifetime, &["technicalSpecs", "lifetime"]),
    PathSpec::at(M::Lifetime, &["technicalSpecs", "designLifeHours"]).with_unit("h"),
    PathSpec::at(M::DegradationRate, &["performance", "degradationRate"]),
];

static MARKET_ANALYSIS: &[PathSpec] = &[
    PathSpec::at(M::PrimaryCost, &["pricing", "currentPrice"]),
    PathSpec::at(M::PrimaryCost, &["marketPrice", "value"]),
    PathSpec::at(M::ProjectedCost, &["pricing", "projectedPrice"]),
    PathSpec::at(M::ProjectedCost, &["forecast", "price2030"]),
    PathSpec::at(M::CostReductionRate, &["forecast", "costDeclineRate"]).with_transform(PCT),
    PathSpec::at(M::CostReductionRate, &["learningCurve", "learningRate"]).with_transform(PCT),
    PathSpec::at(M::Trl, &["competitiveLandscape", "trl"]).with_transform(ROUND),
];

static TEA_ANALYSIS: &[PathSpec] = &[
    PathSpec::at(M::PrimaryCost, &["results", "levelizedCost"]),
    PathSpec::at(M::PrimaryCost, &["results", "mfsp"]),
    PathSpec::at(M::PrimaryCost, &["economics", "lcoe"]),
    PathSpec::at(M::PrimaryCost, &["costAnalysis", "unitCost"]),
    PathSpec::at(M::Efficiency, &["assumptions", "efficiency"]).with_transform(PCT),
    PathSpec::at(M::Efficiency, &["processParameters", "efficiency"]).with_transform(PCT),
    PathSpec::at(M::Capex, &["capitalCosts", "total"]),
    PathSpec::at(M::Capex, &["capitalCosts", "totalCapitalInvestment"]),
    PathSpec::at(M::Capex, &["capitalCosts", "totalUsd"]).with_unit("$"),
    PathSpec::at(M::Capex, &["costs", "capex"]),
    PathSpec::at(M::Opex, &["operatingCosts", "annual"]),
    PathSpec::at(M::Opex, &["operatingCosts", "total"]),
    PathSpec::at(M::Opex, &["operatingCosts", "annualUsd"]).with_unit("$/yr"),
    PathSpec::at(M::Npv, &["financialMetrics", "npv"]),
    PathSpec::at(M::Npv, &["results", "npv"]),
    PathSpec::at(M::Irr, &["financialMetrics", "irr"]).with_transform(PCT),
    PathSpec::at(M::Irr, &["results", "irr"]).with_transform(PCT),
    PathSpec::at(M::PaybackPeriod, &["financialMetrics", "paybackPeriod"]),
    PathSpec::at(M::PaybackPeriod, &["results", "paybackMonths"]).with_unit("months"),
    PathSpec::at(M::CapacityFactor, &["assumptions", "capacityFactor"]).with_transform(PCT),
    PathSpec::at(M::CapacityFactor, &["assumptions", "operatingHours"])
        .with_transform(HOURS_TO_CAPACITY_FACTOR),
    PathSpec::at(M::Lifetime, &["assumptions", "plantLife"]),
    PathSpec::at(M::Lifetime, &["assumptions", "projectLifetime"]),
    PathSpec::at(M::ProjectedCost, &["sensitivity", "nthPlantCost"]),
    PathSpec::at(M::ProjectedCost, &["projections", "futureCost"]),
    PathSpec::at(M::CostReductionRate, &["projections", "learningRate"]).with_transform(PCT),
];

static LCA_ANALYSIS: &[PathSpec] = &[
    PathSpec::at(M::Efficiency, &["energyBalance", "netEnergyEfficiency"]).with_transform(PCT),
    PathSpec::at(M::Efficiency, &["energyBalance", "efficiency"]).with_transform(PCT),
    PathSpec::at(M::Lifetime, &["systemBoundary", "lifetime"]),
    PathSpec::at(M::Lifetime, &["assumptions", "lifetimeYears"]),
];

static PERFORMANCE_ANALYSIS: &[PathSpec] = &[
    PathSpec::at(M::Efficiency, &["metrics", "efficiency"]).with_transform(PCT),
    PathSpec::at(M::Efficiency, &["efficiencyAnalysis", "overall"]).with_transform(PCT),
    PathSpec::at(M::Efficiency, &["efficiencyAnalysis", "models", "0", "value"])
        .with_transform(PCT),
    PathSpec::at(M::CapacityFactor, &["metrics", "capacityFactor"]).with_transform(PCT),
    PathSpec::at(M::CapacityFactor, &["operations", "capacityFactor"]).with_transform(PCT),
    PathSpec::at(M::DegradationRate, &["degradation", "annualRate"]),
    PathSpec::at(M::DegradationRate, &["metrics", "degradationRate"]),
    PathSpec::at(M::Lifetime, &["durability", "lifetimeYears"]),
    PathSpec::at(M::Lifetime, &["durability", "lifetimeHours"]).with_unit("h"),
];

static RISK_ASSESSMENT: &[PathSpec] = &[
    PathSpec::at(M::Trl, &["technicalRisk", "trl"]).with_transform(ROUND),
    PathSpec::at(M::Trl, &["maturity", "trl"]).with_transform(ROUND),
];

static IP_ANALYSIS: &[PathSpec] = &[
    PathSpec::at(M::Trl, &["technologyMaturity", "trl"]).with_transform(ROUND),
];

/// The full fallback table of a stage, in priority order.
pub fn stage_table(stage: AnalysisStage) -> &'static [PathSpec] {
    match stage {
        AnalysisStage::TechnologyOverview => TECHNOLOGY_OVERVIEW,
        AnalysisStage::MarketAnalysis => MARKET_ANALYSIS,
        AnalysisStage::TeaAnalysis => TEA_ANALYSIS,
        AnalysisStage::LcaAnalysis => LCA_ANALYSIS,
        AnalysisStage::PerformanceAnalysis => PERFORMANCE_ANALYSIS,
        AnalysisStage::RiskAssessment => RISK_ASSESSMENT,
        AnalysisStage::IpAnalysis => IP_ANALYSIS,
    }
}

/// Fallback paths for one metric in one stage, in priority order.
pub fn fallback_paths(
    stage: AnalysisStage,
    metric: MetricKey,
) -> impl Iterator<Item = &'static PathSpec> {
    stage_table(stage)
        .iter()
        .filter(move |spec| spec.metric == metric)
}

/// Follow `path` from `root`. Numeric steps index into arrays.
pub fn resolve_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, step| match node {
        Value::Object(map) => map.get(*step),
        Value::Array(items) => step.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_path() {
        let doc = json!({"a": {"b": [{"c": 1}, {"c": 2}]}});
        assert_eq!(resolve_path(&doc, &["a", "b", "1", "c"]), Some(&json!(2)));
        assert_eq!(resolve_path(&doc, &["a", "x"]), None);
        assert_eq!(resolve_path(&doc, &["a", "b", "c"]), None);
        assert_eq!(resolve_path(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_transforms() {
        assert_eq!(Transform::FractionToPercent.apply(0.42), 42.0);
        assert_eq!(Transform::FractionToPercent.apply(42.0), 42.0);
        assert_eq!(Transform::Round.apply(6.6), 7.0);
        assert_eq!(Transform::Scale(2.0).apply(3.0), 6.0);
    }

    #[test]
    fn test_tea_efficiency_path_present() {
        let paths: Vec<String> = fallback_paths(AnalysisStage::TeaAnalysis, MetricKey::Efficiency)
            .map(PathSpec::display_path)
            .collect();
        assert_eq!(paths[0], "assumptions.efficiency");
    }

    #[test]
    fn test_every_stage_has_paths() {
        for stage in AnalysisStage::ALL {
            assert!(!stage_table(stage).is_empty(), "{stage}");
        }
    }

    #[test]
    fn test_path_units_are_convertible() {
        for stage in AnalysisStage::ALL {
            for spec in stage_table(stage) {
                if let Some(unit) = spec.unit {
                    assert!(
                        crate::units::convert(1.0, unit, spec.metric.default_unit()).is_ok(),
                        "{stage}: {} {unit} -> {}",
                        spec.display_path(),
                        spec.metric.default_unit()
                    );
                }
            }
        }
    }
}
