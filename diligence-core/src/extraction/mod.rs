//! Metrics extraction pipeline.
//!
//! Pulls canonical metrics out of heterogeneously shaped stage documents.
//! Each metric is resolved by the first strategy that succeeds:
//!
//! 1. the canonical `standardizedMetrics.<key>` location (`direct`, high),
//! 2. the `standardizedMetrics.secondaryMetrics` table (`direct`, medium),
//! 3. the stage's fallback path table (`search`, medium),
//! 4. a bounded deep search over the whole document (`search`, low).
//!
//! A metric no strategy finds is reported absent with method `fallback`.
//! Optionally, payback period and capacity factor are then calculated from
//! other values (`calculated`, low).

pub mod coerce;
mod derive;
pub mod paths;
pub mod search;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ExtractionConfig;
use crate::error::SchemaError;
use crate::reference::{self, Technology};
use crate::schema::{
    self, Metric, MetricConfidence, MetricOptions, Rating, StandardizedMetrics, Trl,
    create_metric,
};
use crate::units;

pub use coerce::coerce_number;
use paths::resolve_path;
use search::{SearchLimits, declared_unit, deep_search, fuzzy_match, normalize_key};

const CANONICAL_ROOT: &str = "standardizedMetrics";
const SECONDARY_TABLE: &str = "secondaryMetrics";

/// The analysis stage a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisStage {
    TechnologyOverview,
    MarketAnalysis,
    TeaAnalysis,
    LcaAnalysis,
    PerformanceAnalysis,
    RiskAssessment,
    IpAnalysis,
}

impl AnalysisStage {
    pub const ALL: [AnalysisStage; 7] = [
        AnalysisStage::TechnologyOverview,
        AnalysisStage::MarketAnalysis,
        AnalysisStage::TeaAnalysis,
        AnalysisStage::LcaAnalysis,
        AnalysisStage::PerformanceAnalysis,
        AnalysisStage::RiskAssessment,
        AnalysisStage::IpAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStage::TechnologyOverview => "technology-overview",
            AnalysisStage::MarketAnalysis => "market-analysis",
            AnalysisStage::TeaAnalysis => "tea-analysis",
            AnalysisStage::LcaAnalysis => "lca-analysis",
            AnalysisStage::PerformanceAnalysis => "performance-analysis",
            AnalysisStage::RiskAssessment => "risk-assessment",
            AnalysisStage::IpAnalysis => "ip-analysis",
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisStage {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        let stage = match key.as_str() {
            "technologyoverview" | "overview" => AnalysisStage::TechnologyOverview,
            "marketanalysis" | "market" => AnalysisStage::MarketAnalysis,
            "teaanalysis" | "tea" | "technoeconomicanalysis" => AnalysisStage::TeaAnalysis,
            "lcaanalysis" | "lca" | "lifecycleassessment" => AnalysisStage::LcaAnalysis,
            "performanceanalysis" | "performance" => AnalysisStage::PerformanceAnalysis,
            "riskassessment" | "risk" => AnalysisStage::RiskAssessment,
            "ipanalysis" | "ip" => AnalysisStage::IpAnalysis,
            _ => return Err(SchemaError::UnknownStage(s.to_string())),
        };
        Ok(stage)
    }
}

/// The metrics the pipeline knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    PrimaryCost,
    Efficiency,
    Trl,
    Capex,
    Opex,
    Npv,
    Irr,
    PaybackPeriod,
    CapacityFactor,
    Lifetime,
    DegradationRate,
    ProjectedCost,
    CostReductionRate,
}

impl MetricKey {
    /// The core set every stage is asked for.
    pub const CORE: [MetricKey; 9] = [
        MetricKey::PrimaryCost,
        MetricKey::Efficiency,
        MetricKey::Trl,
        MetricKey::Capex,
        MetricKey::Opex,
        MetricKey::Npv,
        MetricKey::Irr,
        MetricKey::PaybackPeriod,
        MetricKey::CapacityFactor,
    ];

    pub const ALL: [MetricKey; 13] = [
        MetricKey::PrimaryCost,
        MetricKey::Efficiency,
        MetricKey::Trl,
        MetricKey::Capex,
        MetricKey::Opex,
        MetricKey::Npv,
        MetricKey::Irr,
        MetricKey::PaybackPeriod,
        MetricKey::CapacityFactor,
        MetricKey::Lifetime,
        MetricKey::DegradationRate,
        MetricKey::ProjectedCost,
        MetricKey::CostReductionRate,
    ];

    /// Canonical document key.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::PrimaryCost => "primaryCost",
            MetricKey::Efficiency => "efficiency",
            MetricKey::Trl => "trl",
            MetricKey::Capex => "capex",
            MetricKey::Opex => "opex",
            MetricKey::Npv => "npv",
            MetricKey::Irr => "irr",
            MetricKey::PaybackPeriod => "paybackPeriod",
            MetricKey::CapacityFactor => "capacityFactor",
            MetricKey::Lifetime => "lifetime",
            MetricKey::DegradationRate => "degradationRate",
            MetricKey::ProjectedCost => "projectedCost",
            MetricKey::CostReductionRate => "costReductionRate",
        }
    }

    /// Known spellings, normalized (lower-case, alphanumeric only).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            MetricKey::PrimaryCost => &[
                "primarycost",
                "levelizedcost",
                "lcoe",
                "lcoh",
                "mfsp",
                "minimumsellingprice",
                "unitcost",
                "productioncost",
            ],
            MetricKey::Efficiency => &[
                "efficiency",
                "conversionefficiency",
                "energyefficiency",
                "netenergyefficiency",
            ],
            MetricKey::Trl => &["trl", "technologyreadinesslevel", "readinesslevel"],
            MetricKey::Capex => &[
                "capex",
                "capitalexpenditure",
                "capitalcost",
                "totalcapitalinvestment",
            ],
            MetricKey::Opex => &[
                "opex",
                "operatingexpenditure",
                "operatingcost",
                "annualoperatingcost",
            ],
            MetricKey::Npv => &["npv", "netpresentvalue"],
            MetricKey::Irr => &["irr", "internalrateofreturn"],
            MetricKey::PaybackPeriod => &["paybackperiod", "payback", "paybacktime"],
            MetricKey::CapacityFactor => &["capacityfactor", "utilizationrate"],
            MetricKey::Lifetime => &[
                "lifetime",
                "projectlifetime",
                "plantlife",
                "designlife",
                "servicelife",
            ],
            MetricKey::DegradationRate => &["degradationrate", "annualdegradation"],
            MetricKey::ProjectedCost => &[
                "projectedcost",
                "futurecost",
                "nthplantcost",
                "projectedprice",
            ],
            MetricKey::CostReductionRate => &[
                "costreductionrate",
                "costdeclinerate",
                "learningrate",
            ],
        }
    }

    /// Unit a freshly created metric of this kind carries.
    pub fn default_unit(&self) -> &'static str {
        schema::metric_definition(self.as_str()).map_or("", |(_, unit)| unit)
    }

    /// Whether the record always carries this field.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            MetricKey::PrimaryCost
                | MetricKey::Efficiency
                | MetricKey::Trl
                | MetricKey::Capex
                | MetricKey::Opex
        )
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = SchemaError;

    /// Accepts the canonical key or any exact alias, ignoring case and separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        MetricKey::ALL
            .into_iter()
            .find(|m| normalize_key(m.as_str()) == key || m.aliases().contains(&key.as_str()))
            .ok_or_else(|| SchemaError::UnknownMetric(s.to_string()))
    }
}

/// Which strategy produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Direct,
    Search,
    Calculated,
    Fallback,
}

/// Outcome of extracting one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub metric: MetricKey,
    pub found: bool,
    pub value: Option<Metric>,
    /// Document location the value came from.
    pub path: Option<String>,
    pub method: ExtractionMethod,
}

impl ExtractionResult {
    pub(crate) fn found(
        key: MetricKey,
        metric: Metric,
        path: Option<String>,
        method: ExtractionMethod,
    ) -> Self {
        Self {
            metric: key,
            found: true,
            value: Some(metric),
            path,
            method,
        }
    }

    pub(crate) fn not_found(key: MetricKey) -> Self {
        Self {
            metric: key,
            found: false,
            value: None,
            path: None,
            method: ExtractionMethod::Fallback,
        }
    }
}

/// A normalized record together with how each metric was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMetrics {
    pub record: StandardizedMetrics,
    pub extractions: BTreeMap<MetricKey, ExtractionResult>,
}

/// Resolves metrics from stage documents.
#[derive(Debug, Clone, Default)]
pub struct MetricsExtractor {
    config: ExtractionConfig,
}

impl MetricsExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_depth: self.config.max_search_depth,
            max_nodes: self.config.max_search_nodes,
            min_alias_len: self.config.min_fuzzy_alias_len,
        }
    }

    /// Extract one metric. Absence is a result, never an error.
    pub fn extract(&self, stage: AnalysisStage, doc: &Value, key: MetricKey) -> ExtractionResult {
        let located = self.locate(stage, doc, key);
        if located.found || !self.config.derive_missing {
            return located;
        }
        derive::derive(self, stage, doc, key).unwrap_or(located)
    }

    /// Extract the nine core metrics.
    pub fn extract_core(
        &self,
        stage: AnalysisStage,
        doc: &Value,
    ) -> BTreeMap<MetricKey, ExtractionResult> {
        self.extract_keys(stage, doc, &MetricKey::CORE)
    }

    /// Extract every known metric.
    pub fn extract_all(
        &self,
        stage: AnalysisStage,
        doc: &Value,
    ) -> BTreeMap<MetricKey, ExtractionResult> {
        self.extract_keys(stage, doc, &MetricKey::ALL)
    }

    fn extract_keys(
        &self,
        stage: AnalysisStage,
        doc: &Value,
        keys: &[MetricKey],
    ) -> BTreeMap<MetricKey, ExtractionResult> {
        keys.iter()
            .map(|&key| (key, self.extract(stage, doc, key)))
            .collect()
    }

    /// Run the lookup strategies in precedence order, without derivation.
    pub(crate) fn locate(&self, stage: AnalysisStage, doc: &Value, key: MetricKey) -> ExtractionResult {
        type Strategy =
            fn(&MetricsExtractor, AnalysisStage, &Value, MetricKey) -> Option<ExtractionResult>;
        let strategies: [Strategy; 4] = [
            Self::canonical,
            Self::secondary,
            Self::stage_fallback,
            Self::deep,
        ];
        for strategy in strategies {
            if let Some(result) = strategy(self, stage, doc, key) {
                debug!(
                    stage = %stage,
                    metric = %key,
                    method = ?result.method,
                    path = result.path.as_deref().unwrap_or(""),
                    "metric resolved"
                );
                return result;
            }
        }
        debug!(stage = %stage, metric = %key, "metric not found");
        ExtractionResult::not_found(key)
    }

    fn canonical(&self, stage: AnalysisStage, doc: &Value, key: MetricKey) -> Option<ExtractionResult> {
        let node = resolve_path(doc, &[CANONICAL_ROOT, key.as_str()])?;
        let (value, unit) = match node {
            Value::Object(map) => (
                map.get("value").and_then(coerce_number)?,
                declared_unit(map),
            ),
            other => (coerce_number(other)?, None),
        };
        let path = format!("{CANONICAL_ROOT}.{key}");
        let mut options = MetricOptions::new()
            .with_confidence(MetricConfidence::High)
            .with_source(format!("{stage}:{path}"));
        if let Some(unit) = unit {
            options = options.with_unit(unit);
        }
        let metric = create_metric(key.as_str(), value, options);
        Some(ExtractionResult::found(key, metric, Some(path), ExtractionMethod::Direct))
    }

    fn secondary(&self, stage: AnalysisStage, doc: &Value, key: MetricKey) -> Option<ExtractionResult> {
        let entries = resolve_path(doc, &[CANONICAL_ROOT, SECONDARY_TABLE])?.as_array()?;

        entries.iter().enumerate().find_map(|(i, entry)| {
            let map = entry.as_object()?;
            let label = ["id", "name"]
                .iter()
                .filter_map(|field| map.get(*field).and_then(Value::as_str))
                .find(|label| {
                    let normalized = normalize_key(label);
                    key.aliases()
                        .iter()
                        .any(|alias| fuzzy_match(&normalized, alias, 0))
                })?;
            let value = map.get("value").and_then(coerce_number)?;

            let path = format!("{CANONICAL_ROOT}.{SECONDARY_TABLE}.{i}");
            let mut options = MetricOptions::new()
                .with_confidence(MetricConfidence::Medium)
                .with_source(format!("{stage}:{path}"))
                .with_derivation(format!("matched secondary metric '{label}'"));
            if let Some(unit) = declared_unit(map) {
                options = options.with_unit(unit);
            }
            let metric = create_metric(key.as_str(), value, options);
            Some(ExtractionResult::found(key, metric, Some(path), ExtractionMethod::Direct))
        })
    }

    fn stage_fallback(
        &self,
        stage: AnalysisStage,
        doc: &Value,
        key: MetricKey,
    ) -> Option<ExtractionResult> {
        for spec in paths::fallback_paths(stage, key) {
            let path = spec.display_path();
            let Some(raw) = resolve_path(doc, spec.path).and_then(coerce_number) else {
                continue;
            };
            let value = match spec.unit {
                Some(unit) => match units::convert(raw, unit, key.default_unit()) {
                    Ok(converted) => converted,
                    Err(e) => {
                        warn!(stage = %stage, path = %path, error = %e, "fallback path unit conversion failed; skipping");
                        continue;
                    }
                },
                None => raw,
            };
            let value = spec.transform.apply(value);
            if !value.is_finite() {
                debug!(stage = %stage, path = %path, "fallback value not finite; skipping");
                continue;
            }

            let metric = create_metric(
                key.as_str(),
                value,
                MetricOptions::new()
                    .with_confidence(MetricConfidence::Medium)
                    .with_source(format!("{stage}:{path}"))
                    .with_derivation(format!("stage fallback path {path}")),
            );
            return Some(ExtractionResult::found(key, metric, Some(path), ExtractionMethod::Search));
        }
        None
    }

    fn deep(&self, stage: AnalysisStage, doc: &Value, key: MetricKey) -> Option<ExtractionResult> {
        let hit = deep_search(doc, key.aliases(), self.search_limits())?;
        let mut options = MetricOptions::new()
            .with_confidence(MetricConfidence::Low)
            .with_source(format!("{stage}:{}", hit.path))
            .with_derivation("fuzzy match during deep search");
        if let Some(unit) = hit.unit {
            options = options.with_unit(unit);
        }
        let metric = create_metric(key.as_str(), hit.value, options);
        Some(ExtractionResult::found(key, metric, Some(hit.path), ExtractionMethod::Search))
    }

    /// Build a full record for one stage document.
    ///
    /// Starts from defaulted values, overlays everything found, converts units
    /// to the schema defaults, and clamps efficiency and TRL into range. Every
    /// default and every adjustment leaves a warning.
    pub fn normalize(
        &self,
        stage: AnalysisStage,
        doc: &Value,
        technology: Option<Technology>,
    ) -> NormalizedMetrics {
        let mut record = schema::blank_record(stage.as_str());
        record.technology = technology;

        let extractions = self.extract_all(stage, doc);
        for (key, result) in &extractions {
            match &result.value {
                Some(metric) => {
                    let mut metric = metric.clone();
                    conform_unit(&mut metric, key.default_unit());
                    place(&mut record, *key, metric);
                }
                None if key.is_required() => {
                    let defaulted = record.required_metrics()[required_index(*key)];
                    let message = format!(
                        "No {} found in {stage} output; defaulted to {} with low confidence",
                        defaulted.name, defaulted.value
                    );
                    record.add_warning(message);
                }
                None => {}
            }
        }

        clamp_efficiency(&mut record);
        clamp_trl(&mut record);
        let rating = find_rating(doc, &mut record);
        record.rating = rating;
        record.secondary_metrics = collect_secondary(stage, doc, &extractions);
        if let Some(technology) = technology {
            attach_benchmarks(&mut record, technology);
        }
        for violation in record.invariant_violations() {
            record.add_warning(violation);
        }

        NormalizedMetrics {
            record,
            extractions,
        }
    }
}

fn required_index(key: MetricKey) -> usize {
    match key {
        MetricKey::PrimaryCost => 0,
        MetricKey::Efficiency => 1,
        MetricKey::Trl => 2,
        MetricKey::Capex => 3,
        _ => 4,
    }
}

fn place(record: &mut StandardizedMetrics, key: MetricKey, metric: Metric) {
    match key {
        MetricKey::PrimaryCost => record.primary_cost = metric,
        MetricKey::Efficiency => record.efficiency = metric,
        MetricKey::Trl => record.trl = metric,
        MetricKey::Capex => record.capex = metric,
        MetricKey::Opex => record.opex = metric,
        MetricKey::Npv => record.npv = Some(metric),
        MetricKey::Irr => record.irr = Some(metric),
        MetricKey::PaybackPeriod => record.payback_period = Some(metric),
        MetricKey::CapacityFactor => record.capacity_factor = Some(metric),
        MetricKey::Lifetime => record.lifetime = Some(metric),
        MetricKey::DegradationRate => record.degradation_rate = Some(metric),
        MetricKey::ProjectedCost => record.projected_cost = Some(metric),
        MetricKey::CostReductionRate => record.cost_reduction_rate = Some(metric),
    }
}

/// Convert a metric to `target` when its declared unit allows it.
fn conform_unit(metric: &mut Metric, target: &str) {
    if target.is_empty() || metric.unit == target {
        return;
    }
    match units::convert(metric.value, &metric.unit, target) {
        Ok(converted) => {
            let note = format!("converted from {} {}", metric.value, metric.unit);
            metric.derivation = Some(match metric.derivation.take() {
                Some(existing) => format!("{existing}; {note}"),
                None => note,
            });
            metric.value = converted;
            metric.unit = target.to_string();
        }
        Err(e) => debug!(metric = %metric.id, error = %e, "unit left as reported"),
    }
}

fn clamp_efficiency(record: &mut StandardizedMetrics) {
    let value = record.efficiency.value;
    let clamped = value.clamp(0.0, 100.0);
    if clamped != value {
        record.efficiency.value = clamped;
        record.add_warning(format!(
            "Efficiency {value} is outside [0, 100]; clamped to {clamped}"
        ));
    }
}

fn clamp_trl(record: &mut StandardizedMetrics) {
    let value = record.trl.value;
    let level = f64::from(Trl::saturating(value).get());
    if level != value {
        record.trl.value = level;
        record.add_warning(format!(
            "TRL {value} is not an integer between 1 and 9; recorded as {level}"
        ));
    }
}

const RATING_PATHS: [&[&str]; 4] = [
    &[CANONICAL_ROOT, "rating"],
    &["rating"],
    &["overallRating"],
    &["summary", "rating"],
];

fn find_rating(doc: &Value, record: &mut StandardizedMetrics) -> Rating {
    let Some(raw) = RATING_PATHS
        .iter()
        .find_map(|path| resolve_path(doc, path).and_then(Value::as_str))
    else {
        return Rating::Unrated;
    };
    match raw.parse::<Rating>() {
        Ok(rating) => rating,
        Err(e) => {
            record.add_warning(format!("{e}; recorded as unrated"));
            Rating::Unrated
        }
    }
}

/// Secondary table entries not consumed by a canonical metric.
fn collect_secondary(
    stage: AnalysisStage,
    doc: &Value,
    extractions: &BTreeMap<MetricKey, ExtractionResult>,
) -> Vec<Metric> {
    let Some(entries) = resolve_path(doc, &[CANONICAL_ROOT, SECONDARY_TABLE]).and_then(Value::as_array)
    else {
        return Vec::new();
    };
    let consumed: HashSet<&str> = extractions
        .values()
        .filter_map(|r| r.path.as_deref())
        .collect();

    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let path = format!("{CANONICAL_ROOT}.{SECONDARY_TABLE}.{i}");
            if consumed.contains(path.as_str()) {
                return None;
            }
            let map = entry.as_object()?;
            let id = map
                .get("id")
                .or_else(|| map.get("name"))
                .and_then(Value::as_str)?;
            if id.parse::<MetricKey>().is_ok() {
                return None;
            }
            let value = map.get("value").and_then(coerce_number)?;
            let mut options = MetricOptions::new().with_source(format!("{stage}:{path}"));
            if let Some(name) = map.get("name").and_then(Value::as_str) {
                options = options.with_name(name);
            }
            if let Some(unit) = declared_unit(map) {
                options = options.with_unit(unit);
            }
            Some(create_metric(id, value, options))
        })
        .collect()
}

fn attach_benchmarks(record: &mut StandardizedMetrics, technology: Technology) {
    let bench = reference::benchmarks(technology);

    if record.efficiency.unit == bench.efficiency_unit {
        record.efficiency.benchmark = Some(bench.efficiency.clone());
        let ceiling = &bench.ceiling;
        if record.efficiency.value > ceiling.value {
            record.add_warning(format!(
                "Efficiency {}% exceeds the {} ceiling of {:.1}% for {technology} ({})",
                record.efficiency.value, ceiling.name, ceiling.value, ceiling.citation
            ));
        }
    }
    if record.primary_cost.unit == bench.levelized_cost_unit {
        record.primary_cost.benchmark = Some(bench.levelized_cost.clone());
    }
    if record.capex.unit == bench.capex_unit {
        record.capex.benchmark = Some(bench.capex.clone());
    }
    if let (Some(metric), Some(range)) = (record.capacity_factor.as_mut(), &bench.capacity_factor) {
        if metric.unit == "%" {
            metric.benchmark = Some(range.clone());
        }
    }
    if let Some(metric) = record.lifetime.as_mut() {
        if metric.unit == "years" {
            metric.benchmark = Some(bench.lifetime_years.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn extract(stage: AnalysisStage, doc: &Value, key: MetricKey) -> ExtractionResult {
        MetricsExtractor::default().extract(stage, doc, key)
    }

    #[test]
    fn test_stage_parse() {
        assert_eq!("tea-analysis".parse::<AnalysisStage>().unwrap(), AnalysisStage::TeaAnalysis);
        assert_eq!("TEA_Analysis".parse::<AnalysisStage>().unwrap(), AnalysisStage::TeaAnalysis);
        assert_eq!("lca".parse::<AnalysisStage>().unwrap(), AnalysisStage::LcaAnalysis);
        assert!(matches!(
            "marketing".parse::<AnalysisStage>(),
            Err(SchemaError::UnknownStage(_))
        ));
        for stage in AnalysisStage::ALL {
            assert_eq!(stage.as_str().parse::<AnalysisStage>().unwrap(), stage);
        }
    }

    #[test]
    fn test_metric_key_parse_and_units() {
        assert_eq!("payback_period".parse::<MetricKey>().unwrap(), MetricKey::PaybackPeriod);
        assert_eq!("Net Present Value".parse::<MetricKey>().unwrap(), MetricKey::Npv);
        assert!("waterUse".parse::<MetricKey>().is_err());
        assert_eq!(MetricKey::Capex.default_unit(), "$M");
        assert_eq!(MetricKey::Trl.default_unit(), "level");
        for key in MetricKey::ALL {
            assert!(!key.default_unit().is_empty(), "{key}");
            assert_eq!(key.as_str().parse::<MetricKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_canonical_object_is_direct_high() {
        let doc = json!({"standardizedMetrics": {"capex": {"value": "1,200", "unit": "$M"}}});
        let result = extract(AnalysisStage::TeaAnalysis, &doc, MetricKey::Capex);
        assert!(result.found);
        assert_eq!(result.method, ExtractionMethod::Direct);
        assert_eq!(result.path.as_deref(), Some("standardizedMetrics.capex"));
        let metric = result.value.unwrap();
        assert_eq!(metric.value, 1200.0);
        assert_eq!(metric.confidence, MetricConfidence::High);
    }

    #[test]
    fn test_canonical_bare_number() {
        let doc = json!({"standardizedMetrics": {"trl": 6}});
        let metric = extract(AnalysisStage::TechnologyOverview, &doc, MetricKey::Trl)
            .value
            .unwrap();
        assert_eq!(metric.value, 6.0);
        assert_eq!(metric.unit, "level");
    }

    #[test]
    fn test_canonical_wins_over_conflicting_values() {
        let doc = json!({
            "standardizedMetrics": {
                "efficiency": {"value": 38},
                "secondaryMetrics": [{"id": "efficiency", "value": 55}]
            },
            "assumptions": {"efficiency": 42},
            "deep": {"efficiencyEstimate": 70}
        });
        let result = extract(AnalysisStage::TeaAnalysis, &doc, MetricKey::Efficiency);
        assert_eq!(result.value.unwrap().value, 38.0);
        assert_eq!(result.method, ExtractionMethod::Direct);
    }

    #[test]
    fn test_malformed_canonical_falls_through() {
        let doc = json!({
            "standardizedMetrics": {"efficiency": {"value": "n/a"}},
            "assumptions": {"efficiency": 0.42}
        });
        let result = extract(AnalysisStage::TeaAnalysis, &doc, MetricKey::Efficiency);
        assert_eq!(result.method, ExtractionMethod::Search);
        assert_eq!(result.value.unwrap().value, 42.0);
    }

    #[test]
    fn test_secondary_table_scan() {
        let doc = json!({
            "standardizedMetrics": {
                "secondaryMetrics": [
                    {"id": "waterUse", "value": 3},
                    {"name": "Levelized Cost of Hydrogen", "value": "4.2", "unit": "$/kg"}
                ]
            }
        });
        let result = extract(AnalysisStage::TeaAnalysis, &doc, MetricKey::PrimaryCost);
        assert_eq!(result.method, ExtractionMethod::Direct);
        assert_eq!(result.path.as_deref(), Some("standardizedMetrics.secondaryMetrics.1"));
        let metric = result.value.unwrap();
        assert_eq!(metric.value, 4.2);
        assert_eq!(metric.unit, "$/kg");
        assert_eq!(metric.confidence, MetricConfidence::Medium);
    }

    #[test]
    fn test_secondary_short_alias_with_suffix() {
        let doc = json!({
            "standardizedMetrics": {"secondaryMetrics": [{"id": "NPV (10yr)", "value": 45}]}
        });
        // The deep-search length guard does not apply to the secondary table.
        let extractor = MetricsExtractor::new(ExtractionConfig {
            min_fuzzy_alias_len: 4,
            ..ExtractionConfig::default()
        });
        for extractor in [MetricsExtractor::default(), extractor] {
            let result = extractor.extract(AnalysisStage::TeaAnalysis, &doc, MetricKey::Npv);
            assert_eq!(result.method, ExtractionMethod::Direct);
            assert_eq!(result.path.as_deref(), Some("standardizedMetrics.secondaryMetrics.0"));
            assert_eq!(result.value.unwrap().value, 45.0);
        }
    }

    #[test]
    fn test_deep_search_short_alias_with_suffix() {
        let doc = json!({"results": {"trlLevel": 6}});
        let result = extract(AnalysisStage::MarketAnalysis, &doc, MetricKey::Trl);
        assert_eq!(result.method, ExtractionMethod::Search);
        assert_eq!(result.path.as_deref(), Some("results.trlLevel"));
        assert_eq!(result.value.unwrap().value, 6.0);
    }

    #[test]
    fn test_stage_fallback_with_unit_conversion() {
        let doc = json!({"results": {"paybackMonths": 30}});
        let result = extract(AnalysisStage::TeaAnalysis, &doc, MetricKey::PaybackPeriod);
        assert_eq!(result.method, ExtractionMethod::Search);
        assert!((result.value.unwrap().value - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_paths_are_stage_specific() {
        let doc = json!({"assumptions": {"efficiency": 42}});
        let result = extract(AnalysisStage::MarketAnalysis, &doc, MetricKey::Efficiency);
        // Only the deep search can see it from this stage.
        assert_eq!(result.method, ExtractionMethod::Search);
        assert_eq!(result.value.unwrap().confidence, MetricConfidence::Low);
    }

    #[test]
    fn test_not_found_is_fallback_absent() {
        let result = extract(AnalysisStage::IpAnalysis, &json!({"patents": []}), MetricKey::Npv);
        assert!(!result.found);
        assert!(result.value.is_none());
        assert_eq!(result.method, ExtractionMethod::Fallback);
    }

    #[test]
    fn test_derivation_can_be_disabled() {
        let doc = json!({
            "capitalCosts": {"total": 120},
            "cashFlow": {"annualNetCashFlow": 15}
        });
        let on = extract(AnalysisStage::TeaAnalysis, &doc, MetricKey::PaybackPeriod);
        assert_eq!(on.method, ExtractionMethod::Calculated);

        let extractor = MetricsExtractor::new(ExtractionConfig {
            derive_missing: false,
            ..ExtractionConfig::default()
        });
        let off = extractor.extract(AnalysisStage::TeaAnalysis, &doc, MetricKey::PaybackPeriod);
        assert_eq!(off.method, ExtractionMethod::Fallback);
    }

    #[test]
    fn test_extract_core_has_all_nine() {
        let results = MetricsExtractor::default().extract_core(AnalysisStage::LcaAnalysis, &json!(null));
        assert_eq!(results.len(), 9);
        assert!(results.values().all(|r| !r.found));
    }

    #[test]
    fn test_normalize_full_record() {
        let doc = json!({
            "standardizedMetrics": {
                "primaryCost": {"value": 3.1, "unit": "$/GGE"},
                "efficiency": {"value": 0.62, "unit": "fraction"},
                "trl": 6.4,
                "rating": "Promising",
                "secondaryMetrics": [
                    {"id": "waterUse", "name": "Water use", "value": 2.5, "unit": "L/kg"},
                    {"id": "npv", "value": 45}
                ]
            },
            "capitalCosts": {"total": 350},
            "operatingCosts": {"annual": 28}
        });
        let normalized = MetricsExtractor::default().normalize(
            AnalysisStage::TeaAnalysis,
            &doc,
            Some(Technology::HydrothermalLiquefaction),
        );
        let record = &normalized.record;
        assert_eq!(record.source_tag, "tea-analysis");
        assert!((record.efficiency.value - 62.0).abs() < 1e-9);
        assert_eq!(record.efficiency.unit, "%");
        assert!(record.efficiency.benchmark.is_some());
        assert_eq!(record.primary_cost.benchmark.as_ref().unwrap().min, 2.5);
        assert_eq!(record.trl.value, 6.0);
        assert_eq!(record.rating, Rating::Promising);
        assert_eq!(record.capex.value, 350.0);
        assert_eq!(record.npv.as_ref().unwrap().value, 45.0);
        assert_eq!(record.secondary_metrics.len(), 1);
        assert_eq!(record.secondary_metrics[0].name, "Water use");
        assert!(record.invariant_violations().is_empty());
        assert!(record.warnings().iter().any(|w| w.starts_with("TRL 6.4")));
        assert_eq!(normalized.extractions.len(), MetricKey::ALL.len());
    }

    #[test]
    fn test_normalize_empty_document_warns_per_required_field() {
        let normalized =
            MetricsExtractor::default().normalize(AnalysisStage::RiskAssessment, &json!({}), None);
        let record = &normalized.record;
        assert_eq!(record.rating, Rating::Unrated);
        assert_eq!(record.trl.value, 1.0);
        assert_eq!(record.warnings().len(), 5);
        assert!(record.npv.is_none());
        assert!(record.invariant_violations().is_empty());
    }

    #[test]
    fn test_normalize_clamps_and_flags_ceiling() {
        let doc = json!({
            "standardizedMetrics": {"efficiency": 140, "trl": 12, "rating": "stellar"}
        });
        let normalized = MetricsExtractor::default().normalize(
            AnalysisStage::PerformanceAnalysis,
            &doc,
            Some(Technology::SolarPv),
        );
        let record = &normalized.record;
        assert_eq!(record.efficiency.value, 100.0);
        assert_eq!(record.trl.value, 9.0);
        assert_eq!(record.rating, Rating::Unrated);
        let warnings = record.warnings().join("\n");
        assert!(warnings.contains("clamped to 100"));
        assert!(warnings.contains("Unknown rating: stellar"));
        assert!(warnings.contains("exceeds the single-junction photovoltaic efficiency ceiling"));
        assert!(record.invariant_violations().is_empty());
    }
}
