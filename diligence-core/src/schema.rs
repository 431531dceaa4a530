//! Standardized metrics schema.
//!
//! One [`StandardizedMetrics`] record is produced per analysis stage. Every
//! required field is always present; [`create_empty_record`] is the single
//! place a missing required value becomes a zero with low confidence.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchemaError;
use crate::reference::{BenchmarkRange, Technology};

/// Confidence tier of a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricConfidence {
    High,
    Medium,
    Low,
}

impl MetricConfidence {
    /// Weight used when scoring records.
    pub fn weight(&self) -> f64 {
        match self {
            MetricConfidence::High => 1.0,
            MetricConfidence::Medium => 0.7,
            MetricConfidence::Low => 0.4,
        }
    }
}

impl fmt::Display for MetricConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetricConfidence::High => "high",
            MetricConfidence::Medium => "medium",
            MetricConfidence::Low => "low",
        })
    }
}

/// A single measured or estimated quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub confidence: MetricConfidence,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<BenchmarkRange>,
}

impl Metric {
    /// Whether the value is a placeholder rather than something extracted.
    pub fn is_defaulted(&self) -> bool {
        self.source == DEFAULT_SOURCE
    }
}

/// Source recorded on placeholder values.
pub const DEFAULT_SOURCE: &str = "default";

/// Optional overrides for [`create_metric`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricOptions {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub confidence: Option<MetricConfidence>,
    pub source: Option<String>,
    pub derivation: Option<String>,
    pub benchmark: Option<BenchmarkRange>,
}

impl MetricOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_confidence(mut self, confidence: MetricConfidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_derivation(mut self, derivation: impl Into<String>) -> Self {
        self.derivation = Some(derivation.into());
        self
    }

    pub fn with_benchmark(mut self, benchmark: BenchmarkRange) -> Self {
        self.benchmark = Some(benchmark);
        self
    }
}

struct MetricDefinition {
    id: &'static str,
    name: &'static str,
    unit: &'static str,
}

const fn def(id: &'static str, name: &'static str, unit: &'static str) -> MetricDefinition {
    MetricDefinition { id, name, unit }
}

static METRIC_DEFINITIONS: &[MetricDefinition] = &[
    def("primaryCost", "Primary Cost Metric", "$/unit"),
    def("efficiency", "Efficiency", "%"),
    def("trl", "Technology Readiness Level", "level"),
    def("capex", "Capital Expenditure", "$M"),
    def("opex", "Operating Expenditure", "$M/yr"),
    def("npv", "Net Present Value", "$M"),
    def("irr", "Internal Rate of Return", "%"),
    def("paybackPeriod", "Payback Period", "years"),
    def("capacityFactor", "Capacity Factor", "%"),
    def("lifetime", "Project Lifetime", "years"),
    def("degradationRate", "Degradation Rate", "%/yr"),
    def("projectedCost", "Projected Future Cost", "$/unit"),
    def("costReductionRate", "Cost Reduction Rate", "%/yr"),
];

/// Display name and default unit of a known metric id.
pub fn metric_definition(id: &str) -> Option<(&'static str, &'static str)> {
    METRIC_DEFINITIONS
        .iter()
        .find(|d| d.id == id)
        .map(|d| (d.name, d.unit))
}

/// Build a metric, filling in name, unit, confidence and source defaults.
///
/// The value is stored exactly as given. Unknown ids keep the id as name and
/// an empty unit unless the options say otherwise.
pub fn create_metric(id: &str, value: f64, options: MetricOptions) -> Metric {
    let definition = metric_definition(id);
    Metric {
        id: id.to_string(),
        name: options
            .name
            .or_else(|| definition.map(|(name, _)| name.to_string()))
            .unwrap_or_else(|| id.to_string()),
        value,
        unit: options
            .unit
            .or_else(|| definition.map(|(_, unit)| unit.to_string()))
            .unwrap_or_default(),
        confidence: options.confidence.unwrap_or(MetricConfidence::Medium),
        source: options.source.unwrap_or_else(|| "analysis".to_string()),
        derivation: options.derivation,
        benchmark: options.benchmark,
    }
}

/// Technology readiness level, 1 through 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Trl(u8);

impl Trl {
    pub const MIN: Trl = Trl(1);
    pub const MAX: Trl = Trl(9);

    pub fn new(level: i64) -> Result<Self, SchemaError> {
        match u8::try_from(level) {
            Ok(l @ 1..=9) => Ok(Trl(l)),
            _ => Err(SchemaError::InvalidTrl(level)),
        }
    }

    /// Round and clamp an arbitrary number into the valid range.
    pub fn saturating(value: f64) -> Self {
        if !value.is_finite() {
            return Trl::MIN;
        }
        Trl(value.round().clamp(1.0, 9.0) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Trl {
    type Error = SchemaError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Trl::new(level)
    }
}

impl From<Trl> for u8 {
    fn from(trl: Trl) -> Self {
        trl.0
    }
}

impl fmt::Display for Trl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRL {}", self.0)
    }
}

/// Overall categorical rating of a technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Strong,
    Promising,
    Moderate,
    Weak,
    Unrated,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Strong => "strong",
            Rating::Promising => "promising",
            Rating::Moderate => "moderate",
            Rating::Weak => "weak",
            Rating::Unrated => "unrated",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = SchemaError;

    /// Accepts the canonical names plus common letter grades and synonyms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '+' || *c == '/')
            .collect();
        let rating = match key.as_str() {
            "strong" | "excellent" | "high" | "a" | "a+" | "buy" | "strongbuy" => Rating::Strong,
            "promising" | "good" | "b" | "b+" | "favorable" | "favourable" => Rating::Promising,
            "moderate" | "medium" | "fair" | "average" | "c" | "neutral" | "hold" => {
                Rating::Moderate
            }
            "weak" | "poor" | "low" | "d" | "f" | "notviable" | "unfavorable" | "pass" => {
                Rating::Weak
            }
            "unrated" | "" | "none" | "n/a" | "na" | "tbd" | "pending" => Rating::Unrated,
            _ => return Err(SchemaError::UnknownRating(s.to_string())),
        };
        Ok(rating)
    }
}

/// Canonical metrics record for one analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardizedMetrics {
    pub id: Uuid,
    pub source_tag: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<Technology>,

    pub primary_cost: Metric,
    pub efficiency: Metric,
    /// Metric whose value is the integer readiness level.
    pub trl: Metric,
    pub rating: Rating,
    pub capex: Metric,
    pub opex: Metric,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npv: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irr: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payback_period: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degradation_rate: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_factor: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_cost: Option<Metric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_reduction_rate: Option<Metric>,

    #[serde(default)]
    pub secondary_metrics: Vec<Metric>,
    #[serde(default)]
    warnings: Vec<String>,
}

impl StandardizedMetrics {
    /// Append a warning. Warnings are never removed.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The required numeric fields, in schema order.
    pub fn required_metrics(&self) -> [&Metric; 5] {
        [
            &self.primary_cost,
            &self.efficiency,
            &self.trl,
            &self.capex,
            &self.opex,
        ]
    }

    /// The optional fields that are present.
    pub fn optional_metrics(&self) -> Vec<&Metric> {
        [
            &self.npv,
            &self.irr,
            &self.payback_period,
            &self.lifetime,
            &self.degradation_rate,
            &self.capacity_factor,
            &self.projected_cost,
            &self.cost_reduction_rate,
        ]
        .into_iter()
        .filter_map(Option::as_ref)
        .collect()
    }

    pub fn trl_level(&self) -> Result<Trl, SchemaError> {
        if self.trl.value.fract() != 0.0 {
            return Err(SchemaError::InvalidTrl(self.trl.value.trunc() as i64));
        }
        Trl::new(self.trl.value as i64)
    }

    /// Describe every broken record invariant (empty = valid).
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let efficiency = self.efficiency.value;
        if !(0.0..=100.0).contains(&efficiency) {
            violations.push(format!("efficiency {efficiency} is outside [0, 100]"));
        }
        if !self.trl.value.is_finite() || self.trl_level().is_err() {
            violations.push(format!(
                "trl {} is not an integer between 1 and 9",
                self.trl.value
            ));
        }
        let all = self
            .required_metrics()
            .into_iter()
            .chain(self.optional_metrics())
            .chain(self.secondary_metrics.iter());
        for metric in all {
            if !metric.value.is_finite() {
                violations.push(format!("{} has non-finite value {}", metric.id, metric.value));
            }
        }
        violations
    }
}

/// A fully populated record with every required field defaulted.
pub fn create_empty_record(source_tag: &str) -> StandardizedMetrics {
    let mut record = blank_record(source_tag);
    record.add_warning(format!(
        "Record for '{source_tag}' created with default values: required fields are zero with low confidence until extracted"
    ));
    record
}

/// Defaulted record without the explanatory warning; callers add their own.
pub(crate) fn blank_record(source_tag: &str) -> StandardizedMetrics {
    let defaulted = |id: &str, value: f64| {
        create_metric(
            id,
            value,
            MetricOptions::new()
                .with_confidence(MetricConfidence::Low)
                .with_source(DEFAULT_SOURCE)
                .with_derivation("no value extracted; defaulted"),
        )
    };

    StandardizedMetrics {
        id: Uuid::new_v4(),
        source_tag: source_tag.to_string(),
        created_at: Utc::now(),
        technology: None,
        primary_cost: defaulted("primaryCost", 0.0),
        efficiency: defaulted("efficiency", 0.0),
        trl: defaulted("trl", f64::from(Trl::MIN.get())),
        rating: Rating::Unrated,
        capex: defaulted("capex", 0.0),
        opex: defaulted("opex", 0.0),
        npv: None,
        irr: None,
        payback_period: None,
        lifetime: None,
        degradation_rate: None,
        capacity_factor: None,
        projected_cost: None,
        cost_reduction_rate: None,
        secondary_metrics: Vec::new(),
        warnings: Vec::new(),
    }
}
