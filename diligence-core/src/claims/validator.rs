//! Claim validation against the rule table.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{
    ClaimCategory, ConfidenceLevel, RiskLevel, ValidationRule, extract_numeric_assertion,
    is_percent_assertion, match_rule,
};
use crate::config::ValidationConfig;
use crate::efficiency::{PlausibilityVerdict, validate_claimed_efficiency_with};

/// Rule id reported for claims no rule matches.
pub const UNMATCHED_RULE_ID: &str = "none";

/// Numeric evidence supplied alongside a batch of claims.
///
/// Keys are free-form (`hot_temperature_k`, `lca_gwp_kg_co2e`, ...). Keys that
/// match an efficiency model's parameters enable the model check. An empty
/// context surfaces every red flag of the matched rule as a data gap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataContext {
    pub values: BTreeMap<String, f64>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().filter(|v| v.is_finite())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of comparing a claimed number with a rule's physics ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsCheck {
    pub claimed: f64,
    pub limit: f64,
    /// Headroom below the limit; negative when the claim exceeds it.
    pub margin: f64,
    pub passed: bool,
    pub unit: String,
    pub citation: String,
}

/// Outcome of running the rule's efficiency model on the supplied data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCheck {
    pub model: String,
    pub modeled_value: f64,
    pub theoretical_max: f64,
    pub verdict: PlausibilityVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimValidationResult {
    pub claim: String,
    pub rule_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ClaimCategory>,
    pub validated: bool,
    pub confidence: ConfidenceLevel,
    pub risk: RiskLevel,
    pub findings: Vec<String>,
    pub data_gaps: Vec<String>,
    pub recommendations: Vec<String>,
    pub data_requests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physics_check: Option<PhysicsCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_check: Option<ModelCheck>,
}

impl ClaimValidationResult {
    pub fn needs_manual_review(&self) -> bool {
        self.rule_id == UNMATCHED_RULE_ID
    }
}

/// Aggregate view over a batch of claim results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub total: usize,
    pub validated: usize,
    pub invalidated: usize,
    pub high_risk: usize,
    pub manual_review: usize,
    pub findings: Vec<String>,
    pub data_gaps: Vec<String>,
    pub priority_data_requests: Vec<String>,
}

/// Validates free-text claims against the built-in rule table.
#[derive(Debug, Clone, Default)]
pub struct ClaimValidator {
    config: ValidationConfig,
}

impl ClaimValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a single claim.
    pub fn validate(&self, claim: &str, data: &DataContext) -> ClaimValidationResult {
        match match_rule(claim) {
            Some(rule) => self.validate_with_rule(claim, rule, data),
            None => {
                tracing::debug!(claim, "no validation rule matched");
                unmatched(claim)
            }
        }
    }

    /// Validate claims independently against one shared data context.
    pub fn validate_batch<S: AsRef<str>>(
        &self,
        claims: &[S],
        data: &DataContext,
    ) -> Vec<ClaimValidationResult> {
        let results: Vec<_> = claims
            .iter()
            .map(|claim| self.validate(claim.as_ref(), data))
            .collect();
        tracing::info!(
            claims = results.len(),
            invalidated = results.iter().filter(|r| !r.validated).count(),
            "claim batch validated"
        );
        results
    }

    fn validate_with_rule(
        &self,
        claim: &str,
        rule: &ValidationRule,
        data: &DataContext,
    ) -> ClaimValidationResult {
        let assertion = extract_numeric_assertion(claim);
        let mut findings = Vec::new();
        let mut data_gaps = Vec::new();
        let mut recommendations = vec![rule.interpretation.clone()];
        recommendations.extend(rule.steps.iter().cloned());
        let mut validated = true;

        let physics_check = match (&rule.ceiling, assertion) {
            (Some(ceiling), Some(claimed)) => {
                let passed = claimed <= ceiling.maximum;
                if passed {
                    findings.push(format!(
                        "Claimed {claimed}{} is within the {} ceiling of {}{} ({})",
                        ceiling.unit, ceiling.metric, ceiling.maximum, ceiling.unit, ceiling.citation
                    ));
                } else {
                    validated = false;
                    findings.push(format!(
                        "PHYSICS VIOLATION: claimed {claimed}{} exceeds the {} ceiling of {}{} (source: {})",
                        ceiling.unit, ceiling.metric, ceiling.maximum, ceiling.unit, ceiling.citation
                    ));
                }
                Some(PhysicsCheck {
                    claimed,
                    limit: ceiling.maximum,
                    margin: ceiling.maximum - claimed,
                    passed,
                    unit: ceiling.unit.clone(),
                    citation: ceiling.citation.clone(),
                })
            }
            _ => None,
        };
        let physics_failed = physics_check.as_ref().is_some_and(|c| !c.passed);

        let model_check = match (rule.model, assertion) {
            (Some(model), Some(claimed)) => match model.evaluate(|key| data.get(key)) {
                Some(Ok(result)) => {
                    let verdict = validate_claimed_efficiency_with(
                        claimed,
                        &result,
                        self.config.margin_of_error,
                        self.config.typical_excess_tolerance,
                    );
                    if verdict.plausible {
                        findings.push(format!("Model check passed: {}", verdict.reason));
                    } else {
                        validated = false;
                        findings.push(format!("MODEL CHECK: {}", verdict.reason));
                    }
                    Some(ModelCheck {
                        model: result.model.clone(),
                        modeled_value: result.value,
                        theoretical_max: result.theoretical_max,
                        verdict,
                    })
                }
                Some(Err(err)) => {
                    tracing::debug!(rule = %rule.id, error = %err, "model parameters rejected");
                    data_gaps.push(format!("Supplied model parameters are physically invalid: {err}"));
                    None
                }
                None => {
                    recommendations.push(format!(
                        "Supply {} to run a first-principles model check",
                        model.required_parameters().join(", ")
                    ));
                    None
                }
            },
            _ => None,
        };

        if let Some(claimed) = assertion {
            let percent = is_percent_assertion(claim);
            let comparable: Vec<_> = rule
                .benchmarks
                .iter()
                .filter(|b| rule.ceiling.as_ref().is_none_or(|c| c.unit == b.unit))
                .filter_map(|b| in_benchmark_unit(claimed, percent, &b.unit).map(|v| (b, v)))
                .collect();
            if !comparable.is_empty() && !comparable.iter().any(|(b, v)| b.range.contains(*v)) {
                let ranges: Vec<String> = comparable
                    .iter()
                    .map(|(b, _)| {
                        format!(
                            "{} {}-{}{} ({} {})",
                            b.name, b.range.min, b.range.max, b.unit, b.range.source, b.range.year
                        )
                    })
                    .collect();
                findings.push(format!(
                    "Claimed {claimed} is outside published benchmarks: {}",
                    ranges.join("; ")
                ));
            }
        }

        // Red flags are all-or-nothing: any supplied data clears them.
        if data.is_empty() {
            data_gaps.extend(rule.red_flags.iter().map(|f| f.condition.clone()));
        }

        let confidence = if physics_failed {
            ConfidenceLevel::High
        } else if data_gaps.len() > 3 {
            ConfidenceLevel::VeryLow
        } else if data_gaps.len() > 1 {
            ConfidenceLevel::Low
        } else {
            rule.default_confidence
        };

        ClaimValidationResult {
            claim: claim.to_string(),
            rule_id: rule.id.clone(),
            category: Some(rule.category),
            validated,
            confidence,
            risk: rule.risk,
            findings,
            data_gaps,
            recommendations,
            data_requests: rule.data_requests.clone(),
            physics_check,
            model_check,
        }
    }

    /// Summarize a batch of results.
    pub fn summarize(&self, results: &[ClaimValidationResult]) -> ValidationSummary {
        let mut summary = ValidationSummary {
            total: results.len(),
            ..Default::default()
        };

        let mut seen_findings = HashSet::new();
        let mut seen_gaps = HashSet::new();
        for result in results {
            if result.validated {
                summary.validated += 1;
            } else {
                summary.invalidated += 1;
            }
            if result.risk >= RiskLevel::High {
                summary.high_risk += 1;
            }
            if result.needs_manual_review() {
                summary.manual_review += 1;
            }
            for finding in &result.findings {
                if seen_findings.insert(finding.as_str()) {
                    summary.findings.push(finding.clone());
                }
            }
            for gap in &result.data_gaps {
                if seen_gaps.insert(gap.as_str()) {
                    summary.data_gaps.push(gap.clone());
                }
            }
        }

        // Highest-risk claims first; invalidated before validated at equal risk.
        let mut ranked: Vec<&ClaimValidationResult> = results.iter().collect();
        ranked.sort_by(|a, b| b.risk.cmp(&a.risk).then(a.validated.cmp(&b.validated)));
        let mut seen_requests = HashSet::new();
        summary.priority_data_requests = ranked
            .iter()
            .flat_map(|r| r.data_requests.iter())
            .filter(|req| seen_requests.insert(req.as_str()))
            .take(self.config.max_priority_requests)
            .cloned()
            .collect();

        summary
    }
}

fn unmatched(claim: &str) -> ClaimValidationResult {
    ClaimValidationResult {
        claim: claim.to_string(),
        rule_id: UNMATCHED_RULE_ID.to_string(),
        category: None,
        validated: false,
        confidence: ConfidenceLevel::VeryLow,
        risk: RiskLevel::Medium,
        findings: Vec::new(),
        data_gaps: Vec::new(),
        recommendations: vec![
            "Manual review required: no validation rule covers this claim".to_string(),
        ],
        data_requests: Vec::new(),
        physics_check: None,
        model_check: None,
    }
}

/// Express a claimed figure in a benchmark's unit, or `None` when they don't compare.
///
/// A percentage against a COP benchmark reads as a ratio (400% is COP 4).
fn in_benchmark_unit(claimed: f64, percent: bool, unit: &str) -> Option<f64> {
    match (percent, unit) {
        (_, "%") | (false, _) => Some(claimed),
        (true, "COP") => Some(claimed / 100.0),
        (true, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn validator() -> ClaimValidator {
        ClaimValidator::default()
    }

    #[test]
    fn test_htl_claim_above_ceiling() {
        let result = validator().validate("95% conversion efficiency", &DataContext::new());
        assert_eq!(result.rule_id, "htl-conversion-efficiency");
        assert!(!result.validated);
        assert_eq!(result.confidence, ConfidenceLevel::High);
        assert!(result.findings.iter().any(|f| f.contains("PHYSICS VIOLATION")));
        assert!(result.findings.iter().any(|f| f.contains("PNNL")));
        let check = result.physics_check.unwrap();
        assert!(!check.passed);
        assert_eq!(check.limit, 85.0);
        assert_eq!(check.margin, -10.0);
    }

    #[test]
    fn test_htl_claim_at_ceiling_passes() {
        let result = validator().validate("85% conversion efficiency", &DataContext::new());
        assert!(result.validated);
        assert!(result.physics_check.unwrap().passed);
        assert!(!result.findings.iter().any(|f| f.contains("PHYSICS VIOLATION")));
    }

    #[test]
    fn test_carbon_neutral_without_data() {
        let result = validator().validate("carbon neutral operation", &DataContext::new());
        assert!(result.validated);
        assert!(result.physics_check.is_none());
        assert_eq!(result.data_gaps.len(), 4);
        assert!(result.confidence <= ConfidenceLevel::Low);
    }

    #[test]
    fn test_any_supplied_data_clears_red_flags() {
        let without_data = validator().validate("carbon neutral operation", &DataContext::new());
        let data = DataContext::new().with_value("capex", 1.0);
        let result = validator().validate("carbon neutral operation", &data);
        assert_eq!(result.rule_id, without_data.rule_id);
        assert!(result.data_gaps.is_empty());
        assert!(result.validated);
        assert!(result.confidence > without_data.confidence);
    }

    #[test]
    fn test_unmatched_claim() {
        let result = validator().validate("Strong founding team", &DataContext::new());
        assert_eq!(result.rule_id, "none");
        assert!(!result.validated);
        assert_eq!(result.confidence, ConfidenceLevel::VeryLow);
        assert!(result.category.is_none());
        assert!(result.needs_manual_review());
        assert!(result.recommendations[0].contains("Manual review"));
    }

    #[test]
    fn test_model_check_rejects_implausible_heat_engine() {
        let data = DataContext::new()
            .with_value("hot_temperature_k", 800.0)
            .with_value("cold_temperature_k", 300.0);
        let result = validator().validate("Gas turbine efficiency of 70%", &data);
        assert_eq!(result.rule_id, "heat-engine-efficiency");
        assert!(!result.validated);
        assert!(result.findings.iter().any(|f| f.starts_with("MODEL CHECK")));
        let check = result.model_check.unwrap();
        assert!((check.theoretical_max - 62.5).abs() < 1e-9);
        assert!(!check.verdict.plausible);
    }

    #[test]
    fn test_model_check_passes_plausible_claim() {
        let data = DataContext::new()
            .with_value("hot_temperature_k", 1700.0)
            .with_value("cold_temperature_k", 300.0);
        let result = validator().validate("Gas turbine efficiency of 55%", &data);
        assert!(result.validated);
        assert!(result.model_check.unwrap().verdict.plausible);
    }

    #[test]
    fn test_invalid_model_parameters_become_gap() {
        let data = DataContext::new()
            .with_value("hot_temperature_k", 300.0)
            .with_value("cold_temperature_k", 800.0);
        let result = validator().validate("Gas turbine efficiency of 40%", &data);
        assert!(result.model_check.is_none());
        assert!(result.data_gaps.iter().any(|g| g.contains("physically invalid")));
    }

    #[test]
    fn test_missing_model_parameters_recommend_data() {
        let result = validator().validate("Gas turbine efficiency of 40%", &DataContext::new());
        assert!(result.model_check.is_none());
        assert!(
            result
                .recommendations
                .iter()
                .any(|r| r.contains("hot_temperature_k"))
        );
    }

    #[test]
    fn test_benchmark_comparison_finding() {
        let result = validator().validate("Solar module efficiency of 31%", &DataContext::new());
        assert!(result.validated);
        assert!(
            result
                .findings
                .iter()
                .any(|f| f.contains("outside published benchmarks"))
        );
    }

    #[test]
    fn test_percent_claim_compared_as_cop() {
        let v = validator();
        let within = v.validate("Heat pump delivering 400% efficiency", &DataContext::new());
        assert_eq!(within.rule_id, "heat-pump-cop");
        assert!(
            !within
                .findings
                .iter()
                .any(|f| f.contains("outside published benchmarks"))
        );

        let beyond = v.validate("Heat pump delivering 800% efficiency", &DataContext::new());
        assert!(
            beyond
                .findings
                .iter()
                .any(|f| f.contains("outside published benchmarks"))
        );
    }

    #[test]
    fn test_benchmark_unit_reconciliation() {
        assert_eq!(in_benchmark_unit(31.0, true, "%"), Some(31.0));
        assert_eq!(in_benchmark_unit(400.0, true, "COP"), Some(4.0));
        assert_eq!(in_benchmark_unit(3.5, false, "COP"), Some(3.5));
        assert_eq!(in_benchmark_unit(90.0, true, "kWh/kg"), None);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let data = DataContext::new().with_value("capex", 1200.0);
        let v = validator();
        let first = v.validate("95% conversion efficiency", &data);
        let second = v.validate("95% conversion efficiency", &data);
        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_and_summary() {
        let v = validator();
        let claims = [
            "95% conversion efficiency",
            "carbon neutral operation",
            "Strong founding team",
            "Cost competitive with fossil diesel",
        ];
        let results = v.validate_batch(&claims, &DataContext::new());
        assert_eq!(results.len(), 4);
        for (claim, result) in claims.iter().zip(&results) {
            assert_eq!(&result.claim, claim);
        }

        let summary = v.summarize(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.validated, 2);
        assert_eq!(summary.invalidated, 2);
        assert_eq!(summary.manual_review, 1);
        assert_eq!(summary.high_risk, 3);
        assert_eq!(summary.priority_data_requests.len(), 5);
        // Critical HTL claim's requests come first
        assert_eq!(
            summary.priority_data_requests[0],
            "Complete mass and energy balance for a continuous run"
        );
    }

    #[test]
    fn test_summary_deduplicates() {
        let v = validator();
        let results = v.validate_batch(
            &["carbon neutral operation", "net zero by 2030"],
            &DataContext::new(),
        );
        let summary = v.summarize(&results);
        assert_eq!(summary.data_gaps.len(), 4);
        assert_eq!(summary.priority_data_requests.len(), 3);
    }

    #[test]
    fn test_priority_cap_is_configurable() {
        let v = ClaimValidator::new(ValidationConfig {
            max_priority_requests: 2,
            ..Default::default()
        });
        let results = v.validate_batch(&["95% conversion efficiency"], &DataContext::new());
        assert_eq!(v.summarize(&results).priority_data_requests.len(), 2);
    }
}
