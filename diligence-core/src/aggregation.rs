//! Roll-up of stage records and claim results into one assessment summary.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::claims::{ClaimValidationResult, ConfidenceLevel, RiskLevel};
use crate::reference::Technology;
use crate::schema::{Metric, StandardizedMetrics};

/// Score of a single stage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageScore {
    pub source_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technology: Option<Technology>,
    /// Confidence-weighted share of required fields actually extracted, 0..=1.
    pub score: f64,
    pub extracted_required: usize,
    pub warning_count: usize,
}

/// Combined view over every stage record and claim result of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    pub record_count: usize,
    pub claim_count: usize,
    /// Mean stage score; 0 without records.
    pub metric_confidence_score: f64,
    /// Share of claims validated, weighted by verdict confidence; absent without claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_confidence_score: Option<f64>,
    pub overall_score: f64,
    pub overall_tier: ConfidenceLevel,
    pub claims_validated: usize,
    pub claims_invalidated: usize,
    pub stage_scores: Vec<StageScore>,
    /// Invalidated claims first, then unsupported high-risk claims, then weak stages.
    pub key_findings: Vec<String>,
    /// Every record warning, prefixed with its source tag.
    pub warnings: Vec<String>,
}

const WEAK_STAGE_SCORE: f64 = 0.4;

fn verdict_weight(confidence: ConfidenceLevel) -> f64 {
    match confidence {
        ConfidenceLevel::High => 1.0,
        ConfidenceLevel::Medium => 0.7,
        ConfidenceLevel::Low => 0.4,
        ConfidenceLevel::VeryLow => 0.2,
    }
}

fn tier(score: f64) -> ConfidenceLevel {
    match score {
        s if s >= 0.8 => ConfidenceLevel::High,
        s if s >= 0.6 => ConfidenceLevel::Medium,
        s if s >= 0.4 => ConfidenceLevel::Low,
        _ => ConfidenceLevel::VeryLow,
    }
}

fn metric_score(metric: &Metric) -> f64 {
    if metric.is_defaulted() {
        0.0
    } else {
        metric.confidence.weight()
    }
}

/// Confidence-weighted completeness of a record's required fields.
pub fn record_score(record: &StandardizedMetrics) -> f64 {
    let required = record.required_metrics();
    required.iter().map(|m| metric_score(m)).sum::<f64>() / required.len() as f64
}

impl AssessmentSummary {
    pub fn build(records: &[StandardizedMetrics], claims: &[ClaimValidationResult]) -> Self {
        let stage_scores: Vec<StageScore> = records
            .iter()
            .map(|record| StageScore {
                source_tag: record.source_tag.clone(),
                technology: record.technology,
                score: record_score(record),
                extracted_required: record
                    .required_metrics()
                    .iter()
                    .filter(|m| !m.is_defaulted())
                    .count(),
                warning_count: record.warnings().len(),
            })
            .collect();

        let metric_confidence_score = if stage_scores.is_empty() {
            0.0
        } else {
            stage_scores.iter().map(|s| s.score).sum::<f64>() / stage_scores.len() as f64
        };

        let claim_confidence_score = (!claims.is_empty()).then(|| {
            claims
                .iter()
                .filter(|c| c.validated)
                .map(|c| verdict_weight(c.confidence))
                .sum::<f64>()
                / claims.len() as f64
        });

        let overall_score = match (records.is_empty(), claim_confidence_score) {
            (false, Some(claim)) => (metric_confidence_score + claim) / 2.0,
            (true, Some(claim)) => claim,
            (_, None) => metric_confidence_score,
        };

        let claims_validated = claims.iter().filter(|c| c.validated).count();
        let warnings = records
            .iter()
            .flat_map(|r| {
                r.warnings()
                    .iter()
                    .map(move |w| format!("[{}] {w}", r.source_tag))
            })
            .collect();

        Self {
            record_count: records.len(),
            claim_count: claims.len(),
            metric_confidence_score,
            claim_confidence_score,
            overall_score,
            overall_tier: tier(overall_score),
            claims_validated,
            claims_invalidated: claims.len() - claims_validated,
            key_findings: key_findings(&stage_scores, claims),
            stage_scores,
            warnings,
        }
    }
}

fn key_findings(stage_scores: &[StageScore], claims: &[ClaimValidationResult]) -> Vec<String> {
    let mut findings = Vec::new();

    let mut invalidated: Vec<&ClaimValidationResult> = claims
        .iter()
        .filter(|c| !c.validated && !c.needs_manual_review())
        .collect();
    invalidated.sort_by(|a, b| b.risk.cmp(&a.risk));
    for claim in invalidated {
        let reason = claim
            .findings
            .first()
            .map(String::as_str)
            .unwrap_or("no supporting evidence");
        findings.push(format!(
            "Claim not supported ({} risk): \"{}\": {reason}",
            claim.risk, claim.claim
        ));
    }

    for claim in claims
        .iter()
        .filter(|c| c.validated && c.risk >= RiskLevel::High && !c.data_gaps.is_empty())
    {
        findings.push(format!(
            "High-risk claim lacks supporting data: \"{}\" ({} open data gaps)",
            claim.claim,
            claim.data_gaps.len()
        ));
    }

    let unreviewed: Vec<&str> = claims
        .iter()
        .filter(|c| c.needs_manual_review())
        .map(|c| c.claim.as_str())
        .collect();
    if !unreviewed.is_empty() {
        findings.push(format!(
            "{} claim(s) need manual review: {}",
            unreviewed.len(),
            unreviewed.join("; ")
        ));
    }

    let mut seen = HashSet::new();
    for stage in stage_scores {
        if stage.score < WEAK_STAGE_SCORE && seen.insert(stage.source_tag.as_str()) {
            findings.push(format!(
                "{}: only {} of 5 required metrics extracted (score {:.2})",
                stage.source_tag, stage.extracted_required, stage.score
            ));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{ClaimValidator, DataContext};
    use crate::schema::{MetricConfidence, MetricOptions, create_empty_record, create_metric};
    use pretty_assertions::assert_eq;

    fn extracted(id: &str, value: f64, confidence: MetricConfidence) -> Metric {
        create_metric(
            id,
            value,
            MetricOptions::new()
                .with_confidence(confidence)
                .with_source("tea-analysis:test"),
        )
    }

    #[test]
    fn test_record_score_weights() {
        let mut record = create_empty_record("tea-analysis");
        assert_eq!(record_score(&record), 0.0);

        record.primary_cost = extracted("primaryCost", 3.0, MetricConfidence::High);
        record.efficiency = extracted("efficiency", 60.0, MetricConfidence::Medium);
        record.capex = extracted("capex", 300.0, MetricConfidence::Low);
        // trl and opex stay defaulted.
        let expected = (1.0 + 0.7 + 0.4) / 5.0;
        assert!((record_score(&record) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_inputs() {
        let summary = AssessmentSummary::build(&[], &[]);
        assert_eq!(summary.overall_score, 0.0);
        assert_eq!(summary.overall_tier, ConfidenceLevel::VeryLow);
        assert!(summary.claim_confidence_score.is_none());
        assert!(summary.key_findings.is_empty());
    }

    #[test]
    fn test_invalidated_claims_lead_findings() {
        let validator = ClaimValidator::default();
        let claims = validator.validate_batch(
            &[
                "carbon neutral operation",
                "95% conversion efficiency",
                "Strong founding team",
            ],
            &DataContext::new(),
        );
        let record = create_empty_record("lca-analysis");
        let summary = AssessmentSummary::build(std::slice::from_ref(&record), &claims);

        assert_eq!(summary.claim_count, 3);
        assert_eq!(summary.claims_invalidated, 2);
        assert!(summary.key_findings[0].starts_with("Claim not supported"));
        assert!(summary.key_findings[0].contains("95% conversion efficiency"));
        assert!(
            summary
                .key_findings
                .iter()
                .any(|f| f.contains("need manual review"))
        );
        assert!(
            summary
                .key_findings
                .last()
                .unwrap()
                .starts_with("lca-analysis: only 0 of 5")
        );
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.warnings[0].starts_with("[lca-analysis] "));
    }

    #[test]
    fn test_overall_blends_metrics_and_claims() {
        let mut record = create_empty_record("tea-analysis");
        for metric in [
            &mut record.primary_cost,
            &mut record.efficiency,
            &mut record.trl,
            &mut record.capex,
            &mut record.opex,
        ] {
            metric.confidence = MetricConfidence::High;
            metric.source = "tea-analysis:standardizedMetrics".to_string();
        }
        let summary = AssessmentSummary::build(&[record], &[]);
        assert_eq!(summary.metric_confidence_score, 1.0);
        assert_eq!(summary.overall_tier, ConfidenceLevel::High);
        assert_eq!(summary.stage_scores[0].extracted_required, 5);
    }
}
