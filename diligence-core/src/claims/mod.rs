//! Claim-rule matching and physics-backed claim validation.
//!
//! Free-text claims are mapped to a fixed, ordered table of validation rules.
//! The first rule whose pattern matches wins, so specific rules precede
//! generic ones. A matched rule may carry a physics ceiling, an efficiency
//! model hook and published benchmark ranges, which the [`ClaimValidator`]
//! checks against the numeric assertion extracted from the claim.

mod rules;
mod validator;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use rules::rules;
pub use validator::{
    ClaimValidationResult, ClaimValidator, DataContext, ModelCheck, PhysicsCheck,
    ValidationSummary,
};

use crate::efficiency::EfficiencyModel;
use crate::reference::BenchmarkRange;

/// Broad subject area of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClaimCategory {
    Efficiency,
    Cost,
    Environmental,
    Scalability,
    Maturity,
    Durability,
    Performance,
}

/// How a rule establishes (or refutes) a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMethod {
    /// Compared against a hard thermodynamic or physical ceiling.
    PhysicsBound,
    /// Compared against published industry ranges.
    Benchmark,
    /// Cannot be judged without documents from the company.
    DataRequest,
    /// Needs a domain expert.
    ExpertReview,
}

/// How much damage a false claim in this area does to an investment case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Confidence in a validation verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryLow => "very-low",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        })
    }
}

/// Text pattern that selects a rule.
#[derive(Debug, Clone)]
pub enum ClaimPattern {
    /// Case-insensitive substring; stored lowercased.
    Literal(String),
    Regex(Regex),
}

impl ClaimPattern {
    pub fn literal(text: &str) -> Self {
        ClaimPattern::Literal(text.to_lowercase())
    }

    pub fn is_match(&self, claim: &str) -> bool {
        match self {
            ClaimPattern::Literal(text) => claim.to_lowercase().contains(text.as_str()),
            ClaimPattern::Regex(re) => re.is_match(claim),
        }
    }
}

/// Hard upper bound a claimed number must not exceed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsCeiling {
    pub metric: String,
    pub maximum: f64,
    pub unit: String,
    pub citation: String,
}

/// A published range the claimed number is compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedBenchmark {
    pub name: String,
    pub unit: String,
    pub range: BenchmarkRange,
}

/// A condition that undermines a claim when no supporting data is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub condition: String,
}

/// A static claim validation rule.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub id: String,
    pub pattern: ClaimPattern,
    pub category: ClaimCategory,
    pub method: ValidationMethod,
    pub benchmarks: Vec<NamedBenchmark>,
    pub ceiling: Option<PhysicsCeiling>,
    /// Model run when the data context carries its parameters.
    pub model: Option<EfficiencyModel>,
    pub interpretation: String,
    pub steps: Vec<String>,
    pub risk: RiskLevel,
    pub default_confidence: ConfidenceLevel,
    pub red_flags: Vec<RedFlag>,
    pub data_requests: Vec<String>,
}

/// First rule (in table order) whose pattern matches the claim.
pub fn match_rule(claim: &str) -> Option<&'static ValidationRule> {
    rules().iter().find(|rule| rule.pattern.is_match(claim))
}

static NUMERIC_ASSERTIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+(?:\.\d+)?)\s*%",
        r"(?i)(\d+(?:\.\d+)?)\s*(?:percent|per cent|pct)\b",
        r"(?i)\b(?:over|above|exceeds?|exceeding|more than|greater than|up to|at least)\s+(\d+(?:\.\d+)?)",
        r"(?i)(\d+(?:\.\d+)?)\s*(?:or higher|or more|or greater|\+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Pull the asserted number out of a claim.
///
/// Patterns are tried in order (`90%`, `90 percent`, `over 90`,
/// `90 or higher`); the first capture of the first matching pattern wins.
pub fn extract_numeric_assertion(claim: &str) -> Option<f64> {
    NUMERIC_ASSERTIONS.iter().find_map(|re| {
        re.captures(claim)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    })
}

/// Whether the asserted number is written as a percentage (`90%`, `90 percent`).
pub fn is_percent_assertion(claim: &str) -> bool {
    NUMERIC_ASSERTIONS
        .iter()
        .position(|re| re.is_match(claim))
        .is_some_and(|index| index < 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_form_detection() {
        assert!(is_percent_assertion("400% efficiency"));
        assert!(is_percent_assertion("efficiency of 95 percent"));
        assert!(!is_percent_assertion("COP above 3.5"));
        assert!(!is_percent_assertion("no numbers here"));
    }

    #[test]
    fn test_extract_percent() {
        assert_eq!(extract_numeric_assertion("95% conversion efficiency"), Some(95.0));
        assert_eq!(extract_numeric_assertion("efficiency of 42.5 %"), Some(42.5));
    }

    #[test]
    fn test_extract_word_forms() {
        assert_eq!(extract_numeric_assertion("90 percent yield"), Some(90.0));
        assert_eq!(extract_numeric_assertion("Efficiency over 60"), Some(60.0));
        assert_eq!(extract_numeric_assertion("exceeds 30 in field tests"), Some(30.0));
        assert_eq!(extract_numeric_assertion("uptime of 99 or higher"), Some(99.0));
        assert_eq!(extract_numeric_assertion("a 20+ year lifetime"), Some(20.0));
    }

    #[test]
    fn test_percent_takes_precedence() {
        // "over 5" appears first in the text but the percent pattern is tried first
        assert_eq!(
            extract_numeric_assertion("over 5 sites report 88% efficiency"),
            Some(88.0)
        );
    }

    #[test]
    fn test_no_assertion() {
        assert_eq!(extract_numeric_assertion("carbon neutral operation"), None);
    }

    #[test]
    fn test_literal_pattern_is_case_insensitive() {
        let pattern = ClaimPattern::literal("Net Zero");
        assert!(pattern.is_match("We are NET ZERO by 2030"));
        assert!(!pattern.is_match("net positive"));
    }

    #[test]
    fn test_match_rule_specific_before_generic() {
        let rule = match_rule("95% conversion efficiency").unwrap();
        assert_eq!(rule.id, "htl-conversion-efficiency");

        let rule = match_rule("Our solar modules reach 24% efficiency").unwrap();
        assert_eq!(rule.id, "solar-pv-efficiency");

        let rule = match_rule("Pump efficiency of 80%").unwrap();
        assert_eq!(rule.id, "generic-efficiency");
    }

    #[test]
    fn test_match_rule_none() {
        assert!(match_rule("Our founders have a strong background").is_none());
    }

    #[test]
    fn test_risk_and_confidence_ordering() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(ConfidenceLevel::VeryLow < ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::VeryLow.to_string(), "very-low");
        assert_eq!(
            serde_json::to_string(&ConfidenceLevel::VeryLow).unwrap(),
            "\"very-low\""
        );
    }
}
