//! Property-based tests for core components using proptest.

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use diligence_core::claims::ClaimValidator;
use diligence_core::config::ExtractionConfig;
use diligence_core::efficiency::{HeatEngineParams, carnot};
use diligence_core::extraction::coerce_number;
use diligence_core::{
    AnalysisStage, DataContext, ExtractionMethod, MetricKey, MetricOptions, MetricsExtractor, Trl,
    create_metric,
};

// --- Numeric coercion properties ---

proptest! {
    #[test]
    fn finite_numbers_coerce_to_themselves(v in -1.0e12f64..1.0e12) {
        prop_assert_eq!(coerce_number(&json!(v)), Some(v));
    }

    #[test]
    fn formatted_currency_strings_coerce(whole in 0u64..10_000_000, cents in 0u64..100) {
        let text = format!("${}.{:02}", group_thousands(whole), cents);
        let expected = whole as f64 + cents as f64 / 100.0;
        let parsed = coerce_number(&json!(text)).unwrap();
        prop_assert!((parsed - expected).abs() < 1e-6);
    }

    #[test]
    fn alphabetic_strings_are_absent(s in "[a-zA-Z ]{1,20}") {
        // "inf", "nan", "infinity" parse as floats but are not finite.
        prop_assert_eq!(coerce_number(&json!(s)), None);
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// --- Schema properties ---

proptest! {
    #[test]
    fn create_metric_preserves_value(key_index in 0usize..13, v in -1.0e9f64..1.0e9) {
        let key = MetricKey::ALL[key_index];
        let metric = create_metric(key.as_str(), v, MetricOptions::new());
        prop_assert_eq!(metric.value, v);
        prop_assert_eq!(metric.unit.as_str(), key.default_unit());
    }

    #[test]
    fn saturating_trl_is_always_in_range(v in proptest::num::f64::ANY) {
        let level = Trl::saturating(v).get();
        prop_assert!((1..=9).contains(&level));
    }
}

// --- Extraction properties ---

fn nest(depth: usize, leaf: Value) -> Value {
    (0..depth).fold(leaf, |inner, i| {
        let mut map = Map::new();
        map.insert(format!("n{i}"), inner);
        Value::Object(map)
    })
}

proptest! {
    #[test]
    fn canonical_value_is_never_overridden(
        canonical in 0.0f64..100.0,
        conflicting in 0.0f64..100.0,
        stage_index in 0usize..7,
    ) {
        let doc = json!({
            "standardizedMetrics": {"efficiency": {"value": canonical}},
            "assumptions": {"efficiency": conflicting},
            "technicalSpecs": {"efficiency": conflicting},
            "metrics": {"efficiency": conflicting},
            "deep": {"efficiencyEstimate": conflicting}
        });
        let stage = AnalysisStage::ALL[stage_index];
        let result = MetricsExtractor::default().extract(stage, &doc, MetricKey::Efficiency);
        prop_assert_eq!(result.method, ExtractionMethod::Direct);
        prop_assert_eq!(result.value.map(|m| m.value), Some(canonical));
    }

    #[test]
    fn deep_search_respects_depth_cap(depth in 0usize..40) {
        for leaf in [json!({"npvEstimate": 5}), json!({"netPresentValue": 5})] {
            let doc = nest(depth, leaf);
            let result = MetricsExtractor::default().extract(AnalysisStage::IpAnalysis, &doc, MetricKey::Npv);
            prop_assert_eq!(result.found, depth <= 10);
        }

        // With the length guard on, `npv` must equal the whole key.
        let guarded = MetricsExtractor::new(ExtractionConfig {
            min_fuzzy_alias_len: 4,
            ..ExtractionConfig::default()
        });
        let doc = nest(depth, json!({"npvEstimate": 5}));
        prop_assert!(!guarded.extract(AnalysisStage::IpAnalysis, &doc, MetricKey::Npv).found);
    }
}

// --- Claim validation properties ---

proptest! {
    #[test]
    fn validation_never_panics_and_is_idempotent(claim in ".{0,80}") {
        let validator = ClaimValidator::default();
        let data = DataContext::new();
        let first = validator.validate(&claim, &data);
        let second = validator.validate(&claim, &data);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn carnot_rejects_inverted_reservoirs(cold in 1.0f64..2000.0, delta in 0.0f64..500.0) {
        let hot = cold - delta;
        let params = HeatEngineParams { hot_k: hot, cold_k: cold };
        prop_assert!(carnot(&params).is_err());
    }

    #[test]
    fn carnot_bounds_modeled_value(cold in 200.0f64..400.0, delta in 1.0f64..1500.0) {
        let result = carnot(&HeatEngineParams { hot_k: cold + delta, cold_k: cold }).unwrap();
        prop_assert!(result.value > 0.0);
        prop_assert!(result.value <= result.theoretical_max);
        prop_assert!(result.theoretical_max < 100.0);
    }
}
