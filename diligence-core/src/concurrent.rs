//! Parallel batch helpers.
//!
//! Claims and stage documents are independent, so batches fan out onto the
//! blocking pool. Results come back in input order regardless of completion
//! order.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinSet;
use tracing::info;

use crate::claims::{ClaimValidationResult, ClaimValidator, DataContext};
use crate::error::{DiligenceError, Result};
use crate::extraction::{AnalysisStage, MetricsExtractor, NormalizedMetrics};
use crate::reference::Technology;

async fn run_ordered<I, T, F>(items: Vec<I>, work: F) -> Result<Vec<T>>
where
    I: Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> T + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let mut set = JoinSet::new();
    let total = items.len();
    for (index, item) in items.into_iter().enumerate() {
        let work = Arc::clone(&work);
        set.spawn_blocking(move || (index, work(item)));
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    while let Some(joined) = set.join_next().await {
        let (index, output) = joined.map_err(|e| DiligenceError::Task {
            message: e.to_string(),
        })?;
        slots[index] = Some(output);
    }

    slots
        .into_iter()
        .collect::<Option<Vec<T>>>()
        .ok_or_else(|| DiligenceError::Task {
            message: "a batch item produced no result".to_string(),
        })
}

/// Validate claims in parallel against one shared data context.
pub async fn validate_claims_concurrent(
    validator: Arc<ClaimValidator>,
    claims: Vec<String>,
    data: Arc<DataContext>,
) -> Result<Vec<ClaimValidationResult>> {
    let results = run_ordered(claims, move |claim| validator.validate(&claim, &data)).await?;
    info!(
        claims = results.len(),
        invalidated = results.iter().filter(|r| !r.validated).count(),
        "concurrent claim batch validated"
    );
    Ok(results)
}

/// Normalize several stage documents in parallel.
pub async fn normalize_stages_concurrent(
    extractor: Arc<MetricsExtractor>,
    stages: Vec<(AnalysisStage, Value)>,
    technology: Option<Technology>,
) -> Result<Vec<NormalizedMetrics>> {
    let records = run_ordered(stages, move |(stage, doc)| {
        extractor.normalize(stage, &doc, technology)
    })
    .await?;
    info!(stages = records.len(), "concurrent stage batch normalized");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_claims_keep_input_order() {
        let validator = Arc::new(ClaimValidator::default());
        let claims: Vec<String> = [
            "95% conversion efficiency",
            "carbon neutral operation",
            "Strong founding team",
            "solar cell efficiency of 45%",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let data = Arc::new(DataContext::new());

        let concurrent =
            validate_claims_concurrent(Arc::clone(&validator), claims.clone(), Arc::clone(&data))
                .await
                .unwrap();
        let sequential = validator.validate_batch(&claims, &data);
        assert_eq!(concurrent, sequential);
    }

    #[tokio::test]
    async fn test_stages_keep_input_order() {
        let extractor = Arc::new(MetricsExtractor::default());
        let stages = vec![
            (AnalysisStage::TeaAnalysis, json!({"assumptions": {"efficiency": 42}})),
            (AnalysisStage::LcaAnalysis, json!({})),
            (AnalysisStage::MarketAnalysis, json!({"pricing": {"currentPrice": 3.5}})),
        ];
        let records = normalize_stages_concurrent(extractor, stages, None).await.unwrap();
        let tags: Vec<&str> = records.iter().map(|r| r.record.source_tag.as_str()).collect();
        assert_eq!(tags, vec!["tea-analysis", "lca-analysis", "market-analysis"]);
        assert_eq!(records[0].record.efficiency.value, 42.0);
        assert_eq!(records[2].record.primary_cost.value, 3.5);
    }

    #[tokio::test]
    async fn test_empty_batches() {
        let results = validate_claims_concurrent(
            Arc::new(ClaimValidator::default()),
            Vec::new(),
            Arc::new(DataContext::new()),
        )
        .await
        .unwrap();
        assert!(results.is_empty());
    }
}
