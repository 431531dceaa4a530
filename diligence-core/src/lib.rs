//! # Diligence Core
//!
//! Assessment validation and metrics normalization for technology due
//! diligence. Validates free-text claims against physics ceilings,
//! first-principles efficiency models and published benchmarks, and
//! normalizes heterogeneous analysis-stage output into one canonical
//! metrics record with confidence and provenance tracking.

pub mod aggregation;
pub mod claims;
pub mod concurrent;
pub mod config;
pub mod efficiency;
pub mod error;
pub mod extraction;
pub mod reference;
pub mod schema;
pub mod units;

// Re-export commonly used types at the crate root.
pub use aggregation::{AssessmentSummary, StageScore};
pub use claims::{
    ClaimCategory, ClaimValidationResult, ClaimValidator, ConfidenceLevel, DataContext,
    RiskLevel, ValidationSummary,
};
pub use config::{EngineConfig, ExtractionConfig, ValidationConfig, load_config};
pub use efficiency::{EfficiencyModel, EfficiencyResult, PlausibilityVerdict};
pub use error::{DiligenceError, PhysicsError, Result, SchemaError, UnitError};
pub use extraction::{
    AnalysisStage, ExtractionMethod, ExtractionResult, MetricKey, MetricsExtractor,
    NormalizedMetrics,
};
pub use reference::{BenchmarkRange, PhysicsLimit, Technology};
pub use schema::{
    Metric, MetricConfidence, MetricOptions, Rating, StandardizedMetrics, Trl,
    create_empty_record, create_metric,
};
