//! Error types for the Diligence engine.
//!
//! Uses `thiserror` for public API error types. Absence of a metric, an
//! unmatched claim, or an exhausted deep search are *not* errors; they travel
//! as data inside result types. Only efficiency models given physically
//! impossible parameters, unit conversions between unknown units, and invalid
//! configuration fail loudly.

/// Top-level error type for the Diligence core library.
#[derive(Debug, thiserror::Error)]
pub enum DiligenceError {
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Background task failed: {message}")]
    Task { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the efficiency modeling library.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhysicsError {
    #[error(
        "Hot reservoir temperature ({hot_k} K) must be greater than cold reservoir temperature ({cold_k} K)"
    )]
    InvalidTemperatures { hot_k: f64, cold_k: f64 },

    #[error("Parameter '{parameter}' must be positive and finite, got {value}")]
    NonPositive { parameter: String, value: f64 },

    #[error("Parameter '{parameter}' = {value} is outside the physical range [{min}, {max}]")]
    OutOfRange {
        parameter: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown storage chemistry: {0}")]
    UnknownChemistry(String),

    #[error("Unknown technology: {0}")]
    UnknownTechnology(String),

    #[error("Model '{model}' needs at least one stage")]
    EmptyChain { model: String },
}

impl PhysicsError {
    pub(crate) fn non_positive(parameter: &str, value: f64) -> Self {
        Self::NonPositive {
            parameter: parameter.to_string(),
            value,
        }
    }

    pub(crate) fn out_of_range(parameter: &str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            parameter: parameter.to_string(),
            value,
            min,
            max,
        }
    }
}

/// Errors from unit conversion.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },

    #[error("Cannot convert {from} ({from_dimension}) to {to} ({to_dimension})")]
    IncompatibleDimensions {
        from: String,
        to: String,
        from_dimension: String,
        to_dimension: String,
    },

    #[error("Cannot convert non-finite value {value}")]
    NonFinite { value: f64 },
}

/// Errors from parsing metrics-record vocabulary (stages, metric keys, ratings).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Unknown rating: {0}")]
    UnknownRating(String),

    #[error("Technology readiness level must be between 1 and 9, got {0}")]
    InvalidTrl(i64),

    #[error("Unknown analysis stage: {0}")]
    UnknownStage(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `DiligenceError`.
pub type Result<T> = std::result::Result<T, DiligenceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_physics() {
        let err = DiligenceError::Physics(PhysicsError::InvalidTemperatures {
            hot_k: 300.0,
            cold_k: 400.0,
        });
        assert_eq!(
            err.to_string(),
            "Physics error: Hot reservoir temperature (300 K) must be greater than cold reservoir temperature (400 K)"
        );
    }

    #[test]
    fn test_error_display_unit() {
        let err = DiligenceError::Unit(UnitError::UnknownUnit {
            unit: "furlong".into(),
        });
        assert_eq!(err.to_string(), "Unit error: Unknown unit: furlong");
    }

    #[test]
    fn test_error_display_out_of_range() {
        let err = PhysicsError::out_of_range("bandgap_ev", 12.0, 0.1, 6.0);
        assert_eq!(
            err.to_string(),
            "Parameter 'bandgap_ev' = 12 is outside the physical range [0.1, 6]"
        );
    }

    #[test]
    fn test_error_from_conversions() {
        let physics = PhysicsError::non_positive("head_m", -3.0);
        let err: DiligenceError = physics.into();
        assert!(matches!(err, DiligenceError::Physics(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: DiligenceError = json_err.into();
        assert!(err.to_string().starts_with("Serialization error:"));
    }
}
