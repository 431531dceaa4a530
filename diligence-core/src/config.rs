//! Engine tolerances: how far extraction searches a stage document and how
//! strictly claims are checked against physics limits.
//!
//! An analyst keeps defaults in their user config directory; each engagement
//! workspace can override them in `.diligence/config.toml`.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

/// Top-level configuration for the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub extraction: ExtractionConfig,
    pub validation: ValidationConfig,
}

/// Metrics extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Hard depth cap for the recursive deep search.
    pub max_search_depth: usize,
    /// Maximum number of nodes the deep search may visit per metric.
    pub max_search_nodes: usize,
    /// Deep search only: aliases shorter than this must match a key exactly.
    /// `0` lets every alias match as a substring.
    pub min_fuzzy_alias_len: usize,
    /// Whether absent metrics may be derived from already-extracted ones.
    pub derive_missing: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_search_depth: 10,
            max_search_nodes: 10_000,
            min_fuzzy_alias_len: 0,
            derive_missing: true,
        }
    }
}

/// Claim validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Fractional tolerance above a model's theoretical maximum (0.05 = 5%).
    pub margin_of_error: f64,
    /// How far a claim may exceed a model's typical value (0.5 = 50%).
    pub typical_excess_tolerance: f64,
    /// Cap on the priority data requests surfaced by a summary.
    pub max_priority_requests: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            margin_of_error: 0.05,
            typical_excess_tolerance: 0.5,
            max_priority_requests: 5,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration, returning a list of problems (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.extraction.max_search_depth == 0 {
            problems.push("extraction.max_search_depth must be at least 1".to_string());
        }
        if self.extraction.max_search_depth > 64 {
            problems.push(format!(
                "extraction.max_search_depth {} exceeds the supported maximum of 64",
                self.extraction.max_search_depth
            ));
        }
        if self.extraction.max_search_nodes == 0 {
            problems.push("extraction.max_search_nodes must be at least 1".to_string());
        }
        let margin = self.validation.margin_of_error;
        if !margin.is_finite() || !(0.0..=1.0).contains(&margin) {
            problems.push(format!(
                "validation.margin_of_error must be within [0, 1], got {margin}"
            ));
        }
        let excess = self.validation.typical_excess_tolerance;
        if !excess.is_finite() || excess < 0.0 {
            problems.push(format!(
                "validation.typical_excess_tolerance must be non-negative, got {excess}"
            ));
        }
        if self.validation.max_priority_requests == 0 {
            problems.push("validation.max_priority_requests must be at least 1".to_string());
        }
        problems
    }

    /// Validate and convert the first problem into a [`ConfigError`].
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        match self.validate().into_iter().next() {
            Some(message) => Err(ConfigError::Invalid { message }),
            None => Ok(()),
        }
    }
}

/// Prefix for environment overrides; nested keys are split on `__`, so
/// `DILIGENCE_EXTRACTION__MAX_SEARCH_NODES=50000` sets `extraction.max_search_nodes`.
pub const ENV_PREFIX: &str = "DILIGENCE_";

/// Where a workspace keeps its engine settings.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".diligence").join("config.toml")
}

/// Existing TOML files to layer, lowest priority first.
///
/// The per-user file carries analyst-wide tolerances; a workspace file lets one
/// diligence engagement tighten search limits or the validation margin.
pub fn config_file_layers(workspace: Option<&Path>) -> Vec<PathBuf> {
    let user = directories::ProjectDirs::from("dev", "diligence", "diligence")
        .map(|dirs| dirs.config_dir().join("config.toml"));
    let local = workspace.map(workspace_config_path);
    user.into_iter().chain(local).filter(|path| path.is_file()).collect()
}

/// Load the engine configuration.
///
/// Built-in defaults, then every file from [`config_file_layers`], then
/// `DILIGENCE_*` environment variables, then `overrides`. Later layers win.
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&EngineConfig>,
) -> Result<EngineConfig, Box<figment::Error>> {
    let files = config_file_layers(workspace);
    debug!(layers = files.len(), "loading engine configuration");

    let figment = files.iter().fold(
        Figment::from(Serialized::defaults(EngineConfig::default())),
        |figment, path| figment.merge(Toml::file(path)),
    );
    let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
    let figment = match overrides {
        Some(overrides) => figment.merge(Serialized::defaults(overrides)),
        None => figment,
    };

    figment.extract().map_err(Box::new)
}

/// Parse a configuration from a TOML string on top of the defaults.
pub fn parse_config(toml_str: &str) -> Result<EngineConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.extraction.max_search_depth, 10);
        assert_eq!(config.extraction.max_search_nodes, 10_000);
        assert_eq!(config.extraction.min_fuzzy_alias_len, 0);
        assert!((config.validation.margin_of_error - 0.05).abs() < f64::EPSILON);
        assert_eq!(config.validation.max_priority_requests, 5);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
[validation]
margin_of_error = 0.1
"#,
        )
        .unwrap();
        assert!((config.validation.margin_of_error - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.validation.max_priority_requests, 5);
        assert_eq!(config.extraction.max_search_depth, 10);
    }

    #[test]
    fn test_parse_config_error() {
        let err = parse_config("[validation\nmargin").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.extraction.max_search_depth = 0;
        config.validation.margin_of_error = 2.0;
        let problems = config.validate();
        assert_eq!(problems.len(), 2);
        assert!(config.ensure_valid().is_err());
    }

    #[test]
    fn test_load_config_with_overrides() {
        let mut overrides = EngineConfig::default();
        overrides.extraction.max_search_depth = 4;
        overrides.validation.max_priority_requests = 3;

        let config = load_config(None, Some(&overrides)).unwrap();
        assert_eq!(config.extraction.max_search_depth, 4);
        assert_eq!(config.validation.max_priority_requests, 3);
    }

    #[test]
    fn test_load_config_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let diligence_dir = dir.path().join(".diligence");
        std::fs::create_dir_all(&diligence_dir).unwrap();
        std::fs::write(
            diligence_dir.join("config.toml"),
            r#"
[extraction]
max_search_depth = 6
"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.extraction.max_search_depth, 6);
        assert_eq!(config.extraction.max_search_nodes, 10_000);
    }

    #[test]
    fn test_workspace_layer_is_last_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!config_file_layers(Some(dir.path())).contains(&workspace_config_path(dir.path())));

        let path = workspace_config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[validation]\nmax_priority_requests = 2\n").unwrap();
        assert_eq!(config_file_layers(Some(dir.path())).last(), Some(&path));
    }

    #[test]
    fn test_overrides_beat_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = workspace_config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[extraction]\nmax_search_nodes = 500\n").unwrap();

        let mut overrides = EngineConfig::default();
        overrides.extraction.max_search_nodes = 900;
        let config = load_config(Some(dir.path()), Some(&overrides)).unwrap();
        assert_eq!(config.extraction.max_search_nodes, 900);
    }
}
