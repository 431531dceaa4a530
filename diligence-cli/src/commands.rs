//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use crate::EfficiencyCommand;
use anyhow::Context;
use diligence_core::efficiency::{
    BatteryParams, BraytonParams, Chemistry, DetailedBalanceParams, ElectrolyzerParams,
    FuelCellParams, HeatEngineParams, HeatPumpParams, PumpedHydroParams, RankineParams,
    WindTurbineParams, validate_claimed_efficiency_with,
};
use diligence_core::{
    AnalysisStage, AssessmentSummary, ClaimValidator, DataContext, EfficiencyResult, EngineConfig,
    MetricKey, MetricsExtractor, Technology, efficiency, reference,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    config: EngineConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Extract {
            stage,
            file,
            metric,
        } => handle_extract(&stage, &file, metric.as_deref(), &config),
        Commands::Normalize {
            stage,
            file,
            technology,
        } => handle_normalize(&stage, &file, technology.as_deref(), &config),
        Commands::Validate { claims, data } => handle_validate(&claims, data.as_deref(), &config),
        Commands::Assess {
            stages,
            claims,
            data,
            technology,
        } => {
            handle_assess(
                &stages,
                claims.as_deref(),
                data.as_deref(),
                technology.as_deref(),
                &config,
            )
            .await
        }
        Commands::Efficiency { claim, model } => handle_efficiency(model, claim, &config),
        Commands::Benchmarks { technology } => handle_benchmarks(technology.as_deref()),
        Commands::Config { action } => handle_config(action, workspace, &config),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "loaded document");
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Claims may be a bare array or wrapped in `{"claims": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClaimsFile {
    List(Vec<String>),
    Wrapped { claims: Vec<String> },
}

fn read_claims(path: &Path) -> anyhow::Result<Vec<String>> {
    let file: ClaimsFile = serde_json::from_value(read_json(path)?).with_context(|| {
        format!(
            "{} must hold an array of claim strings or an object with a `claims` array",
            path.display()
        )
    })?;
    Ok(match file {
        ClaimsFile::List(claims) | ClaimsFile::Wrapped { claims } => claims,
    })
}

fn read_data(path: Option<&Path>) -> anyhow::Result<DataContext> {
    match path {
        Some(path) => serde_json::from_value(read_json(path)?).with_context(|| {
            format!("{} must be an object of numeric values", path.display())
        }),
        None => Ok(DataContext::new()),
    }
}

fn parse_technology(technology: Option<&str>) -> anyhow::Result<Option<Technology>> {
    technology.map(str::parse::<Technology>).transpose().map_err(Into::into)
}

/// Split a `STAGE=FILE` argument.
fn parse_stage_arg(arg: &str) -> anyhow::Result<(AnalysisStage, PathBuf)> {
    let (stage, file) = arg
        .split_once('=')
        .with_context(|| format!("Expected STAGE=FILE, got '{arg}'"))?;
    Ok((stage.parse()?, PathBuf::from(file)))
}

fn handle_extract(
    stage: &str,
    file: &Path,
    metric: Option<&str>,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let stage: AnalysisStage = stage.parse()?;
    let doc = read_json(file)?;
    let extractor = MetricsExtractor::new(config.extraction.clone());
    match metric {
        Some(metric) => {
            let key: MetricKey = metric.parse()?;
            print_json(&extractor.extract(stage, &doc, key))
        }
        None => print_json(&extractor.extract_core(stage, &doc)),
    }
}

fn handle_normalize(
    stage: &str,
    file: &Path,
    technology: Option<&str>,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let stage: AnalysisStage = stage.parse()?;
    let technology = parse_technology(technology)?;
    let doc = read_json(file)?;
    let normalized = MetricsExtractor::new(config.extraction.clone()).normalize(stage, &doc, technology);
    for warning in normalized.record.warnings() {
        info!(stage = %stage, "{warning}");
    }
    print_json(&normalized)
}

fn handle_validate(
    claims: &Path,
    data: Option<&Path>,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let claims = read_claims(claims)?;
    let data = read_data(data)?;
    let validator = ClaimValidator::new(config.validation.clone());
    let results = validator.validate_batch(&claims, &data);
    let summary = validator.summarize(&results);
    print_json(&json!({ "results": results, "summary": summary }))
}

async fn handle_assess(
    stages: &[String],
    claims: Option<&Path>,
    data: Option<&Path>,
    technology: Option<&str>,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let technology = parse_technology(technology)?;
    let mut documents = Vec::with_capacity(stages.len());
    for arg in stages {
        let (stage, file) = parse_stage_arg(arg)?;
        documents.push((stage, read_json(&file)?));
    }
    let claims = match claims {
        Some(path) => read_claims(path)?,
        None => Vec::new(),
    };
    let data = read_data(data)?;

    let extractor = Arc::new(MetricsExtractor::new(config.extraction.clone()));
    let validator = Arc::new(ClaimValidator::new(config.validation.clone()));

    let normalized =
        diligence_core::concurrent::normalize_stages_concurrent(extractor, documents, technology)
            .await?;
    let results = diligence_core::concurrent::validate_claims_concurrent(
        validator,
        claims,
        Arc::new(data),
    )
    .await?;

    let records: Vec<_> = normalized.iter().map(|n| n.record.clone()).collect();
    let summary = AssessmentSummary::build(&records, &results);
    info!(
        overall = summary.overall_score,
        tier = summary.overall_tier.as_str(),
        "assessment complete"
    );
    print_json(&json!({
        "stages": normalized,
        "claims": results,
        "summary": summary,
    }))
}

fn run_model(model: EfficiencyCommand) -> anyhow::Result<EfficiencyResult> {
    let result = match model {
        EfficiencyCommand::Carnot { hot, cold } => efficiency::carnot(&HeatEngineParams {
            hot_k: hot,
            cold_k: cold,
        }),
        EfficiencyCommand::Rankine { boiler, condenser } => {
            efficiency::rankine(&RankineParams::new(boiler, condenser))
        }
        EfficiencyCommand::Brayton {
            pressure_ratio,
            turbine_inlet,
        } => efficiency::brayton(&BraytonParams::new(pressure_ratio, turbine_inlet)),
        EfficiencyCommand::Solar {
            bandgap,
            concentration,
        } => {
            let mut params = DetailedBalanceParams::new(bandgap);
            params.concentration = concentration;
            efficiency::detailed_balance(&params)
        }
        EfficiencyCommand::Wind { speed, diameter } => {
            efficiency::wind_turbine(&WindTurbineParams::new(speed, diameter))
        }
        EfficiencyCommand::Electrolyzer { voltage } => {
            efficiency::electrolyzer(&ElectrolyzerParams::new(voltage))
        }
        EfficiencyCommand::FuelCell { voltage } => {
            efficiency::fuel_cell(&FuelCellParams::new(voltage))
        }
        EfficiencyCommand::Battery { chemistry } => {
            let chemistry: Chemistry = chemistry.parse()?;
            efficiency::battery_round_trip(&BatteryParams::new(chemistry))
        }
        EfficiencyCommand::HeatPump { sink, source } => {
            efficiency::heat_pump_cop(&HeatPumpParams::new(sink, source))
        }
        EfficiencyCommand::PumpedHydro {
            head,
            penstock_length,
        } => efficiency::pumped_hydro(&PumpedHydroParams::new(head, penstock_length)),
    };
    Ok(result?)
}

fn handle_efficiency(
    model: EfficiencyCommand,
    claim: Option<f64>,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    let result = run_model(model)?;
    let verdict = claim.map(|claimed| {
        validate_claimed_efficiency_with(
            claimed,
            &result,
            config.validation.margin_of_error,
            config.validation.typical_excess_tolerance,
        )
    });
    print_json(&json!({ "result": result, "verdict": verdict }))
}

fn handle_benchmarks(technology: Option<&str>) -> anyhow::Result<()> {
    match parse_technology(technology)? {
        Some(technology) => print_json(reference::benchmarks(technology)),
        None => print_json(reference::all_benchmarks()),
    }
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config: &EngineConfig,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = diligence_core::config::workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let toml_str = toml::to_string_pretty(&EngineConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            println!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_claims_accept_both_layouts() {
        let dir = tempfile::tempdir().unwrap();
        let bare = write(dir.path(), "bare.json", r#"["a", "b"]"#);
        let wrapped = write(dir.path(), "wrapped.json", r#"{"claims": ["a", "b"]}"#);
        assert_eq!(read_claims(&bare).unwrap(), vec!["a", "b"]);
        assert_eq!(read_claims(&wrapped).unwrap(), vec!["a", "b"]);

        let bad = write(dir.path(), "bad.json", r#"{"claims": [1, 2]}"#);
        assert!(read_claims(&bad).is_err());
    }

    #[test]
    fn test_data_context_from_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "data.json", r#"{"hot_temperature_k": 900}"#);
        let data = read_data(Some(&path)).unwrap();
        assert_eq!(data.get("hot_temperature_k"), Some(900.0));
        assert!(read_data(None).unwrap().is_empty());
    }

    #[test]
    fn test_stage_arg_parsing() {
        let (stage, file) = parse_stage_arg("tea=reports/tea.json").unwrap();
        assert_eq!(stage, AnalysisStage::TeaAnalysis);
        assert_eq!(file, PathBuf::from("reports/tea.json"));
        assert!(parse_stage_arg("tea-analysis").is_err());
        assert!(parse_stage_arg("astrology=x.json").is_err());
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "broken.json", "{not json");
        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_model_errors_propagate() {
        let err = run_model(EfficiencyCommand::Carnot {
            hot: 300.0,
            cold: 400.0,
        })
        .unwrap_err();
        assert!(err.to_string().contains("must be greater than"));

        let result = run_model(EfficiencyCommand::Battery {
            chemistry: "lfp".to_string(),
        })
        .unwrap();
        assert!(result.value <= result.theoretical_max);
    }

    #[test]
    fn test_config_init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::default();
        handle_config(ConfigAction::Init, dir.path(), &config).unwrap();
        let path = dir.path().join(".diligence").join("config.toml");
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(diligence_core::config::parse_config(&written).unwrap(), config);
        // Second init leaves the file alone.
        std::fs::write(&path, "# edited\n").unwrap();
        handle_config(ConfigAction::Init, dir.path(), &config).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited\n");
    }
}
