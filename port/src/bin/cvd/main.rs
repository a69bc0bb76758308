//! CVD - adaptive color filter command-line tool
//!
//! Derives filter parameters from cone sensitivities and task metrics, and
//! runs colors through the adaptive filter or a fixed OS preset.
//! Results go to stdout (JSON or one color per line); diagnostics go to stderr.

mod args;

use clap::Parser;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use args::{Args, Command, ModelInput};
use cvd_wasm::difficulty::{self, DifficultySummary, StudyMetrics};
use cvd_wasm::palette;
use cvd_wasm::results::{self, TrialRun};
use cvd_wasm::{AdaptiveFilter, ConeSensitivity, ModelConfig};

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn load_metrics_summary(path: &Path, config: &ModelConfig) -> Result<DifficultySummary, String> {
    let records = difficulty::parse_metrics_json(&read_file(path)?)
        .map_err(|e| format!("Invalid metrics in {}: {}", path.display(), e))?;
    info!(records = records.len(), path = %path.display(), "summarizing metrics");
    Ok(difficulty::summarize_difficulty_with(&config.difficulty, &records))
}

fn build_filter(input: &ModelInput, config: &ModelConfig) -> Result<AdaptiveFilter, String> {
    let initial = config.calibration.initial;
    let sensitivity = ConeSensitivity::new(
        input.l.unwrap_or(initial.l),
        input.m.unwrap_or(initial.m),
        input.s.unwrap_or(initial.s),
    );

    let difficulty = if let Some(path) = &input.difficulty {
        serde_json::from_str(&read_file(path)?)
            .map_err(|e| format!("Invalid difficulty summary in {}: {}", path.display(), e))?
    } else if let Some(path) = &input.metrics {
        load_metrics_summary(path, config)?
    } else {
        config.difficulty.fallback
    };

    debug!(?sensitivity, ?difficulty, "model inputs");
    Ok(AdaptiveFilter::from_inputs(&sensitivity, &difficulty, config))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => ModelConfig::load_from_file(path).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => ModelConfig::default(),
    };

    match args.command {
        Command::Params(input) => {
            let filter = build_filter(&input, &config)?;
            print_json(filter.parameters())?;
        }
        Command::Apply { input, condition, colors } => {
            let filter = build_filter(&input, &config)?;
            let condition = condition.to_condition();
            for color in &colors {
                println!("{}", palette::apply_for_condition(color, condition, filter.parameters()));
            }
        }
        Command::Summarize { metrics } => {
            print_json(&load_metrics_summary(&metrics, &config)?)?;
        }
        Command::Results { trials, metrics } => {
            if trials.is_none() && metrics.is_none() {
                return Err("results needs --trials and/or --metrics".to_string());
            }
            let mut report = serde_json::Map::new();
            if let Some(path) = &trials {
                let history: Vec<TrialRun> = serde_json::from_str(&read_file(path)?)
                    .map_err(|e| format!("Invalid trial log in {}: {}", path.display(), e))?;
                let phases = serde_json::to_value(results::summarize_runs(&history)).map_err(|e| e.to_string())?;
                report.insert("phases".to_string(), phases);
            }
            if let Some(path) = &metrics {
                let study: StudyMetrics = serde_json::from_str(&read_file(path)?)
                    .map_err(|e| format!("Invalid metrics in {}: {}", path.display(), e))?;
                let conditions = serde_json::to_value(results::compare_conditions(&study)).map_err(|e| e.to_string())?;
                report.insert("conditions".to_string(), conditions);
            }
            print_json(&report)?;
        }
        Command::Wheel(input) => {
            let filter = build_filter(&input, &config)?;
            for entry in palette::color_wheel(filter.parameters()) {
                println!("{} -> {}", entry.original, entry.adapted);
            }
        }
        Command::Preset { preset, colors } => {
            let preset = preset.to_preset();
            debug!(preset = preset.display_name(), "applying preset");
            for color in &colors {
                println!("{}", preset.apply(color));
            }
        }
    }

    Ok(())
}
