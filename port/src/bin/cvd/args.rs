//! Command-line argument definitions and type conversions

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cvd_wasm::difficulty::Condition;
use cvd_wasm::preset::OsPreset;

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum ConditionArg {
    /// Unfiltered colors (OS-preset baseline)
    Ios,
    /// Adaptive filter
    #[default]
    Aui,
}

impl ConditionArg {
    pub fn to_condition(self) -> Condition {
        match self {
            ConditionArg::Ios => Condition::Ios,
            ConditionArg::Aui => Condition::Aui,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PresetArg {
    /// Red-weak channel mix
    Protanopia,
    /// Green-weak channel mix
    Deuteranopia,
    /// Blue-weak channel mix
    Tritanopia,
    /// Rec.601 luma
    Grayscale,
}

impl PresetArg {
    pub fn to_preset(self) -> OsPreset {
        match self {
            PresetArg::Protanopia => OsPreset::Protanopia,
            PresetArg::Deuteranopia => OsPreset::Deuteranopia,
            PresetArg::Tritanopia => OsPreset::Tritanopia,
            PresetArg::Grayscale => OsPreset::Grayscale,
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "cvd")]
#[command(author, version, about = "Adaptive color filter model for CVD interface studies", long_about = None)]
pub struct Args {
    /// Model config file (TOML, or JSON with a .json extension)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the filter parameter set and print it as JSON
    Params(ModelInput),
    /// Adapt one or more #rrggbb colors
    Apply {
        #[command(flatten)]
        input: ModelInput,

        /// Study condition; ios prints the colors unchanged
        #[arg(long, value_enum, default_value_t = ConditionArg::Aui)]
        condition: ConditionArg,

        /// Colors to adapt
        #[arg(required = true)]
        colors: Vec<String>,
    },
    /// Summarize a metrics JSON file (keyed by condition, or a list of task records)
    Summarize {
        /// Metrics file
        metrics: PathBuf,
    },
    /// Results dashboard figures: per-phase trial summary and per-condition task metrics
    Results {
        /// Trial log JSON file (entries with ms, correct, phase)
        #[arg(long)]
        trials: Option<PathBuf>,

        /// Metrics JSON file keyed by condition
        #[arg(long)]
        metrics: Option<PathBuf>,
    },
    /// Print the eight-hue preview wheel with adapted colors
    Wheel(ModelInput),
    /// Apply a fixed OS preset to one or more colors
    Preset {
        /// Preset to apply
        #[arg(value_enum)]
        preset: PresetArg,

        /// Colors to transform
        #[arg(required = true)]
        colors: Vec<String>,
    },
}

/// Inputs to the parameter derivation
#[derive(ClapArgs, Debug, Clone)]
pub struct ModelInput {
    /// L cone sensitivity (0-1), defaults to the configured initial value
    #[arg(long)]
    pub l: Option<f64>,

    /// M cone sensitivity (0-1)
    #[arg(long)]
    pub m: Option<f64>,

    /// S cone sensitivity (0-1)
    #[arg(long)]
    pub s: Option<f64>,

    /// Difficulty summary JSON file; uses the default summary if omitted
    #[arg(long, conflicts_with = "metrics")]
    pub difficulty: Option<PathBuf>,

    /// Metrics JSON file to summarize into a difficulty summary
    #[arg(long)]
    pub metrics: Option<PathBuf>,
}
