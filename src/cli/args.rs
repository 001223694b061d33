//! Command line argument parsing for the PhishGuard CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// PhishGuard - phishing URL detection from lexical URL features
#[derive(Parser, Debug, Clone)]
#[command(name = "phishguard")]
#[command(about = "Classify URLs as legitimate or phishing")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PhishGuardArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Model file to persist to and restore from
    #[arg(long, value_name = "PATH", env = "PHISHGUARD_MODEL_PATH", global = true)]
    pub model_path: Option<PathBuf>,

    /// Classifier configuration file (JSON)
    #[arg(long, value_name = "FILE", env = "PHISHGUARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PhishGuardArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model and persist it
    Train(TrainArgs),

    /// Classify a URL with the persisted model
    Predict(PredictArgs),

    /// Print the features extracted from a URL
    Extract(ExtractArgs),

    /// Describe the persisted model
    Info,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Training data file: JSON array of {"url": ..., "label": 0|1}.
    /// The built-in corpus is used when omitted.
    #[arg(short, long, value_name = "DATA_FILE")]
    pub data: Option<PathBuf>,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// URL to classify
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Arguments for feature extraction
#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    /// URL to featurize
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
