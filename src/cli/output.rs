//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, PhishGuardArgs};
use crate::detector::{ModelInfo, UrlVerdict};
use crate::error::Result;
use crate::features::FeatureVector;
use crate::ml::ClassificationMetrics;

/// Result structure for training.
#[derive(Debug, Serialize)]
pub struct TrainingResult {
    pub model_path: String,
    pub duration_ms: u64,
    pub metrics: ClassificationMetrics,
}

/// Result structure for feature extraction.
#[derive(Debug, Serialize)]
pub struct ExtractionResult {
    pub url: String,
    pub features: FeatureVector,
}

/// Values the CLI knows how to print for a human reader.
pub trait HumanOutput {
    fn print_human(&self);
}

impl HumanOutput for TrainingResult {
    fn print_human(&self) {
        println!("Training Results:");
        println!("═════════════════");
        print_metrics(&self.metrics);
        println!();
        println!("Model saved to: {}", self.model_path);
        println!("Training time: {}ms", self.duration_ms);
    }
}

impl HumanOutput for UrlVerdict {
    fn print_human(&self) {
        println!("URL: {}", self.url);
        println!(
            "Prediction: {} ({})",
            self.prediction.index(),
            self.prediction
        );
        println!("Confidence: {:.4}", self.confidence);
        println!("Phishing: {}", if self.is_phishing { "yes" } else { "no" });
    }
}

impl HumanOutput for ExtractionResult {
    fn print_human(&self) {
        println!("Features for {}:", self.url);
        println!("─────────────");
        let width = self.features.names().map(str::len).max().unwrap_or(0);
        for (name, value) in self.features.iter() {
            println!("{name:<width$}  {}", format_number(value));
        }
    }
}

impl HumanOutput for ModelInfo {
    fn print_human(&self) {
        match self {
            ModelInfo::NotTrained => println!("Status: not_trained"),
            ModelInfo::Trained(info) => {
                println!("Model Information:");
                println!("══════════════════");
                println!("Status: trained");
                println!("Model type: {}", info.model_type);
                if let Some(estimators) = info.estimator_count {
                    println!("Estimators: {estimators}");
                }
                println!("Features: {}", info.feature_count);
                println!("Layout version: {}", info.layout_version);
                println!("Trained at: {}", info.trained_at.to_rfc3339());
                println!("Training samples: {}", info.training_samples);
                println!();
                print_metrics(&info.metrics);
                println!();
                println!("Feature names:");
                for name in &info.feature_names {
                    println!("  {name}");
                }
            }
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(result: &T, args: &PhishGuardArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &PhishGuardArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn print_metrics(metrics: &ClassificationMetrics) {
    println!("Accuracy:  {:.4}", metrics.accuracy);
    println!("Precision: {:.4}", metrics.precision);
    println!("Recall:    {:.4}", metrics.recall);
    println!("F1 Score:  {:.4}", metrics.f1_score);
}

/// Print integral feature values without a fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.4}")
    }
}
