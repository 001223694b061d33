//! Command implementations for the PhishGuard CLI.

use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ClassifierConfig;
use crate::dataset;
use crate::detector::UrlClassifier;
use crate::error::{PhishGuardError, Result};
use crate::features;

/// Execute a CLI command.
pub fn execute_command(args: PhishGuardArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args.clone(), &args),
        Command::Predict(predict_args) => predict(predict_args.clone(), &args),
        Command::Extract(extract_args) => extract(extract_args.clone(), &args),
        Command::Info => info(&args),
    }
}

/// Build the classifier configuration from `--config` and `--model-path`.
pub fn resolve_config(args: &PhishGuardArgs) -> Result<ClassifierConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            ClassifierConfig::load(path)?
        }
        None => ClassifierConfig::default(),
    };
    if let Some(model_path) = &args.model_path {
        config.model_path = model_path.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Train a model and persist it.
fn train(args: TrainArgs, cli_args: &PhishGuardArgs) -> Result<()> {
    let config = resolve_config(cli_args)?;

    let examples = match &args.data {
        Some(path) => {
            log::info!("Loading training data from {}", path.display());
            Some(dataset::load_training_data(path)?)
        }
        None => None,
    };

    let classifier = UrlClassifier::new(config);
    let start_time = Instant::now();
    let metrics = classifier.train(examples)?;
    let duration = start_time.elapsed();

    output_result(
        &TrainingResult {
            model_path: classifier.config().model_path.display().to_string(),
            duration_ms: duration.as_millis() as u64,
            metrics,
        },
        cli_args,
    )
}

/// Classify a URL with the persisted model.
fn predict(args: PredictArgs, cli_args: &PhishGuardArgs) -> Result<()> {
    let classifier = open_classifier(cli_args)?;
    if !classifier.is_trained() {
        return Err(PhishGuardError::model_not_ready(format!(
            "no usable model at {}; run `phishguard train` first",
            classifier.config().model_path.display()
        )));
    }

    let verdict = classifier.classify_url(&args.url)?;
    output_result(&verdict, cli_args)
}

/// Print the features extracted from a URL.
fn extract(args: ExtractArgs, cli_args: &PhishGuardArgs) -> Result<()> {
    let features = features::extract(&args.url)?;
    output_result(
        &ExtractionResult {
            url: args.url,
            features,
        },
        cli_args,
    )
}

/// Describe the persisted model.
fn info(cli_args: &PhishGuardArgs) -> Result<()> {
    let classifier = open_classifier(cli_args)?;
    output_result(&classifier.describe(), cli_args)
}

fn open_classifier(cli_args: &PhishGuardArgs) -> Result<UrlClassifier> {
    let config = resolve_config(cli_args)?;
    Ok(UrlClassifier::open(config))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;

    #[test]
    fn test_resolve_config_model_path_override() {
        let args = PhishGuardArgs::try_parse_from([
            "phishguard",
            "--model-path",
            "/tmp/override.json",
            "info",
        ])
        .unwrap();

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.model_path, PathBuf::from("/tmp/override.json"));
        assert_eq!(config.forest.n_estimators, 100);
    }

    #[test]
    fn test_resolve_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{"forest": {"n_estimators": 12}}"#).unwrap();

        let args = PhishGuardArgs::try_parse_from([
            "phishguard",
            "--config",
            config_path.to_str().unwrap(),
            "info",
        ])
        .unwrap();

        let config = resolve_config(&args).unwrap();
        assert_eq!(config.forest.n_estimators, 12);
    }

    #[test]
    fn test_predict_without_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("missing.json");
        let args = PhishGuardArgs::try_parse_from([
            "phishguard",
            "-q",
            "--model-path",
            model_path.to_str().unwrap(),
            "predict",
            "https://example.com",
        ])
        .unwrap();

        assert!(matches!(
            execute_command(args),
            Err(PhishGuardError::ModelNotReady(_))
        ));
    }

    #[test]
    fn test_train_then_predict() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.json");
        let model_arg = model_path.to_str().unwrap();

        let train = PhishGuardArgs::try_parse_from([
            "phishguard",
            "-f",
            "json",
            "--model-path",
            model_arg,
            "train",
        ])
        .unwrap();
        execute_command(train).unwrap();
        assert!(model_path.exists());

        let predict = PhishGuardArgs::try_parse_from([
            "phishguard",
            "-f",
            "json",
            "--model-path",
            model_arg,
            "predict",
            "http://secure-login-3.tk/verify",
        ])
        .unwrap();
        execute_command(predict).unwrap();
    }
}
