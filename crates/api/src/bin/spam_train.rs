// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Offline model training
//!
//! Trains the configured engine on the built-in corpus or a JSON corpus file,
//! saves the model, and prints an evaluation report followed by predictions
//! for the showcase texts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spam_predictor::{
    EngineKind, SpamLabel, SpamPredictor, SpamPredictorConfig, TrainingExample, demo_examples,
    sample_corpus,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Train and evaluate a spam classifier model
#[derive(Parser, Debug)]
#[command(name = "spam-train", version, about)]
struct Args {
    /// Where the trained model is written
    #[arg(
        short,
        long,
        env = "SPAM_MODEL_PATH",
        default_value = "models/spam_classifier.json"
    )]
    model: PathBuf,

    /// Engine to train (statistical or rules); overrides the configuration file
    #[arg(short, long)]
    engine: Option<EngineKind>,

    /// YAML or JSON engine configuration
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// JSON array of `{"text", "label"}` examples; defaults to the built-in corpus
    #[arg(long, value_name = "CORPUS_FILE")]
    corpus: Option<PathBuf>,
}

fn load_corpus(path: Option<&PathBuf>) -> Result<Vec<TrainingExample>> {
    let Some(path) = path else {
        return Ok(sample_corpus());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid corpus {}", path.display()))
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SpamPredictorConfig::from_file(path)?,
        None => SpamPredictorConfig::default(),
    };
    if let Some(engine) = args.engine {
        config.engine = engine;
    }

    let corpus = load_corpus(args.corpus.as_ref())?;
    info!(engine = %config.engine, examples = corpus.len(), "Training model");

    let mut predictor = SpamPredictor::new(config)?;
    predictor.train(&corpus)?;
    predictor
        .save(&args.model)
        .with_context(|| format!("failed to save model to {}", args.model.display()))?;
    println!("Model saved to {}", args.model.display());

    let report = predictor.evaluate(&corpus)?;
    println!();
    println!(
        "Training accuracy: {}/{} ({:.1}%)",
        report.correct,
        report.total,
        report.accuracy * 100.0
    );
    for label in SpamLabel::ALL {
        let counts = report.label(label);
        println!("  {label:<4} {}/{}", counts.correct, counts.total);
    }

    let examples = demo_examples();
    println!();
    for (expected, texts) in [(SpamLabel::Spam, examples.spam), (SpamLabel::Ham, examples.ham)] {
        for text in texts {
            let result = predictor.predict(text)?;
            let mark = if result.prediction() == expected { ' ' } else { '!' };
            println!(
                "{mark} {:<4} {:.3}  {text}",
                result.prediction(),
                result.confidence()
            );
        }
    }

    Ok(())
}
