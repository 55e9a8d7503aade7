//! Nomen training CLI
//!
//! Trains, evaluates and queries GRU surname classifiers.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use candle_core::Device;
use clap::{Parser, Subcommand};
use nomen_core::CorpusLoader;
use nomen_trainer::{OptimizerKind, Predictor, TrainConfig, evaluate, run_training};
use tracing::info;

/// CLI arguments
#[derive(Parser)]
#[command(name = "nomen-train")]
#[command(about = "Train and query GRU surname classifiers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a classifier on one text file per category
    Train {
        /// Glob pattern matching the category files
        #[arg(short, long, env = "NOMEN_DATA", default_value = "data/names/*.txt")]
        data: String,

        /// Directory the trained model is written to
        #[arg(short, long, env = "NOMEN_MODEL_DIR", default_value = "models/nomen")]
        output: PathBuf,

        /// JSON training configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the number of epochs
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Override the shuffle and split seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Override the learning rate
        #[arg(long)]
        learning_rate: Option<f64>,

        /// Use AdamW instead of the configured optimizer
        #[arg(long)]
        adamw: bool,
    },
    /// Report accuracy of a trained model on a corpus
    Evaluate {
        /// Trained model directory
        #[arg(short, long, env = "NOMEN_MODEL_DIR", default_value = "models/nomen")]
        model: PathBuf,

        /// Glob pattern matching the category files
        #[arg(short, long, env = "NOMEN_DATA", default_value = "data/names/*.txt")]
        data: String,

        /// Names per forward pass
        #[arg(short, long, default_value_t = 64)]
        batch_size: usize,
    },
    /// Print the most likely origins of each name
    Predict {
        /// Trained model directory
        #[arg(short, long, env = "NOMEN_MODEL_DIR", default_value = "models/nomen")]
        model: PathBuf,

        /// Number of categories to show per name
        #[arg(short = 'k', long, default_value_t = 3)]
        top_k: usize,

        /// Surnames to classify
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let device = Device::Cpu;

    match cli.command {
        Commands::Train {
            data,
            output,
            config,
            epochs,
            seed,
            learning_rate,
            adamw,
        } => {
            let mut train_config = match config {
                Some(path) => TrainConfig::from_file(path)?,
                None => TrainConfig::default(),
            };
            if let Some(epochs) = epochs {
                train_config = train_config.with_epochs(epochs);
            }
            if let Some(seed) = seed {
                train_config = train_config.with_seed(seed);
            }
            if let Some(lr) = learning_rate {
                train_config = train_config.with_learning_rate(lr);
            }
            if adamw {
                train_config = train_config.with_optimizer(OptimizerKind::AdamW);
            }

            info!("Starting GRU training on {}", data);
            let report = run_training(&data, &output, train_config)?;
            if let Some(last) = report.history.last() {
                println!("Final loss: {:.4}", last.mean_loss);
            }
            if let Some(eval) = report.evaluation {
                println!(
                    "Held-out accuracy: {:.2}% ({}/{})",
                    eval.accuracy() * 100.0,
                    eval.correct,
                    eval.total
                );
            }
            println!("Model saved to {}", output.display());
        }
        Commands::Evaluate {
            model,
            data,
            batch_size,
        } => {
            let predictor = Predictor::load(&model, &device)?;
            let corpus = CorpusLoader::new()
                .with_alphabet(predictor.codec().alphabet().clone())
                .load(&data)?;
            ensure!(
                corpus.categories() == predictor.categories(),
                "corpus categories {:?} do not match the model's {:?}",
                corpus.categories().names(),
                predictor.categories().names()
            );

            let indices: Vec<usize> = (0..corpus.len()).collect();
            let eval = evaluate(predictor.model(), &corpus, &indices, batch_size)
                .context("evaluation failed")?;

            println!(
                "Accuracy: {:.2}% ({}/{})",
                eval.accuracy() * 100.0,
                eval.correct,
                eval.total
            );
            for (index, row) in eval.normalized_confusion().iter().enumerate() {
                let name = corpus.categories().name(index).unwrap_or("?");
                let hit = row.get(index).copied().unwrap_or(0.0);
                println!("  {name:<12} {:.2}%", hit * 100.0);
            }
        }
        Commands::Predict {
            model,
            top_k,
            names,
        } => {
            let predictor = Predictor::load(&model, &device)?;
            for name in &names {
                println!("> {name}");
                for prediction in predictor.predict(name, top_k)? {
                    println!(
                        "  ({:.2}) {}",
                        prediction.probability, prediction.category
                    );
                }
            }
        }
    }

    Ok(())
}
