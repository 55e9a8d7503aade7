//! # Nomen Trainer
//!
//! GRU surname classifier on top of `nomen-core`. Provides the classifier,
//! an explicit training session, the train / evaluate / predict loops and
//! model directories for saving and reloading trained weights.

pub mod artifact;
pub mod config;
pub mod model;
pub mod session;
pub mod split;
pub mod trainer;

pub use artifact::{ModelMetadata, Predictor, save_model};
pub use config::{OptimizerKind, TrainConfig};
pub use model::{ModelDims, NameClassifier};
pub use session::TrainingSession;
pub use split::{Split, split_indices};
pub use trainer::{EpochStats, Evaluation, Prediction, evaluate, predict, train, train_epoch};

use std::path::Path;

use candle_core::Device;
use nomen_core::Corpus;
use tracing::info;

/// Summary of a finished [`run_training`] call.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub history: Vec<EpochStats>,
    /// Held-out evaluation, `None` when the whole corpus was used for training.
    pub evaluation: Option<Evaluation>,
}

/// Load `pattern`, train a fresh classifier and save it to `output`.
pub fn run_training<P: AsRef<Path>>(
    pattern: &str,
    output: P,
    config: TrainConfig,
) -> anyhow::Result<TrainingReport> {
    let device = Device::Cpu;
    let corpus = Corpus::load(pattern)?;
    anyhow::ensure!(!corpus.is_empty(), "corpus {pattern:?} has no examples");

    let split = split_indices(corpus.len(), config.train_fraction, config.seed)?;
    let mut session = TrainingSession::for_corpus(config, &corpus, &device)?;
    let history = train(&mut session, &corpus, &split)?;

    let evaluation = if split.test.is_empty() {
        None
    } else {
        let eval = evaluate(
            session.model(),
            &corpus,
            &split.test,
            session.config().batch_size,
        )?;
        info!(
            correct = eval.correct,
            total = eval.total,
            "held-out accuracy {:.2}%",
            eval.accuracy() * 100.0
        );
        Some(eval)
    };

    save_model(&session, &corpus, output)?;

    Ok(TrainingReport {
        history,
        evaluation,
    })
}
