//! Training configuration.

use std::path::Path;

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

/// Which candle optimizer drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// Plain stochastic gradient descent.
    #[default]
    Sgd,
    /// AdamW with candle's default betas and weight decay.
    AdamW,
}

/// Hyper-parameters for one training run.
///
/// Missing fields in a JSON config file fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Width of the character embedding fed to the GRU.
    pub embedding_dim: usize,
    /// GRU hidden state size
    pub hidden_size: usize,
    /// Number of passes over the training partition.
    pub epochs: usize,
    /// Names per optimizer step.
    pub batch_size: usize,
    /// Step size handed to the optimizer.
    pub learning_rate: f64,
    /// Optimizer used by the training session.
    pub optimizer: OptimizerKind,
    /// Share of the corpus used for training, in `(0, 1]`. The rest is held out.
    pub train_fraction: f64,
    /// Seed for the train/test split and per-epoch shuffles.
    pub seed: u64,
    /// Log a progress line every this many epochs.
    pub report_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 32,
            hidden_size: 128,
            epochs: 27,
            batch_size: 64,
            learning_rate: 0.15,
            optimizer: OptimizerKind::Sgd,
            train_fraction: 0.85,
            seed: 2024,
            report_every: 5,
        }
    }
}

impl TrainConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of epochs.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the optimizer.
    pub fn with_optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Set the shuffle and split seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the embedding and hidden sizes.
    pub fn with_dims(mut self, embedding_dim: usize, hidden_size: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self.hidden_size = hidden_size;
        self
    }

    /// Set the training share of the corpus.
    pub fn with_train_fraction(mut self, train_fraction: f64) -> Self {
        self.train_fraction = train_fraction;
        self
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.embedding_dim > 0, "embedding_dim must be positive");
        ensure!(self.hidden_size > 0, "hidden_size must be positive");
        ensure!(self.batch_size > 0, "batch_size must be positive");
        ensure!(
            self.learning_rate.is_finite() && self.learning_rate > 0.0,
            "learning_rate must be a positive number, got {}",
            self.learning_rate
        );
        ensure!(
            self.train_fraction > 0.0 && self.train_fraction <= 1.0,
            "train_fraction must be in (0, 1], got {}",
            self.train_fraction
        );
        Ok(())
    }
}
