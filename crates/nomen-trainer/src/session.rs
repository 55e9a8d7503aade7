//! # Training Session
//!
//! Owns everything that changes while training: the variable store, the
//! classifier built on it, the optimizer state and the epoch counter.
//! Every training step takes the session by `&mut`.

use anyhow::Context;
use candle_core::{DType, Device};
use candle_nn::{AdamW, Optimizer, ParamsAdamW, SGD, VarBuilder, VarMap};
use nomen_core::{Batch, Corpus};

use crate::config::{OptimizerKind, TrainConfig};
use crate::model::{ModelDims, NameClassifier, target_tensor};

/// The optimizer selected by [`OptimizerKind`].
pub enum SessionOptimizer {
    Sgd(SGD),
    AdamW(AdamW),
}

impl SessionOptimizer {
    fn new(kind: OptimizerKind, varmap: &VarMap, learning_rate: f64) -> candle_core::Result<Self> {
        let vars = varmap.all_vars();
        match kind {
            OptimizerKind::Sgd => SGD::new(vars, learning_rate).map(Self::Sgd),
            OptimizerKind::AdamW => AdamW::new(
                vars,
                ParamsAdamW {
                    lr: learning_rate,
                    ..Default::default()
                },
            )
            .map(Self::AdamW),
        }
    }

    fn backward_step(&mut self, loss: &candle_core::Tensor) -> candle_core::Result<()> {
        match self {
            Self::Sgd(opt) => opt.backward_step(loss),
            Self::AdamW(opt) => opt.backward_step(loss),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        match self {
            Self::Sgd(opt) => opt.learning_rate(),
            Self::AdamW(opt) => opt.learning_rate(),
        }
    }
}

/// Mutable training state for one run.
pub struct TrainingSession {
    config: TrainConfig,
    varmap: VarMap,
    model: NameClassifier,
    optimizer: SessionOptimizer,
    epoch: usize,
    losses: Vec<f32>,
}

impl TrainingSession {
    /// Create a session with freshly initialized weights.
    pub fn new(config: TrainConfig, dims: ModelDims, device: &Device) -> anyhow::Result<Self> {
        config.validate()?;

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = NameClassifier::new(dims, vb).context("failed to build classifier")?;
        let optimizer = SessionOptimizer::new(config.optimizer, &varmap, config.learning_rate)
            .context("failed to build optimizer")?;

        Ok(Self {
            config,
            varmap,
            model,
            optimizer,
            epoch: 0,
            losses: Vec::new(),
        })
    }

    /// Size the classifier for `corpus`' alphabet and categories.
    pub fn for_corpus(config: TrainConfig, corpus: &Corpus, device: &Device) -> anyhow::Result<Self> {
        let dims = ModelDims {
            alphabet_size: corpus.codec().alphabet_size(),
            embedding_dim: config.embedding_dim,
            hidden_size: config.hidden_size,
            num_categories: corpus.categories().len(),
        };
        Self::new(config, dims, device)
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn model(&self) -> &NameClassifier {
        &self.model
    }

    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn optimizer(&self) -> &SessionOptimizer {
        &self.optimizer
    }

    /// Number of completed epochs.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Mean loss of every completed epoch, in order.
    pub fn losses(&self) -> &[f32] {
        &self.losses
    }

    /// One forward/backward/update pass on `batch`. Returns the batch loss.
    pub fn step(&mut self, batch: &Batch) -> anyhow::Result<f32> {
        let logits = self.model.forward_batch(batch)?;
        let targets = target_tensor(batch, self.model.device())?;
        let loss = candle_nn::loss::cross_entropy(&logits, &targets)?;
        self.optimizer.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    /// Record a finished epoch and its mean loss.
    pub(crate) fn finish_epoch(&mut self, mean_loss: f32) -> usize {
        self.losses.push(mean_loss);
        self.epoch += 1;
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nomen_core::Alphabet;

    fn corpus() -> Corpus {
        Corpus::from_items(
            Alphabet::standard(),
            [("Smith", "English"), ("Jones", "English"), ("Rossi", "Italian")],
        )
    }

    #[test]
    fn session_sizes_model_from_corpus() {
        let config = TrainConfig::new().with_dims(4, 6);
        let session = TrainingSession::for_corpus(config, &corpus(), &Device::Cpu).unwrap();

        let dims = session.model().dims();
        assert_eq!(dims.alphabet_size, 58);
        assert_eq!(dims.num_categories, 2);
        assert_eq!(dims.hidden_size, 6);
        assert_eq!(session.epoch(), 0);
        assert!(!session.varmap().all_vars().is_empty());
    }

    #[test]
    fn step_returns_finite_loss() {
        let corpus = corpus();
        let config = TrainConfig::new()
            .with_dims(4, 6)
            .with_optimizer(OptimizerKind::AdamW)
            .with_learning_rate(0.01);
        let mut session = TrainingSession::for_corpus(config, &corpus, &Device::Cpu).unwrap();

        let batch = corpus.batch_of(&[0, 1, 2]).unwrap();
        let loss = session.step(&batch).unwrap();
        assert!(loss.is_finite());
        assert!((session.optimizer().learning_rate() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn finish_epoch_records_loss() {
        let config = TrainConfig::new().with_dims(4, 6);
        let mut session = TrainingSession::for_corpus(config, &corpus(), &Device::Cpu).unwrap();
        assert_eq!(session.finish_epoch(1.5), 1);
        assert_eq!(session.losses(), &[1.5]);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = TrainConfig::new().with_batch_size(0);
        assert!(TrainingSession::for_corpus(config, &corpus(), &Device::Cpu).is_err());
    }
}
