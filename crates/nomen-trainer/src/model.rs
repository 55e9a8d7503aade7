//! GRU surname classifier.
//! Embedding → candle-nn GRU → linear head over the last real time step.

use candle_core::{Device, IndexOp, Result, Tensor};
use candle_nn::{Embedding, GRU, GRUConfig, Linear, Module, RNN, VarBuilder};
use nomen_core::Batch;
use serde::{Deserialize, Serialize};

/// Layer sizes of a [`NameClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDims {
    pub alphabet_size: usize,
    pub embedding_dim: usize,
    pub hidden_size: usize,
    pub num_categories: usize,
}

#[derive(Debug, Clone)]
pub struct NameClassifier {
    embedding: Embedding,
    gru: GRU,
    head: Linear,
    dims: ModelDims,
    device: Device,
}

impl NameClassifier {
    /// Create (or look up) the weights under `vb`.
    pub fn new(dims: ModelDims, vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();
        let embedding =
            candle_nn::embedding(dims.alphabet_size, dims.embedding_dim, vb.pp("embedding"))?;
        let gru = candle_nn::gru(
            dims.embedding_dim,
            dims.hidden_size,
            GRUConfig::default(),
            vb.pp("gru"),
        )?;
        let head = candle_nn::linear(dims.hidden_size, dims.num_categories, vb.pp("head"))?;

        Ok(Self {
            embedding,
            gru,
            head,
            dims,
            device,
        })
    }

    pub fn dims(&self) -> &ModelDims {
        &self.dims
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Logits of shape `[batch, num_categories]`.
    ///
    /// `tokens` is a `[batch, seq_len]` u32 tensor and `lengths` the
    /// unpadded length of each row. Each row is classified from its hidden
    /// state at `len - 1`, so tail padding never reaches the head.
    pub fn forward(&self, tokens: &Tensor, lengths: &[usize]) -> Result<Tensor> {
        let (batch_size, seq_len) = tokens.dims2()?;
        if lengths.len() != batch_size {
            candle_core::bail!(
                "got {} lengths for a batch of {} rows",
                lengths.len(),
                batch_size
            );
        }

        // [batch, seq_len, embedding_dim]
        let embedded = self.embedding.forward(tokens)?;
        let states = self.gru.seq(&embedded)?;

        let last = lengths
            .iter()
            .enumerate()
            .map(|(row, &len)| {
                if len == 0 || len > seq_len {
                    candle_core::bail!("row {row} has length {len} in a batch of width {seq_len}");
                }
                states[len - 1].h().i(row)
            })
            .collect::<Result<Vec<_>>>()?;

        // [batch, hidden_size]
        let last = Tensor::stack(&last, 0)?;
        self.head.forward(&last)
    }

    /// Logits for a padded [`Batch`].
    pub fn forward_batch(&self, batch: &Batch) -> Result<Tensor> {
        let tokens = token_tensor(batch, &self.device)?;
        self.forward(&tokens, batch.lengths())
    }
}

/// `[batch, seq_len]` u32 index tensor. Both axes survive extents of 1.
pub fn token_tensor(batch: &Batch, device: &Device) -> Result<Tensor> {
    Tensor::from_slice(batch.flat(), batch.shape(), device)
}

/// `[batch]` u32 category targets.
pub fn target_tensor(batch: &Batch, device: &Device) -> Result<Tensor> {
    let targets: Vec<u32> = batch.categories().iter().map(|&c| c as u32).collect();
    Tensor::from_vec(targets, batch.batch_size(), device)
}
