//! # Model Artifacts
//!
//! A trained model is a directory holding the weights (`model.safetensors`)
//! and the tables needed to reuse them (`model.json`): the alphabet, the
//! category names in index order, and the layer sizes.

use std::path::Path;

use anyhow::{Context, ensure};
use candle_core::{DType, Device};
use candle_nn::{VarBuilder, VarMap};
use nomen_core::{Alphabet, Categories, Corpus, SequenceCodec};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{ModelDims, NameClassifier};
use crate::session::TrainingSession;
use crate::trainer::{Prediction, predict};

pub const WEIGHTS_FILE: &str = "model.safetensors";
pub const METADATA_FILE: &str = "model.json";

/// Everything besides the weights needed to rebuild a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub alphabet: Alphabet,
    pub categories: Categories,
    pub dims: ModelDims,
    pub epochs_trained: usize,
}

/// Write the session's weights and the corpus tables to `dir`.
pub fn save_model<P: AsRef<Path>>(
    session: &TrainingSession,
    corpus: &Corpus,
    dir: P,
) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create model directory {}", dir.display()))?;

    session
        .varmap()
        .save(dir.join(WEIGHTS_FILE))
        .context("failed to save weights")?;

    let metadata = ModelMetadata {
        alphabet: corpus.alphabet().clone(),
        categories: corpus.categories().clone(),
        dims: *session.model().dims(),
        epochs_trained: session.epoch(),
    };
    let json = serde_json::to_string_pretty(&metadata)?;
    std::fs::write(dir.join(METADATA_FILE), json).context("failed to write model metadata")?;

    info!(dir = %dir.display(), epochs = metadata.epochs_trained, "model saved");
    Ok(())
}

/// A loaded model ready to classify names.
pub struct Predictor {
    // Keeps the loaded variables alive alongside the model.
    _varmap: VarMap,
    model: NameClassifier,
    codec: SequenceCodec,
    categories: Categories,
    epochs_trained: usize,
}

impl Predictor {
    /// Load a model directory written by [`save_model`].
    pub fn load<P: AsRef<Path>>(dir: P, device: &Device) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let metadata_path = dir.join(METADATA_FILE);
        let content = std::fs::read_to_string(&metadata_path)
            .with_context(|| format!("failed to read {}", metadata_path.display()))?;
        let metadata: ModelMetadata = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", metadata_path.display()))?;

        ensure!(
            metadata.dims.alphabet_size == metadata.alphabet.len(),
            "model expects an alphabet of {} symbols, metadata has {}",
            metadata.dims.alphabet_size,
            metadata.alphabet.len()
        );
        ensure!(
            metadata.dims.num_categories == metadata.categories.len(),
            "model expects {} categories, metadata has {}",
            metadata.dims.num_categories,
            metadata.categories.len()
        );

        let mut varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let model = NameClassifier::new(metadata.dims, vb)?;
        varmap
            .load(dir.join(WEIGHTS_FILE))
            .with_context(|| format!("failed to load weights from {}", dir.display()))?;

        info!(
            dir = %dir.display(),
            categories = metadata.categories.len(),
            "model loaded"
        );

        Ok(Self {
            _varmap: varmap,
            model,
            codec: SequenceCodec::new(metadata.alphabet),
            categories: metadata.categories,
            epochs_trained: metadata.epochs_trained,
        })
    }

    pub fn model(&self) -> &NameClassifier {
        &self.model
    }

    pub fn codec(&self) -> &SequenceCodec {
        &self.codec
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn epochs_trained(&self) -> usize {
        self.epochs_trained
    }

    /// Top `top_k` categories for `name`.
    pub fn predict(&self, name: &str, top_k: usize) -> anyhow::Result<Vec<Prediction>> {
        predict(&self.model, &self.codec, &self.categories, name, top_k)
    }
}
