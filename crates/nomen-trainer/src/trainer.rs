//! Training, evaluation and prediction loops.

use anyhow::ensure;
use candle_core::D;
use nomen_core::{Categories, Corpus, SequenceCodec, normalize_line};
use serde::Serialize;
use tracing::{debug, info};

use crate::model::NameClassifier;
use crate::session::TrainingSession;
use crate::split::{Split, shuffle};

/// Outcome of one pass over the training partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub mean_loss: f32,
    pub batches: usize,
}

/// Accuracy and confusion counts over a set of corpus items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub correct: usize,
    pub total: usize,
    /// `confusion[actual][predicted]` counts.
    pub confusion: Vec<Vec<usize>>,
}

impl Evaluation {
    fn new(num_categories: usize) -> Self {
        Self {
            correct: 0,
            total: 0,
            confusion: vec![vec![0; num_categories]; num_categories],
        }
    }

    fn record(&mut self, actual: usize, predicted: usize) {
        self.total += 1;
        if actual == predicted {
            self.correct += 1;
        }
        self.confusion[actual][predicted] += 1;
    }

    /// Share of correctly classified items, 0 when nothing was evaluated.
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 / self.total as f32
        }
    }

    /// Confusion matrix with every non-empty row scaled to sum to 1.
    pub fn normalized_confusion(&self) -> Vec<Vec<f32>> {
        self.confusion
            .iter()
            .map(|row| {
                let sum: usize = row.iter().sum();
                row.iter()
                    .map(|&count| {
                        if sum == 0 {
                            0.0
                        } else {
                            count as f32 / sum as f32
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// A category and its softmax probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub category: String,
    pub index: usize,
    pub probability: f32,
}

/// Run one epoch over `train_indices` in a freshly shuffled order.
pub fn train_epoch(
    session: &mut TrainingSession,
    corpus: &Corpus,
    train_indices: &[usize],
) -> anyhow::Result<EpochStats> {
    ensure!(!train_indices.is_empty(), "training partition is empty");

    let mut order = train_indices.to_vec();
    shuffle(
        &mut order,
        session.config().seed.wrapping_add(session.epoch() as u64 + 1),
    );

    let batch_size = session.config().batch_size;
    let mut total_loss = 0.0f32;
    let mut batches = 0usize;

    for chunk in order.chunks(batch_size) {
        let batch = corpus.batch_of(chunk)?;
        total_loss += session.step(&batch)?;
        batches += 1;
    }

    let mean_loss = total_loss / batches as f32;
    let epoch = session.finish_epoch(mean_loss);
    debug!(epoch, mean_loss, batches, "epoch finished");

    Ok(EpochStats {
        epoch,
        mean_loss,
        batches,
    })
}

/// Train for the configured number of epochs.
///
/// Held-out accuracy is logged alongside the loss every `report_every`
/// epochs and after the last one.
pub fn train(
    session: &mut TrainingSession,
    corpus: &Corpus,
    split: &Split,
) -> anyhow::Result<Vec<EpochStats>> {
    let epochs = session.config().epochs;
    let report_every = session.config().report_every.max(1);
    info!(
        epochs,
        train = split.train.len(),
        test = split.test.len(),
        "starting training"
    );

    let mut history = Vec::with_capacity(epochs);
    for _ in 0..epochs {
        let stats = train_epoch(session, corpus, &split.train)?;

        if stats.epoch % report_every == 0 || stats.epoch == epochs {
            if split.test.is_empty() {
                info!(
                    "Epoch {}/{} - loss {:.4}",
                    stats.epoch, epochs, stats.mean_loss
                );
            } else {
                let eval = evaluate(
                    session.model(),
                    corpus,
                    &split.test,
                    session.config().batch_size,
                )?;
                info!(
                    "Epoch {}/{} - loss {:.4}, test accuracy {:.2}%",
                    stats.epoch,
                    epochs,
                    stats.mean_loss,
                    eval.accuracy() * 100.0
                );
            }
        }
        history.push(stats);
    }

    Ok(history)
}

/// Classify the items at `indices` and tally accuracy and confusion.
pub fn evaluate(
    model: &NameClassifier,
    corpus: &Corpus,
    indices: &[usize],
    batch_size: usize,
) -> anyhow::Result<Evaluation> {
    ensure!(batch_size > 0, "batch_size must be positive");
    ensure!(
        model.dims().num_categories == corpus.categories().len(),
        "model predicts {} categories but the corpus has {}",
        model.dims().num_categories,
        corpus.categories().len()
    );
    let mut eval = Evaluation::new(corpus.categories().len());

    for chunk in indices.chunks(batch_size) {
        let batch = corpus.batch_of(chunk)?;
        let predicted = model
            .forward_batch(&batch)?
            .argmax(D::Minus1)?
            .to_vec1::<u32>()?;

        for (&actual, &predicted) in batch.categories().iter().zip(&predicted) {
            eval.record(actual, predicted as usize);
        }
    }

    Ok(eval)
}

/// Top `top_k` categories for `name`, most probable first.
///
/// The name goes through the same normalization as corpus lines.
pub fn predict(
    model: &NameClassifier,
    codec: &SequenceCodec,
    categories: &Categories,
    name: &str,
    top_k: usize,
) -> anyhow::Result<Vec<Prediction>> {
    let text = normalize_line(name);
    ensure!(!text.is_empty(), "cannot classify an empty name");

    let batch = codec.batch([(codec.encode(&text), 0)])?;
    let logits = model.forward_batch(&batch)?;
    let probabilities = candle_nn::ops::softmax(&logits, D::Minus1)?
        .squeeze(0)?
        .to_vec1::<f32>()?;

    let mut ranked: Vec<(usize, f32)> = probabilities.into_iter().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(top_k)
        .map(|(index, probability)| -> anyhow::Result<Prediction> {
            Ok(Prediction {
                category: categories.try_name(index)?.to_string(),
                index,
                probability,
            })
        })
        .collect()
}
