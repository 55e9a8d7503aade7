//! # Nomen
//!
//! Predicts the national origin of a surname from its characters.
//!
//! - [`nomen_core`]: corpus loading, normalization and the sequence codec
//! - [`nomen_trainer`]: the GRU classifier, training session and model files
//!
//! ```no_run
//! use nomen::{TrainConfig, run_training};
//!
//! let report = run_training("data/names/*.txt", "models/nomen", TrainConfig::default()).unwrap();
//! println!("{} epochs", report.history.len());
//! ```

pub use nomen_core;
pub use nomen_trainer;

pub use nomen_core::{
    Alphabet, Batch, Categories, Corpus, CorpusLoader, EncodedSequence, NomenError,
    SequenceCodec, normalize_line,
};
pub use nomen_trainer::{
    Evaluation, Prediction, Predictor, TrainConfig, TrainingReport, TrainingSession, run_training,
};
