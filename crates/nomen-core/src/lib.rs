//! # Nomen Core
//!
//! Data layer of the Nomen surname classifier. Loads a labeled corpus
//! from one text file per category and turns surnames into fixed-alphabet
//! index sequences, padded into batches for the recurrent model.
//!
//! ## Quick Start
//!
//! ```rust
//! use nomen_core::{Alphabet, Corpus};
//!
//! let corpus = Corpus::from_items(
//!     Alphabet::standard(),
//!     [("Smith", "English"), ("Jones", "English"), ("Rossi", "Italian")],
//! );
//! let batch = corpus.batch_of(&[0, 2]).unwrap();
//!
//! assert_eq!(batch.shape(), (2, 5));
//! assert_eq!(batch.categories(), &[0, 1]);
//! assert_eq!(corpus.codec().decode(batch.row(1).unwrap()).unwrap(), "Rossi");
//! ```
pub mod alphabet;
pub mod codec;
pub mod corpus;
pub mod error;

// Re-export primary API
pub use alphabet::{Alphabet, AlphabetSpec, SENTINEL_INDEX};
pub use codec::{Batch, EncodedSequence, SequenceCodec};
pub use corpus::{Categories, Corpus, CorpusItem, CorpusLoader, normalize_line};
pub use error::{NomenError, Result};
