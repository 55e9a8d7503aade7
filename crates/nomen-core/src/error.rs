use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a corpus or encoding sequences.
#[derive(Debug, Error)]
pub enum NomenError {
    /// The glob pattern did not match a single category file.
    #[error("no category files match pattern {pattern:?}")]
    NoFilesMatched {
        /// The pattern that matched nothing.
        pattern: String,
    },

    /// The glob pattern itself is malformed.
    #[error("invalid corpus pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    /// A matched file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An index passed to `decode` lies outside the alphabet.
    #[error("index {index} is out of range for an alphabet of size {size}")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of entries in the alphabet, sentinel included.
        size: usize,
    },

    /// The alphabet definition is inconsistent.
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// The same category name was given two indices.
    #[error("duplicate category: {0:?}")]
    DuplicateCategory(String),

    /// A category index has no registered name.
    #[error("unknown category index {0}")]
    UnknownCategory(usize),

    /// A corpus position past the last item was requested.
    #[error("item {index} is out of range for a corpus of {len} items")]
    ItemOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of items in the corpus.
        len: usize,
    },

    /// A batch was requested from zero items.
    #[error("cannot build a batch from zero sequences")]
    EmptyBatch,
}

/// Result type alias for Nomen core operations.
pub type Result<T> = std::result::Result<T, NomenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = NomenError::NoFilesMatched {
            pattern: "data/names/*.txt".into(),
        };
        assert!(err.to_string().contains("data/names/*.txt"));

        let err = NomenError::IndexOutOfRange { index: 99, size: 58 };
        assert_eq!(
            err.to_string(),
            "index 99 is out of range for an alphabet of size 58"
        );

        assert_eq!(
            NomenError::EmptyBatch.to_string(),
            "cannot build a batch from zero sequences"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NomenError>();
    }
}
