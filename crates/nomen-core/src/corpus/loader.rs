//! # Corpus Loader
//!
//! Materializes a labeled surname corpus from one text file per category.
//! The file stem names the category and every non-empty line is one example.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::alphabet::Alphabet;
use crate::codec::{Batch, EncodedSequence, SequenceCodec};
use crate::corpus::categories::Categories;
use crate::corpus::normalize::normalize_line;
use crate::error::{NomenError, Result};

/// A single normalized example and its category index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusItem {
    /// Normalized text.
    pub text: String,
    /// Index into the corpus [`Categories`].
    pub category: usize,
}

/// Builder for [`Corpus`] loading.
#[derive(Debug, Clone, Default)]
pub struct CorpusLoader {
    alphabet: Alphabet,
}

impl CorpusLoader {
    /// Create a loader using the standard alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `alphabet` for every encoding of the loaded corpus.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Load every file matching the glob `pattern`.
    ///
    /// Matched paths are sorted before categories are assigned, so the
    /// same set of files always yields the same category indices.
    pub fn load(self, pattern: &str) -> Result<Corpus> {
        let mut paths = glob::glob(pattern)?
            .collect::<std::result::Result<Vec<PathBuf>, _>>()
            .map_err(|e| NomenError::Io {
                path: e.path().to_path_buf(),
                source: e.into(),
            })?;
        paths.retain(|path| path.is_file());
        paths.sort();

        if paths.is_empty() {
            return Err(NomenError::NoFilesMatched {
                pattern: pattern.to_string(),
            });
        }

        let mut categories = Categories::default();
        let mut items = Vec::new();

        for path in &paths {
            let label = category_label(path);
            let category = categories.register(&label);
            let added = read_examples(path, category, &mut items)?;

            if added == 0 {
                warn!(path = %path.display(), category = %label, "category file has no examples");
            } else {
                debug!(path = %path.display(), category = %label, examples = added, "loaded category file");
            }
        }

        info!(
            files = paths.len(),
            categories = categories.len(),
            items = items.len(),
            "corpus loaded"
        );

        Ok(Corpus {
            codec: SequenceCodec::new(self.alphabet),
            categories,
            items,
        })
    }
}

fn category_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_examples(path: &Path, category: usize, items: &mut Vec<CorpusItem>) -> Result<usize> {
    let io_err = |source| NomenError::Io {
        path: path.to_path_buf(),
        source,
    };

    let reader = BufReader::new(File::open(path).map_err(io_err)?);
    let before = items.len();

    for line in reader.lines() {
        let text = normalize_line(&line.map_err(io_err)?);
        if text.is_empty() {
            continue;
        }
        items.push(CorpusItem { text, category });
    }

    Ok(items.len() - before)
}

/// An immutable labeled corpus plus the codec its texts are encoded with.
#[derive(Debug, Clone)]
pub struct Corpus {
    codec: SequenceCodec,
    categories: Categories,
    items: Vec<CorpusItem>,
}

impl Corpus {
    /// Load `pattern` with the standard alphabet.
    ///
    /// # Examples
    /// ```no_run
    /// use nomen_core::Corpus;
    ///
    /// let corpus = Corpus::load("data/names/*.txt").unwrap();
    /// println!("{} names in {} categories", corpus.len(), corpus.categories().len());
    /// ```
    pub fn load(pattern: &str) -> Result<Self> {
        CorpusLoader::new().load(pattern)
    }

    /// Build a corpus from in-memory `(text, category name)` pairs.
    ///
    /// Texts are normalized and empty ones skipped, exactly as when loading
    /// from files. Categories are indexed in first-seen order.
    pub fn from_items<I, T, C>(alphabet: Alphabet, pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: AsRef<str>,
    {
        let mut categories = Categories::default();
        let mut items = Vec::new();

        for (text, category) in pairs {
            let category = categories.register(category.as_ref());
            let text = normalize_line(text.as_ref());
            if !text.is_empty() {
                items.push(CorpusItem { text, category });
            }
        }

        Self {
            codec: SequenceCodec::new(alphabet),
            categories,
            items,
        }
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the corpus has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Text and category index of the item at `index`.
    pub fn get(&self, index: usize) -> Option<(&str, usize)> {
        self.items
            .get(index)
            .map(|item| (item.text.as_str(), item.category))
    }

    /// All items in load order.
    pub fn items(&self) -> &[CorpusItem] {
        &self.items
    }

    /// The category table.
    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// The codec bound to this corpus' alphabet.
    pub fn codec(&self) -> &SequenceCodec {
        &self.codec
    }

    /// The alphabet shared by all encodings of this corpus.
    pub fn alphabet(&self) -> &Alphabet {
        self.codec.alphabet()
    }

    /// Encode the item at `index`.
    pub fn encode_item(&self, index: usize) -> Result<(EncodedSequence, usize)> {
        let (text, category) = self.get(index).ok_or(NomenError::ItemOutOfRange {
            index,
            len: self.len(),
        })?;
        Ok((self.codec.encode(text), category))
    }

    /// Encode and batch the items at `positions`, keeping their order.
    pub fn batch_of(&self, positions: &[usize]) -> Result<Batch> {
        let encoded = positions
            .iter()
            .map(|&index| self.encode_item(index))
            .collect::<Result<Vec<_>>>()?;
        self.codec.batch(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_corpus(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn pattern(dir: &TempDir) -> String {
        format!("{}/*.txt", dir.path().display())
    }

    #[test]
    fn loads_two_category_scenario() {
        let dir = write_corpus(&[
            ("English.txt", "Smith\nJones\n"),
            ("Italian.txt", "Rossi\n"),
        ]);
        let corpus = Corpus::load(&pattern(&dir)).unwrap();

        let categories = corpus.categories();
        assert_eq!(categories.index_of("English"), Some(0));
        assert_eq!(categories.index_of("Italian"), Some(1));
        assert_eq!(categories.index_map().len(), 2);
        assert_eq!(corpus.len(), 3);

        let codec = corpus.codec();
        assert_eq!(codec.decode(&codec.encode("Rossi")).unwrap(), "Rossi");
        assert_eq!(corpus.get(2), Some(("Rossi", 1)));
    }

    #[test]
    fn category_indices_are_stable_across_loads() {
        let dir = write_corpus(&[
            ("Vietnamese.txt", "Nguyen\n"),
            ("Arabic.txt", "Nader\n"),
            ("Korean.txt", "Park\n"),
        ]);
        let first = Corpus::load(&pattern(&dir)).unwrap();
        let second = Corpus::load(&pattern(&dir)).unwrap();

        assert_eq!(first.categories(), second.categories());
        assert_eq!(first.items(), second.items());
        assert_eq!(
            first.categories().names(),
            &["Arabic", "Korean", "Vietnamese"]
        );
    }

    #[test]
    fn normalizes_diacritics_on_load() {
        let dir = write_corpus(&[("Spanish.txt", "José\nMuñoz\n")]);
        let corpus = Corpus::load(&pattern(&dir)).unwrap();
        assert_eq!(corpus.get(0), Some(("Jose", 0)));
        assert_eq!(corpus.get(1), Some(("Munoz", 0)));
    }

    #[test]
    fn skips_empty_lines() {
        let dir = write_corpus(&[("Scottish.txt", "Smith\n\n   \nCampbell\r\n")]);
        let corpus = Corpus::load(&pattern(&dir)).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(1), Some(("Campbell", 0)));
    }

    #[test]
    fn empty_file_registers_category_without_items() {
        let dir = write_corpus(&[("Dutch.txt", ""), ("Greek.txt", "Pappas\n")]);
        let corpus = Corpus::load(&pattern(&dir)).unwrap();
        assert_eq!(corpus.categories().index_of("Dutch"), Some(0));
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(0), Some(("Pappas", 1)));
    }

    #[test]
    fn keeps_unknown_characters_in_text() {
        let dir = write_corpus(&[("German.txt", "Straße\n")]);
        let corpus = Corpus::load(&pattern(&dir)).unwrap();
        let (text, _) = corpus.get(0).unwrap();
        assert_eq!(text, "Straße");

        let (encoded, _) = corpus.encode_item(0).unwrap();
        assert_eq!(encoded.len(), 6);
        assert_eq!(encoded[4], corpus.codec().sentinel_index());
    }

    #[test]
    fn no_matching_files_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Corpus::load(&pattern(&dir)).unwrap_err();
        assert!(matches!(err, NomenError::NoFilesMatched { .. }));
    }

    #[test]
    fn invalid_utf8_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Broken.txt"), b"\xff\xfe").unwrap();
        let err = Corpus::load(&pattern(&dir)).unwrap_err();
        match err {
            NomenError::Io { path, .. } => assert!(path.ends_with("Broken.txt")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn corpus_and_codec_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Corpus>();
        assert_send_sync::<SequenceCodec>();
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        let err = Corpus::load("data/[names/*.txt").unwrap_err();
        assert!(matches!(err, NomenError::InvalidPattern(_)));
    }

    #[test]
    fn batch_of_keeps_requested_order() {
        let corpus = Corpus::from_items(
            Alphabet::standard(),
            [("Abl", "Czech"), ("Zz", "Polish"), ("Kowalski", "Polish")],
        );
        let batch = corpus.batch_of(&[1, 0]).unwrap();

        assert_eq!(batch.shape(), (2, 3));
        assert_eq!(batch.categories(), &[1, 0]);
        assert_eq!(batch.lengths(), &[2, 3]);
        assert_eq!(batch.row(0).unwrap()[2], corpus.codec().sentinel_index());
    }

    #[test]
    fn batch_of_rejects_missing_item() {
        let corpus = Corpus::from_items(Alphabet::standard(), [("Sato", "Japanese")]);
        let err = corpus.batch_of(&[0, 5]).unwrap_err();
        assert!(matches!(err, NomenError::ItemOutOfRange { index: 5, len: 1 }));
    }

    #[test]
    fn from_items_normalizes_and_skips_empty() {
        let corpus = Corpus::from_items(
            Alphabet::standard(),
            [("Sánchez", "Spanish"), ("", "Spanish"), ("Tanaka", "Japanese")],
        );
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0), Some(("Sanchez", 0)));
        assert_eq!(corpus.get(1), Some(("Tanaka", 1)));
    }
}
