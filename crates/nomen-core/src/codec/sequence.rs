//! # Sequence Encoder/Decoder
//!
//! Maps text to alphabet index sequences and back. Unknown characters
//! fall back to the sentinel index instead of failing.

use std::ops::Deref;

use crate::alphabet::{Alphabet, SENTINEL_INDEX};
use crate::codec::batch::Batch;
use crate::error::{NomenError, Result};

/// Per-character alphabet indices of a single text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EncodedSequence(Vec<u32>);

impl EncodedSequence {
    /// Borrow the indices.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Consume the sequence, returning the raw indices.
    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

impl Deref for EncodedSequence {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for EncodedSequence {
    fn from(indices: Vec<u32>) -> Self {
        Self(indices)
    }
}

impl FromIterator<u32> for EncodedSequence {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Bidirectional text ↔ index mapping over one fixed alphabet.
#[derive(Debug, Clone, Default)]
pub struct SequenceCodec {
    alphabet: Alphabet,
}

impl SequenceCodec {
    /// Create a codec over `alphabet`.
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    /// The alphabet this codec encodes against.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of alphabet entries, sentinel included. Sizes the model input.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet.len()
    }

    /// Index used for unknown characters and padding.
    pub fn sentinel_index(&self) -> u32 {
        SENTINEL_INDEX
    }

    /// Glyph that [`decode`](Self::decode) emits for the sentinel index.
    pub fn sentinel(&self) -> char {
        self.alphabet.sentinel()
    }

    /// Encode `text` as one index per character.
    ///
    /// # Examples
    /// ```
    /// use nomen_core::SequenceCodec;
    ///
    /// let codec = SequenceCodec::default();
    /// let encoded = codec.encode("Zoë");
    /// assert_eq!(encoded.len(), 3);
    /// assert_eq!(encoded[2], codec.sentinel_index());
    /// ```
    pub fn encode(&self, text: &str) -> EncodedSequence {
        text.chars()
            .map(|c| self.alphabet.index_of(c).unwrap_or(SENTINEL_INDEX))
            .collect()
    }

    /// Decode indices back to text, sentinel glyphs included.
    ///
    /// Padding is not stripped; slice the row to its original length first.
    pub fn decode(&self, indices: &[u32]) -> Result<String> {
        indices
            .iter()
            .map(|&index| {
                self.alphabet
                    .symbol(index)
                    .ok_or(NomenError::IndexOutOfRange {
                        index,
                        size: self.alphabet.len(),
                    })
            })
            .collect()
    }

    /// Pad `items` on the right with the sentinel index into one batch.
    pub fn batch<I>(&self, items: I) -> Result<Batch>
    where
        I: IntoIterator<Item = (EncodedSequence, usize)>,
    {
        Batch::pad(items, SENTINEL_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SequenceCodec {
        SequenceCodec::new(Alphabet::standard())
    }

    #[test]
    fn every_alphabet_character_round_trips() {
        let codec = codec();
        for c in codec.alphabet().characters() {
            let text = c.to_string();
            let encoded = codec.encode(&text);
            assert_eq!(codec.decode(&encoded).unwrap(), text);
        }
    }

    #[test]
    fn unknown_character_decodes_to_sentinel() {
        let codec = codec();
        for c in ['ß', '7', '-', '_', '字'] {
            let encoded = codec.encode(&c.to_string());
            assert_eq!(encoded.as_slice(), &[SENTINEL_INDEX]);
            assert_eq!(codec.decode(&encoded).unwrap(), "_");
        }
    }

    #[test]
    fn encoding_preserves_character_count() {
        let codec = codec();
        for text in ["", "a", "O'Neill", "Dvořák", "Nguyễn Văn", "李"] {
            assert_eq!(codec.encode(text).len(), text.chars().count());
        }
    }

    #[test]
    fn decode_rejects_out_of_range_index() {
        let codec = codec();
        let err = codec.decode(&[1, 2, 58]).unwrap_err();
        assert!(matches!(
            err,
            NomenError::IndexOutOfRange { index: 58, size: 58 }
        ));
    }

    #[test]
    fn decode_keeps_sentinel_glyphs() {
        let codec = codec();
        assert_eq!(codec.decode(&[1, 0, 2, 0]).unwrap(), "a_b_");
    }

    #[test]
    fn reports_alphabet_size_and_sentinel() {
        let codec = codec();
        assert_eq!(codec.alphabet_size(), 58);
        assert_eq!(codec.sentinel_index(), 0);
        assert_eq!(codec.sentinel(), '_');
    }

    #[test]
    fn custom_alphabet_sentinel_is_reported() {
        let codec = SequenceCodec::new(Alphabet::new('#', "abc").unwrap());
        assert_eq!(codec.sentinel(), '#');
        assert_eq!(codec.decode(&[0, 1]).unwrap(), "#a");
    }

    #[test]
    fn batch_pads_to_longest_and_round_trips() {
        let codec = codec();
        let texts = ["Abl", "Zz"];
        let batch = codec
            .batch(texts.iter().enumerate().map(|(i, t)| (codec.encode(t), i)))
            .unwrap();

        assert_eq!(batch.seq_len(), 3);
        assert_eq!(batch.row(1).unwrap()[2], codec.sentinel_index());
        assert_eq!(codec.decode(&batch.row(1).unwrap()[..2]).unwrap(), "Zz");

        for (i, text) in texts.iter().enumerate() {
            let row = batch.row(i).unwrap();
            let len = batch.lengths()[i];
            assert_eq!(codec.decode(&row[..len]).unwrap(), *text);
        }
    }

    #[test]
    fn single_character_batch_keeps_both_axes() {
        let codec = codec();
        let batch = codec.batch([(codec.encode("x"), 4)]).unwrap();
        assert_eq!(batch.shape(), (1, 1));
        assert_eq!(batch.categories(), &[4]);
        assert_eq!(batch.row(0).unwrap().len(), 1);
    }
}
