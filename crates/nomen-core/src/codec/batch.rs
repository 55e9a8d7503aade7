//! Right-padded batches of encoded sequences.

use crate::codec::sequence::EncodedSequence;
use crate::error::{NomenError, Result};

/// Encoded sequences padded on the tail to a common length.
///
/// Rows are stored row-major in a single buffer of shape
/// `[batch_size, seq_len]`. Both axes are kept even when either is 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    indices: Vec<u32>,
    lengths: Vec<usize>,
    categories: Vec<usize>,
    seq_len: usize,
}

impl Batch {
    /// Pad every sequence with `pad_index` up to the longest one.
    ///
    /// Category indices keep the input order.
    pub fn pad<I>(items: I, pad_index: u32) -> Result<Self>
    where
        I: IntoIterator<Item = (EncodedSequence, usize)>,
    {
        let (sequences, categories): (Vec<EncodedSequence>, Vec<usize>) =
            items.into_iter().unzip();
        if sequences.is_empty() {
            return Err(NomenError::EmptyBatch);
        }

        let seq_len = sequences.iter().map(|s| s.len()).max().unwrap_or(0);
        let mut indices = Vec::with_capacity(sequences.len() * seq_len);
        let mut lengths = Vec::with_capacity(sequences.len());

        for sequence in sequences {
            lengths.push(sequence.len());
            let pad = seq_len - sequence.len();
            indices.extend(sequence.into_inner());
            indices.extend(std::iter::repeat_n(pad_index, pad));
        }

        Ok(Self {
            indices,
            lengths,
            categories,
            seq_len,
        })
    }

    /// `(batch_size, seq_len)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.batch_size(), self.seq_len)
    }

    /// Number of rows.
    pub fn batch_size(&self) -> usize {
        self.lengths.len()
    }

    /// Padded length shared by every row.
    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    /// The padded row at position `i`.
    pub fn row(&self, i: usize) -> Option<&[u32]> {
        if i >= self.batch_size() {
            return None;
        }
        let start = i * self.seq_len;
        Some(&self.indices[start..start + self.seq_len])
    }

    /// Iterate over the padded rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.batch_size()).filter_map(move |i| self.row(i))
    }

    /// All indices, row-major.
    pub fn flat(&self) -> &[u32] {
        &self.indices
    }

    /// Original, unpadded length of each row.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Category index of each row.
    pub fn categories(&self) -> &[usize] {
        &self.categories
    }

    /// Row-major mask, `true` where a position holds real content.
    pub fn padding_mask(&self) -> Vec<bool> {
        self.lengths
            .iter()
            .flat_map(|&len| (0..self.seq_len).map(move |pos| pos < len))
            .collect()
    }
}
