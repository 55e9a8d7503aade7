//! # Character Alphabet
//!
//! The fixed, ordered character table every encoding is relative to.
//! Index 0 always holds the sentinel symbol, used both for characters
//! outside the alphabet and for tail padding.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{NomenError, Result};

/// Index reserved for the sentinel symbol.
pub const SENTINEL_INDEX: u32 = 0;

/// Glyph shown for the sentinel when decoding.
pub const DEFAULT_SENTINEL: char = '_';

/// Admissible characters of the standard alphabet, in index order starting at 1.
pub const DEFAULT_CHARACTERS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ .,;'";

/// Ordered character table with a reserved sentinel at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AlphabetSpec", into = "AlphabetSpec")]
pub struct Alphabet {
    symbols: Vec<char>,
    lookup: HashMap<char, u32>,
}

/// Serialized form of an [`Alphabet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphabetSpec {
    /// Glyph stored at the sentinel index.
    pub sentinel: char,
    /// Real characters in index order, starting at index 1.
    pub characters: String,
}

impl Alphabet {
    /// Build an alphabet from a sentinel glyph and the ordered real characters.
    ///
    /// Fails if `characters` is empty, repeats a character, or contains the
    /// sentinel glyph.
    pub fn new(sentinel: char, characters: &str) -> Result<Self> {
        if characters.is_empty() {
            return Err(NomenError::InvalidAlphabet(
                "alphabet has no characters".into(),
            ));
        }

        let mut seen = HashSet::new();
        for c in characters.chars() {
            if c == sentinel {
                return Err(NomenError::InvalidAlphabet(format!(
                    "sentinel {sentinel:?} also appears as a character"
                )));
            }
            if !seen.insert(c) {
                return Err(NomenError::InvalidAlphabet(format!(
                    "character {c:?} appears more than once"
                )));
            }
        }

        Ok(Self::from_checked(sentinel, characters))
    }

    /// The standard surname alphabet: ASCII letters plus `" .,;'"`.
    pub fn standard() -> Self {
        Self::from_checked(DEFAULT_SENTINEL, DEFAULT_CHARACTERS)
    }

    fn from_checked(sentinel: char, characters: &str) -> Self {
        let mut symbols = Vec::with_capacity(characters.chars().count() + 1);
        symbols.push(sentinel);
        symbols.extend(characters.chars());

        let lookup = symbols
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, &c)| (c, idx as u32))
            .collect();

        Self { symbols, lookup }
    }

    /// Number of entries, sentinel included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: the sentinel is present in every alphabet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The sentinel glyph.
    pub fn sentinel(&self) -> char {
        self.symbols[SENTINEL_INDEX as usize]
    }

    /// Index of a real character, or `None` if it is not admissible.
    pub fn index_of(&self, c: char) -> Option<u32> {
        self.lookup.get(&c).copied()
    }

    /// Whether `c` is a real character of this alphabet.
    pub fn contains(&self, c: char) -> bool {
        self.lookup.contains_key(&c)
    }

    /// Symbol stored at `index`, sentinel included.
    pub fn symbol(&self, index: u32) -> Option<char> {
        self.symbols.get(index as usize).copied()
    }

    /// Real characters in index order, sentinel excluded.
    pub fn characters(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().skip(1).copied()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<AlphabetSpec> for Alphabet {
    type Error = NomenError;

    fn try_from(spec: AlphabetSpec) -> Result<Self> {
        Self::new(spec.sentinel, &spec.characters)
    }
}

impl From<Alphabet> for AlphabetSpec {
    fn from(alphabet: Alphabet) -> Self {
        Self {
            sentinel: alphabet.sentinel(),
            characters: alphabet.characters().collect(),
        }
    }
}
