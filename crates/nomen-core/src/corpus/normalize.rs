//! Line normalization applied to every corpus example.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalize a raw corpus line.
///
/// - Strips trailing whitespace and line terminators
/// - Decomposes canonically (NFD) and drops combining marks
///
/// Characters outside any alphabet are kept; they become the sentinel
/// index only when encoded.
///
/// # Examples
/// ```
/// use nomen_core::corpus::normalize_line;
///
/// assert_eq!(normalize_line("José\n"), "Jose");
/// assert_eq!(normalize_line("Ślusàrski  "), "Slusarski");
/// ```
pub fn normalize_line(line: &str) -> String {
    line.trim_end()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
