//! Match scanner
//!
//! Finds every occurrence of a query in a document snapshot. Matching is
//! case-insensitive, greedy and non-overlapping, and confined to a single
//! text run: positions are computed run-locally and offset by the run's
//! start, so a match never spans two runs even when they render adjacent.

use crate::{DocumentScan, TextRange};

/// A match is a plain document range, valid only for the snapshot it was
/// scanned from
pub type MatchRange = TextRange;

/// Scanner over a read-only document snapshot
pub struct FindEngine<'a, D: DocumentScan + ?Sized> {
    doc: &'a D,
}

impl<'a, D: DocumentScan + ?Sized> FindEngine<'a, D> {
    /// Create a new find engine for a document
    pub fn new(doc: &'a D) -> Self {
        Self { doc }
    }

    /// Find all matches in document order.
    ///
    /// Empty and whitespace-only queries match nothing.
    pub fn find_all(&self, query: &str) -> Vec<MatchRange> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let needle = fold_case(query);
        let mut matches = Vec::new();

        self.doc.traverse(&mut |text, pos| {
            if let Some(text) = text {
                let haystack = fold_case(text);
                for offset in non_overlapping_offsets(&haystack, &needle) {
                    matches.push(TextRange::new(pos + offset, pos + offset + needle.len()));
                }
            }
            true
        });

        matches
    }

    /// Count matches without keeping them
    pub fn count(&self, query: &str) -> usize {
        self.find_all(query).len()
    }
}

/// Scan `doc` for `query`
pub fn scan<D: DocumentScan + ?Sized>(doc: &D, query: &str) -> Vec<MatchRange> {
    FindEngine::new(doc).find_all(query)
}

/// Lowercase char by char, keeping one char per input char.
///
/// Chars whose lowercase form expands to several chars (e.g. 'İ') are left
/// as they are, so offsets in the folded text are offsets in the original.
fn fold_case(text: &str) -> Vec<char> {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

/// Leftmost-first search that resumes right after each hit
fn non_overlapping_offsets(haystack: &[char], needle: &[char]) -> Vec<usize> {
    let mut offsets = Vec::new();
    if needle.is_empty() {
        return offsets;
    }

    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        match haystack[start..]
            .windows(needle.len())
            .position(|window| window == needle)
        {
            Some(index) => {
                offsets.push(start + index);
                start += index + needle.len();
            }
            None => break,
        }
    }
    offsets
}
