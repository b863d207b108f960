//! Output Redaction
//!
//! Literal secret scrubbing for child output. A [`RedactionSet`] holds the
//! secrets; a [`RedactingWriter`] line-buffers a byte stream and masks every
//! completed line before it reaches the downstream sink.

pub mod writer;

pub use writer::{FilterStats, RedactingWriter};

use std::fmt;
use zeroize::Zeroizing;

/// Byte used to mask every redacted byte
pub const MASK_BYTE: u8 = b'*';

/// Ordered set of literal secrets to scrub
///
/// Entries are applied in insertion order. Secret bytes are zeroed when the
/// set is dropped.
#[derive(Clone, Default)]
pub struct RedactionSet {
    entries: Vec<Zeroizing<Vec<u8>>>,
}

impl RedactionSet {
    /// Build a set from raw entries, dropping empty ones
    pub fn new(entries: Vec<Vec<u8>>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .filter(|entry| !entry.is_empty())
                .map(Zeroizing::new)
                .collect(),
        }
    }

    /// Parse a newline-delimited secret list
    ///
    /// An empty string yields an empty set, meaning nothing is redacted.
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split('\n')
                .map(|entry| entry.as_bytes().to_vec())
                .collect(),
        )
    }

    /// Number of secrets in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set redacts nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the secrets in application order
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(|entry| entry.as_slice())
    }

    /// Mask every occurrence of every secret in `line`, in place
    ///
    /// Entries are applied one after another. Each pass scans left to right
    /// and replaces non-overlapping matches with [`MASK_BYTE`], so the line
    /// keeps its length. Returns the number of matches masked.
    pub fn redact_line(&self, line: &mut [u8]) -> usize {
        self.iter().map(|secret| mask_occurrences(line, secret)).sum()
    }
}

impl fmt::Debug for RedactionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactionSet")
            .field("entries", &self.entries.len())
            .finish()
    }
}

fn mask_occurrences(line: &mut [u8], secret: &[u8]) -> usize {
    if secret.is_empty() || secret.len() > line.len() {
        return 0;
    }

    let mut count = 0;
    let mut i = 0;
    while i + secret.len() <= line.len() {
        if &line[i..i + secret.len()] == secret {
            line[i..i + secret.len()].fill(MASK_BYTE);
            i += secret.len();
            count += 1;
        } else {
            i += 1;
        }
    }
    count
}
