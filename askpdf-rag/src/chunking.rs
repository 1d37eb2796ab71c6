//! Sentence-aware chunking of extracted page text.
//!
//! The chunker turns one page's raw text into bounded-size passages
//! that never cut a sentence in half. Bounded size keeps embeddings
//! precise; sentence boundaries keep passages self-contained.

use crate::document::Passage;

/// A strategy for splitting one page of raw text into passages.
///
/// Implementations must be deterministic: chunking the same text twice
/// yields identical passage boundaries.
pub trait Chunker: Send + Sync {
    /// Split a page's raw text into zero or more passages.
    ///
    /// `page` is the 1-indexed source page, recorded as provenance on
    /// every produced passage.
    fn chunk(&self, text: &str, page: u32) -> Vec<Passage>;
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Greedy sentence-accumulating chunker.
///
/// Splits normalized text at terminal punctuation (`.`, `!`, `?`) and
/// packs consecutive sentences into passages of at most `max_chars`
/// characters, prefixed with `Page <n>: `. Text shorter than
/// `min_chars` after normalization produces nothing.
///
/// # Example
///
/// ```rust,ignore
/// use askpdf_rag::SentenceChunker;
///
/// let chunker = SentenceChunker::new(500, 10);
/// let passages = chunker.chunk("The cat sat. The dog ran.", 1);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    max_chars: usize,
    min_chars: usize,
}

impl SentenceChunker {
    /// Create a chunker with the given passage size bound and minimum
    /// page text length.
    pub fn new(max_chars: usize, min_chars: usize) -> Self {
        Self { max_chars, min_chars }
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(500, 10)
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, text: &str, page: u32) -> Vec<Passage> {
        let text = normalize_whitespace(text);
        if text.len() < self.min_chars {
            return Vec::new();
        }

        let mut passages = Vec::new();
        let mut buffer = String::new();

        for sentence in text.split(['.', '!', '?']) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            // Flush when appending would overflow the size bound. The
            // overflowing sentence starts the next buffer instead of
            // being truncated mid-sentence.
            if buffer.len() + sentence.len() > self.max_chars && !buffer.is_empty() {
                passages.push(Passage::new(format!("Page {page}: {}", buffer.trim()), page));
                buffer = sentence.to_string();
            } else if buffer.is_empty() {
                buffer = sentence.to_string();
            } else {
                buffer.push_str(". ");
                buffer.push_str(sentence);
            }
        }

        if !buffer.is_empty() {
            passages.push(Passage::new(format!("Page {page}: {}.", buffer.trim()), page));
        }

        // Punctuation-only or otherwise sentence-free text: emit the
        // whole normalized page as a single passage rather than losing it.
        if passages.is_empty() && !text.is_empty() {
            passages.push(Passage::new(format!("Page {page}: {text}"), page));
        }

        passages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_runs_and_trims() {
        assert_eq!(normalize_whitespace("  a \t b\n\nc "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn short_text_is_rejected() {
        let chunker = SentenceChunker::default();
        assert!(chunker.chunk("tiny.", 1).is_empty());
        assert!(chunker.chunk("   ", 1).is_empty());
    }
}
