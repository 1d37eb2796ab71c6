//! PDF text extraction with a cascading strategy chain.
//!
//! Per page, an ordered list of [`ExtractionStrategy`] implementations
//! is tried in sequence, stopping at the first that yields text:
//!
//! 1. [`LayoutStrategy`] — layout-aware extraction via `pdf-extract`
//! 2. [`WordStrategy`] — word tokens recovered from the content stream
//! 3. [`RawStrategy`] — `lopdf`'s own per-page text extraction
//!
//! When an entire document chunks to zero passages, a structural walk
//! over content-stream text runs ([`span_walk`]) produces passages
//! directly, bypassing the chunker.

use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, Object, ObjectId};
use tracing::{debug, warn};

use crate::document::Passage;
use crate::error::{RagError, Result};

/// Minimum text-run length kept by the span-walk fallback.
const SPAN_MIN_CHARS: usize = 10;

/// Raw text recovered from one page, 1-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    pub page: u32,
    pub text: String,
}

/// An opened PDF, ready for per-page extraction.
///
/// Layout-aware text for every page is computed once at open time;
/// if the layout pass fails, only the first strategy is disabled and
/// the content-stream strategies still run.
#[derive(Debug)]
pub struct PdfSource {
    doc: LopdfDocument,
    layout_pages: Vec<String>,
}

impl PdfSource {
    /// Open a PDF from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DocumentParse`] if the bytes are not a
    /// readable PDF. No partial source is produced.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(bytes)
            .map_err(|e| RagError::DocumentParse(format!("failed to open PDF: {e}")))?;

        let layout_pages = match pdf_extract::extract_text_from_mem_by_pages(bytes) {
            Ok(pages) => pages,
            Err(e) => {
                warn!(error = %e, "layout-aware extraction unavailable for this document");
                Vec::new()
            }
        };

        Ok(Self { doc, layout_pages })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Page numbers in document order (1-indexed).
    fn page_numbers(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }

    fn page_object(&self, page: u32) -> Option<ObjectId> {
        self.doc.get_pages().get(&page).copied()
    }
}

/// One way of pulling text out of a page.
///
/// Returns `Some` only for non-empty text; failures inside a strategy
/// are logged by the strategy and surface as `None`, letting the chain
/// move on to the next one.
pub trait ExtractionStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extract text for the given 1-indexed page, if this strategy can.
    fn extract(&self, source: &PdfSource, page: u32) -> Option<String>;
}

/// Layout-aware extraction: the per-page output of `pdf-extract`.
pub struct LayoutStrategy;

impl ExtractionStrategy for LayoutStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn extract(&self, source: &PdfSource, page: u32) -> Option<String> {
        let text = source.layout_pages.get(page as usize - 1)?.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// Word-level extraction: show-text operands from the page content
/// stream, joined with single spaces.
pub struct WordStrategy;

impl ExtractionStrategy for WordStrategy {
    fn name(&self) -> &'static str {
        "words"
    }

    fn extract(&self, source: &PdfSource, page: u32) -> Option<String> {
        let page_id = source.page_object(page)?;
        let runs = text_runs(&source.doc, page_id);
        let words: Vec<&str> =
            runs.iter().flat_map(|run| run.split_whitespace()).collect();
        if words.is_empty() {
            return None;
        }
        Some(words.join(" "))
    }
}

/// Raw extraction: `lopdf`'s built-in `extract_text` for the page.
pub struct RawStrategy;

impl ExtractionStrategy for RawStrategy {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn extract(&self, source: &PdfSource, page: u32) -> Option<String> {
        match source.doc.extract_text(&[page]) {
            Ok(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(e) => {
                debug!(page, error = %e, "raw extraction failed");
                None
            }
        }
    }
}

/// Per-page extraction driver over an ordered strategy chain.
pub struct TextExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(LayoutStrategy),
                Box::new(WordStrategy),
                Box::new(RawStrategy),
            ],
        }
    }
}

impl TextExtractor {
    /// Build an extractor with a custom strategy chain.
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract text for every page, in document order.
    ///
    /// A page where every strategy comes up empty is logged and
    /// skipped; it never aborts the rest of the document.
    pub fn extract_pages(&self, source: &PdfSource) -> Vec<PageText> {
        let mut pages = Vec::new();
        for page in source.page_numbers() {
            match self.extract_page(source, page) {
                Some((name, text)) => {
                    debug!(page, strategy = name, chars = text.len(), "extracted page text");
                    pages.push(PageText { page, text });
                }
                None => warn!(page, "no text found on page"),
            }
        }
        pages
    }

    fn extract_page(&self, source: &PdfSource, page: u32) -> Option<(&'static str, String)> {
        self.strategies
            .iter()
            .find_map(|s| s.extract(source, page).map(|text| (s.name(), text)))
    }
}

/// Structural fallback for documents the page strategies cannot read:
/// walk every page's content-stream text runs and emit one passage per
/// run longer than ten characters, bypassing the chunker.
pub fn span_walk(source: &PdfSource) -> Vec<Passage> {
    let mut passages = Vec::new();
    for page in source.page_numbers() {
        let Some(page_id) = source.page_object(page) else { continue };
        for run in text_runs(&source.doc, page_id) {
            let run = run.trim();
            if run.len() > SPAN_MIN_CHARS {
                passages.push(Passage::new(format!("Page {page}: {run}"), page));
            }
        }
    }
    passages
}

/// Decode a page's content stream into text runs.
///
/// Show-text operands (`Tj`, `TJ`, `'`, `"`) accumulate into the
/// current run; positioning operators (`Td`, `TD`, `T*`) and text
/// object boundaries (`BT`/`ET`) flush it. One run roughly corresponds
/// to one line or span of the original layout.
fn text_runs(doc: &LopdfDocument, page_id: ObjectId) -> Vec<String> {
    let Ok(content) = doc.get_page_content(page_id) else {
        return Vec::new();
    };
    let operations = match Content::decode(&content) {
        Ok(content) => content.operations,
        Err(e) => {
            debug!(error = %e, "content stream decode failed");
            return Vec::new();
        }
    };

    let mut runs = Vec::new();
    let mut current = String::new();
    let mut flush = |current: &mut String| {
        let trimmed = current.trim();
        if !trimmed.is_empty() {
            runs.push(trimmed.to_string());
        }
        current.clear();
    };

    for op in operations {
        match op.operator.as_str() {
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    if let Some(text) = decode_text_bytes(bytes) {
                        current.push_str(&text);
                    }
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        if let Object::String(bytes, _) = item {
                            if let Some(text) = decode_text_bytes(bytes) {
                                current.push_str(&text);
                            }
                        }
                    }
                }
            }
            // ' and " show text after moving to the next line.
            "'" | "\"" => {
                flush(&mut current);
                if let Some(Object::String(bytes, _)) = op.operands.last() {
                    if let Some(text) = decode_text_bytes(bytes) {
                        current.push_str(&text);
                    }
                }
            }
            "Td" | "TD" | "T*" | "BT" => flush(&mut current),
            "ET" => flush(&mut current),
            _ => {}
        }
    }
    flush(&mut current);
    runs
}

/// Decode a PDF string's bytes to readable text.
///
/// Handles UTF-16BE (with BOM), UTF-8, and falls back to treating each
/// byte as a Latin-1 codepoint, which also covers PDFDocEncoding for
/// the common range. Control characters are dropped.
fn decode_text_bytes(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16(&units).ok().and_then(strip_controls);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return strip_controls(text.to_string());
    }

    strip_controls(bytes.iter().map(|&b| b as char).collect())
}

fn strip_controls(text: String) -> Option<String> {
    let cleaned: String = text.chars().filter(|c| !c.is_control() || *c == ' ').collect();
    (!cleaned.is_empty()).then_some(cleaned)
}
