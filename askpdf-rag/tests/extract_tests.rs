//! Extraction tests over synthetic in-memory PDFs.

use std::sync::Arc;

use askpdf_rag::extract::{span_walk, PdfSource, TextExtractor};
use askpdf_rag::{EmbeddingProvider, RagError, RetrievalEngine};
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as LopdfDocument, Object, Stream};

/// Build a minimal PDF where each page shows the given text runs, one
/// per line.
fn build_pdf(pages: &[Vec<&str>]) -> Vec<u8> {
    let mut doc = LopdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for runs in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 750.into()]),
        ];
        for run in runs {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*run)]));
            operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = pages.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn corrupt_bytes_fail_to_open() {
    let err = PdfSource::open(b"definitely not a pdf").unwrap_err();
    assert!(matches!(err, RagError::DocumentParse(_)));
}

#[test]
fn pages_come_back_in_document_order() {
    let bytes = build_pdf(&[
        vec!["The first page talks about cats."],
        vec!["The second page talks about dogs."],
    ]);
    let source = PdfSource::open(&bytes).unwrap();
    assert_eq!(source.page_count(), 2);

    let pages = TextExtractor::default().extract_pages(&source);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].page, 1);
    assert_eq!(pages[1].page, 2);
    assert!(pages[0].text.contains("cats"), "page 1 text: {:?}", pages[0].text);
    assert!(pages[1].text.contains("dogs"), "page 2 text: {:?}", pages[1].text);
}

#[test]
fn empty_page_contributes_nothing_without_aborting_the_rest() {
    let bytes = build_pdf(&[
        vec![],
        vec!["Only this page carries any text at all."],
    ]);
    let source = PdfSource::open(&bytes).unwrap();

    let pages = TextExtractor::default().extract_pages(&source);
    // Exactly one page yields text, and it keeps its real page number.
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].page, 2);
}

#[test]
fn span_walk_emits_one_passage_per_long_run() {
    let bytes = build_pdf(&[vec![
        "short run",
        "a text run comfortably past ten characters",
        "another run that is also long enough to keep",
    ]]);
    let source = PdfSource::open(&bytes).unwrap();

    let passages = span_walk(&source);
    assert_eq!(passages.len(), 2);
    assert!(passages[0].text.starts_with("Page 1: "));
    assert!(passages[0].text.contains("comfortably past ten characters"));
    assert!(passages.iter().all(|p| !p.text.contains("short run")));
}

// -- end to end through the engine ----------------------------------

struct ConstantEmbedder;

#[async_trait]
impl EmbeddingProvider for ConstantEmbedder {
    async fn embed(&self, _text: &str) -> askpdf_rag::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0, 0.0])
    }

    fn dimensions(&self) -> usize {
        3
    }
}

#[tokio::test]
async fn build_document_indexes_every_chunked_passage() {
    let bytes = build_pdf(&[
        vec!["The cat sat. The dog ran. Birds fly high."],
        vec!["Warranty coverage lasts two years from purchase."],
    ]);
    let engine = RetrievalEngine::builder()
        .embedding_provider(Arc::new(ConstantEmbedder))
        .build()
        .unwrap();

    let document = engine.build_document(&bytes).await.unwrap();
    assert_eq!(document.len(), 2);
    assert!(document.passages()[0].text.starts_with("Page 1: "));
    assert!(document.passages()[1].text.starts_with("Page 2: "));

    let retrieved = engine.retrieve(&document, "anything").await;
    assert!(!retrieved.passages.is_empty());
}

#[tokio::test]
async fn textless_document_fails_with_empty_document() {
    // One page, no text operators at all: every strategy and the span
    // walk come up empty.
    let bytes = build_pdf(&[vec![]]);
    let engine = RetrievalEngine::builder()
        .embedding_provider(Arc::new(ConstantEmbedder))
        .build()
        .unwrap();

    let err = engine.build_document(&bytes).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyDocument));
}
