//! Behavioral tests for sentence-aware chunking.

use askpdf_rag::chunking::{Chunker, SentenceChunker};

#[test]
fn sentences_join_into_one_prefixed_passage() {
    let chunker = SentenceChunker::default();
    let passages = chunker.chunk("The cat sat. The dog ran. Birds fly high.", 1);

    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].text, "Page 1: The cat sat. The dog ran. Birds fly high.");
    assert_eq!(passages[0].page, 1);
}

#[test]
fn oversized_pages_split_at_sentence_boundaries() {
    let chunker = SentenceChunker::new(80, 10);
    let long_a = "a".repeat(60);
    let long_b = "b".repeat(60);
    let text = format!("{long_a}. {long_b}.");
    let passages = chunker.chunk(&text, 3);

    assert_eq!(passages.len(), 2);
    assert_eq!(passages[0].text, format!("Page 3: {long_a}"));
    assert_eq!(passages[1].text, format!("Page 3: {long_b}."));
    // No mid-sentence truncation: each passage holds a whole sentence.
    assert!(passages.iter().all(|p| p.page == 3));
}

#[test]
fn whitespace_runs_collapse_before_splitting() {
    let chunker = SentenceChunker::default();
    let passages = chunker.chunk("The  cat\n\tsat.   The dog\n ran.", 2);

    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].text, "Page 2: The cat sat. The dog ran.");
}

#[test]
fn text_below_minimum_length_produces_nothing() {
    let chunker = SentenceChunker::default();
    assert!(chunker.chunk("short", 1).is_empty());
    assert!(chunker.chunk("", 1).is_empty());
    assert!(chunker.chunk("    \n\t  ", 1).is_empty());
}

#[test]
fn text_without_terminal_punctuation_becomes_one_passage() {
    let chunker = SentenceChunker::default();
    let passages = chunker.chunk("a heading with no sentence punctuation at all", 7);

    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].text, "Page 7: a heading with no sentence punctuation at all.");
}

#[test]
fn punctuation_only_text_falls_back_to_whole_text() {
    let chunker = SentenceChunker::default();
    // Long enough to pass the minimum, but splits into zero sentences.
    let passages = chunker.chunk("!?!?!?!?!?!?", 4);

    assert_eq!(passages.len(), 1);
    assert_eq!(passages[0].text, "Page 4: !?!?!?!?!?!?");
}

#[test]
fn chunking_is_deterministic() {
    let chunker = SentenceChunker::default();
    let text = "One sentence here. Another sentence there! A question? And a closer.";
    let first = chunker.chunk(text, 1);
    let second = chunker.chunk(text, 1);
    assert_eq!(first, second);
}

#[test]
fn passage_order_follows_sentence_order() {
    let chunker = SentenceChunker::new(30, 10);
    let passages = chunker.chunk("First sentence here. Second sentence here. Third sentence here.", 1);

    assert!(passages.len() > 1);
    let joined = passages.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(" ");
    let first_pos = joined.find("First").unwrap();
    let second_pos = joined.find("Second").unwrap();
    let third_pos = joined.find("Third").unwrap();
    assert!(first_pos < second_pos && second_pos < third_pos);
}
