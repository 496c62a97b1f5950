use super::estimate_token_count as estimate_token_count_impl;
use super::*;

fn paragraph(sentence: &str, repeats: usize) -> String {
    sentence.repeat(repeats)
}

#[test]
fn estimate_token_count() {
    assert_eq!(estimate_token_count_impl("hello world"), 2);
    assert_eq!(estimate_token_count_impl("This is a test."), 5);
    assert_eq!(estimate_token_count_impl(""), 0);
}

#[test]
fn small_document_single_chunk() {
    let text = "A short note about nothing in particular.";
    let config = ChunkingConfig::default();

    let chunks = chunk_text(text, &config).expect("chunk_text should succeed");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chunk_index, 0);
    assert!(chunks[0].content.contains("short note"));
}

#[test]
fn large_document_splits() {
    let text = paragraph("The quick brown fox jumps over the lazy dog. ", 400);
    let config = ChunkingConfig::default();

    let chunks = chunk_text(&text, &config).expect("chunk_text should succeed");

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(!chunk.content.trim().is_empty());
    }
}

#[test]
fn chunk_indexes_are_dense() {
    let text = format!(
        "{}\n\n{}\n\n{}",
        paragraph("First section sentence. ", 120),
        paragraph("Second section sentence. ", 120),
        paragraph("Third section sentence. ", 120)
    );
    let config = ChunkingConfig {
        target_chunk_size: 120,
        max_chunk_size: 240,
        ..ChunkingConfig::default()
    };

    let chunks = chunk_text(&text, &config).expect("chunk_text should succeed");

    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index, i);
    }
}

#[test]
fn paragraph_boundaries_preferred() {
    let text = "First paragraph with enough words to stand alone as content.\n\n\
                Second paragraph, also with its own words and meaning.";
    let config = ChunkingConfig {
        overlap_size: 0,
        min_chunk_size: 50,
        target_chunk_size: 650,
        max_chunk_size: 1000,
        sentence_boundary_splitting: true,
    };

    let chunks = chunk_text(text, &config).expect("chunk_text should succeed");

    // Both paragraphs fit the target window, so they land in one chunk with
    // the paragraph break preserved
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.contains("\n\n"));
}

#[test]
fn overlap_carries_trailing_words() {
    let text = paragraph("Overlap source sentence with several words inside. ", 200);
    let config = ChunkingConfig {
        target_chunk_size: 120,
        max_chunk_size: 240,
        min_chunk_size: 50,
        overlap_size: 40,
        sentence_boundary_splitting: true,
    };

    let chunks = chunk_text(&text, &config).expect("chunk_text should succeed");
    assert!(chunks.len() > 1);

    // The second chunk starts with words copied from the end of the first
    let first_tail: Vec<&str> = chunks[0].content.split_whitespace().rev().take(5).collect();
    for word in first_tail {
        assert!(chunks[1].content.contains(word));
    }
}

#[test]
fn no_overlap_when_disabled() {
    let text = paragraph("Plain sentence for splitting purposes here. ", 200);
    let config = ChunkingConfig {
        target_chunk_size: 120,
        max_chunk_size: 240,
        min_chunk_size: 50,
        overlap_size: 0,
        sentence_boundary_splitting: true,
    };

    let chunks = chunk_text(&text, &config).expect("chunk_text should succeed");
    assert!(chunks.len() > 1);
}

#[test]
fn small_neighbours_merge() {
    let text = "Tiny one.\n\nTiny two.\n\nTiny three.";
    let config = ChunkingConfig::default();

    let chunks = chunk_text(text, &config).expect("chunk_text should succeed");

    // All three fragments are far below min_chunk_size and merge together
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].content.contains("Tiny one"));
    assert!(chunks[0].content.contains("Tiny three"));
}

#[test]
fn word_splitting_fallback() {
    let text = paragraph("unbroken-run-of-words ", 2000);
    let config = ChunkingConfig {
        sentence_boundary_splitting: false,
        ..ChunkingConfig::default()
    };

    let chunks = chunk_text(&text, &config).expect("chunk_text should succeed");
    assert!(chunks.len() > 1);
}

#[test]
fn empty_content() {
    let config = ChunkingConfig::default();

    let chunks = chunk_text("", &config).expect("chunk_text should succeed");
    assert!(chunks.is_empty());

    let chunks = chunk_text("   \n\n   ", &config).expect("chunk_text should succeed");
    assert!(chunks.is_empty());
}
