use criterion::{Criterion, criterion_group, criterion_main};
use docsearch::embeddings::chunking::{ChunkingConfig, chunk_text};
use std::hint::black_box;

/// Build a document large enough to exercise paragraph and sentence splitting
fn synthetic_document() -> String {
    let paragraph = "Retrieval systems split documents into overlapping windows before \
                     embedding them. Each window is mapped to a dense vector by the \
                     embedding model. At query time the engine embeds the query and \
                     returns the nearest stored vectors above a similarity threshold.\n\n";
    paragraph.repeat(400)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let document = synthetic_document();
    let config = ChunkingConfig::default();
    c.bench_function("chunking", |b| {
        b.iter(|| chunk_text(black_box(&document), black_box(&config)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
