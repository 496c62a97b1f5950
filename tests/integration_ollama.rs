#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// Integration tests that require a local Ollama instance with the embedding
// model pulled. Run with:
//   cargo test --test integration_ollama -- --ignored

use docsearch::config::OllamaConfig;
use docsearch::embeddings::chunking::{ChunkingConfig, chunk_text};
use docsearch::embeddings::ollama::OllamaClient;
use std::env;
use std::time::Duration;
use tracing::info;

const TEST_MODEL: &str = "mxbai-embed-large:latest";
const DEFAULT_OLLAMA_HOST: &str = "localhost";
const DEFAULT_OLLAMA_PORT: u16 = 11434;

fn create_integration_test_client() -> OllamaClient {
    let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
    let port = env::var("OLLAMA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_OLLAMA_PORT);
    let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| TEST_MODEL.to_string());

    let config = OllamaConfig {
        host,
        port,
        model,
        batch_size: 5, // Smaller batch size for testing
        ..OllamaConfig::default()
    };

    OllamaClient::new(&config)
        .expect("Failed to create Ollama client")
        .with_timeout(Duration::from_secs(60)) // Longer timeout for embedding generation
        .with_retry_attempts(3)
}

fn init_test_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init()
        .ok(); // Ignore error if already initialized
}

#[test]
#[ignore = "requires a running Ollama instance with the embedding model pulled"]
fn real_ollama_health_check() {
    init_test_tracing();

    let client = create_integration_test_client();

    info!("Testing health check against real Ollama instance");
    let result = client.health_check();

    assert!(
        result.is_ok(),
        "Health check should succeed with local Ollama: {:?}",
        result
    );
}

#[test]
#[ignore = "requires a running Ollama instance with the embedding model pulled"]
fn real_ollama_single_embedding() {
    init_test_tracing();

    let client = create_integration_test_client();

    let embedding = client
        .embed("The sky above the port was the color of television.")
        .expect("embedding generation should succeed");

    assert_eq!(embedding.len(), client.dimension());
    assert!(embedding.iter().any(|v| *v != 0.0));
}

#[test]
#[ignore = "requires a running Ollama instance with the embedding model pulled"]
fn real_ollama_chunk_pipeline() {
    init_test_tracing();

    let client = create_integration_test_client();
    let text = "Rust is a systems programming language. \
                It emphasizes memory safety without garbage collection. "
        .repeat(120);

    let chunks = chunk_text(&text, &ChunkingConfig::default()).expect("chunking should succeed");
    assert!(!chunks.is_empty());

    let embedded = client
        .embed_chunks(&chunks)
        .expect("chunk embedding should succeed");

    assert_eq!(embedded.len(), chunks.len());
    for chunk in &embedded {
        assert_eq!(chunk.embedding.len(), client.dimension());
    }
}

#[test]
#[ignore = "requires a running Ollama instance with the embedding model pulled"]
fn real_ollama_similar_texts_score_higher() {
    init_test_tracing();

    let client = create_integration_test_client();

    let query = client.embed("How do I install the database?").expect("embed");
    let close = client
        .embed("Installing the database requires running the setup script.")
        .expect("embed");
    let far = client
        .embed("The weather in the mountains was cold and windy.")
        .expect("embed");

    let close_score = cosine_similarity(&query, &close);
    let far_score = cosine_similarity(&query, &far);

    assert!(
        close_score > far_score,
        "related text should score higher: {} vs {}",
        close_score,
        far_score
    );
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm_a * norm_b)
}
