// Embeddings module
// Handles content chunking and embedding generation via Ollama

pub mod chunking;
pub mod ollama;

pub use chunking::{ChunkingConfig, TextChunk, chunk_text, estimate_token_count};
pub use ollama::{ChunkEmbedding, OllamaClient};
