use super::*;
use crate::config::OllamaConfig;
use sqlx::postgres::PgPoolOptions;

/// Build an ingestor whose pool is lazy: nothing here touches the network,
/// so these tests cover the paths that fail before any backend is reached.
fn offline_ingestor() -> Ingestor {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/docsearch-test")
        .expect("lazy pool creation should not connect");
    let client = OllamaClient::new(&OllamaConfig::default()).expect("client should build");

    Ingestor::from_parts(Database::from_pool(pool), client, ChunkingConfig::default())
}

#[tokio::test]
async fn empty_document_is_rejected() {
    let ingestor = offline_ingestor();

    let result = ingestor.ingest_text("   \n\n  ", "empty.txt", None).await;

    let error = result.expect_err("empty document should be rejected");
    assert!(error.to_string().contains("no indexable text"));
}

#[tokio::test]
async fn missing_file_is_rejected() {
    let ingestor = offline_ingestor();

    let result = ingestor
        .ingest_file(Path::new("/nonexistent/document.txt"), None, None)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn file_name_defaults_from_path() {
    let ingestor = offline_ingestor();

    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("guide.md");
    std::fs::write(&path, "").expect("should write file");

    // The document is empty, so the pipeline stops after naming it
    let error = ingestor
        .ingest_file(&path, None, None)
        .await
        .expect_err("empty file should be rejected");
    assert!(error.to_string().contains("guide.md"));

    let error = ingestor
        .ingest_file(&path, Some("renamed.md"), None)
        .await
        .expect_err("empty file should be rejected");
    assert!(error.to_string().contains("renamed.md"));
}
