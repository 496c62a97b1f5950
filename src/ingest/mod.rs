// Ingest module
// Runs the chunk -> embed -> store pipeline for one document at a time

#[cfg(test)]
mod tests;

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::DocsearchError;
use crate::config::Config;
use crate::database::Database;
use crate::database::models::NewDocument;
use crate::embeddings::chunking::{ChunkingConfig, chunk_text};
use crate::embeddings::ollama::OllamaClient;

/// Pipeline orchestrator: chunks a document, embeds the chunks, and stores
/// the resulting rows
pub struct Ingestor {
    database: Database,
    client: OllamaClient,
    chunking: ChunkingConfig,
    batch_size: usize,
    show_progress: bool,
}

/// Outcome of ingesting a single document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub filename: String,
    pub chunks_created: usize,
    pub embeddings_generated: usize,
    pub tokens_processed: usize,
    pub replaced_chunks: u64,
    pub duration: Duration,
}

impl Ingestor {
    #[inline]
    pub async fn new(config: &Config) -> Result<Self> {
        let database = Database::connect(&config.database)
            .await
            .context("Failed to initialize Postgres database")?;

        let client =
            OllamaClient::new(&config.ollama).context("Failed to initialize Ollama client")?;

        Ok(Self {
            database,
            client,
            chunking: config.chunking.clone(),
            batch_size: config.ollama.batch_size as usize,
            show_progress: true,
        })
    }

    /// Build from already-connected parts
    #[inline]
    pub fn from_parts(database: Database, client: OllamaClient, chunking: ChunkingConfig) -> Self {
        Self {
            database,
            client,
            chunking,
            batch_size: 16,
            show_progress: false,
        }
    }

    #[inline]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Ingest a document from disk. The stored filename defaults to the
    /// file's name and can be overridden with `name`.
    #[inline]
    pub async fn ingest_file(
        &self,
        path: &Path,
        name: Option<&str>,
        owner: Option<&str>,
    ) -> Result<IngestReport> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;

        let filename = match name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    DocsearchError::Ingest(format!("Not a file path: {}", path.display()))
                })?,
        };

        self.ingest_text(&text, &filename, owner).await
    }

    /// Ingest raw document text under a source filename. Re-ingesting a
    /// filename replaces its previous chunks.
    #[inline]
    pub async fn ingest_text(
        &self,
        text: &str,
        filename: &str,
        owner: Option<&str>,
    ) -> Result<IngestReport> {
        let started = Instant::now();

        info!("Ingesting document '{}'", filename);

        let chunks = chunk_text(text, &self.chunking)
            .with_context(|| format!("Failed to chunk document '{}'", filename))?;

        if chunks.is_empty() {
            return Err(DocsearchError::Ingest(format!(
                "Document '{}' contains no indexable text",
                filename
            ))
            .into());
        }

        debug!("Document '{}' produced {} chunks", filename, chunks.len());

        // Replace any previous version of this document
        let replaced_chunks = self
            .database
            .delete_source(filename)
            .await
            .with_context(|| format!("Failed to replace existing chunks for '{}'", filename))?;

        if replaced_chunks > 0 {
            warn!(
                "Replacing {} existing chunks for '{}'",
                replaced_chunks, filename
            );
        }

        let progress = self.create_progress_bar(chunks.len() as u64)?;

        let mut embeddings_generated = 0;
        let mut tokens_processed = 0;

        for batch in chunks.chunks(self.batch_size.max(1)) {
            let embedded = self
                .client
                .embed_chunks(batch)
                .with_context(|| format!("Failed to embed chunks for '{}'", filename))?;

            let rows: Vec<NewDocument> = embedded
                .into_iter()
                .map(|chunk| NewDocument {
                    content: chunk.content,
                    embedding: chunk.embedding.into(),
                    filename: Some(filename.to_string()),
                    owner_id: owner.map(str::to_string),
                    chunk_index: chunk.chunk_index.try_into().unwrap_or(i32::MAX),
                    token_count: chunk.token_count.try_into().unwrap_or(i32::MAX),
                })
                .collect();

            embeddings_generated += rows.len();
            tokens_processed += batch.iter().map(|c| c.token_count).sum::<usize>();

            self.database
                .insert_documents(rows)
                .await
                .with_context(|| format!("Failed to store chunks for '{}'", filename))?;

            progress.inc(batch.len() as u64);
        }

        progress.finish_and_clear();

        let report = IngestReport {
            filename: filename.to_string(),
            chunks_created: chunks.len(),
            embeddings_generated,
            tokens_processed,
            replaced_chunks,
            duration: started.elapsed(),
        };

        info!(
            "Ingested '{}': {} chunks, {} tokens in {:?}",
            report.filename, report.chunks_created, report.tokens_processed, report.duration
        );

        Ok(report)
    }

    fn create_progress_bar(&self, len: u64) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let progress = ProgressBar::new(len);
        progress.set_style(
            ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} chunks embedded")
                .context("Invalid progress bar template")?
                .progress_chars("=> "),
        );
        Ok(progress)
    }
}
