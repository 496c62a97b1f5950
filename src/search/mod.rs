// Search module
// Embeds a query and ranks the most similar stored chunks


use anyhow::{Context, Result};
use pgvector::Vector;
use tracing::debug;

use crate::DocsearchError;
use crate::config::Config;
use crate::database::Database;
use crate::database::models::DocumentMatch;
use crate::embeddings::ollama::OllamaClient;

/// Default number of matches returned per query
pub const DEFAULT_MATCH_COUNT: usize = 10;
/// Default minimum cosine similarity for a match
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.5;

const MAX_MATCH_COUNT: usize = 100;

/// Per-query knobs for the retriever
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of matches to return
    pub limit: usize,
    /// Minimum cosine similarity for a chunk to be returned
    pub threshold: f32,
    /// Restrict matches to chunks stored for this owner
    pub owner: Option<String>,
}

impl Default for SearchOptions {
    #[inline]
    fn default() -> Self {
        Self {
            limit: DEFAULT_MATCH_COUNT,
            threshold: DEFAULT_MATCH_THRESHOLD,
            owner: None,
        }
    }
}

impl SearchOptions {
    /// Defaults taken from the loaded configuration
    #[inline]
    pub fn from_config(config: &Config) -> Self {
        Self {
            limit: config.search.match_count,
            threshold: config.search.match_threshold,
            owner: None,
        }
    }

    /// Clamp to the ranges the store accepts: limit 1..=100, threshold
    /// within the cosine similarity interval
    #[inline]
    pub fn clamped(&self) -> (i32, f64) {
        let limit = self.limit.clamp(1, MAX_MATCH_COUNT) as i32;
        let threshold = f64::from(self.threshold.clamp(-1.0, 1.0));
        (limit, threshold)
    }
}

/// Retriever over the document store: query embedding, similarity search,
/// ranked results
pub struct Retriever {
    database: Database,
    client: OllamaClient,
}

impl Retriever {
    #[inline]
    pub async fn new(config: &Config) -> Result<Self> {
        let database = Database::connect(&config.database)
            .await
            .context("Failed to initialize Postgres database")?;

        let client =
            OllamaClient::new(&config.ollama).context("Failed to initialize Ollama client")?;

        Ok(Self { database, client })
    }

    /// Build from already-connected parts
    #[inline]
    pub fn from_parts(database: Database, client: OllamaClient) -> Self {
        Self { database, client }
    }

    /// Embed the query text and return the top matches above the threshold,
    /// ordered by descending similarity
    #[inline]
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<DocumentMatch>> {
        let query = validate_query(query)?;
        let (limit, threshold) = options.clamped();

        debug!(
            "Searching: query length {}, limit {}, threshold {}, owner {:?}",
            query.len(),
            limit,
            threshold,
            options.owner
        );

        let embedding = self
            .client
            .embed(query)
            .context("Failed to generate query embedding")?;

        let matches = self
            .database
            .match_documents(
                Vector::from(embedding),
                threshold,
                limit,
                options.owner.as_deref(),
            )
            .await?;

        Ok(rank(matches))
    }
}

/// Reject queries with no searchable content before spending an embedding call
fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(DocsearchError::Search("Query must not be empty".to_string()).into());
    }
    Ok(trimmed)
}

/// Order by descending similarity; equal scores order by ascending id so
/// repeated queries return a stable ranking
fn rank(mut matches: Vec<DocumentMatch>) -> Vec<DocumentMatch> {
    matches.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.id.cmp(&b.id))
    });
    matches
}
