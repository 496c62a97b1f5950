use anyhow::{Context, Result};
use pgvector::Vector;
use sqlx::{PgPool, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::models::{DocumentMatch, DocumentRow, NewDocument, SourceSummary};

pub struct DocumentQueries;

impl DocumentQueries {
    /// Insert a batch of chunk rows in a single statement
    #[inline]
    pub async fn insert_batch(pool: &PgPool, rows: Vec<NewDocument>) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO documents (content, embedding, filename, owner_id, chunk_index, token_count) ",
        );

        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.content)
                .push_bind(row.embedding)
                .push_bind(row.filename)
                .push_bind(row.owner_id)
                .push_bind(row.chunk_index)
                .push_bind(row.token_count);
        });

        let result = builder
            .build()
            .execute(pool)
            .await
            .context("Failed to insert document chunks")?;

        debug!("Inserted {} document chunks", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Query the `match_documents` SQL function: top-K chunks above the
    /// similarity threshold, ordered by descending cosine similarity
    #[inline]
    pub async fn match_documents(
        pool: &PgPool,
        query_embedding: Vector,
        match_threshold: f64,
        match_count: i32,
        match_owner: Option<&str>,
    ) -> Result<Vec<DocumentMatch>> {
        let matches = sqlx::query_as::<_, DocumentMatch>(
            "SELECT id, content, filename, similarity FROM match_documents($1, $2, $3, $4)",
        )
        .bind(query_embedding)
        .bind(match_threshold)
        .bind(match_count)
        .bind(match_owner)
        .fetch_all(pool)
        .await
        .context("Failed to run match_documents")?;

        debug!("match_documents returned {} rows", matches.len());
        Ok(matches)
    }

    #[inline]
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, content, filename, owner_id, chunk_index, token_count, created_at \
             FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get document by id")?;

        Ok(row)
    }

    /// Delete every chunk belonging to a filename, returning the row count
    #[inline]
    pub async fn delete_by_filename(pool: &PgPool, filename: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE filename = $1")
            .bind(filename)
            .execute(pool)
            .await
            .context("Failed to delete document chunks")?;

        Ok(result.rows_affected())
    }

    /// Summarize the corpus per source filename, most recently indexed first
    #[inline]
    pub async fn list_sources(pool: &PgPool) -> Result<Vec<SourceSummary>> {
        let sources = sqlx::query_as::<_, SourceSummary>(
            "SELECT filename, \
                    count(*) AS chunk_count, \
                    coalesce(sum(token_count), 0)::bigint AS token_count, \
                    max(created_at) AS last_indexed \
             FROM documents \
             WHERE filename IS NOT NULL \
             GROUP BY filename \
             ORDER BY last_indexed DESC",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list sources")?;

        Ok(sources)
    }

    #[inline]
    pub async fn count_all(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM documents")
            .fetch_one(pool)
            .await
            .context("Failed to count documents")?;

        Ok(count)
    }
}
