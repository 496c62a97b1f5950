#[cfg(test)]
mod tests;

use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored chunk row, without its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub content: String,
    pub filename: Option<String>,
    pub owner_id: Option<String>,
    pub chunk_index: i32,
    pub token_count: i32,
    pub created_at: DateTime<Utc>,
}

/// A chunk row ready for insertion
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub content: String,
    pub embedding: Vector,
    pub filename: Option<String>,
    pub owner_id: Option<String>,
    pub chunk_index: i32,
    pub token_count: i32,
}

/// One row returned by the `match_documents` SQL function
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DocumentMatch {
    pub id: Uuid,
    pub content: String,
    pub filename: Option<String>,
    pub similarity: f64,
}

/// Per-source corpus statistics
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SourceSummary {
    pub filename: String,
    pub chunk_count: i64,
    pub token_count: i64,
    pub last_indexed: DateTime<Utc>,
}
