use anyhow::{Context, Result};
use pgvector::Vector;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::database::postgres::models::{DocumentMatch, DocumentRow, NewDocument, SourceSummary};
use crate::database::postgres::queries::DocumentQueries;

pub mod models;
pub mod queries;

pub type DbPool = Pool<Postgres>;

#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Connect to the configured Postgres service and apply migrations
    #[inline]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config
            .resolve_url()
            .context("No usable database URL configured")?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await
            .context("Failed to create database connection pool")?;

        let database = Self { pool };
        database.run_migrations().await?;

        Ok(database)
    }

    /// Wrap an existing pool without running migrations
    #[inline]
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    #[inline]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    #[inline]
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");

        sqlx::migrate!("src/database/postgres/migrations")
            .run(&self.pool)
            .await
            .context("Failed to run schema migration")?;

        debug!("Database migrations completed successfully");
        Ok(())
    }

    // Document operations

    #[inline]
    pub async fn insert_documents(&self, rows: Vec<NewDocument>) -> Result<u64> {
        DocumentQueries::insert_batch(&self.pool, rows).await
    }

    #[inline]
    pub async fn match_documents(
        &self,
        query_embedding: Vector,
        match_threshold: f64,
        match_count: i32,
        match_owner: Option<&str>,
    ) -> Result<Vec<DocumentMatch>> {
        DocumentQueries::match_documents(
            &self.pool,
            query_embedding,
            match_threshold,
            match_count,
            match_owner,
        )
        .await
    }

    #[inline]
    pub async fn get_document(&self, id: Uuid) -> Result<Option<DocumentRow>> {
        DocumentQueries::get_by_id(&self.pool, id).await
    }

    #[inline]
    pub async fn delete_source(&self, filename: &str) -> Result<u64> {
        DocumentQueries::delete_by_filename(&self.pool, filename).await
    }

    #[inline]
    pub async fn list_sources(&self) -> Result<Vec<SourceSummary>> {
        DocumentQueries::list_sources(&self.pool).await
    }

    #[inline]
    pub async fn count_documents(&self) -> Result<i64> {
        DocumentQueries::count_all(&self.pool).await
    }
}
