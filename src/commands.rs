use anyhow::{Context, Result};
use itertools::Itertools;
use std::path::Path;
use tracing::{error, info};

use crate::config::Config;
use crate::database::Database;
use crate::database::models::DocumentMatch;
use crate::embeddings::ollama::OllamaClient;
use crate::ingest::Ingestor;
use crate::search::{Retriever, SearchOptions};

const PREVIEW_CHARS: usize = 240;

/// Ingest a document into the search corpus
#[inline]
pub async fn add_document(
    path: String,
    name: Option<String>,
    owner: Option<String>,
) -> Result<()> {
    let config = Config::load_default()?;

    info!("Adding document: {}", path);

    let ingestor = Ingestor::new(&config).await?;
    let report = ingestor
        .ingest_file(Path::new(&path), name.as_deref(), owner.as_deref())
        .await?;

    println!("Indexed document: {}", report.filename);
    println!("  Chunks: {}", report.chunks_created);
    println!("  Tokens (estimated): {}", report.tokens_processed);
    if report.replaced_chunks > 0 {
        println!("  Replaced previous chunks: {}", report.replaced_chunks);
    }
    println!("  Duration: {:?}", report.duration);

    Ok(())
}

/// List indexed sources with per-source statistics
#[inline]
pub async fn list_sources() -> Result<()> {
    let config = Config::load_default()?;
    let database = Database::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let sources = database.list_sources().await?;

    if sources.is_empty() {
        println!("No documents have been indexed yet.");
        println!("Use 'docsearch add <file>' to index a document.");
        return Ok(());
    }

    println!("Indexed Sources ({} total):", sources.len());
    println!();

    for source in &sources {
        println!("📄 {}", source.filename);
        println!("   Chunks: {}", source.chunk_count);
        println!("   Tokens (estimated): {}", source.token_count);
        println!(
            "   Last Indexed: {}",
            source.last_indexed.format("%Y-%m-%d %H:%M:%S")
        );
        println!();
    }

    let total_chunks: i64 = sources.iter().map(|s| s.chunk_count).sum();
    println!("Summary:");
    println!("  Total Sources: {}", sources.len());
    println!("  Total Chunks: {}", total_chunks);

    Ok(())
}

/// Delete every chunk stored for a source filename
#[inline]
pub async fn delete_source(filename: String) -> Result<()> {
    let config = Config::load_default()?;
    let database = Database::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let deleted = database.delete_source(&filename).await?;

    if deleted == 0 {
        println!("No chunks found for source: {}", filename);
        println!("Use 'docsearch list' to see indexed sources.");
    } else {
        println!("Deleted source: {} ({} chunks)", filename, deleted);
    }

    Ok(())
}

/// Run a semantic query against the corpus
#[inline]
pub async fn run_search(
    query: String,
    limit: Option<usize>,
    threshold: Option<f32>,
    owner: Option<String>,
    json: bool,
) -> Result<()> {
    let config = Config::load_default()?;

    let mut options = SearchOptions::from_config(&config);
    if let Some(limit) = limit {
        options.limit = limit;
    }
    if let Some(threshold) = threshold {
        options.threshold = threshold;
    }
    options.owner = owner;

    let retriever = Retriever::new(&config).await?;
    let matches = retriever.search(&query, &options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!(
            "No matches above similarity {:.2}.",
            options.clamped().1
        );
        println!("Try lowering the threshold with --threshold.");
        return Ok(());
    }

    let source_count = matches
        .iter()
        .filter_map(|m| m.filename.as_deref())
        .unique()
        .count();

    println!(
        "🔍 {} matches across {} sources (threshold {:.2}):",
        matches.len(),
        source_count,
        options.clamped().1
    );
    println!();

    for (i, m) in matches.iter().enumerate() {
        print_match(i + 1, m);
    }

    Ok(())
}

fn print_match(rank: usize, m: &DocumentMatch) {
    let source = m.filename.as_deref().unwrap_or("(unnamed source)");
    println!("{}. {} (similarity {:.3})", rank, source, m.similarity);
    println!("   {}", preview(&m.content));
    println!();
}

/// Single-line preview of chunk content, truncated on a char boundary
fn preview(content: &str) -> String {
    let flattened = content.split_whitespace().join(" ");
    if flattened.chars().count() <= PREVIEW_CHARS {
        flattened
    } else {
        let truncated: String = flattened.chars().take(PREVIEW_CHARS).collect();
        format!("{}…", truncated.trim_end())
    }
}

/// Show connectivity and corpus status for each subsystem
#[inline]
pub async fn show_status() -> Result<()> {
    let config = Config::load_default().unwrap_or_default();

    println!("📊 Docsearch Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("🗄️  Database Status:");
    let database = match Database::connect(&config.database).await {
        Ok(db) => {
            println!("   ✅ Postgres: Connected");
            Some(db)
        }
        Err(e) => {
            error!("Database connection failed: {}", e);
            println!("   ❌ Postgres: Failed to connect - {}", e);
            None
        }
    };

    println!();
    println!("🤖 Embedding Server Status:");
    match OllamaClient::new(&config.ollama) {
        Ok(client) => match client.health_check() {
            Ok(()) => {
                println!(
                    "   ✅ Ollama: Connected ({}:{})",
                    config.ollama.host, config.ollama.port
                );
                println!("   📋 Model: {}", config.ollama.model);
                println!("   🔢 Batch Size: {}", config.ollama.batch_size);
                println!(
                    "   📐 Embedding Dimension: {}",
                    config.ollama.embedding_dimension
                );
            }
            Err(e) => {
                println!("   ⚠️  Ollama: Connected but unhealthy - {}", e);
            }
        },
        Err(e) => {
            println!("   ❌ Ollama: Failed to connect - {}", e);
        }
    }

    if let Some(database) = database {
        println!();
        println!("📚 Corpus Overview:");
        match database.list_sources().await {
            Ok(sources) => {
                if sources.is_empty() {
                    println!("   📭 No documents indexed yet");
                } else {
                    let total_chunks: i64 = sources.iter().map(|s| s.chunk_count).sum();
                    println!("   📊 Sources: {}", sources.len());
                    println!("   📄 Chunks Indexed: {}", total_chunks);
                    if let Some(latest) = sources.first() {
                        println!(
                            "   🕒 Most Recently Indexed: {} ({})",
                            latest.filename,
                            latest.last_indexed.format("%Y-%m-%d %H:%M:%S")
                        );
                    }
                }
            }
            Err(e) => {
                println!("   ❌ Failed to load corpus statistics: {}", e);
            }
        }

        match database.count_documents().await {
            Ok(count) => println!("   🧮 Total Rows: {}", count),
            Err(e) => println!("   🧮 Total Rows: Error - {}", e),
        }
    }

    println!();
    println!("💡 Next Steps:");
    println!("   • Use 'docsearch add <file>' to index a document");
    println!("   • Use 'docsearch search <query>' to query the corpus");
    println!("   • Use 'docsearch config' to update connection settings");

    Ok(())
}
