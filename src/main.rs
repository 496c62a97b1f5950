use clap::{Parser, Subcommand};
use docsearch::Result;
use docsearch::commands::{add_document, delete_source, list_sources, run_search, show_status};
use docsearch::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Semantic document search over Postgres/pgvector")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the embedding server and database connection
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Index a document file into the search corpus
    Add {
        /// Path to the document to index
        file: String,
        /// Optional source name stored with the document, defaults to the file name
        #[arg(long)]
        name: Option<String>,
        /// Optional owner id stored with the document's chunks
        #[arg(long)]
        owner: Option<String>,
    },
    /// List indexed sources
    List,
    /// Delete an indexed source and all of its chunks
    Delete {
        /// Source filename to delete
        source: String,
    },
    /// Search the corpus for chunks similar to a query
    Search {
        /// Query text
        query: String,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
        /// Minimum cosine similarity for a result
        #[arg(long)]
        threshold: Option<f32>,
        /// Only return chunks stored for this owner id
        #[arg(long)]
        owner: Option<String>,
        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show connectivity and corpus status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Add { file, name, owner } => {
            add_document(file, name, owner).await?;
        }
        Commands::List => {
            list_sources().await?;
        }
        Commands::Delete { source } => {
            delete_source(source).await?;
        }
        Commands::Search {
            query,
            limit,
            threshold,
            owner,
            json,
        } => {
            run_search(query, limit, threshold, owner, json).await?;
        }
        Commands::Status => {
            show_status().await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["docsearch", "list"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::List);
        }
    }

    #[test]
    fn add_command_with_file() {
        let cli = Cli::try_parse_from(["docsearch", "add", "notes.md"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Add { file, name, owner } = parsed.command {
                assert_eq!(file, "notes.md");
                assert_eq!(name, None);
                assert_eq!(owner, None);
            }
        }
    }

    #[test]
    fn add_command_with_name_and_owner() {
        let cli = Cli::try_parse_from([
            "docsearch",
            "add",
            "notes.md",
            "--name",
            "Release Notes",
            "--owner",
            "user-42",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Add { file, name, owner } = parsed.command {
                assert_eq!(file, "notes.md");
                assert_eq!(name, Some("Release Notes".to_string()));
                assert_eq!(owner, Some("user-42".to_string()));
            }
        }
    }

    #[test]
    fn search_command_with_options() {
        let cli = Cli::try_parse_from([
            "docsearch",
            "search",
            "how do i rotate keys",
            "--limit",
            "5",
            "--threshold",
            "0.25",
            "--json",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Search {
                query,
                limit,
                threshold,
                owner,
                json,
            } = parsed.command
            {
                assert_eq!(query, "how do i rotate keys");
                assert_eq!(limit, Some(5));
                assert_eq!(threshold, Some(0.25));
                assert_eq!(owner, None);
                assert!(json);
            }
        }
    }

    #[test]
    fn config_show_flag() {
        let cli = Cli::try_parse_from(["docsearch", "config", "--show"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Config { show } = parsed.command {
                assert!(show);
            }
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["docsearch", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["docsearch", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
