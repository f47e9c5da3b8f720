use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod client;
mod commands;
mod util;

use client::ApiClient;
use commands::favorites::FavoritesCommands;

#[derive(Parser)]
#[command(name = "toolshelf", version, about = "Toolshelf CLI: browse AI tools and manage favorites")]
struct Cli {
    /// API base URL
    #[arg(long, env = "TOOLSHELF_API_URL", default_value = "http://localhost:3001/api")]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "TOOLSHELF_TIMEOUT_SECS", default_value_t = client::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// List tools, optionally filtered by category and search term
    Tools {
        /// Only tools in this category (case-insensitive)
        #[arg(long)]
        category: Option<String>,
        /// Match name, category, description or tags (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List categories
    Categories,
    /// Catalog statistics
    Stats,
    /// Favorite operations
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TOOLSHELF_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match ApiClient::new(&cli.api_url, Duration::from_secs(cli.timeout_secs)) {
        Ok(client) => client,
        Err(e) => util::exit_error(&e.to_string(), Some("Check --api-url / TOOLSHELF_API_URL.")),
    };

    let code = match cli.command {
        Commands::Health => commands::health::run(&client).await,
        Commands::Tools {
            category,
            search,
            json,
        } => commands::catalog::tools(&client, category, search, json).await,
        Commands::Categories => commands::catalog::categories(&client).await,
        Commands::Stats => commands::catalog::stats(&client).await,
        Commands::Favorites { command } => commands::favorites::run(&client, command).await,
    };

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_favorites_add() {
        let cli = Cli::try_parse_from(["toolshelf", "favorites", "add", "5"]).unwrap();
        match cli.command {
            Commands::Favorites {
                command: FavoritesCommands::Add { tool_id },
            } => assert_eq!(tool_id, 5),
            _ => panic!("expected favorites add"),
        }
    }

    #[test]
    fn rejects_non_numeric_tool_id() {
        assert!(Cli::try_parse_from(["toolshelf", "favorites", "remove", "abc"]).is_err());
    }
}
