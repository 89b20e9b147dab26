//! GitHub search crawler CLI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use github_search_crawler::config::CrawlConfig;
use github_search_crawler::GitHubCrawler;

/// Crawl GitHub search results and print them as JSON
#[derive(Parser)]
#[command(name = "github-search-crawler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON crawl config
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = CrawlConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    let crawler = GitHubCrawler::new(config.crawler_config()?.with_user_session_from_env())?;
    let results = crawler
        .crawl(config.keywords.as_slice(), &config.search_type())
        .await?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
