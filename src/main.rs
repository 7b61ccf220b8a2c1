//! # scrape_prep
//!
//! Scrapes two article sources into flat JSON snapshots and prepares their
//! text for NLP work.
//!
//! ## Features
//!
//! - Scrapes every post linked from the Codeup blog index
//! - Scrapes the news cards of a fixed set of Inshorts sections
//! - Caches each source as a JSON snapshot and can serve it back offline
//! - Cleans, tokenizes, stems and stopword-filters snapshot columns
//!
//! ## Usage
//!
//! ```sh
//! scrape_prep blog
//! scrape_prep news --cached
//! scrape_prep prepare -i codeup_blog_articles.json -c article_content -o prepared.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: fetch a source's listing page(s) and select its items
//! 2. **Extraction**: read record fields with a per-site field extractor
//! 3. **Caching**: persist the table, or serve an existing snapshot
//! 4. **Preparation**: independent text transforms over a snapshot's columns
//!
//! Requests are made one at a time and nothing is retried.

use clap::Parser;
use std::error::Error;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod error;
mod models;
mod prepare;
mod scrapers;
mod table;
mod utils;

use cli::{Cli, Command, PrepareArgs};
use prepare::StopwordOptions;
use scrapers::{HttpFetcher, codeup, inshorts};
use table::Table;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    info!(?args.command, "scrape_prep starting up");

    let result = run(args.command).await;
    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(?elapsed, "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "Execution failed"),
    }
    result.map_err(Into::into)
}

async fn run(command: Command) -> error::Result<()> {
    match command {
        Command::Blog {
            acquire,
            user_agent,
        } => {
            let config = codeup::config()
                .with_cache_dir(acquire.cache_dir)
                .with_user_agent(user_agent);
            let table =
                codeup::get_blog_articles(&HttpFetcher::new(), &config, acquire.cached).await?;
            info!(rows = table.len(), path = %config.cache_path.display(), "Blog articles ready");
            print_table(&table)
        }
        Command::News {
            acquire,
            user_agent,
            sections,
        } => {
            let config = inshorts::config()
                .with_cache_dir(acquire.cache_dir)
                .with_user_agent(user_agent);
            let table = inshorts::get_news_articles(
                &HttpFetcher::new(),
                &config,
                &sections,
                acquire.cached,
            )
            .await?;
            info!(rows = table.len(), path = %config.cache_path.display(), "News articles ready");
            print_table(&table)
        }
        Command::Prepare(args) => {
            let table = run_prepare(&args).await?;
            info!(rows = table.len(), output = %args.output.display(), "Prepared snapshot written");
            Ok(())
        }
    }
}

fn print_table(table: &Table) -> error::Result<()> {
    if table.is_empty() {
        warn!("No articles found");
    }
    info!(columns = ?table.column_names().collect::<Vec<_>>(), "Printing table");
    println!("{}", serde_json::to_string_pretty(&table.to_snapshot())?);
    Ok(())
}

/// Read a snapshot, run every preparation step over it, and write the result.
#[instrument(level = "info", skip_all, fields(input = %args.input.display(), column = %args.column))]
async fn run_prepare(args: &PrepareArgs) -> error::Result<Table> {
    let mut table = cache::read_snapshot(&args.input).await?;
    prepare::basic_clean(&mut table)?;
    prepare::tokenize(&mut table, &args.column)?;
    prepare::stem(&mut table, &args.column)?;
    let options = StopwordOptions {
        extra_words: args.extra_words.clone(),
        exclude_words: args.exclude_words.clone(),
    };
    prepare::remove_stopwords(&mut table, &args.column, &options)?;
    cache::write_snapshot(&table, &args.output).await?;
    Ok(table)
}
