//! Command-line interface definitions for scrape_prep.
//!
//! Every option can be given as a flag; the cache directory and per-site
//! user-agents can also come from the environment.

use crate::prepare::DEFAULT_EXCLUDE_WORDS;
use crate::scrapers::{codeup, inshorts};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for scrape_prep.
///
/// # Examples
///
/// ```sh
/// # Scrape the blog and write ./codeup_blog_articles.json
/// scrape_prep blog
///
/// # Reuse the news snapshot from a previous run
/// scrape_prep news --cached --cache-dir ./data
///
/// # Clean, tokenize, stem and filter one column of a snapshot
/// scrape_prep prepare -i codeup_blog_articles.json -c article_content -o prepared.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape Codeup blog posts (or reload them from the snapshot)
    Blog {
        #[command(flatten)]
        acquire: AcquireArgs,

        /// User-agent sent to codeup.com
        #[arg(long, env = "CODEUP_USER_AGENT", default_value = codeup::USER_AGENT)]
        user_agent: String,
    },

    /// Scrape Inshorts section cards (or reload them from the snapshot)
    News {
        #[command(flatten)]
        acquire: AcquireArgs,

        /// User-agent sent to inshorts.com
        #[arg(long, env = "INSHORTS_USER_AGENT", default_value = inshorts::USER_AGENT)]
        user_agent: String,

        /// Comma-separated section slugs to read
        #[arg(long, value_delimiter = ',', default_values = inshorts::SECTIONS)]
        sections: Vec<String>,
    },

    /// Clean, tokenize, stem and stopword-filter a snapshot column
    Prepare(PrepareArgs),
}

#[derive(Args, Debug)]
pub struct AcquireArgs {
    /// Serve the existing snapshot instead of fetching; fails if there is none
    #[arg(long)]
    pub cached: bool,

    /// Directory holding the snapshot files
    #[arg(long, env = "SCRAPE_PREP_CACHE_DIR", default_value = ".")]
    pub cache_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Snapshot to read
    #[arg(short, long)]
    pub input: PathBuf,

    /// Text column to tokenize, stem and filter
    #[arg(short, long)]
    pub column: String,

    /// Where to write the prepared snapshot
    #[arg(short, long)]
    pub output: PathBuf,

    /// Comma-separated words to treat as stopwords on top of the English list
    #[arg(long, value_delimiter = ',')]
    pub extra_words: Vec<String>,

    /// Comma-separated words never to drop
    #[arg(long, value_delimiter = ',', default_values = DEFAULT_EXCLUDE_WORDS)]
    pub exclude_words: Vec<String>,
}
