//! Crate-wide error type.
//!
//! Every acquisition and preparation routine returns [`Result`]. Nothing is
//! retried and nothing is swallowed: the first failure is handed back to the
//! caller, which for the binary means it is logged and the process exits.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("No element found for selector `{selector}`")]
    MissingElement { selector: &'static str },

    #[error("Element `{selector}` has no `{attribute}` attribute")]
    MissingAttribute {
        attribute: &'static str,
        selector: &'static str,
    },

    #[error("No cached file exists at {}; rerun without --cached to fetch it", path.display())]
    CacheMissing { path: PathBuf },

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Column `{column}` has {actual} values but the table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column `{column}` holds a {kind} value; only text can be cleaned")]
    NonTextColumn { column: String, kind: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
