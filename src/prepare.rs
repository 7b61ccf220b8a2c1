//! Text preparation over article tables.
//!
//! These are independent steps; nothing here calls another, so a caller
//! (or the `prepare` subcommand) decides the order:
//!
//! - [`basic_clean`]: lowercase, NFKD-normalize, strip to ASCII and drop
//!   everything outside `[a-z0-9'\s]`, across every column
//! - [`tokenize`]: split a column into word and punctuation tokens
//! - [`stem`]: Snowball English stems of a column, into `stemmed`
//! - [`remove_stopwords`]: a column without English stopwords, into
//!   `no_stopwords_<column>`

use crate::error::{Error, Result};
use crate::table::Table;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, instrument};
use unicode_normalization::UnicodeNormalization;

/// Column [`stem`] writes its output to.
pub const STEMMED_COLUMN: &str = "stemmed";
/// Prefix [`remove_stopwords`] puts in front of the source column name.
pub const STOPWORD_PREFIX: &str = "no_stopwords_";
/// Words kept even though the base English list contains them.
pub const DEFAULT_EXCLUDE_WORDS: [&str; 2] = ["no", "not"];

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9'\s]").expect("allow-set pattern is valid"));

static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:'\w+)*|[^\w\s]").expect("token pattern is valid"));

/// Clean a single string the way [`basic_clean`] cleans a cell.
pub fn clean_text(text: &str) -> String {
    let ascii: String = text
        .to_lowercase()
        .nfkd()
        .filter(char::is_ascii)
        .collect();
    DISALLOWED.replace_all(&ascii, "").into_owned()
}

/// Split text into word tokens (keeping inner apostrophes) and single
/// punctuation tokens, joined by single spaces.
pub fn tokenize_text(text: &str) -> String {
    TOKEN.find_iter(text).map(|m| m.as_str()).join(" ")
}

/// Clean every cell of every column in place.
///
/// `null` cells are left alone and string arrays are cleaned element-wise.
/// Any other value fails with [`Error::NonTextColumn`] and leaves that column
/// untouched.
#[instrument(level = "info", skip_all, fields(rows = table.len()))]
pub fn basic_clean(table: &mut Table) -> Result<()> {
    for column in table.columns_mut() {
        let cleaned = column
            .values
            .iter()
            .map(|value| map_text(value, &column.name, clean_text))
            .collect::<Result<Vec<_>>>()?;
        column.values = cleaned;
        debug!(column = %column.name, "Cleaned column");
    }
    Ok(())
}

/// Tokenize `column` in place.
#[instrument(level = "info", skip(table))]
pub fn tokenize(table: &mut Table, column: &str) -> Result<()> {
    let target = table
        .column_mut(column)
        .ok_or_else(|| Error::UnknownColumn(column.to_string()))?;
    let tokenized = target
        .values
        .iter()
        .map(|value| map_text(value, column, tokenize_text))
        .collect::<Result<Vec<_>>>()?;
    target.values = tokenized;
    Ok(())
}

/// Stem every token of `column` and store the space-joined stems in
/// [`STEMMED_COLUMN`].
#[instrument(level = "info", skip(table))]
pub fn stem(table: &mut Table, column: &str) -> Result<()> {
    let stemmer = Stemmer::create(Algorithm::English);
    let stems = transform_tokens(table, column, |tokens| {
        tokens.iter().map(|token| stemmer.stem(token)).join(" ")
    })?;
    table.insert_column(STEMMED_COLUMN, stems)
}

/// Extra and excluded words layered over the base English stopword list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwordOptions {
    pub extra_words: Vec<String>,
    pub exclude_words: Vec<String>,
}

impl Default for StopwordOptions {
    fn default() -> Self {
        Self {
            extra_words: Vec::new(),
            exclude_words: DEFAULT_EXCLUDE_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Base English stopwords (the NLTK list), plus extras, minus exclusions.
pub fn stopword_set(options: &StopwordOptions) -> HashSet<String> {
    let mut words: HashSet<String> = stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .map(|w| w.to_string())
        .collect();
    words.extend(options.extra_words.iter().cloned());
    for word in &options.exclude_words {
        words.remove(word);
    }
    words
}

/// Drop stopwords from `column` and store the result in
/// `no_stopwords_<column>`.
#[instrument(level = "info", skip(table))]
pub fn remove_stopwords(table: &mut Table, column: &str, options: &StopwordOptions) -> Result<()> {
    let stopwords = stopword_set(options);
    let filtered = transform_tokens(table, column, |tokens| {
        tokens
            .iter()
            .filter(|token| !stopwords.contains(token.as_str()))
            .join(" ")
    })?;
    table.insert_column(&format!("{STOPWORD_PREFIX}{column}"), filtered)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn non_text(column: &str, value: &Value) -> Error {
    Error::NonTextColumn {
        column: column.to_string(),
        kind: value_kind(value),
    }
}

/// Apply `f` to a text cell, element-wise to a string array, and pass
/// `null` through.
fn map_text(value: &Value, column: &str, f: impl Fn(&str) -> String) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(f(s))),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(Value::String(f(s))),
                other => Err(non_text(column, other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Err(non_text(column, other)),
    }
}

/// Tokens of a cell: a string split on whitespace, or a string array as-is.
fn cell_tokens(value: &Value, column: &str) -> Result<Option<Vec<String>>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.split_whitespace().map(str::to_string).collect())),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(non_text(column, other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        other => Err(non_text(column, other)),
    }
}

fn transform_tokens(
    table: &Table,
    column: &str,
    f: impl Fn(&[String]) -> String,
) -> Result<Vec<Value>> {
    let source = table
        .column(column)
        .ok_or_else(|| Error::UnknownColumn(column.to_string()))?;
    source
        .values
        .iter()
        .map(|value| -> Result<Value> {
            Ok(match cell_tokens(value, column)? {
                Some(tokens) => Value::String(f(&tokens)),
                None => Value::Null,
            })
        })
        .collect()
}
