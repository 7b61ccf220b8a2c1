//! Column-ordered article table and its JSON snapshot layout.
//!
//! A [`Table`] is the in-memory form of an article collection: each record
//! is a row, each record field a column. Cells are [`serde_json::Value`]s so
//! the cleaning steps can tell text from everything else without a schema.
//!
//! # Snapshot Layout
//!
//! Snapshots use the column-keyed layout pandas writes by default:
//!
//! ```text
//! {
//!   "title":   { "0": "First post", "1": "Second post" },
//!   "content": { "0": "...",        "1": "..." }
//! }
//! ```
//!
//! Column order is kept as written. Row keys are decimal indices and are
//! ordered numerically on read.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A named column of cells, one per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from serializable records. Columns appear in the order
    /// fields are first seen; a field missing from a record becomes `null`.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self> {
        let mut table = Self::new();
        for record in records {
            let Value::Object(fields) = serde_json::to_value(record)? else {
                return Err(Error::MalformedSnapshot(
                    "records must serialize to flat objects".to_string(),
                ));
            };
            let row = table.rows;
            for (name, value) in fields {
                let column = table.column_entry(&name);
                column.values.push(value);
            }
            table.rows = row + 1;
            for column in &mut table.columns {
                column.values.resize(table.rows, Value::Null);
            }
        }
        Ok(table)
    }

    /// Deserialize every row back into a typed record.
    #[cfg(test)]
    pub fn to_records<T: serde::de::DeserializeOwned>(&self) -> Result<Vec<T>> {
        (0..self.rows)
            .map(|row| {
                let fields: Map<String, Value> = self
                    .columns
                    .iter()
                    .map(|c| (c.name.clone(), c.values[row].clone()))
                    .collect();
                serde_json::from_value(Value::Object(fields)).map_err(Error::from)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Replace the column called `name`, or append it if there is none.
    ///
    /// `values` must hold exactly one cell per row.
    pub fn insert_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if values.len() != self.rows {
            return Err(Error::ColumnLength {
                column: name.to_string(),
                expected: self.rows,
                actual: values.len(),
            });
        }
        match self.column_mut(name) {
            Some(column) => column.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }

    fn column_entry(&mut self, name: &str) -> &mut Column {
        let idx = match self.columns.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.columns.push(Column {
                    name: name.to_string(),
                    values: vec![Value::Null; self.rows],
                });
                self.columns.len() - 1
            }
        };
        &mut self.columns[idx]
    }

    /// Convert to the column-keyed snapshot value.
    pub fn to_snapshot(&self) -> Value {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let cells: Map<String, Value> = column
                    .values
                    .iter()
                    .enumerate()
                    .map(|(row, value)| (row.to_string(), value.clone()))
                    .collect();
                (column.name.clone(), Value::Object(cells))
            })
            .collect::<Map<String, Value>>();
        Value::Object(columns)
    }

    /// Rebuild a table from a column-keyed snapshot value.
    ///
    /// Row keys only order the rows: they are sorted numerically and
    /// compacted, so gaps left by dropped rows do not become empty rows.
    pub fn from_snapshot(snapshot: Value) -> Result<Self> {
        let Value::Object(columns) = snapshot else {
            return Err(Error::MalformedSnapshot(
                "top level must be an object of columns".to_string(),
            ));
        };

        let mut parsed = Vec::with_capacity(columns.len());
        let mut keys = BTreeSet::new();
        for (name, cells) in columns {
            let Value::Object(cells) = cells else {
                return Err(Error::MalformedSnapshot(format!(
                    "column `{name}` must be an object keyed by row index"
                )));
            };
            let mut indexed = Vec::with_capacity(cells.len());
            for (key, value) in cells {
                let row = key.parse::<u64>().map_err(|_| {
                    Error::MalformedSnapshot(format!(
                        "column `{name}` has non-numeric row key `{key}`"
                    ))
                })?;
                keys.insert(row);
                indexed.push((row, value));
            }
            parsed.push((name, indexed));
        }

        let positions: BTreeMap<u64, usize> = keys
            .into_iter()
            .enumerate()
            .map(|(pos, key)| (key, pos))
            .collect();
        let rows = positions.len();

        let columns = parsed
            .into_iter()
            .map(|(name, indexed)| {
                let mut values = vec![Value::Null; rows];
                for (key, value) in indexed {
                    values[positions[&key]] = value;
                }
                Column { name, values }
            })
            .collect();
        Ok(Self { columns, rows })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_snapshot())?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlogArticle, NewsArticle};
    use serde_json::json;

    fn blog_articles() -> Vec<BlogArticle> {
        vec![
            BlogArticle {
                title: "Why Data Science?".to_string(),
                date_published: Some("Sep 30, 2021".to_string()),
                article_content: "Data is everywhere.".to_string(),
            },
            BlogArticle {
                title: "Café Résumé Tips".to_string(),
                date_published: None,
                article_content: "Write it well.".to_string(),
            },
        ]
    }

    #[test]
    fn test_from_records_keeps_field_order() {
        let table = Table::from_records(&blog_articles()).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["title", "date_published", "article_content"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("date_published").unwrap().values[1], Value::Null);
    }

    #[test]
    fn test_snapshot_round_trip_preserves_records() {
        let articles = vec![NewsArticle {
            section: "technology".to_string(),
            title: "New chip".to_string(),
            author: None,
            content: "Faster than ever.".to_string(),
            date_published: Some("Friday".to_string()),
        }];
        let table = Table::from_records(&articles).unwrap();
        let json = table.to_json_string().unwrap();
        let back = Table::from_json_str(&json).unwrap();
        assert_eq!(back, table);
        let records: Vec<NewsArticle> = back.to_records().unwrap();
        assert_eq!(records, articles);
    }

    #[test]
    fn test_snapshot_layout_matches_column_orient() {
        let table = Table::from_records(&blog_articles()).unwrap();
        let snapshot = table.to_snapshot();
        assert_eq!(snapshot["title"]["0"], json!("Why Data Science?"));
        assert_eq!(snapshot["title"]["1"], json!("Café Résumé Tips"));
        assert_eq!(snapshot["date_published"]["1"], Value::Null);
    }

    #[test]
    fn test_from_snapshot_orders_rows_numerically() {
        let mut cells = Map::new();
        for row in (0..12).rev() {
            cells.insert(row.to_string(), json!(format!("row {row}")));
        }
        let snapshot = json!({ "title": Value::Object(cells) });
        let table = Table::from_snapshot(snapshot).unwrap();
        let values = &table.column("title").unwrap().values;
        assert_eq!(values.len(), 12);
        assert_eq!(values[2], json!("row 2"));
        assert_eq!(values[10], json!("row 10"));
    }

    #[test]
    fn test_from_snapshot_fills_missing_cells_with_null() {
        let snapshot = json!({
            "title": { "0": "a", "1": "b" },
            "author": { "0": "x" }
        });
        let table = Table::from_snapshot(snapshot).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("author").unwrap().values[1], Value::Null);
    }

    #[test]
    fn test_from_snapshot_rejects_bad_row_key() {
        let snapshot = json!({ "title": { "first": "a" } });
        let err = Table::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn test_empty_table_round_trip() {
        let table = Table::from_records::<BlogArticle>(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.to_json_string().unwrap(), "{}");
        assert!(Table::from_json_str("{}").unwrap().is_empty());
    }

    #[test]
    fn test_insert_column_replaces_existing() {
        let mut table = Table::from_records(&blog_articles()).unwrap();
        table.insert_column("title", vec![json!("x"), json!("y")]).unwrap();
        table.insert_column("stemmed", vec![json!("a"), json!("b")]).unwrap();
        assert_eq!(table.column("title").unwrap().values[0], json!("x"));
        assert_eq!(table.column_names().last(), Some("stemmed"));
        assert_eq!(table.column_names().count(), 4);
    }

    #[test]
    fn test_insert_column_rejects_wrong_length() {
        let mut table = Table::from_records(&blog_articles()).unwrap();
        let err = table.insert_column("stemmed", vec![json!("a")]).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnLength { expected: 2, actual: 1, .. }
        ));
        assert!(table.column("stemmed").is_none());
    }

    #[test]
    fn test_from_snapshot_compacts_row_gaps() {
        let snapshot = json!({
            "title": { "0": "First", "5": "Second" },
            "date_published": { "0": null, "5": "Oct 1, 2021" },
            "article_content": { "0": "a", "5": "b" }
        });
        let table = Table::from_snapshot(snapshot).unwrap();
        assert_eq!(table.len(), 2);
        let records: Vec<BlogArticle> = table.to_records().unwrap();
        assert_eq!(records[0].title, "First");
        assert_eq!(records[1].title, "Second");
        assert_eq!(records[1].date_published.as_deref(), Some("Oct 1, 2021"));
    }

    #[test]
    fn test_from_snapshot_huge_row_keys() {
        let snapshot = json!({
            "title": { "18446744073709551615": "last", "100000000000": "middle", "3": "first" }
        });
        let table = Table::from_snapshot(snapshot).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.column("title").unwrap().values,
            vec![json!("first"), json!("middle"), json!("last")]
        );
    }

    #[test]
    fn test_from_snapshot_rejects_out_of_range_row_key() {
        let snapshot = json!({ "title": { "18446744073709551616": "a" } });
        let err = Table::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }
}
