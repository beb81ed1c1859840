//! Opaque query result handed from the façade to cursors.

use rusqlite::types::Value;
use rusqlite::{Params, Statement};

/// Column names plus raw row values captured from one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Builds a result set from already-materialized rows.
    ///
    /// Rows are fitted to the column list: short rows are padded with
    /// `NULL` and extra trailing values are dropped.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        for row in &mut rows {
            row.resize(width, Value::Null);
        }
        Self { columns, rows }
    }

    /// Runs `stmt` and captures every row.
    pub(crate) fn collect<P: Params>(stmt: &mut Statement<'_>, params: P) -> rusqlite::Result<Self> {
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let width = columns.len();

        let mut rows = stmt.query(params)?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for index in 0..width {
                record.push(row.get::<_, Value>(index)?);
            }
            values.push(record);
        }

        Ok(Self {
            columns,
            rows: values,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of the first column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw value at (`row`, `column`). Out-of-range lookups return `None`.
    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|values| values.get(column))
    }
}
