//! Column-indexed view over ISS table sections.
//!
//! Every ISS response carries one object per requested section, shaped as
//! `{"columns": [...], "data": [[...], ...]}`. Column order depends on the
//! query, so fields are always looked up by name through an index resolved
//! once per response.

use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    index: HashMap<String, usize>,
}

impl ProviderTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            columns,
            rows,
            index,
        }
    }

    /// Decode `section` out of a parsed response body.
    ///
    /// An absent body, an absent section, or a section that is not shaped
    /// like a table yields an empty table.
    pub fn from_response(body: Option<&Value>, section: &str) -> Self {
        let Some(table) = body.and_then(|b| b.get(section)) else {
            return Self::default();
        };

        let columns: Option<Vec<String>> = match table.get("columns") {
            Some(Value::Array(cols)) => cols
                .iter()
                .map(|c| c.as_str().map(str::to_string))
                .collect(),
            _ => Some(Vec::new()),
        };
        let Some(columns) = columns else {
            return Self::default();
        };

        let rows = match table.get("data") {
            Some(Value::Array(data)) => data
                .iter()
                .filter_map(|row| row.as_array().cloned())
                .collect(),
            _ => Vec::new(),
        };

        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there is nothing addressable: no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            index: &self.index,
            values,
        })
    }

    pub fn first(&self) -> Option<Row<'_>> {
        if self.columns.is_empty() {
            return None;
        }
        self.rows().next()
    }
}

/// One row of a [`ProviderTable`], addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: &'a HashMap<String, usize>,
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Cell value, or `None` when the column is missing, the row is short,
    /// or the cell is `null`.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let i = *self.index.get(column)?;
        match self.values.get(i) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    pub fn str(&self, column: &str) -> Option<&'a str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Numeric cell. ISS sends most numbers as JSON numbers but a few
    /// endpoints quote them.
    pub fn f64(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
