//! Typed cells, rows and tables.
//!
//! A [`Table`] is an ordered list of shared [`Row`]s plus an [`Arc`]ed
//! [`TableSchema`]. Every filtering step builds a new `Table` over the same
//! row allocations, so the canonical table produced by the normalizer is never
//! copied or mutated by downstream stages.

use std::{fmt, sync::Arc};

use serde::Serialize;

use crate::normalize::ResolvedRoles;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

/// A single cell; `None` is an explicitly missing value.
pub type Cell = Option<Value>;

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Canonical text form of a cell. Missing cells render as the empty string.
pub fn render_cell(cell: &Cell) -> String {
    cell.as_ref().map(Value::as_display).unwrap_or_default()
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Lenient numeric coercion: anything that does not parse to a finite number becomes missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Text cells are kept verbatim; blank input is missing.
pub fn parse_text(raw: &str) -> Cell {
    if raw.trim().is_empty() {
        None
    } else {
        Some(Value::Text(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 0-based position in the canonical table.
    pub position: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.cells.get(index).and_then(|c| c.as_ref())
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(Value::as_number)
    }

    pub fn text(&self, index: usize) -> String {
        self.get(index).map(Value::as_display).unwrap_or_default()
    }

    /// Display text of a cell, `None` when the cell is missing.
    pub fn label(&self, index: usize) -> Option<String> {
        self.get(index).map(Value::as_display)
    }
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    pub columns: Vec<String>,
    pub roles: ResolvedRoles,
}

impl TableSchema {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<TableSchema>,
    rows: Vec<Arc<Row>>,
}

impl Table {
    pub fn new(schema: Arc<TableSchema>, rows: Vec<Arc<Row>>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn roles(&self) -> &ResolvedRoles {
        &self.schema.roles
    }

    pub fn headers(&self) -> &[String] {
        &self.schema.columns
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Derives a table holding the rows that satisfy `keep`, in order.
    pub fn retain<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Row) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| keep(row))
            .cloned()
            .collect();
        Table {
            schema: Arc::clone(&self.schema),
            rows,
        }
    }

    /// Same schema, explicit row list.
    pub fn with_rows(&self, rows: Vec<Arc<Row>>) -> Table {
        Table {
            schema: Arc::clone(&self.schema),
            rows,
        }
    }

    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(render_cell).collect())
            .collect()
    }

    /// Positions of the rows in the canonical table, mostly useful in tests.
    pub fn positions(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(Value::Number(100.0).as_display(), "100");
        assert_eq!(Value::Number(12.5).as_display(), "12.5");
        assert_eq!(Value::Number(-3.0).as_display(), "-3");
    }

    #[test]
    fn missing_cells_render_empty() {
        assert_eq!(render_cell(&None), "");
        assert_eq!(render_cell(&Some(Value::Text("Pune".into()))), "Pune");
    }

    #[test]
    fn parse_number_coerces_garbage_to_missing() {
        assert_eq!(parse_number(" 42.5 "), Some(42.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-Infinity"), None);
        assert_eq!(parse_number("1,200"), None);
    }

    #[test]
    fn parse_text_treats_blank_as_missing() {
        assert_eq!(parse_text("   "), None);
        assert_eq!(parse_text("Engine"), Some(Value::Text("Engine".into())));
    }

    #[test]
    fn values_serialize_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Number(1.5),
            Value::Text("x".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"[1.5,"x"]"#);
    }
}
