//! Plain-text and JSON rendering of result tables.

use std::{borrow::Cow, fmt::Write as _};

use serde_json::{Map, Value as JsonValue, json};

use crate::data::{Table, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A rendered grid: headers, string cells, and one alignment per column.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub align: Vec<Align>,
}

impl Grid {
    pub fn new(headers: Vec<String>) -> Self {
        let align = vec![Align::Left; headers.len()];
        Self {
            headers,
            rows: Vec::new(),
            align,
        }
    }

    pub fn right_align(mut self, columns: &[usize]) -> Self {
        for &idx in columns {
            if let Some(slot) = self.align.get_mut(idx) {
                *slot = Align::Right;
            }
        }
        self
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Grid of a data table; numeric role columns are right-aligned.
    pub fn from_table(table: &Table) -> Self {
        let roles = table.roles();
        let numeric = roles.numeric_columns().into_iter().collect::<Vec<_>>();
        let mut grid = Grid::new(table.headers().to_vec()).right_align(&numeric);
        grid.rows = table.display_rows();
        grid
    }

    pub fn render(&self) -> String {
        let column_count = self.headers.len();
        let mut widths = self
            .headers
            .iter()
            .map(|h| display_width(h))
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate().take(column_count) {
                widths[idx] = widths[idx].max(display_width(cell));
            }
        }

        let mut output = String::new();
        let _ = writeln!(output, "{}", self.format_line(&self.headers, &widths));
        let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", self.format_line(&rule, &widths));
        for row in &self.rows {
            let _ = writeln!(output, "{}", self.format_line(row, &widths));
        }
        output
    }

    fn format_line(&self, values: &[String], widths: &[usize]) -> String {
        let cells = values
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (value, width))| {
                let text = sanitize_cell(value);
                let padding = " ".repeat(width.saturating_sub(display_width(&text)));
                match self.align.get(idx).copied().unwrap_or(Align::Left) {
                    Align::Left => format!("{text}{padding}"),
                    Align::Right => format!("{padding}{text}"),
                }
            })
            .collect::<Vec<_>>();
        cells.join("  ").trim_end().to_string()
    }
}

pub fn print_grid(grid: &Grid) {
    print!("{}", grid.render());
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

/// Two decimals with thousands separators, e.g. `12,345.60`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

pub fn format_optional_amount(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_else(|| "-".to_string())
}

/// Rows as JSON objects keyed by header, with `_row` holding the 1-based input row.
pub fn table_to_json(table: &Table) -> JsonValue {
    let headers = table.headers();
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut object = Map::new();
            object.insert("_row".to_string(), json!(row.position + 1));
            for (header, cell) in headers.iter().zip(&row.cells) {
                let value = match cell {
                    Some(Value::Number(n)) => json!(n),
                    Some(Value::Text(s)) => json!(s),
                    None => JsonValue::Null,
                };
                object.insert(header.clone(), value);
            }
            JsonValue::Object(object)
        })
        .collect::<Vec<_>>();
    JsonValue::Array(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::table_from;

    #[test]
    fn grid_pads_and_right_aligns() {
        let mut grid = Grid::new(vec!["part".to_string(), "price".to_string()]).right_align(&[1]);
        grid.push(vec!["P-1".to_string(), "100".to_string()]);
        grid.push(vec!["P-22".to_string(), "7.5".to_string()]);
        let rendered = grid.render();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines, vec!["part  price", "----  -----", "P-1     100", "P-22    7.5"]);
    }

    #[test]
    fn grid_flattens_control_characters() {
        let mut grid = Grid::new(vec!["note".to_string()]);
        grid.push(vec!["line1\nline2\tend".to_string()]);
        assert_eq!(grid.render().lines().nth(2), Some("line1 line2 end"));
    }

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(50.0), "50.00");
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(-1000.0), "-1,000.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_optional_amount(None), "-");
    }

    #[test]
    fn json_rows_keep_types_and_nulls() {
        let table = table_from(&[("Engine", "", "P-1", "Acme", "12.5")]);
        let json = table_to_json(&table);
        assert_eq!(json[0]["_row"], json!(1));
        assert_eq!(json[0]["PO Price"], json!(12.5));
        assert_eq!(json[0]["Vehicle Model"], JsonValue::Null);
        assert_eq!(json[0]["PartNo"], json!("P-1"));
    }
}
