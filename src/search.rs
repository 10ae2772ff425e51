//! Case-insensitive substring search across every cell of a table.

use log::debug;

use crate::data::{Row, Table, render_cell};

/// Rows where at least one cell's canonical text contains `query`,
/// ignoring case. An empty query returns the input unchanged.
pub fn search(table: &Table, query: &str) -> Table {
    if query.is_empty() {
        return table.clone();
    }
    let needle = query.to_lowercase();
    let found = table.retain(|row| row_matches(row, &needle));
    debug!(
        "Search '{query}' matched {} of {} row(s)",
        found.len(),
        table.len()
    );
    found
}

/// `needle` must already be lowercased.
pub fn row_matches(row: &Row, needle: &str) -> bool {
    row.cells
        .iter()
        .any(|cell| render_cell(cell).to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::table_from;

    fn fixture() -> Table {
        table_from(&[
            ("Engine", "M1", "PX-100", "Acme Forge", "1250"),
            ("Body", "M2", "BD-7", "beta castings", "99.5"),
            ("Engine", "", "EN-3", "Core", ""),
        ])
    }

    #[test]
    fn empty_query_is_identity() {
        let table = fixture();
        assert_eq!(search(&table, "").positions(), vec![0, 1, 2]);
    }

    #[test]
    fn matching_ignores_case() {
        let table = fixture();
        assert_eq!(search(&table, "ACME").positions(), vec![0]);
        assert_eq!(search(&table, "Castings").positions(), vec![1]);
        assert_eq!(search(&table, "engine").positions(), vec![0, 2]);
    }

    #[test]
    fn numbers_match_their_canonical_text() {
        let table = fixture();
        assert_eq!(search(&table, "125").positions(), vec![0]);
        assert_eq!(search(&table, "99.5").positions(), vec![1]);
        assert!(search(&table, "1250.0").is_empty());
    }

    #[test]
    fn missing_cells_never_match_placeholder_text() {
        let table = fixture();
        assert!(search(&table, "nan").is_empty());
        assert!(search(&table, "none").is_empty());
    }

    #[test]
    fn search_on_empty_table_is_empty() {
        let empty = fixture().retain(|_| false);
        assert!(search(&empty, "x").is_empty());
    }
}
