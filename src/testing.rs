//! Table builders shared by unit tests.

use crate::{config::RoleConfig, data::Table, io_utils::RawTable, normalize::normalize};

pub(crate) const BASE_HEADERS: [&str; 5] =
    ["Part Family", "Vehicle Model", "PartNo", "Vendor", "PO Price"];

/// Table with only the required columns, default roles, no plant.
pub(crate) fn table_from(rows: &[(&str, &str, &str, &str, &str)]) -> Table {
    let rows = rows
        .iter()
        .map(|(f, m, p, s, price)| vec![*f, *m, *p, *s, *price])
        .collect::<Vec<_>>();
    table_with(&BASE_HEADERS, &rows)
}

pub(crate) fn table_with(headers: &[&str], rows: &[Vec<&str>]) -> Table {
    let raw = RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    );
    normalize(&raw, &RoleConfig::default()).expect("normalize test table")
}
