//! Dataset normalization.
//!
//! Resolves the role configuration against the trimmed headers of an upload
//! exactly once, failing fast with [`SpendError::MissingColumn`], and coerces
//! the price and cost-metric columns to numbers. Every other column stays text.

use std::{collections::HashSet, sync::Arc};

use log::{debug, info, warn};

use crate::{
    config::RoleConfig,
    data::{Row, Table, TableSchema, Value, parse_number, parse_text},
    error::{SpendError, SpendResult},
    io_utils::RawTable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetric {
    pub name: String,
    pub index: usize,
    pub exclude_zero: bool,
}

/// Column indices for every logical role, resolved at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoles {
    pub family: usize,
    pub model: usize,
    pub part: usize,
    pub supplier: usize,
    pub price: usize,
    pub plant: Option<usize>,
    /// Configured metrics present in the upload, in configured order.
    pub metrics: Vec<ResolvedMetric>,
}

impl ResolvedRoles {
    fn resolve(headers: &[String], config: &RoleConfig) -> SpendResult<Self> {
        let lookup = |name: &str| headers.iter().position(|h| h == name.trim());
        let mut required = [0usize; 5];
        for (slot, (role, column)) in required.iter_mut().zip(config.required_roles()) {
            *slot = lookup(column).ok_or_else(|| SpendError::MissingColumn {
                role,
                column: column.trim().to_string(),
            })?;
        }
        let [family, model, part, supplier, price] = required;

        let plant = lookup(&config.plant);
        if plant.is_none() {
            warn!(
                "Optional column '{}' not present; plant is unavailable",
                config.plant.trim()
            );
        }

        let metrics = config
            .metrics
            .iter()
            .filter_map(|metric| {
                lookup(&metric.name).map(|index| ResolvedMetric {
                    name: metric.name.trim().to_string(),
                    index,
                    // Price is always zero-excluded.
                    exclude_zero: metric.exclude_zero || index == price,
                })
            })
            .collect::<Vec<_>>();

        Ok(Self {
            family,
            model,
            part,
            supplier,
            price,
            plant,
            metrics,
        })
    }

    /// Columns coerced to numbers: the price column plus every present metric.
    pub fn numeric_columns(&self) -> HashSet<usize> {
        std::iter::once(self.price)
            .chain(self.metrics.iter().map(|m| m.index))
            .collect()
    }
}

/// Builds the canonical typed table from raw input. `raw` is not modified.
pub fn normalize(raw: &RawTable, config: &RoleConfig) -> SpendResult<Table> {
    let headers = raw
        .headers
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();
    let mut seen = HashSet::new();
    for header in &headers {
        if !header.is_empty() && !seen.insert(header.as_str()) {
            return Err(SpendError::DuplicateColumn {
                column: header.clone(),
            });
        }
    }

    let roles = ResolvedRoles::resolve(&headers, config)?;
    debug!(
        "Resolved roles: family={}, model={}, part={}, supplier={}, price={}, plant={:?}",
        roles.family, roles.model, roles.part, roles.supplier, roles.price, roles.plant
    );
    let numeric = roles.numeric_columns();

    let width = headers.len();
    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut unparsed = 0usize;
    for (position, raw_row) in raw.rows.iter().enumerate() {
        if raw_row.len() > width {
            return Err(SpendError::RaggedRow {
                row: position + 2,
                expected: width,
                found: raw_row.len(),
            });
        }
        let cells = (0..width)
            .map(|idx| {
                let value = raw_row.get(idx).map(String::as_str).unwrap_or("");
                if numeric.contains(&idx) {
                    let parsed = parse_number(value);
                    if parsed.is_none() && !value.trim().is_empty() {
                        unparsed += 1;
                    }
                    parsed.map(Value::Number)
                } else {
                    parse_text(value)
                }
            })
            .collect();
        rows.push(Arc::new(Row { position, cells }));
    }

    if unparsed > 0 {
        debug!("{unparsed} non-numeric value(s) in metric columns treated as missing");
    }
    info!(
        "Normalized {} row(s) across {} column(s); {} metric column(s) present",
        rows.len(),
        width,
        roles.metrics.len()
    );

    let schema = TableSchema {
        columns: headers,
        roles,
    };
    Ok(Table::new(Arc::new(schema), rows))
}
