//! Portfolio-level KPIs over the full upload.

use std::collections::HashSet;

use serde::Serialize;

use crate::{data::Table, sourcing::SourcingBenchmark};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub unique_parts: usize,
    pub active_suppliers: usize,
    pub vehicle_models: usize,
    /// Plain mean of every non-missing price, zeros included.
    pub average_price: Option<f64>,
    /// Spread percentage of the current scope.
    pub savings_potential_pct: f64,
}

fn distinct_count(table: &Table, column: usize) -> usize {
    table
        .rows()
        .iter()
        .filter_map(|row| row.label(column))
        .collect::<HashSet<_>>()
        .len()
}

/// `table` is the full normalized table; `scope_benchmark` comes from the current scope.
pub fn overview(table: &Table, scope_benchmark: &SourcingBenchmark) -> Overview {
    let roles = table.roles();
    let (sum, count) = table
        .rows()
        .iter()
        .filter_map(|row| row.number(roles.price))
        .fold((0.0, 0usize), |(sum, count), price| (sum + price, count + 1));
    Overview {
        unique_parts: distinct_count(table, roles.part),
        active_suppliers: distinct_count(table, roles.supplier),
        vehicle_models: distinct_count(table, roles.model),
        average_price: (count > 0).then(|| sum / count as f64),
        savings_potential_pct: scope_benchmark.spread_pct,
    }
}
