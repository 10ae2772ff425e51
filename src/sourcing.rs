//! Lowest-cost sourcing benchmark.
//!
//! Finds the cheapest and costliest qualifying price points in a scope, the
//! savings spread between them, and the deduplicated set of sourcing
//! combinations quoting the cheapest price. Zero prices are not quotations and
//! are excluded from both ends of the range.

use std::{collections::HashSet, fmt, sync::Arc};

use log::info;
use serde::Serialize;

use crate::{
    data::{Row, Table},
    normalize::ResolvedRoles,
    render::format_amount,
    summary::{Exemplar, extremes},
};

#[derive(Debug, Clone)]
pub struct SourcingBenchmark {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub spread: f64,
    pub spread_pct: f64,
    /// Rows quoting `min_price`, one per (part, supplier, plant) combination.
    pub candidates: Table,
    pub min_example: Option<Exemplar>,
    pub max_example: Option<Exemplar>,
}

/// Key used to collapse duplicate sourcing combinations. Plant takes part
/// only when the upload has a plant column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourcingKey {
    part: Option<String>,
    supplier: Option<String>,
    plant: Option<String>,
}

impl SourcingKey {
    fn of(row: &Row, roles: &ResolvedRoles) -> Self {
        Self {
            part: row.label(roles.part),
            supplier: row.label(roles.supplier),
            plant: roles.plant.and_then(|idx| row.label(idx)),
        }
    }
}

/// Keeps the first row per sourcing key, preserving order.
pub fn dedup_sourcing(table: &Table) -> Table {
    let roles = table.roles();
    let mut seen = HashSet::new();
    let rows = table
        .rows()
        .iter()
        .filter(|row| seen.insert(SourcingKey::of(row, roles)))
        .cloned()
        .collect::<Vec<Arc<Row>>>();
    table.with_rows(rows)
}

pub fn spread_pct(spread: f64, max_price: Option<f64>) -> f64 {
    match max_price {
        Some(max) if max != 0.0 => spread / max * 100.0,
        _ => 0.0,
    }
}

pub fn benchmark(scope: &Table) -> SourcingBenchmark {
    let roles = scope.roles();
    let price = roles.price;
    let found = extremes(scope, price, true);

    let min_price = found.as_ref().map(|f| f.min.value);
    let max_price = found.as_ref().map(|f| f.max.value);
    let spread = match (min_price, max_price) {
        (Some(min), Some(max)) => max - min,
        _ => 0.0,
    };

    let candidates = match min_price {
        Some(min) => dedup_sourcing(&scope.retain(|row| row.number(price) == Some(min))),
        None => scope.with_rows(Vec::new()),
    };

    let result = SourcingBenchmark {
        min_price,
        max_price,
        spread,
        spread_pct: spread_pct(spread, max_price),
        candidates,
        min_example: found.as_ref().map(|f| Exemplar::project(&f.min.row, roles)),
        max_example: found.as_ref().map(|f| Exemplar::project(&f.max.row, roles)),
    };
    info!(
        "Sourcing benchmark: min={:?}, max={:?}, spread={:.2} ({:.2}%), {} candidate(s)",
        result.min_price,
        result.max_price,
        result.spread,
        result.spread_pct,
        result.candidates.len()
    );
    result
}

impl SourcingBenchmark {
    pub fn narrative(&self) -> Narrative {
        match (&self.min_example, &self.max_example) {
            (Some(low), Some(high)) if self.spread > 0.0 => Narrative::Opportunity {
                high_part: high.part.clone().unwrap_or_default(),
                low_part: low.part.clone().unwrap_or_default(),
                savings_per_unit: self.spread,
                savings_pct: self.spread_pct,
            },
            _ => Narrative::Aligned,
        }
    }
}

/// Human-readable benchmarking statement for a scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Narrative {
    Opportunity {
        high_part: String,
        low_part: String,
        savings_per_unit: f64,
        savings_pct: f64,
    },
    Aligned,
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narrative::Opportunity {
                high_part,
                low_part,
                savings_per_unit,
                savings_pct,
            } => {
                writeln!(
                    f,
                    "The highest PO price part {high_part} can be benchmarked against the lowest PO price part {low_part}."
                )?;
                writeln!(
                    f,
                    "Potential savings: {} per unit ({savings_pct:.2}% reduction potential).",
                    format_amount(*savings_per_unit)
                )?;
                write!(
                    f,
                    "Share of business can be reviewed and adjusted towards the lower cost benchmark."
                )
            }
            Narrative::Aligned => write!(
                f,
                "No cost saving opportunity identified for the current selection. Pricing levels are already aligned."
            ),
        }
    }
}
