//! Per-metric min/max summarization with representative rows.

use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::{
    data::{Row, Table},
    normalize::ResolvedRoles,
};

/// Display fields of the row chosen to illustrate an extremum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exemplar {
    /// 0-based position in the canonical table.
    pub position: usize,
    pub part: Option<String>,
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant: Option<String>,
    #[serde(skip)]
    pub row: Arc<Row>,
}

impl Exemplar {
    pub fn project(row: &Arc<Row>, roles: &ResolvedRoles) -> Self {
        Self {
            position: row.position,
            part: row.label(roles.part),
            supplier: row.label(roles.supplier),
            plant: roles.plant.and_then(|idx| row.label(idx)),
            row: Arc::clone(row),
        }
    }
}

/// An extremum and the first row (in scope order) holding exactly that value.
#[derive(Debug, Clone)]
pub(crate) struct Extremum {
    pub value: f64,
    pub row: Arc<Row>,
}

#[derive(Debug, Clone)]
pub(crate) struct Extremes {
    pub min: Extremum,
    pub max: Extremum,
}

/// Min and max of a numeric column over `scope`, ignoring missing values and,
/// when `exclude_zero` holds, values equal to zero. `None` when nothing qualifies.
///
/// Only strictly smaller (larger) values replace the running extremum, so ties
/// resolve to the earliest row.
pub(crate) fn extremes(scope: &Table, column: usize, exclude_zero: bool) -> Option<Extremes> {
    let mut found: Option<Extremes> = None;
    for row in scope.rows() {
        let Some(value) = row.number(column) else {
            continue;
        };
        if exclude_zero && value == 0.0 {
            continue;
        }
        match found.as_mut() {
            None => {
                found = Some(Extremes {
                    min: Extremum {
                        value,
                        row: Arc::clone(row),
                    },
                    max: Extremum {
                        value,
                        row: Arc::clone(row),
                    },
                });
            }
            Some(current) => {
                if value < current.min.value {
                    current.min = Extremum {
                        value,
                        row: Arc::clone(row),
                    };
                }
                if value > current.max.value {
                    current.max = Extremum {
                        value,
                        row: Arc::clone(row),
                    };
                }
            }
        }
    }
    found
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: String,
    pub min: f64,
    pub min_example: Exemplar,
    pub max: f64,
    pub max_example: Exemplar,
}

/// One entry per configured metric that is present and has at least one
/// qualifying value, in configured order.
pub fn summarize(scope: &Table) -> Vec<MetricSummary> {
    let roles = scope.roles();
    let summaries = roles
        .metrics
        .iter()
        .filter_map(|metric| {
            let Some(found) = extremes(scope, metric.index, metric.exclude_zero) else {
                debug!("Metric '{}' has no qualifying values; skipped", metric.name);
                return None;
            };
            Some(MetricSummary {
                metric: metric.name.clone(),
                min: found.min.value,
                min_example: Exemplar::project(&found.min.row, roles),
                max: found.max.value,
                max_example: Exemplar::project(&found.max.row, roles),
            })
        })
        .collect::<Vec<_>>();
    info!(
        "Summarized {} metric(s) over {} row(s)",
        summaries.len(),
        scope.len()
    );
    summaries
}
