//! Three-level hierarchical narrowing: family → model → part.
//!
//! Each level's offerable values come from the scope already narrowed by the
//! levels above it, never from the full table (except family, which is the top
//! of the hierarchy). Value lists are deduplicated and sorted so repeated runs
//! over the same table offer the same choices in the same order.

use std::fmt;

use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    config::Sentinels,
    data::Table,
    error::{SpendError, SpendResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Family,
    Model,
    Part,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Family => "family",
            Stage::Model => "model",
            Stage::Part => "part",
        };
        f.write_str(label)
    }
}

/// An optional level of the cascade: either the "all" sentinel or one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Maps user input onto a choice; absent input or the sentinel text means [`Choice::All`].
    pub fn parse(value: Option<&str>, sentinel: &str) -> Self {
        match value {
            None => Choice::All,
            Some(v) if v == sentinel => Choice::All,
            Some(v) => Choice::Only(v.to_string()),
        }
    }

    pub fn label<'a>(&'a self, sentinel: &'a str) -> &'a str {
        match self {
            Choice::All => sentinel,
            Choice::Only(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub family: String,
    pub model: Choice,
    pub part: Choice,
}

impl Selection {
    pub fn family(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            model: Choice::All,
            part: Choice::All,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Choice::Only(model.into());
        self
    }

    pub fn with_part(mut self, part: impl Into<String>) -> Self {
        self.part = Choice::Only(part.into());
        self
    }
}

fn distinct_sorted(table: &Table, column: usize) -> Vec<String> {
    table
        .rows()
        .iter()
        .filter_map(|row| row.label(column))
        .sorted()
        .dedup()
        .collect()
}

fn narrow(scope: &Table, column: usize, choice: &Choice) -> Table {
    match choice {
        Choice::All => scope.clone(),
        Choice::Only(value) => scope.retain(|row| row.label(column).as_deref() == Some(value)),
    }
}

/// Families offered at the top of the hierarchy, from the full table.
pub fn family_options(table: &Table) -> Vec<String> {
    distinct_sorted(table, table.roles().family)
}

/// Models found within an already family-narrowed scope.
pub fn model_options(scope: &Table) -> Vec<String> {
    distinct_sorted(scope, scope.roles().model)
}

/// Parts found within an already model-narrowed scope.
pub fn part_options(scope: &Table) -> Vec<String> {
    distinct_sorted(scope, scope.roles().part)
}

pub fn select_family(table: &Table, family: &str) -> Table {
    let column = table.roles().family;
    table.retain(|row| row.label(column).as_deref() == Some(family))
}

pub fn select_model(scope: &Table, model: &Choice) -> Table {
    narrow(scope, scope.roles().model, model)
}

pub fn select_part(scope: &Table, part: &Choice) -> Table {
    narrow(scope, scope.roles().part, part)
}

/// Offerable values at each level for a given (possibly partial) selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Choices {
    pub families: Vec<String>,
    pub models: Vec<String>,
    pub parts: Vec<String>,
}

impl Choices {
    /// Model list as a control surface shows it: sentinel first.
    pub fn model_menu(&self, sentinels: &Sentinels) -> Vec<String> {
        std::iter::once(sentinels.all_models.clone())
            .chain(self.models.iter().cloned())
            .collect()
    }

    pub fn part_menu(&self, sentinels: &Sentinels) -> Vec<String> {
        std::iter::once(sentinels.all_parts.clone())
            .chain(self.parts.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageCounts {
    pub total: usize,
    pub family: usize,
    pub model: usize,
    pub part: usize,
}

impl StageCounts {
    fn emptied_at(&self) -> Option<Stage> {
        if self.family == 0 {
            Some(Stage::Family)
        } else if self.model == 0 {
            Some(Stage::Model)
        } else if self.part == 0 {
            Some(Stage::Part)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cascade {
    pub choices: Choices,
    pub counts: StageCounts,
    /// The scope after all three levels.
    pub scope: Table,
}

/// Runs all three levels without judging the result; an empty scope is returned as-is.
pub fn run(table: &Table, selection: &Selection) -> Cascade {
    let families = family_options(table);
    let by_family = select_family(table, &selection.family);
    let models = model_options(&by_family);
    let by_model = select_model(&by_family, &selection.model);
    let parts = part_options(&by_model);
    let scope = select_part(&by_model, &selection.part);

    let counts = StageCounts {
        total: table.len(),
        family: by_family.len(),
        model: by_model.len(),
        part: scope.len(),
    };
    debug!("Selection {selection:?} narrowed rows {counts:?}");

    Cascade {
        choices: Choices {
            families,
            models,
            parts,
        },
        counts,
        scope,
    }
}

/// Runs the cascade and halts with [`SpendError::NoData`] when the scope is empty.
pub fn apply(table: &Table, selection: &Selection) -> SpendResult<Cascade> {
    let cascade = run(table, selection);
    if let Some(stage) = cascade.counts.emptied_at() {
        warn!(
            "No data available: {} selection emptied the scope ({:?})",
            stage, selection
        );
        return Err(SpendError::NoData { stage });
    }
    info!(
        "Scope narrowed to {} of {} row(s)",
        cascade.counts.part, cascade.counts.total
    );
    Ok(cascade)
}
