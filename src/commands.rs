//! Command handlers: load, normalize, run a pipeline stage, render.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use serde_json::json;

use crate::{
    cascade::{self, Cascade, Choice, Selection},
    cli::{
        ChoicesArgs, ConfigArgs, InputArgs, OutputFormat, ReportArgs, ScopeArgs, SelectionArgs,
        SourcingArgs,
    },
    config::{RoleConfig, Sentinels},
    data::{Table, format_number},
    io_utils, normalize,
    overview::overview,
    render::{Grid, format_amount, format_optional_amount, print_grid, table_to_json},
    search::search,
    sourcing::{SourcingBenchmark, benchmark},
    summary::{MetricSummary, summarize},
};

/// Reads and normalizes the upload described by `args`.
pub fn load_table(args: &InputArgs) -> Result<(RoleConfig, Table)> {
    let config = RoleConfig::load_or_default(args.config.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!(
        "Loading '{}' with delimiter '{}'",
        args.input.display(),
        crate::printable_delimiter(delimiter)
    );
    let raw = io_utils::read_raw_table_from_path(&args.input, delimiter, encoding)?;
    let table = normalize::normalize(&raw, &config)
        .with_context(|| format!("Normalizing {:?}", args.input))?;
    Ok((config, table))
}

fn selection(args: &SelectionArgs, sentinels: &Sentinels) -> Selection {
    Selection {
        family: args.family.clone(),
        model: Choice::parse(args.model.as_deref(), &sentinels.all_models),
        part: Choice::parse(args.part.as_deref(), &sentinels.all_parts),
    }
}

fn scoped(input: &InputArgs, args: &SelectionArgs) -> Result<(Table, Cascade)> {
    let (config, table) = load_table(input)?;
    let selection = selection(args, &config.sentinels);
    let cascade = cascade::apply(&table, &selection)?;
    Ok((table, cascade))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Serializing JSON output")?;
    println!("{rendered}");
    Ok(())
}

pub fn execute_choices(args: &ChoicesArgs) -> Result<()> {
    let (config, table) = load_table(&args.input)?;
    let sentinels = &config.sentinels;
    let choices = match &args.family {
        None => cascade::Choices {
            families: cascade::family_options(&table),
            ..Default::default()
        },
        Some(family) => {
            let selection = Selection {
                family: family.clone(),
                model: Choice::parse(args.model.as_deref(), &sentinels.all_models),
                part: Choice::All,
            };
            cascade::run(&table, &selection).choices
        }
    };

    match args.format {
        OutputFormat::Json => print_json(&choices)?,
        OutputFormat::Table => {
            println!("Families: {}", choices.families.join(", "));
            if args.family.is_some() {
                println!("Models: {}", choices.model_menu(sentinels).join(", "));
                println!("Parts: {}", choices.part_menu(sentinels).join(", "));
            }
        }
    }
    Ok(())
}

pub fn execute_scope(args: &ScopeArgs) -> Result<()> {
    let (_, cascade) = scoped(&args.input, &args.selection)?;
    let rows = match args.search.as_deref() {
        Some(query) => search(&cascade.scope, query),
        None => cascade.scope,
    };

    if let Some(path) = &args.output {
        let delimiter = io_utils::resolve_input_delimiter(path, None);
        io_utils::write_table_csv(&rows, Some(path.as_path()), delimiter)?;
        info!("Wrote {} row(s) to {:?}", rows.len(), path);
        return Ok(());
    }
    match args.format {
        OutputFormat::Json => print_json(&table_to_json(&rows))?,
        OutputFormat::Table => print_grid(&Grid::from_table(&rows)),
    }
    info!("Displayed {} row(s)", rows.len());
    Ok(())
}

fn summary_grid(summaries: &[MetricSummary], with_plant: bool) -> Grid {
    let mut headers = vec!["metric", "min", "min part", "min supplier"];
    if with_plant {
        headers.push("min plant");
    }
    headers.extend(["max", "max part", "max supplier"]);
    if with_plant {
        headers.push("max plant");
    }
    let max_col = if with_plant { 5 } else { 4 };
    let mut grid = Grid::new(headers.into_iter().map(String::from).collect())
        .right_align(&[1, max_col]);

    for entry in summaries {
        let mut row = vec![
            entry.metric.clone(),
            format_number(entry.min),
            entry.min_example.part.clone().unwrap_or_default(),
            entry.min_example.supplier.clone().unwrap_or_default(),
        ];
        if with_plant {
            row.push(entry.min_example.plant.clone().unwrap_or_default());
        }
        row.extend([
            format_number(entry.max),
            entry.max_example.part.clone().unwrap_or_default(),
            entry.max_example.supplier.clone().unwrap_or_default(),
        ]);
        if with_plant {
            row.push(entry.max_example.plant.clone().unwrap_or_default());
        }
        grid.push(row);
    }
    grid
}

pub fn execute_summary(args: &ReportArgs) -> Result<()> {
    let (_, cascade) = scoped(&args.input, &args.selection)?;
    let summaries = summarize(&cascade.scope);
    match args.format {
        OutputFormat::Json => print_json(&summaries)?,
        OutputFormat::Table => {
            if summaries.is_empty() {
                println!("No metric has values in the current selection.");
            } else {
                let with_plant = cascade.scope.roles().plant.is_some();
                print_grid(&summary_grid(&summaries, with_plant));
            }
        }
    }
    Ok(())
}

fn sourcing_json(result: &SourcingBenchmark, candidates: &Table) -> serde_json::Value {
    let narrative = result.narrative();
    json!({
        "min_price": result.min_price,
        "max_price": result.max_price,
        "spread": result.spread,
        "spread_pct": result.spread_pct,
        "min_example": result.min_example,
        "max_example": result.max_example,
        "candidates": table_to_json(candidates),
        "narrative": narrative,
        "statement": narrative.to_string(),
    })
}

pub fn execute_sourcing(args: &SourcingArgs) -> Result<()> {
    let report = &args.report;
    let (_, cascade) = scoped(&report.input, &report.selection)?;
    let result = benchmark(&cascade.scope);
    let candidates = match args.search.as_deref() {
        Some(query) => search(&result.candidates, query),
        None => result.candidates.clone(),
    };

    match report.format {
        OutputFormat::Json => print_json(&sourcing_json(&result, &candidates))?,
        OutputFormat::Table => {
            println!("Lowest price:  {}", format_optional_amount(result.min_price));
            println!("Highest price: {}", format_optional_amount(result.max_price));
            println!(
                "Spread:        {} ({:.2}%)",
                format_amount(result.spread),
                result.spread_pct
            );
            println!();
            println!("Unique lowest cost combinations: {}", candidates.len());
            if !candidates.is_empty() {
                print_grid(&Grid::from_table(&candidates));
            }
            println!();
            println!("{}", result.narrative());
        }
    }
    Ok(())
}

pub fn execute_overview(args: &ReportArgs) -> Result<()> {
    let (table, cascade) = scoped(&args.input, &args.selection)?;
    let kpis = overview(&table, &benchmark(&cascade.scope));
    match args.format {
        OutputFormat::Json => print_json(&kpis)?,
        OutputFormat::Table => {
            let mut grid = Grid::new(vec!["kpi".to_string(), "value".to_string()]).right_align(&[1]);
            grid.push(vec!["Unique parts".into(), kpis.unique_parts.to_string()]);
            grid.push(vec!["Active vendors".into(), kpis.active_suppliers.to_string()]);
            grid.push(vec!["Vehicle models".into(), kpis.vehicle_models.to_string()]);
            grid.push(vec![
                "Avg PO price".into(),
                format_optional_amount(kpis.average_price),
            ]);
            grid.push(vec![
                "Savings potential".into(),
                format!("{:.2}%", kpis.savings_potential_pct),
            ]);
            print_grid(&grid);
        }
    }
    Ok(())
}

pub fn execute_config(args: &ConfigArgs) -> Result<()> {
    let yaml = RoleConfig::default().to_yaml_string()?;
    match args.output.as_deref() {
        Some(path) if !io_utils::is_dash(path) => write_file(path, &yaml),
        _ => {
            print!("{yaml}");
            Ok(())
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Writing {path:?}"))?;
    info!("Default role configuration written to {path:?}");
    Ok(())
}
