use log::{debug, info, warn};

use hours_view::builder::ContextBuilder;
use hours_view::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dash::config_reader::*;
use crate::dash::io_common::RawTable;
use crate::dash::render::{render_options, render_view, Presentation};

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
pub mod render;
mod tables;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading a line of {path}"))]
    CsvLineParse { source: csv::Error, path: String },
    #[snafu(display("No data found in {path}"))]
    EmptySource { path: String },
    #[snafu(display("Worksheet {worksheet} not found in {path}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("Column {column:?} not found in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Line {lineno}, column {column:?}: unexpected content {content:?}"))]
    WrongCellType {
        lineno: u64,
        column: String,
        content: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading json"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the view to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unknown provider {provider:?}, expected xlsx or csv"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown table {table:?}"))]
    UnknownTable { table: String },
    #[snafu(display("No source configured for the {table} table"))]
    MissingSource { table: String },
    #[snafu(display("Invalid data: {source}"))]
    InvalidData { source: ViewErrors },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashError>;
pub type BDashResult<T> = Result<T, Box<DashError>>;

/// Reads the sheet of a source. The paths are relative to the configuration file.
fn read_table(root: &Path, cfs: &FileSource) -> BDashResult<RawTable> {
    let p = root.join(&cfs.file_path).display().to_string();
    let mut table = match cfs.provider.as_str() {
        "xlsx" => io_excel::read_excel_table(p, cfs)?,
        "csv" => io_csv::read_csv_table(p)?,
        _ => {
            return Err(Box::new(DashError::UnknownProvider {
                provider: cfs.provider.clone(),
            }));
        }
    };
    if cfs.drops_last_row() {
        table.drop_last_row();
    }
    Ok(table)
}

/// Loads the four source tables and builds the data context.
pub fn load_context(config_path: &str, config: &DashboardConfig) -> BDashResult<DataContext> {
    let root = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    let rules = config.rules.view_rules()?;

    let cfs = config.source(TableKind::TimeEntries)?;
    let entries = tables::read_time_entries(&read_table(root, cfs)?, cfs)?;

    let cfs = config.source(TableKind::BudgetByEntity)?;
    let budget = tables::read_budget_by_entity(&read_table(root, cfs)?, cfs)?;

    let cfs = config.source(TableKind::ProjectHours)?;
    let projects =
        tables::read_project_hours(&read_table(root, cfs)?, cfs, &rules.tracked_auditors)?;

    let cfs = config.source(TableKind::Capacity)?;
    let (capacity, entity_budget) = tables::read_capacity(&read_table(root, cfs)?, cfs)?;

    debug!(
        "load_context: {} entries, {} budget rows, {} projects, {} capacity rows, {} entity budget rows",
        entries.len(),
        budget.len(),
        projects.len(),
        capacity.len(),
        entity_budget.len()
    );

    let ctx = ContextBuilder::new(&rules)
        .time_entries(entries)
        .budget_by_entity(budget)
        .project_hours(projects)
        .capacity(capacity)
        .entity_budget(entity_budget)
        .build()
        .context(InvalidDataSnafu {})?;
    Ok(ctx)
}

fn write_output(out: Option<&str>, contents: &str) -> DashResult<()> {
    match out {
        None | Some("") | Some("stdout") => {
            println!("{}", contents);
        }
        Some(path) => {
            fs::write(path, contents).context(WritingOutputSnafu { path })?;
            info!("View written to {}", path);
        }
    }
    Ok(())
}

fn check_reference(path: &str, computed: &str) -> DashResult<()> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let reference: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_reference != computed {
        warn!("Found differences with the reference view");
        print_diff(pretty_reference.as_str(), computed, "\n");
        whatever!("Difference detected between the computed view and the reference view")
    }
    Ok(())
}

pub fn run_dashboard(args: &Args) -> BDashResult<()> {
    let config = read_config(args.config.as_str())?;
    info!("config: {:?}", config);
    let ctx = load_context(args.config.as_str(), &config)?;

    let result_js = if args.list_options {
        render_options(&ctx)
    } else {
        let presentation = Presentation::new(&config.presentation, ctx.rules());
        match &args.events {
            Some(events_path) => {
                let selections = read_events(events_path.as_str())?;
                info!(
                    "Processing {} selections from {}",
                    selections.len(),
                    events_path
                );
                let views: Vec<JSValue> = selections
                    .iter()
                    .map(|sel| {
                        render_view(
                            &compute_view(&ctx, sel),
                            &presentation,
                            &config.output_settings,
                        )
                    })
                    .collect();
                json!(views)
            }
            None => {
                let sel = Selection::new(
                    args.auditor.as_deref(),
                    args.project.as_deref(),
                    args.show_table,
                );
                render_view(
                    &compute_view(&ctx, &sel),
                    &presentation,
                    &config.output_settings,
                )
            }
        }
    };

    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let out = args
        .out
        .as_deref()
        .or(config.output_settings.output_path.as_deref());
    write_output(out, pretty_js.as_str())?;

    // The reference view, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path.as_str(), pretty_js.as_str())?;
    }

    Ok(())
}
