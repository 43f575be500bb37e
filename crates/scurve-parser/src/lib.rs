//! # scurve-parser
//!
//! Turns a raw schedule table into a typed [`Schedule`].
//!
//! This crate provides:
//! - Cell parsers for localized dates, free-text durations and predecessor
//!   references ([`fields`])
//! - Table validation and row conversion with per-row diagnostics
//! - CSV loading with delimiter detection ([`table`])
//!
//! ## Example
//!
//! ```rust
//! use scurve_core::{AnalysisConfig, Diagnostic};
//! use scurve_parser::{parse_table, RawTable};
//!
//! let table = RawTable::new(
//!     ["Nome da tarefa", "Início", "Término", "Duração", "Predecessoras"],
//!     vec![
//!         vec!["A", "Seg 04/03/24", "Sex 08/03/24", "5 dias", ""],
//!         vec!["B", "Sex 08/03/24", "Seg 18/03/24", "10 dias", "TI A"],
//!     ],
//! );
//!
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let schedule = parse_table(&table, &AnalysisConfig::default(), &mut diagnostics).unwrap();
//! assert_eq!(schedule.tasks[1].predecessors[0].id, "A");
//! ```

pub mod fields;
pub mod table;

pub use fields::{parse_date, parse_duration, parse_predecessors, strip_relation_prefix, DurationCell};
pub use table::{detect_format, load_file, read_csv, FileFormat, RawTable};

use std::collections::HashSet;

use scurve_core::{
    AnalysisConfig, ColumnNames, Diagnostic, DiagnosticCode, DiagnosticEmitter, Schedule, Task,
};
use thiserror::Error;
use tracing::debug;

/// Parsing error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table has no header row")]
    NoHeader,
}

/// Column positions resolved once from the header
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    name: usize,
    start: usize,
    end: usize,
    duration: usize,
    predecessors: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String], names: &ColumnNames) -> Result<Self, ParseError> {
        let find = |literal: &str| headers.iter().position(|h| h == literal);
        let require =
            |literal: &str| find(literal).ok_or_else(|| ParseError::MissingColumn(literal.to_string()));

        Ok(Self {
            name: require(&names.name)?,
            start: require(&names.start)?,
            end: require(&names.end)?,
            duration: require(&names.duration)?,
            predecessors: find(&names.predecessors),
        })
    }
}

/// Parse a raw table into a typed schedule.
///
/// Data-quality problems (bad dates, bad durations, missing predecessor
/// column, duplicate names) are emitted as diagnostics and never abort the
/// parse. Only a missing name/start/end/duration column is fatal.
pub fn parse_table(
    table: &RawTable,
    config: &AnalysisConfig,
    emitter: &mut impl DiagnosticEmitter,
) -> Result<Schedule, ParseError> {
    if table.headers.is_empty() {
        return Err(ParseError::NoHeader);
    }
    let columns = ColumnIndex::resolve(&table.headers, &config.columns)?;

    if columns.predecessors.is_none() {
        emitter.emit(
            Diagnostic::new(
                DiagnosticCode::E001MissingPredecessorColumn,
                format!("column '{}' not found", config.columns.predecessors),
            )
            .with_note("the critical path cannot be computed without predecessors"),
        );
    }

    let mut tasks = Vec::with_capacity(table.rows.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (index, row) in table.rows.iter().enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let line = index + 1;
        let task = parse_row(row, line, columns, config, emitter);

        if !seen.insert(task.id.clone()) {
            emitter.emit(
                Diagnostic::new(
                    DiagnosticCode::W004DuplicateTask,
                    format!("task '{}' (line {}) repeats an earlier name", task.id, line),
                )
                .with_task(&task.id)
                .with_line(line)
                .with_note("both rows share one node in the dependency graph"),
            );
        }
        tasks.push(task);
    }

    let mut schedule = Schedule {
        tasks,
        has_predecessor_column: columns.predecessors.is_some(),
    };

    if config.parser.resolve_row_numbers {
        resolve_row_numbers(&mut schedule);
    }

    debug!(
        tasks = schedule.len(),
        roots = schedule.roots().count(),
        "parsed schedule table"
    );
    Ok(schedule)
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", |c| c.trim())
}

fn parse_row(
    row: &[String],
    line: usize,
    columns: ColumnIndex,
    config: &AnalysisConfig,
    emitter: &mut impl DiagnosticEmitter,
) -> Task {
    let mut task = Task::new(cell(row, columns.name)).line(line);

    for (literal, index, slot) in [
        (&config.columns.start, columns.start, &mut task.start),
        (&config.columns.end, columns.end, &mut task.end),
    ] {
        let text = cell(row, index);
        *slot = fields::parse_date(text);
        if slot.is_none() {
            emitter.emit(
                Diagnostic::new(
                    DiagnosticCode::W002UnparseableDate,
                    format!(
                        "task '{}' (line {}): cannot read {} '{}'",
                        task.id, line, literal, text
                    ),
                )
                .with_task(&task.id)
                .with_line(line)
                .with_hint("dates must look like 'Seg 04/03/24' or '04/03/2024'"),
            );
        }
    }

    if task.ends_before_start() {
        emitter.emit(
            Diagnostic::new(
                DiagnosticCode::W003EndBeforeStart,
                format!("task '{}' (line {}) ends before it starts", task.id, line),
            )
            .with_task(&task.id)
            .with_line(line),
        );
    }

    task.duration_text = cell(row, columns.duration).to_string();
    task.duration = match fields::parse_duration(&task.duration_text) {
        DurationCell::Days(days) => Some(days),
        DurationCell::Empty => {
            let derived = task.span_days().filter(|days| *days >= 0);
            if derived.is_none() {
                emitter.emit(
                    Diagnostic::new(
                        DiagnosticCode::W005MissingDuration,
                        format!(
                            "task '{}' (line {}) has no duration and no usable dates",
                            task.id, line
                        ),
                    )
                    .with_task(&task.id)
                    .with_line(line),
                );
            }
            derived
        }
        DurationCell::Invalid => {
            emitter.emit(
                Diagnostic::new(
                    DiagnosticCode::E002InvalidDuration,
                    format!(
                        "invalid duration for task '{}': '{}' (line {})",
                        task.id, task.duration_text, line
                    ),
                )
                .with_task(&task.id)
                .with_line(line)
                .with_note("the row's dependencies are left out of the graph")
                .with_hint("write the duration as '<days> dias'"),
            );
            None
        }
    };

    if let Some(index) = columns.predecessors {
        let text = cell(row, index);
        if text.is_empty() {
            if config.parser.report_roots {
                emitter.emit(
                    Diagnostic::new(
                        DiagnosticCode::W001RootActivity,
                        format!("task '{}' (line {}) has no predecessors", task.id, line),
                    )
                    .with_task(&task.id)
                    .with_line(line),
                );
            }
        } else {
            task.predecessors = fields::parse_predecessors(text);
            task.predecessor_text = Some(text.to_string());
        }
    }

    task
}

/// Rewrite numeric predecessor ids that name no task into the name of the
/// task on that line.
fn resolve_row_numbers(schedule: &mut Schedule) {
    let mut renames = Vec::new();
    for (t, task) in schedule.tasks.iter().enumerate() {
        for (p, pred) in task.predecessors.iter().enumerate() {
            if schedule.get_task(&pred.id).is_some() {
                continue;
            }
            let Ok(line) = pred.id.parse::<usize>() else {
                continue;
            };
            if let Some(target) = schedule.task_at_line(line) {
                renames.push((t, p, target.id.clone()));
            }
        }
    }

    for (t, p, name) in renames {
        schedule.tasks[t].predecessors[p].id = name;
    }
}

/// Load and parse a schedule file
pub fn parse_file(
    path: &std::path::Path,
    config: &AnalysisConfig,
    emitter: &mut impl DiagnosticEmitter,
) -> Result<Schedule, ParseError> {
    let table = load_file(path)?;
    parse_table(&table, config, emitter)
}
