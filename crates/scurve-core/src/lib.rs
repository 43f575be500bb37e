//! # scurve-core
//!
//! Core domain model for the scurve schedule analyzer.
//!
//! This crate provides:
//! - Domain types: `Task`, `Predecessor`, `RelationType`, `Schedule`
//! - Result types: `CriticalPath`, `ProgressTimeline`, `ActivityWindows`, `Analysis`
//! - User-facing diagnostics (`Diagnostic`, `DiagnosticEmitter`)
//! - Analysis configuration (`AnalysisConfig`)
//! - Error types and the `Renderer` trait
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use scurve_core::{Schedule, Task};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
//! let schedule = Schedule::new(vec![
//!     Task::new("Foundations").line(1).dates(d(4), d(8)).duration(5),
//!     Task::new("Walls").line(2).dates(d(8), d(18)).duration(10).depends_on("Foundations"),
//! ]);
//!
//! assert_eq!(schedule.roots().count(), 1);
//! assert_eq!(schedule.latest_end(), Some(d(18)));
//! ```

pub mod analysis;
pub mod config;
pub mod diagnostics;

pub use analysis::{
    ActivityWindows, Analysis, CriticalPath, PathStatus, ProgressTimeline, TimelinePoint,
};
pub use config::{AnalysisConfig, ColumnNames, Distribution, ParserConfig, ProgressConfig};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticEmitter, Severity};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task (the task name acts as graph node key)
pub type TaskId = String;

// ============================================================================
// Task
// ============================================================================

/// Relationship type attached to a predecessor reference.
///
/// All relation types are weighted identically when computing the critical
/// path; the type is kept so reports can show what the schedule declared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    /// Successor starts after predecessor finishes
    #[default]
    FinishToStart,
    /// Successor starts when predecessor starts
    StartToStart,
    /// Successor finishes when predecessor finishes
    FinishToFinish,
    /// Successor finishes when predecessor starts
    StartToFinish,
}

impl RelationType {
    /// Two-letter prefixes recognized in front of a predecessor id.
    ///
    /// Portuguese codes (TI/II/TT/IT) come first; English codes follow.
    pub const PREFIXES: [(&'static str, RelationType); 8] = [
        ("TI", RelationType::FinishToStart),
        ("II", RelationType::StartToStart),
        ("TT", RelationType::FinishToFinish),
        ("IT", RelationType::StartToFinish),
        ("FS", RelationType::FinishToStart),
        ("SS", RelationType::StartToStart),
        ("FF", RelationType::FinishToFinish),
        ("SF", RelationType::StartToFinish),
    ];

    /// Short English code (FS/SS/FF/SF)
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::FinishToStart => "FS",
            RelationType::StartToStart => "SS",
            RelationType::FinishToFinish => "FF",
            RelationType::StartToFinish => "SF",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned predecessor reference
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predecessor {
    /// Referenced task id, with relation prefix and whitespace removed
    pub id: TaskId,
    /// Declared relationship type (FinishToStart when no prefix was given)
    pub relation: RelationType,
}

impl Predecessor {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            relation: RelationType::FinishToStart,
        }
    }

    pub fn with_relation(mut self, relation: RelationType) -> Self {
        self.relation = relation;
        self
    }
}

/// One row of the schedule, validated once at parse time
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Task name, unique within a schedule
    pub id: TaskId,
    /// 1-based row number in the source table
    pub line: usize,
    /// Start date (None when missing or unparseable)
    pub start: Option<NaiveDate>,
    /// End date (None when missing or unparseable)
    pub end: Option<NaiveDate>,
    /// Duration in days; derived from the dates when the cell was empty,
    /// None when the text could not be parsed
    pub duration: Option<i64>,
    /// Original duration text (e.g. "10 dias")
    pub duration_text: String,
    /// Cleaned predecessor references in declaration order
    pub predecessors: Vec<Predecessor>,
    /// Original predecessor text; None means the task is a schedule root
    pub predecessor_text: Option<String>,
}

impl Task {
    /// Create a new task with the given name
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            line: 0,
            start: None,
            end: None,
            duration: None,
            duration_text: String::new(),
            predecessors: Vec::new(),
            predecessor_text: None,
        }
    }

    /// Set the source line number
    pub fn line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Set both dates
    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set the duration in days
    pub fn duration(mut self, days: i64) -> Self {
        self.duration = Some(days);
        self.duration_text = format!("{days} dias");
        self
    }

    /// Add a finish-to-start predecessor
    pub fn depends_on(self, predecessor: impl Into<TaskId>) -> Self {
        self.with_predecessor(Predecessor::new(predecessor))
    }

    /// Add a predecessor with an explicit relation type
    pub fn with_predecessor(mut self, predecessor: Predecessor) -> Self {
        let text = self.predecessor_text.get_or_insert_with(String::new);
        if !text.is_empty() {
            text.push(';');
        }
        text.push_str(&predecessor.id);
        self.predecessors.push(predecessor);
        self
    }

    /// A task with no predecessor value is a schedule root
    pub fn is_root(&self) -> bool {
        self.predecessor_text
            .as_deref()
            .map_or(true, |text| text.trim().is_empty())
    }

    /// Both dates resolved
    pub fn has_dates(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Calendar days between start and end, when both are known
    pub fn span_days(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }

    /// End strictly before start
    pub fn ends_before_start(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if e < s)
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// A typed schedule snapshot
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Tasks in source order
    pub tasks: Vec<Task>,
    /// Whether the source table carried a predecessor column at all
    pub has_predecessor_column: bool,
}

impl Schedule {
    /// Build a schedule that has a predecessor column
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            has_predecessor_column: true,
        }
    }

    /// Get a task by id (first match in source order)
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get the task on a given 1-based source line
    pub fn task_at_line(&self, line: usize) -> Option<&Task> {
        self.tasks.iter().find(|t| t.line == line)
    }

    /// Tasks lacking predecessors, in source order
    pub fn roots(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_root())
    }

    /// Latest resolved end date
    pub fn latest_end(&self) -> Option<NaiveDate> {
        self.tasks.iter().filter_map(|t| t.end).max()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ============================================================================
// Date window (user parameters)
// ============================================================================

/// The reporting window chosen by the user; `end` is strictly after `start`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Validate and build a window
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InputError> {
        if end <= start {
            return Err(InputError::EndNotAfterStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from user text (`dd/mm/yyyy`)
    pub fn parse(start: &str, end: &str) -> Result<Self, InputError> {
        Self::new(parse_user_date(start)?, parse_user_date(end)?)
    }
}

/// Parse a user-entered date: `dd/mm/yyyy`, with ISO `yyyy-mm-dd` accepted too
pub fn parse_user_date(text: &str) -> Result<NaiveDate, InputError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| InputError::InvalidDate(trimmed.to_string()))
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render an analysis to the output format
    fn render(&self, analysis: &Analysis) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// User parameter validation error, raised before any computation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid date '{0}': expected dd/mm/yyyy")]
    InvalidDate(String),

    #[error("End date {end} must be after start date {start}")]
    EndNotAfterStart { start: NaiveDate, end: NaiveDate },

    #[error("Schedule has no resolvable end date; pass an explicit end date")]
    NoEndDate,
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
