//! User-facing diagnostics
//!
//! Data-quality and structural conditions found while parsing and analyzing a
//! schedule are reported as `Diagnostic`s instead of errors: each one names
//! the task and source line needed to fix the row, and processing continues.
//!
//! Codes are grouped by prefix:
//!
//! | Prefix | Severity | Meaning |
//! |--------|----------|---------|
//! | `E`    | error    | a view could not be computed or a row was skipped |
//! | `W`    | warning  | suspicious data that was tolerated |
//! | `H`    | hint     | likely data-entry slips |
//! | `I`    | info     | summaries |

use serde::{Deserialize, Serialize};

use crate::TaskId;

/// Diagnostic severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Hint,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable diagnostic codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// The predecessor column is absent; the critical path is skipped
    E001MissingPredecessorColumn,
    /// Duration text is not an integer; the row adds no edges
    E002InvalidDuration,
    /// No edges could be built
    E003EmptyGraph,
    /// Dependencies form a cycle
    E004CyclicDependency,
    /// Summed durations along a path overflow
    E005PathOverflow,
    /// Task has no predecessors
    W001RootActivity,
    /// Start or end date could not be parsed
    W002UnparseableDate,
    /// End date before start date
    W003EndBeforeStart,
    /// Two rows share a task name
    W004DuplicateTask,
    /// Duration is empty and cannot be derived from the dates
    W005MissingDuration,
    /// No task contributed progress; S-curve stays at zero
    W006NoProgressData,
    /// The reporting window holds no week boundary
    W007EmptyWeekWindow,
    /// Predecessor id does not name any task
    H001UnresolvedPredecessor,
    /// Summary of a completed analysis
    I001AnalysisSummary,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::E001MissingPredecessorColumn => "E001",
            DiagnosticCode::E002InvalidDuration => "E002",
            DiagnosticCode::E003EmptyGraph => "E003",
            DiagnosticCode::E004CyclicDependency => "E004",
            DiagnosticCode::E005PathOverflow => "E005",
            DiagnosticCode::W001RootActivity => "W001",
            DiagnosticCode::W002UnparseableDate => "W002",
            DiagnosticCode::W003EndBeforeStart => "W003",
            DiagnosticCode::W004DuplicateTask => "W004",
            DiagnosticCode::W005MissingDuration => "W005",
            DiagnosticCode::W006NoProgressData => "W006",
            DiagnosticCode::W007EmptyWeekWindow => "W007",
            DiagnosticCode::H001UnresolvedPredecessor => "H001",
            DiagnosticCode::I001AnalysisSummary => "I001",
        }
    }

    /// Severity implied by the code prefix
    pub fn default_severity(&self) -> Severity {
        match self.as_str().as_bytes()[0] {
            b'E' => Severity::Error,
            b'W' => Severity::Warning,
            b'H' => Severity::Hint,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reported condition with enough context to locate the source row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    /// Task the condition refers to
    pub task: Option<TaskId>,
    /// 1-based source line
    pub line: Option<usize>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            task: None,
            line: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Create a diagnostic forced to error severity
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::new(code, message)
        }
    }

    pub fn with_task(mut self, task: impl Into<TaskId>) -> Self {
        self.task = Some(task.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Sink for diagnostics
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Collect diagnostics in memory
impl DiagnosticEmitter for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Fan out to two emitters
impl<A: DiagnosticEmitter, B: DiagnosticEmitter> DiagnosticEmitter for (A, B) {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.0.emit(diagnostic.clone());
        self.1.emit(diagnostic);
    }
}

impl<E: DiagnosticEmitter + ?Sized> DiagnosticEmitter for &mut E {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}
