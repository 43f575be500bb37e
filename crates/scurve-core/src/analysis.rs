//! Derived views produced by the solver and consumed by renderers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DateWindow, Diagnostic, Schedule, Task, TaskId};

// ============================================================================
// Critical path
// ============================================================================

/// Why a critical path is (or is not) available
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStatus {
    /// Longest path computed
    Computed,
    /// The schedule had no predecessor column
    ColumnMissing,
    /// No edges could be built
    EmptyGraph,
    /// Dependencies are cyclic; `tasks` could not be ordered
    Cycle { tasks: Vec<TaskId> },
    /// The path length exceeds the representable range at `task`
    Overflow { task: TaskId },
}

/// Maximum-weight chain of dependent tasks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CriticalPath {
    /// Task ids from source to sink; empty when not computable
    pub path: Vec<TaskId>,
    /// Summed edge weight along `path` (days)
    pub total_weight: i64,
    /// Tasks lacking predecessors, in source order
    pub roots: Vec<Task>,
    pub status: PathStatus,
}

impl CriticalPath {
    /// A neutral result carrying only the root activities
    pub fn not_computable(status: PathStatus, roots: Vec<Task>) -> Self {
        Self {
            path: Vec::new(),
            total_weight: 0,
            roots,
            status,
        }
    }

    pub fn is_computed(&self) -> bool {
        self.status == PathStatus::Computed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.path.iter().any(|p| p == id)
    }
}

// ============================================================================
// S-curve
// ============================================================================

/// One weekly point of the S-curve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Week boundary (a Monday)
    pub week: NaiveDate,
    /// Display label (`dd/mm/yyyy`)
    pub label: String,
    /// Raw progress credited to this week
    pub increment: f64,
    /// Cumulative progress in percent
    pub cumulative: f64,
    /// `cumulative[i] - cumulative[i-1]`
    pub delta: f64,
}

/// Week-bucketed cumulative progress curve
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressTimeline {
    pub points: Vec<TimelinePoint>,
    /// Sum of all raw increments before normalization
    pub total_raw: f64,
}

impl ProgressTimeline {
    /// True when no task contributed progress (all values stay at 0)
    pub fn is_degenerate(&self) -> bool {
        self.total_raw <= 0.0
    }

    /// Last cumulative value, 0 for an empty timeline
    pub fn final_cumulative(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.cumulative)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cumulative percentage at or before `date`
    pub fn cumulative_at(&self, date: NaiveDate) -> f64 {
        self.points
            .iter()
            .take_while(|p| p.week <= date)
            .last()
            .map_or(0.0, |p| p.cumulative)
    }
}

// ============================================================================
// Activity windows
// ============================================================================

/// Time-windowed activity filters relative to `today`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityWindows {
    pub today: NaiveDate,
    /// `end < today`
    pub overdue: Vec<Task>,
    /// `start <= today + 7 && end >= today`
    pub next_7_days: Vec<Task>,
    /// `start <= today + 15 && end >= today`
    pub next_15_days: Vec<Task>,
}

// ============================================================================
// Analysis
// ============================================================================

/// Every view derived from one schedule snapshot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub schedule: Schedule,
    pub window: DateWindow,
    pub critical_path: CriticalPath,
    pub timeline: ProgressTimeline,
    pub activities: ActivityWindows,
    /// Conditions reported while parsing and analyzing
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}
