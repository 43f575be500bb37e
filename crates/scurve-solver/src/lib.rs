//! # scurve-solver
//!
//! Analytical views over a typed schedule.
//!
//! This crate provides:
//! - Dependency graph construction (edges weighted by successor duration)
//! - Critical path as the longest path through the DAG
//! - Weekly S-curve aggregation (even or daily-rate distribution)
//! - Overdue / next 7 days / next 15 days filters
//! - An [`Analyzer`] running all of the above
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use scurve_core::{AnalysisConfig, DateWindow, Schedule, Task};
//! use scurve_solver::analyze;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
//! let schedule = Schedule::new(vec![
//!     Task::new("A").line(1).dates(d(4), d(8)).duration(4),
//!     Task::new("B").line(2).dates(d(8), d(18)).duration(10).depends_on("A"),
//! ]);
//! let window = DateWindow::new(d(4), d(18)).unwrap();
//!
//! let analysis = analyze(schedule, window, d(11), &AnalysisConfig::default(), &mut Vec::new());
//! assert_eq!(analysis.critical_path.path, vec!["A", "B"]);
//! ```

pub mod analysis;
pub mod critical;
pub mod filters;
pub mod graph;
pub mod progress;

pub use analysis::{analyze, resolve_window, Analyzer};
pub use critical::{longest_path, CriticalPathEngine};
pub use filters::{activity_windows, overdue, upcoming};
pub use graph::{DependencyGraph, GraphEdge, GraphError};
pub use progress::{aggregate, week_boundaries, ProgressAggregator};
