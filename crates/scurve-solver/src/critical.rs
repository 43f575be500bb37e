//! Critical path as the longest weighted path through the dependency DAG
//!
//! # Algorithm
//!
//! 1. Topological sort (Kahn, see `graph.rs`)
//! 2. Dynamic programming in topological order:
//!    `best[v] = max over incoming (u, v) of best[u] + w(u, v)`, 0 for sources
//! 3. The path ends at the node with the largest `best`; walk back through
//!    the recorded predecessors
//!
//! # Tie-breaking
//!
//! Equal-duration alternatives are common in real schedules, so ties are
//! resolved deterministically:
//! - among incoming edges of a node, the first inserted edge wins (a later
//!   edge replaces it only when strictly longer);
//! - among candidate path ends, the first node in topological order wins.

use scurve_core::{
    CriticalPath, Diagnostic, DiagnosticCode, DiagnosticEmitter, PathStatus, Schedule, TaskId,
};
use tracing::{debug, warn};

use crate::graph::{DependencyGraph, GraphError};

/// Longest path through the graph and its summed weight
pub fn longest_path(graph: &DependencyGraph) -> Result<(Vec<TaskId>, i64), GraphError> {
    if graph.is_empty() {
        return Err(GraphError::Empty);
    }

    let order = graph.topological_order()?;
    let mut best = vec![0_i64; graph.node_count()];
    let mut via: Vec<Option<usize>> = vec![None; graph.node_count()];

    for &node in &order {
        for edge in graph.incoming(node) {
            let candidate = best[edge.from].checked_add(edge.weight).ok_or_else(|| {
                GraphError::WeightOverflow {
                    task: graph.node_id(node).to_string(),
                }
            })?;
            if via[node].is_none() || candidate > best[node] {
                best[node] = candidate;
                via[node] = Some(edge.from);
            }
        }
    }

    let mut end = order[0];
    for &node in &order {
        if best[node] > best[end] {
            end = node;
        }
    }

    let mut path = vec![end];
    let mut current = end;
    while let Some(prev) = via[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();

    Ok((
        path.into_iter().map(|n| graph.node_id(n).to_string()).collect(),
        best[end],
    ))
}

/// Critical path engine over a typed schedule
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalPathEngine;

impl CriticalPathEngine {
    pub fn new() -> Self {
        Self
    }

    /// Build the dependency graph and compute the critical path.
    ///
    /// Never fails: a missing predecessor column, an empty graph, a cycle or
    /// an overflowing path length yield an empty path with the matching
    /// [`PathStatus`].
    pub fn compute(
        &self,
        schedule: &Schedule,
        emitter: &mut impl DiagnosticEmitter,
    ) -> CriticalPath {
        if !schedule.has_predecessor_column {
            // Already reported by the parser; nothing to build.
            debug!("no predecessor column, skipping critical path");
            return CriticalPath::not_computable(PathStatus::ColumnMissing, Vec::new());
        }

        let roots: Vec<_> = schedule.roots().cloned().collect();
        let graph = DependencyGraph::from_schedule(schedule, emitter);

        if graph.is_empty() {
            emitter.emit(
                Diagnostic::new(
                    DiagnosticCode::E003EmptyGraph,
                    "the activity graph is empty",
                )
                .with_hint("check the predecessor and duration columns"),
            );
            return CriticalPath::not_computable(PathStatus::EmptyGraph, roots);
        }

        match longest_path(&graph) {
            Ok((path, total_weight)) => {
                debug!(length = path.len(), total_weight, "critical path computed");
                CriticalPath {
                    path,
                    total_weight,
                    roots,
                    status: PathStatus::Computed,
                }
            }
            Err(GraphError::CycleDetected { tasks }) => {
                warn!(?tasks, "dependency cycle, critical path not computable");
                emitter.emit(
                    Diagnostic::new(
                        DiagnosticCode::E004CyclicDependency,
                        format!("cannot compute the critical path: cycle among {}", tasks.join(", ")),
                    )
                    .with_hint("remove one predecessor link from the cycle"),
                );
                CriticalPath::not_computable(PathStatus::Cycle { tasks }, roots)
            }
            Err(GraphError::WeightOverflow { task }) => {
                warn!(%task, "critical path length overflows");
                emitter.emit(
                    Diagnostic::new(
                        DiagnosticCode::E005PathOverflow,
                        format!("cannot compute the critical path: length overflows at '{task}'"),
                    )
                    .with_task(&task)
                    .with_hint("check the duration column for oversized values"),
                );
                CriticalPath::not_computable(PathStatus::Overflow { task }, roots)
            }
            Err(GraphError::Empty) => CriticalPath::not_computable(PathStatus::EmptyGraph, roots),
        }
    }
}
