//! Dependency graph construction
//!
//! Nodes are task ids in first-seen order. An edge `predecessor -> task`
//! carries the duration of the downstream task: depending on a chain costs
//! the time of the task that waits for it.
//!
//! Predecessor ids that name no task still become nodes. They end up as
//! sources with no incoming edges, which usually points at a typo in the
//! predecessor cell, so each one is reported as a hint.

use std::collections::{HashMap, HashSet, VecDeque};

use scurve_core::{Diagnostic, DiagnosticCode, DiagnosticEmitter, Schedule, TaskId};
use thiserror::Error;
use tracing::debug;

/// Errors during graph traversal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Cycle detected in dependencies
    #[error("Cycle detected involving tasks: {tasks:?}")]
    CycleDetected { tasks: Vec<TaskId> },
    /// No nodes to traverse
    #[error("Dependency graph is empty")]
    Empty,
    /// Summed durations exceed the `i64` range at `task`
    #[error("Path length overflows at task '{task}'")]
    WeightOverflow { task: TaskId },
}

/// A weighted dependency edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    /// Predecessor node index
    pub from: usize,
    /// Successor node index
    pub to: usize,
    /// Duration of the successor task, in days
    pub weight: i64,
}

/// Directed task graph with duration-weighted edges
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<TaskId>,
    node_index: HashMap<TaskId, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<(usize, usize), usize>,
    /// Outgoing edge indices per node, in insertion order
    outgoing: Vec<Vec<usize>>,
    /// Incoming edge indices per node, in insertion order
    incoming: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a typed schedule.
    ///
    /// Rows without a usable duration add no edges (the parser has already
    /// reported them). Unknown predecessor ids are reported as hints.
    pub fn from_schedule(schedule: &Schedule, emitter: &mut impl DiagnosticEmitter) -> Self {
        let known: HashSet<&str> = schedule.tasks.iter().map(|t| t.id.as_str()).collect();
        let mut graph = Self::new();

        for task in &schedule.tasks {
            if task.predecessors.is_empty() {
                continue;
            }
            let Some(weight) = task.duration else {
                continue;
            };

            for pred in &task.predecessors {
                if !known.contains(pred.id.as_str()) {
                    emitter.emit(
                        Diagnostic::new(
                            DiagnosticCode::H001UnresolvedPredecessor,
                            format!(
                                "task '{}' (line {}) depends on '{}', which is not a task name",
                                task.id, task.line, pred.id
                            ),
                        )
                        .with_task(&task.id)
                        .with_line(task.line)
                        .with_note(format!("'{}' is treated as a start node", pred.id)),
                    );
                }
                graph.add_edge(&pred.id, &task.id, weight);
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built dependency graph"
        );
        graph
    }

    /// Insert a node if absent and return its index
    pub fn add_node(&mut self, id: &str) -> usize {
        if let Some(&index) = self.node_index.get(id) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(id.to_string());
        self.node_index.insert(id.to_string(), index);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        index
    }

    /// Add `from -> to`; a repeated edge keeps its position and takes the new weight
    pub fn add_edge(&mut self, from: &str, to: &str, weight: i64) {
        let u = self.add_node(from);
        let v = self.add_node(to);

        if let Some(&existing) = self.edge_index.get(&(u, v)) {
            self.edges[existing].weight = weight;
            return;
        }

        let index = self.edges.len();
        self.edges.push(GraphEdge {
            from: u,
            to: v,
            weight,
        });
        self.edge_index.insert((u, v), index);
        self.outgoing[u].push(index);
        self.incoming[v].push(index);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in insertion order
    pub fn nodes(&self) -> &[TaskId] {
        &self.nodes
    }

    pub fn node_id(&self, index: usize) -> &str {
        &self.nodes[index]
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Weight of `from -> to`, if the edge exists
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<i64> {
        let u = *self.node_index.get(from)?;
        let v = *self.node_index.get(to)?;
        self.edge_index.get(&(u, v)).map(|&e| self.edges[e].weight)
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.edge_weight(from, to).is_some()
    }

    /// Incoming edges of a node, in insertion order
    pub fn incoming(&self, node: usize) -> impl Iterator<Item = &GraphEdge> {
        self.incoming[node].iter().map(|&e| &self.edges[e])
    }

    /// Outgoing edges of a node, in insertion order
    pub fn outgoing(&self, node: usize) -> impl Iterator<Item = &GraphEdge> {
        self.outgoing[node].iter().map(|&e| &self.edges[e])
    }

    /// Nodes without incoming edges, in insertion order
    pub fn sources(&self) -> Vec<&str> {
        (0..self.nodes.len())
            .filter(|&n| self.incoming[n].is_empty())
            .map(|n| self.node_id(n))
            .collect()
    }

    /// Kahn's algorithm; the queue is seeded in node insertion order so the
    /// result is deterministic.
    pub fn topological_order(&self) -> Result<Vec<usize>, GraphError> {
        let mut in_degree: Vec<usize> = self.incoming.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&n| in_degree[n] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &e in &self.outgoing[node] {
                let to = self.edges[e].to;
                in_degree[to] -= 1;
                if in_degree[to] == 0 {
                    queue.push_back(to);
                }
            }
        }

        if order.len() != self.nodes.len() {
            let tasks = (0..self.nodes.len())
                .filter(|&n| in_degree[n] > 0)
                .map(|n| self.nodes[n].clone())
                .collect();
            return Err(GraphError::CycleDetected { tasks });
        }

        Ok(order)
    }
}
