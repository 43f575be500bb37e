//! Critical path property suite
//!
//! Invariants checked against brute-force enumeration:
//! 1. Consecutive path tasks are joined by a graph edge
//! 2. The reported weight is the sum of the edge weights along the path
//! 3. No source-to-sink path is heavier than the critical path
//! 4. Schedules with no buildable edge return an empty path without failing
//! 5. A row with an unreadable duration only loses its own edges

use pretty_assertions::assert_eq;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::Config;
use scurve_core::{AnalysisConfig, DiagnosticCode, PathStatus, Schedule, Task, TaskId};
use scurve_parser::{parse_table, RawTable};
use scurve_solver::{longest_path, CriticalPathEngine, DependencyGraph};

/// Schedules where task `i` may only depend on tasks `< i`, so the
/// dependency graph is always acyclic
fn acyclic_schedule() -> impl Strategy<Value = Schedule> {
    vec((0_i64..12, vec(prop::bool::weighted(0.3), 10)), 1..10).prop_map(|rows| {
        let tasks = rows
            .into_iter()
            .enumerate()
            .map(|(i, (duration, links))| {
                let mut task = Task::new(format!("t{i}")).line(i + 1).duration(duration);
                for (j, linked) in links.into_iter().take(i).enumerate() {
                    if linked {
                        task = task.depends_on(format!("t{j}"));
                    }
                }
                task
            })
            .collect();
        Schedule::new(tasks)
    })
}

/// Heaviest weight over every path starting at a source and ending at a sink
fn brute_force_max(graph: &DependencyGraph) -> i64 {
    fn walk(graph: &DependencyGraph, node: usize, acc: i64, best: &mut i64) {
        let mut leaf = true;
        for edge in graph.outgoing(node) {
            leaf = false;
            walk(graph, edge.to, acc + edge.weight, best);
        }
        if leaf {
            *best = (*best).max(acc);
        }
    }

    let mut best = 0;
    for node in 0..graph.node_count() {
        if graph.incoming(node).next().is_none() {
            walk(graph, node, 0, &mut best);
        }
    }
    best
}

/// Sum of edge weights along `path`, `None` when two neighbours share no edge
fn path_weight(graph: &DependencyGraph, path: &[TaskId]) -> Option<i64> {
    path.windows(2)
        .map(|pair| graph.edge_weight(&pair[0], &pair[1]))
        .sum()
}

// ============================================================================
// Validity and maximality
// ============================================================================

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn critical_path_is_valid_and_maximal(schedule in acyclic_schedule()) {
        let graph = DependencyGraph::from_schedule(&schedule, &mut Vec::new());
        prop_assume!(!graph.is_empty());

        let (path, weight) = longest_path(&graph).unwrap();

        prop_assert!(!path.is_empty());
        prop_assert_eq!(path_weight(&graph, &path), Some(weight));
        prop_assert_eq!(weight, brute_force_max(&graph));
    }

    #[test]
    fn engine_agrees_with_graph_search(schedule in acyclic_schedule()) {
        let graph = DependencyGraph::from_schedule(&schedule, &mut Vec::new());
        let cp = CriticalPathEngine::new().compute(&schedule, &mut Vec::new());

        let roots: Vec<&str> = schedule.roots().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(cp.roots.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), roots);

        if graph.is_empty() {
            prop_assert_eq!(cp.status, PathStatus::EmptyGraph);
            prop_assert!(cp.path.is_empty());
        } else {
            let (path, weight) = longest_path(&graph).unwrap();
            prop_assert_eq!(cp.status, PathStatus::Computed);
            prop_assert_eq!(cp.path, path);
            prop_assert_eq!(cp.total_weight, weight);
        }
    }

    #[test]
    fn repeated_runs_agree(schedule in acyclic_schedule()) {
        let first = CriticalPathEngine::new().compute(&schedule, &mut Vec::new());
        let again = CriticalPathEngine::new().compute(&schedule, &mut Vec::new());
        prop_assert_eq!(again, first);
    }
}

#[test]
fn chain_through_diamond() {
    let schedule = Schedule::new(vec![
        Task::new("kickoff").line(1).duration(1),
        Task::new("design").line(2).duration(5).depends_on("kickoff"),
        Task::new("procure").line(3).duration(8).depends_on("kickoff"),
        Task::new("build").line(4).duration(10).depends_on("design").depends_on("procure"),
        Task::new("handover").line(5).duration(2).depends_on("build"),
    ]);

    let cp = CriticalPathEngine::new().compute(&schedule, &mut Vec::new());

    assert_eq!(cp.path, vec!["kickoff", "procure", "build", "handover"]);
    assert_eq!(cp.total_weight, 20);
    assert_eq!(cp.status, PathStatus::Computed);
    assert_eq!(cp.roots.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["kickoff"]);
}

// ============================================================================
// Empty-graph short-circuit
// ============================================================================

#[test]
fn no_predecessors_short_circuits() {
    let schedule = Schedule::new(
        (1..=5)
            .map(|i| Task::new(format!("t{i}")).line(i).duration(3))
            .collect(),
    );
    let mut diags = Vec::new();

    let cp = CriticalPathEngine::new().compute(&schedule, &mut diags);

    assert!(cp.path.is_empty());
    assert_eq!(cp.roots.len(), 5);
    assert_eq!(cp.status, PathStatus::EmptyGraph);
    assert!(diags.iter().any(|d| d.code == DiagnosticCode::E003EmptyGraph));
}

#[test]
fn missing_column_short_circuits() {
    let table = RawTable::new(
        ["Nome da tarefa", "Início", "Término", "Duração"],
        vec![vec!["a", "04/03/24", "08/03/24", "4 dias"]],
    );
    let mut diags = Vec::new();
    let schedule = parse_table(&table, &AnalysisConfig::default(), &mut diags).unwrap();

    let cp = CriticalPathEngine::new().compute(&schedule, &mut diags);

    assert!(cp.path.is_empty());
    assert!(cp.roots.is_empty());
    assert_eq!(cp.status, PathStatus::ColumnMissing);
    assert_eq!(
        diags
            .iter()
            .filter(|d| d.code == DiagnosticCode::E001MissingPredecessorColumn)
            .count(),
        1
    );
}

// ============================================================================
// Row-level failure isolation
// ============================================================================

#[test]
fn one_bad_duration_keeps_other_edges() {
    let mut rows = vec![vec![
        "Marco".to_string(),
        "04/03/24".to_string(),
        "04/03/24".to_string(),
        "0 dias".to_string(),
        String::new(),
    ]];
    for i in 1..=10 {
        let duration = if i == 6 { "seis dias".to_string() } else { format!("{i} dias") };
        rows.push(vec![
            format!("Etapa {i}"),
            "05/03/24".to_string(),
            "20/03/24".to_string(),
            duration,
            "Marco".to_string(),
        ]);
    }
    let table = RawTable::new(
        ["Nome da tarefa", "Início", "Término", "Duração", "Predecessoras"],
        rows,
    );
    let mut diags = Vec::new();

    let schedule = parse_table(&table, &AnalysisConfig::default(), &mut diags).unwrap();
    let graph = DependencyGraph::from_schedule(&schedule, &mut diags);

    assert_eq!(graph.edge_count(), 9);
    assert!(!graph.contains_edge("Marco", "Etapa 6"));
    assert!(graph.contains_edge("Marco", "Etapa 10"));

    let invalid: Vec<_> = diags
        .iter()
        .filter(|d| d.code == DiagnosticCode::E002InvalidDuration)
        .collect();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].task.as_deref(), Some("Etapa 6"));
    assert_eq!(invalid[0].line, Some(7));

    let cp = CriticalPathEngine::new().compute(&schedule, &mut diags);
    assert_eq!(cp.path, vec!["Marco", "Etapa 10"]);
}
