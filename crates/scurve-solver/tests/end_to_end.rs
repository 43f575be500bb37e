//! End-to-end: raw table through parser and analyzer

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use scurve_core::{AnalysisConfig, DateWindow, Diagnostic, DiagnosticCode, PathStatus};
use scurve_parser::{parse_table, read_csv, FileFormat};
use scurve_solver::{analyze, resolve_window};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const TWO_TASKS: &str = "Nome da tarefa;Duração;Início;Término;Predecessoras
A;5 dias;Seg 04/03/24;Sex 08/03/24;
B;10 dias;Sex 08/03/24;Seg 18/03/24;A
";

#[test]
fn two_task_schedule() {
    let table = read_csv(TWO_TASKS, FileFormat::Csv).unwrap();
    let mut diags: Vec<Diagnostic> = Vec::new();
    let schedule = parse_table(&table, &AnalysisConfig::default(), &mut diags).unwrap();
    let window = DateWindow::parse("04/03/2024", "18/03/2024").unwrap();

    let analysis = analyze(
        schedule,
        window,
        date(2024, 3, 11),
        &AnalysisConfig::default(),
        &mut diags,
    );

    let roots: Vec<&str> = analysis.critical_path.roots.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(roots, vec!["A"]);
    assert_eq!(analysis.critical_path.path, vec!["A", "B"]);
    assert_eq!(analysis.critical_path.total_weight, 10);
    assert_eq!(analysis.critical_path.status, PathStatus::Computed);

    let cumulative: Vec<f64> = analysis.timeline.points.iter().map(|p| p.cumulative).collect();
    assert_eq!(cumulative, vec![50.0, 75.0, 100.0]);
    let labels: Vec<&str> = analysis.timeline.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["04/03/2024", "11/03/2024", "18/03/2024"]);

    let overdue: Vec<&str> = analysis.activities.overdue.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(overdue, vec!["A"]);
    assert_eq!(analysis.activities.next_7_days.len(), 1);

    assert_eq!(analysis.error_count(), 0);
    assert!(diags.iter().any(|d| d.code == DiagnosticCode::W001RootActivity));
    assert_eq!(diags.last().map(|d| d.code), Some(DiagnosticCode::I001AnalysisSummary));
}

#[test]
fn open_ended_window_uses_latest_end() {
    let table = read_csv(TWO_TASKS, FileFormat::Csv).unwrap();
    let schedule = parse_table(&table, &AnalysisConfig::default(), &mut Vec::new()).unwrap();

    let window = resolve_window(&schedule, date(2024, 3, 4), None).unwrap();
    let analysis = analyze(
        schedule,
        window,
        date(2024, 3, 4),
        &AnalysisConfig::default(),
        &mut Vec::new(),
    );

    assert_eq!(analysis.window.end, date(2024, 3, 18));
    assert_eq!(analysis.timeline.len(), 3);
    assert!(analysis.activities.overdue.is_empty());
}

#[test]
fn daily_distribution_from_config() {
    let config: AnalysisConfig = toml::from_str("[progress]\ndistribution = \"daily\"\n").unwrap();
    let table = read_csv(TWO_TASKS, FileFormat::Csv).unwrap();
    let schedule = parse_table(&table, &config, &mut Vec::new()).unwrap();
    let window = DateWindow::parse("04/03/2024", "18/03/2024").unwrap();

    let analysis = analyze(schedule, window, date(2024, 3, 11), &config, &mut Vec::new());

    // A: 4 days in week 1; B: 3 of 10 days in week 1, 7 in week 2
    let first = analysis.timeline.points[0].cumulative;
    assert!((first - 65.0).abs() < 1e-9, "got {first}");
    assert!((analysis.timeline.final_cumulative() - 100.0).abs() < 1e-9);
}
