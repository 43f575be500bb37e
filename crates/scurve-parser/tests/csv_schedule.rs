//! Integration tests: CSV exports through `parse_file`

use std::io::Write;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use scurve_core::{AnalysisConfig, Diagnostic, DiagnosticCode};
use scurve_parser::{parse_file, ParseError};

fn write_fixture(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const CONSTRUCTION: &str = r#"Nome da tarefa;Duração;Início;Término;Predecessoras
Mobilização;3 dias;Seg 04/03/24;Qua 06/03/24;
Fundação;10 dias;Qui 07/03/24;Qua 20/03/24;TI Mobilização
Alvenaria;15 dias;Qui 21/03/24;Qua 10/04/24;TI Fundação
Instalações;8 dias;Qui 21/03/24;Seg 01/04/24;II Fundação
Cobertura;5 dias;Qui 11/04/24;Qua 17/04/24;"Alvenaria;Instalações"
Acabamento;dez dias;Qui 18/04/24;Qua 01/05/24;TT Cobertura-2 dias
"#;

#[test]
fn semicolon_export_parses_every_row() {
    let file = write_fixture(".csv", CONSTRUCTION);
    let mut diags: Vec<Diagnostic> = Vec::new();

    let schedule = parse_file(file.path(), &AnalysisConfig::default(), &mut diags).unwrap();

    assert_eq!(schedule.len(), 6);
    assert!(schedule.has_predecessor_column);

    let cobertura = schedule.get_task("Cobertura").unwrap();
    let preds: Vec<&str> = cobertura.predecessors.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(preds, vec!["Alvenaria", "Instalações"]);

    let acabamento = schedule.get_task("Acabamento").unwrap();
    assert_eq!(acabamento.duration, None);
    assert_eq!(acabamento.predecessors[0].id, "Cobertura");
    assert_eq!(acabamento.end, NaiveDate::from_ymd_opt(2024, 5, 1));
}

#[test]
fn diagnostics_locate_rows() {
    let file = write_fixture(".csv", CONSTRUCTION);
    let mut diags: Vec<Diagnostic> = Vec::new();

    parse_file(file.path(), &AnalysisConfig::default(), &mut diags).unwrap();

    let root = diags
        .iter()
        .find(|d| d.code == DiagnosticCode::W001RootActivity)
        .unwrap();
    assert_eq!(root.task.as_deref(), Some("Mobilização"));
    assert_eq!(root.line, Some(1));

    let bad = diags
        .iter()
        .find(|d| d.code == DiagnosticCode::E002InvalidDuration)
        .unwrap();
    assert_eq!(bad.task.as_deref(), Some("Acabamento"));
    assert_eq!(bad.line, Some(6));
    assert_eq!(diags.len(), 2);
}

#[test]
fn tab_separated_export() {
    let file = write_fixture(
        ".tsv",
        "Nome da tarefa\tInício\tTérmino\tDuração\tPredecessoras\nA\t04/03/2024\t08/03/2024\t5 dias\t\n",
    );
    let schedule = parse_file(file.path(), &AnalysisConfig::default(), &mut Vec::new()).unwrap();
    assert_eq!(schedule.tasks[0].start, NaiveDate::from_ymd_opt(2024, 3, 4));
}

#[test]
fn missing_name_column_fails() {
    let file = write_fixture(".csv", "Tarefa,Início,Término,Duração\nA,04/03/24,08/03/24,5 dias\n");
    let err = parse_file(file.path(), &AnalysisConfig::default(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, ParseError::MissingColumn(ref c) if c == "Nome da tarefa"));
}
