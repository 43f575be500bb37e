//! Analysis configuration
//!
//! Loaded from `scurve.toml` by the CLI; every field has a default so an
//! empty file (or no file) yields the behavior of the source spreadsheets.

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Column header literals
    #[serde(default)]
    pub columns: ColumnNames,

    /// Parser behavior
    #[serde(default)]
    pub parser: ParserConfig,

    /// S-curve behavior
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Exact header literals for each required column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    #[serde(default = "default_name_column")]
    pub name: String,
    #[serde(default = "default_start_column")]
    pub start: String,
    #[serde(default = "default_end_column")]
    pub end: String,
    #[serde(default = "default_duration_column")]
    pub duration: String,
    #[serde(default = "default_predecessors_column")]
    pub predecessors: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: default_name_column(),
            start: default_start_column(),
            end: default_end_column(),
            duration: default_duration_column(),
            predecessors: default_predecessors_column(),
        }
    }
}

fn default_name_column() -> String {
    "Nome da tarefa".to_string()
}

fn default_start_column() -> String {
    "Início".to_string()
}

fn default_end_column() -> String {
    "Término".to_string()
}

fn default_duration_column() -> String {
    "Duração".to_string()
}

fn default_predecessors_column() -> String {
    "Predecessoras".to_string()
}

/// Parser options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Map numeric predecessor ids to the task on that 1-based line when no
    /// task carries that name
    #[serde(default)]
    pub resolve_row_numbers: bool,

    /// Report each root activity as a warning
    #[serde(default = "default_true")]
    pub report_roots: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            resolve_row_numbers: false,
            report_roots: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// How a task's unit of progress is spread over the weeks it covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    /// Evenly across the week boundaries inside the task interval
    #[default]
    Weekly,
    /// At `1 / duration` per calendar day, bucketed by week
    Daily,
}

/// S-curve options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default)]
    pub distribution: Distribution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: AnalysisConfig = toml::from_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.columns.predecessors, "Predecessoras");
        assert_eq!(config.progress.distribution, Distribution::Weekly);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AnalysisConfig = toml::from_str(
            r#"
            [columns]
            name = "Task Name"

            [progress]
            distribution = "daily"
            "#,
        )
        .unwrap();

        assert_eq!(config.columns.name, "Task Name");
        assert_eq!(config.columns.start, "Início");
        assert_eq!(config.progress.distribution, Distribution::Daily);
        assert!(!config.parser.resolve_row_numbers);
        assert!(config.parser.report_roots);
    }
}
