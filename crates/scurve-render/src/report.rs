//! Printable HTML report
//!
//! Generates a standalone HTML document laid out for printing: CSS page
//! breaks split it into a summary page with the S-curve chart, then one page
//! each for the critical path, root activities and overdue tasks.
//!
//! The chart is rendered to a uniquely named temporary file, read back and
//! embedded inline. The file belongs to a [`ChartArtifact`] that lives for a
//! single render call and is removed when it drops, on success and failure
//! alike.

use std::io::Write;
use std::path::Path;

use scurve_core::{Analysis, PathStatus, RenderError, Renderer, Severity, Task};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{format_date, html_escape, SvgCurveRenderer};

/// Scoped temporary file holding a rendered chart
#[derive(Debug)]
pub struct ChartArtifact {
    file: NamedTempFile,
}

impl ChartArtifact {
    /// Create an empty, uniquely named `.svg` file in the system temp dir
    pub fn create() -> Result<Self, RenderError> {
        let file = tempfile::Builder::new()
            .prefix("scurve-chart-")
            .suffix(".svg")
            .tempfile()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Write the chart and flush it to disk
    pub fn write(&mut self, content: &str) -> Result<(), RenderError> {
        self.file.write_all(content.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }

    /// Read the chart back from disk
    pub fn read_back(&self) -> Result<String, RenderError> {
        Ok(std::fs::read_to_string(self.file.path())?)
    }
}

/// HTML report renderer configuration
#[derive(Clone, Debug)]
pub struct HtmlReportRenderer {
    /// Report title
    pub title: String,
    /// Chart settings
    pub chart: SvgCurveRenderer,
    /// Add a page listing the next 7 and 15 days
    pub include_upcoming: bool,
}

impl Default for HtmlReportRenderer {
    fn default() -> Self {
        Self {
            title: "Relatório de Cronograma".into(),
            chart: SvgCurveRenderer::default(),
            include_upcoming: true,
        }
    }
}

impl HtmlReportRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Configure the chart
    pub fn chart(mut self, chart: SvgCurveRenderer) -> Self {
        self.chart = chart;
        self
    }

    /// Drop the upcoming-activities page
    pub fn no_upcoming(mut self) -> Self {
        self.include_upcoming = false;
        self
    }

    /// Render the chart through a scoped artifact and return its markup
    fn chart_markup(&self, analysis: &Analysis) -> Result<Option<String>, RenderError> {
        if analysis.timeline.is_empty() {
            return Ok(None);
        }

        let svg = self.chart.render(analysis)?;
        let mut artifact = ChartArtifact::create()?;
        artifact.write(&svg)?;
        debug!(path = %artifact.path().display(), "chart artifact written");
        let markup = artifact.read_back()?;
        Ok(Some(markup))
    }

    fn summary_page(&self, analysis: &Analysis, chart: Option<&str>) -> String {
        let cp = &analysis.critical_path;
        let errors = analysis
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = analysis
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();

        let path_summary = if cp.is_computed() {
            format!("{} tasks, {} days", cp.path.len(), cp.total_weight)
        } else {
            "not computed".to_string()
        };

        let figure = match chart {
            Some(svg) => format!("<figure class=\"chart\">\n{svg}\n</figure>"),
            None => "<p class=\"empty\">S-curve unavailable: no week boundary in the reporting window.</p>".to_string(),
        };

        format!(
            r#"<section class="page">
    <h1>{title}</h1>
    <table class="summary">
        <tr><th>Reporting window</th><td>{start} - {end}</td></tr>
        <tr><th>Status date</th><td>{today}</td></tr>
        <tr><th>Tasks</th><td>{tasks}</td></tr>
        <tr><th>Critical path</th><td>{path}</td></tr>
        <tr><th>Progress at status date</th><td>{progress:.1}%</td></tr>
        <tr><th>Overdue</th><td>{overdue}</td></tr>
        <tr><th>Diagnostics</th><td>{errors} errors, {warnings} warnings</td></tr>
    </table>
    {figure}
</section>"#,
            title = html_escape(&self.title),
            start = analysis.window.start.format("%d/%m/%Y"),
            end = analysis.window.end.format("%d/%m/%Y"),
            today = analysis.activities.today.format("%d/%m/%Y"),
            tasks = analysis.schedule.len(),
            path = path_summary,
            progress = analysis.timeline.cumulative_at(analysis.activities.today),
            overdue = analysis.activities.overdue.len(),
            errors = errors,
            warnings = warnings,
            figure = figure,
        )
    }

    fn critical_path_page(analysis: &Analysis) -> String {
        let cp = &analysis.critical_path;
        let body = match &cp.status {
            PathStatus::Computed => {
                let items: String = cp
                    .path
                    .iter()
                    .map(|id| {
                        let task = analysis.schedule.get_task(id);
                        format!(
                            "        <li>{} <span class=\"dates\">{} - {}</span></li>\n",
                            html_escape(id),
                            format_date(task.and_then(|t| t.start)),
                            format_date(task.and_then(|t| t.end)),
                        )
                    })
                    .collect();
                format!("<ol>\n{items}    </ol>")
            }
            PathStatus::ColumnMissing => {
                "<p class=\"empty\">Not computed: the schedule has no predecessor column.</p>".to_string()
            }
            PathStatus::EmptyGraph => {
                "<p class=\"empty\">Not computed: no dependency could be built.</p>".to_string()
            }
            PathStatus::Cycle { tasks } => format!(
                "<p class=\"empty\">Not computed: dependency cycle among {}.</p>",
                html_escape(&tasks.join(", "))
            ),
            PathStatus::Overflow { task } => format!(
                "<p class=\"empty\">Not computed: path length overflows at {}.</p>",
                html_escape(task)
            ),
        };

        format!("<section class=\"page\">\n    <h2>Critical Path</h2>\n    {body}\n</section>")
    }

    fn task_page(title: &str, tasks: &[Task]) -> String {
        let body = if tasks.is_empty() {
            "<p class=\"empty\">None.</p>".to_string()
        } else {
            let rows: String = tasks
                .iter()
                .map(|t| {
                    format!(
                        "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                        t.line,
                        html_escape(&t.id),
                        format_date(t.start),
                        format_date(t.end),
                        html_escape(&t.duration_text),
                    )
                })
                .collect();
            format!(
                "<table class=\"tasks\">\n        <tr><th>Line</th><th>Task</th><th>Start</th><th>End</th><th>Duration</th></tr>\n{rows}    </table>"
            )
        };

        format!("<section class=\"page\">\n    <h2>{title}</h2>\n    {body}\n</section>")
    }

    fn generate_css() -> &'static str {
        r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: system-ui, -apple-system, sans-serif;
            color: #2c3e50;
            padding: 24px;
        }
        h1 { font-size: 22px; margin-bottom: 16px; }
        h2 { font-size: 18px; margin-bottom: 12px; }
        table { border-collapse: collapse; margin-bottom: 16px; }
        th, td { border: 1px solid #d0d7de; padding: 4px 8px; text-align: left; font-size: 12px; }
        th { background: #4472c4; color: #ffffff; }
        ol li { font-size: 13px; margin: 2px 0 2px 24px; }
        .dates { color: #6a737d; margin-left: 8px; }
        .empty { color: #6a737d; font-style: italic; }
        .chart svg { max-width: 100%; height: auto; }
        .page { page-break-after: always; break-after: page; }
        .page:last-child { page-break-after: auto; break-after: auto; }
        @page { size: A4; margin: 15mm; }"#
    }
}

impl Renderer for HtmlReportRenderer {
    type Output = String;

    fn render(&self, analysis: &Analysis) -> Result<String, RenderError> {
        let chart = self.chart_markup(analysis)?;

        let mut pages = vec![
            self.summary_page(analysis, chart.as_deref()),
            Self::critical_path_page(analysis),
            Self::task_page("Root Activities", &analysis.critical_path.roots),
            Self::task_page("Overdue", &analysis.activities.overdue),
        ];
        if self.include_upcoming {
            pages.push(Self::task_page("Next 7 Days", &analysis.activities.next_7_days));
            pages.push(Self::task_page("Next 15 Days", &analysis.activities.next_15_days));
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{pages}
</body>
</html>"#,
            title = html_escape(&self.title),
            css = Self::generate_css(),
            pages = pages.join("\n"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn artifact_is_removed_on_drop() {
        let mut artifact = ChartArtifact::create().unwrap();
        artifact.write("<svg/>").unwrap();
        let path = artifact.path().to_path_buf();

        assert!(path.exists());
        assert_eq!(artifact.read_back().unwrap(), "<svg/>");
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("scurve-chart-"));

        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn artifacts_get_distinct_paths() {
        let a = ChartArtifact::create().unwrap();
        let b = ChartArtifact::create().unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn report_is_paginated_and_embeds_chart() {
        let html = HtmlReportRenderer::new("Obra Residencial")
            .render(&fixtures::analysis())
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Obra Residencial</title>"));
        assert!(html.contains("page-break-after: always"));
        assert_eq!(html.matches("<section class=\"page\">").count(), 6);
        assert!(html.contains("<figure class=\"chart\">"));
        assert!(html.contains("<polyline"));
        assert!(html.contains("2 tasks, 10 days"));
        assert!(html.contains("<li>A <span"));
    }

    #[test]
    fn report_without_weeks_skips_chart() {
        let mut analysis = fixtures::analysis();
        analysis.timeline.points.clear();

        let html = HtmlReportRenderer::default().no_upcoming().render(&analysis).unwrap();

        assert!(!html.contains("<figure"));
        assert!(html.contains("S-curve unavailable"));
        assert_eq!(html.matches("<section class=\"page\">").count(), 4);
    }

    #[test]
    fn report_escapes_task_names() {
        let mut analysis = fixtures::analysis();
        analysis.activities.overdue[0].id = "Caixa <d'água>".into();

        let html = HtmlReportRenderer::default().render(&analysis).unwrap();
        assert!(html.contains("Caixa &lt;d'água&gt;"));
    }

    #[test]
    fn summary_marks_uncomputed_path() {
        let mut analysis = fixtures::analysis();
        analysis.critical_path.path.clear();
        analysis.critical_path.status = PathStatus::Overflow { task: "B".into() };

        let html = HtmlReportRenderer::default().render(&analysis).unwrap();
        assert!(html.contains("<tr><th>Critical path</th><td>not computed</td></tr>"));
        assert!(html.contains("Not computed: path length overflows at B."));
        assert!(!html.contains("0 tasks, 10 days"));
    }
}
