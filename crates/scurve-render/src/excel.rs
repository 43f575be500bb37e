//! Excel workbook renderer
//!
//! Generates an XLSX file with one sheet per analytical view:
//! - Critical Path: ordered tasks of the longest dependency chain
//! - Root Activities: tasks without predecessors
//! - S-Curve: weekly increment, cumulative and delta percentages, with a
//!   native line chart of the cumulative curve
//! - Overdue / Next 7 Days / Next 15 Days: activity windows relative to today
//! - Diagnostics: every reported condition, errors first
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: S-Curve
//! | Week       | Increment | Cumulative % | Delta % |
//! |------------|-----------|--------------|---------|
//! | 04/03/2024 | 1.00      | 50.00        | 50.00   |
//! | 11/03/2024 | 0.50      | 75.00        | 25.00   |
//! | 18/03/2024 | 0.50      | 100.00       | 25.00   |
//! ```

use rust_xlsxwriter::{
    Chart, ChartType, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};
use scurve_core::{Analysis, Diagnostic, PathStatus, RenderError, Renderer, Severity, Task};
use tracing::debug;

use crate::format_date;

const SCURVE_SHEET: &str = "S-Curve";

/// Excel workbook renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Whether to add the native line chart to the S-Curve sheet
    pub include_chart: bool,
    /// Whether to include the Diagnostics sheet
    pub include_diagnostics: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            include_chart: true,
            include_diagnostics: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave the S-Curve sheet as a plain table
    pub fn no_chart(mut self) -> Self {
        self.include_chart = false;
        self
    }

    /// Omit the Diagnostics sheet
    pub fn no_diagnostics(mut self) -> Self {
        self.include_diagnostics = false;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, analysis: &Analysis) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = ExcelFormats::new();

        Self::add_critical_path_sheet(&mut workbook, analysis, &formats).map_err(xlsx_error)?;
        Self::add_task_sheet(
            &mut workbook,
            "Root Activities",
            &analysis.critical_path.roots,
            &formats,
        )
        .map_err(xlsx_error)?;
        self.add_scurve_sheet(&mut workbook, analysis, &formats)
            .map_err(xlsx_error)?;
        Self::add_task_sheet(&mut workbook, "Overdue", &analysis.activities.overdue, &formats)
            .map_err(xlsx_error)?;
        Self::add_task_sheet(
            &mut workbook,
            "Next 7 Days",
            &analysis.activities.next_7_days,
            &formats,
        )
        .map_err(xlsx_error)?;
        Self::add_task_sheet(
            &mut workbook,
            "Next 15 Days",
            &analysis.activities.next_15_days,
            &formats,
        )
        .map_err(xlsx_error)?;

        if self.include_diagnostics {
            Self::add_diagnostics_sheet(&mut workbook, &analysis.diagnostics, &formats)
                .map_err(xlsx_error)?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        debug!(bytes = buffer.len(), "rendered workbook");
        Ok(buffer)
    }

    /// Critical path tasks in path order
    fn add_critical_path_sheet(
        workbook: &mut Workbook,
        analysis: &Analysis,
        formats: &ExcelFormats,
    ) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Critical Path")?;

        let headers = ["#", "Task", "Line", "Start", "End", "Duration (days)"];
        write_headers(sheet, &headers, formats)?;
        sheet.set_column_width(0, 5)?;
        sheet.set_column_width(1, 40)?;
        sheet.set_column_width(2, 8)?;
        sheet.set_column_width(3, 12)?;
        sheet.set_column_width(4, 12)?;
        sheet.set_column_width(5, 16)?;

        let cp = &analysis.critical_path;
        for (i, id) in cp.path.iter().enumerate() {
            let row = (i + 1) as u32;
            let task = analysis.schedule.get_task(id);

            sheet.write_with_format(row, 0, (i + 1) as f64, &formats.integer)?;
            sheet.write_with_format(row, 1, id.as_str(), &formats.text)?;
            match task {
                Some(task) => {
                    sheet.write_with_format(row, 2, task.line as f64, &formats.integer)?;
                    sheet.write_with_format(row, 3, format_date(task.start), &formats.date)?;
                    sheet.write_with_format(row, 4, format_date(task.end), &formats.date)?;
                    write_duration(sheet, row, 5, task, formats)?;
                }
                None => {
                    for col in 2..=5 {
                        sheet.write_with_format(row, col, "-", &formats.text)?;
                    }
                }
            }
        }

        let footer = (cp.path.len() + 2) as u32;
        match &cp.status {
            PathStatus::Computed => {
                sheet.write_with_format(footer, 1, "Total (days)", &formats.total_row)?;
                sheet.write_with_format(footer, 5, cp.total_weight as f64, &formats.total_row)?;
            }
            PathStatus::ColumnMissing => {
                sheet.write_with_format(footer, 1, "Not computed: no predecessor column", &formats.text)?;
            }
            PathStatus::EmptyGraph => {
                sheet.write_with_format(footer, 1, "Not computed: empty dependency graph", &formats.text)?;
            }
            PathStatus::Cycle { tasks } => {
                sheet.write_with_format(
                    footer,
                    1,
                    format!("Not computed: cycle among {}", tasks.join(", ")),
                    &formats.text,
                )?;
            }
            PathStatus::Overflow { task } => {
                sheet.write_with_format(
                    footer,
                    1,
                    format!("Not computed: path length overflows at {task}"),
                    &formats.text,
                )?;
            }
        }

        sheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    /// Weekly S-curve table plus a line chart of the cumulative column
    fn add_scurve_sheet(
        &self,
        workbook: &mut Workbook,
        analysis: &Analysis,
        formats: &ExcelFormats,
    ) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SCURVE_SHEET)?;

        let headers = ["Week", "Increment", "Cumulative %", "Delta %"];
        write_headers(sheet, &headers, formats)?;
        sheet.set_column_width(0, 12)?;
        sheet.set_column_width(1, 12)?;
        sheet.set_column_width(2, 14)?;
        sheet.set_column_width(3, 12)?;

        let points = &analysis.timeline.points;
        for (i, point) in points.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_with_format(row, 0, point.label.as_str(), &formats.date)?;
            sheet.write_with_format(row, 1, point.increment, &formats.number)?;
            sheet.write_with_format(row, 2, point.cumulative, &formats.number)?;
            sheet.write_with_format(row, 3, point.delta, &formats.number)?;
        }

        if self.include_chart && !points.is_empty() {
            let last = points.len() as u32;
            let mut chart = Chart::new(ChartType::Line);
            chart
                .add_series()
                .set_name("Cumulative %")
                .set_categories((SCURVE_SHEET, 1, 0, last, 0))
                .set_values((SCURVE_SHEET, 1, 2, last, 2));
            chart.title().set_name("S-Curve");
            chart.x_axis().set_name("Week");
            chart.y_axis().set_name("Cumulative %");
            chart.legend().set_hidden();

            sheet.insert_chart(1, 5, &chart)?;
        }

        sheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    /// Generic task list used by the root and activity-window sheets
    fn add_task_sheet(
        workbook: &mut Workbook,
        name: &str,
        tasks: &[Task],
        formats: &ExcelFormats,
    ) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;

        let headers = ["Line", "Task", "Start", "End", "Duration (days)", "Predecessors"];
        write_headers(sheet, &headers, formats)?;
        sheet.set_column_width(0, 8)?;
        sheet.set_column_width(1, 40)?;
        sheet.set_column_width(2, 12)?;
        sheet.set_column_width(3, 12)?;
        sheet.set_column_width(4, 16)?;
        sheet.set_column_width(5, 30)?;

        for (i, task) in tasks.iter().enumerate() {
            let row = (i + 1) as u32;
            sheet.write_with_format(row, 0, task.line as f64, &formats.integer)?;
            sheet.write_with_format(row, 1, task.id.as_str(), &formats.text)?;
            sheet.write_with_format(row, 2, format_date(task.start), &formats.date)?;
            sheet.write_with_format(row, 3, format_date(task.end), &formats.date)?;
            write_duration(sheet, row, 4, task, formats)?;
            sheet.write_with_format(
                row,
                5,
                task.predecessor_text.as_deref().unwrap_or(""),
                &formats.text,
            )?;
        }

        sheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    /// Every diagnostic, errors first
    fn add_diagnostics_sheet(
        workbook: &mut Workbook,
        diagnostics: &[Diagnostic],
        formats: &ExcelFormats,
    ) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Diagnostics")?;

        let headers = ["Code", "Severity", "Line", "Task", "Message", "Hint"];
        write_headers(sheet, &headers, formats)?;
        sheet.set_column_width(0, 8)?;
        sheet.set_column_width(1, 10)?;
        sheet.set_column_width(2, 8)?;
        sheet.set_column_width(3, 30)?;
        sheet.set_column_width(4, 60)?;
        sheet.set_column_width(5, 40)?;

        let mut sorted: Vec<&Diagnostic> = diagnostics.iter().collect();
        sorted.sort_by_key(|d| std::cmp::Reverse(d.severity));

        for (i, diag) in sorted.iter().enumerate() {
            let row = (i + 1) as u32;
            let severity_format = formats.severity(diag.severity);

            sheet.write_with_format(row, 0, diag.code.as_str(), severity_format)?;
            sheet.write_with_format(row, 1, diag.severity.as_str(), severity_format)?;
            match diag.line {
                Some(line) => sheet.write_with_format(row, 2, line as f64, &formats.integer)?,
                None => sheet.write_with_format(row, 2, "", &formats.text)?,
            };
            sheet.write_with_format(row, 3, diag.task.as_deref().unwrap_or(""), &formats.text)?;
            sheet.write_with_format(row, 4, diag.message.as_str(), &formats.text)?;
            let hint = diag.hints.first().map(String::as_str).unwrap_or("");
            sheet.write_with_format(row, 5, hint, &formats.text)?;
        }

        sheet.set_freeze_panes(1, 0)?;
        Ok(())
    }
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], formats: &ExcelFormats) -> Result<(), XlsxError> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, &formats.header)?;
    }
    Ok(())
}

/// Parsed duration when available, the original text otherwise
fn write_duration(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    task: &Task,
    formats: &ExcelFormats,
) -> Result<(), XlsxError> {
    match task.duration {
        Some(days) => sheet.write_with_format(row, col, days as f64, &formats.integer)?,
        None => sheet.write_with_format(row, col, task.duration_text.as_str(), &formats.text)?,
    };
    Ok(())
}

fn xlsx_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

/// Reusable cell formats
struct ExcelFormats {
    header: Format,
    text: Format,
    date: Format,
    number: Format,
    integer: Format,
    total_row: Format,
    error: Format,
    warning: Format,
    hint: Format,
    info: Format,
}

impl ExcelFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let text = Format::new().set_border(FormatBorder::Thin);

        let date = Format::new()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let number = Format::new()
            .set_num_format("0.00")
            .set_border(FormatBorder::Thin);

        let integer = Format::new()
            .set_num_format("#,##0")
            .set_border(FormatBorder::Thin);

        let total_row = Format::new()
            .set_bold()
            .set_background_color(0xE2EFDA)
            .set_border(FormatBorder::Thin);

        let severity = |color: u32| {
            Format::new()
                .set_background_color(color)
                .set_border(FormatBorder::Thin)
        };

        Self {
            header,
            text,
            date,
            number,
            integer,
            total_row,
            error: severity(0xFFCCCC),
            warning: severity(0xFFFFCC),
            hint: severity(0xCCFFFF),
            info: severity(0xCCCCFF),
        }
    }

    fn severity(&self, severity: Severity) -> &Format {
        match severity {
            Severity::Error => &self.error,
            Severity::Warning => &self.warning,
            Severity::Hint => &self.hint,
            Severity::Info => &self.info,
        }
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, analysis: &Analysis) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(analysis)
    }
}
