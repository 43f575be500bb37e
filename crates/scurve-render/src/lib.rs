//! # scurve-render
//!
//! Reporting backends for scurve analyses.
//!
//! This crate provides:
//! - Plain text tables for the terminal
//! - SVG S-curve chart rendering
//! - Excel workbook export (one sheet per view, with a native line chart)
//! - Paginated HTML report embedding the chart
//! - Custom renderer trait (re-exported from `scurve-core`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use scurve_core::Renderer;
//! use scurve_render::{ExcelRenderer, HtmlReportRenderer, SvgCurveRenderer, TextRenderer};
//!
//! // Terminal tables
//! println!("{}", TextRenderer.render(&analysis)?);
//!
//! // Pure SVG chart
//! let svg = SvgCurveRenderer::default().render(&analysis)?;
//!
//! // Excel workbook
//! let xlsx_bytes = ExcelRenderer::new().render(&analysis)?;
//! std::fs::write("schedule.xlsx", xlsx_bytes)?;
//!
//! // Printable report
//! let html = HtmlReportRenderer::new("Obra Residencial").render(&analysis)?;
//! ```

pub mod excel;
pub mod report;
pub mod text;

pub use excel::ExcelRenderer;
pub use report::{ChartArtifact, HtmlReportRenderer};
pub use text::TextRenderer;

use chrono::NaiveDate;
use svg::node::element::{Circle, Group, Line, Polyline, Rectangle, Text};
use svg::Document;
use scurve_core::{Analysis, ProgressTimeline, RenderError, Renderer};

/// SVG S-curve chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgCurveRenderer {
    /// Width of the plot area in pixels
    pub plot_width: u32,
    /// Height of the plot area in pixels
    pub plot_height: u32,
    /// Width reserved for the percentage axis
    pub axis_width: u32,
    /// Height reserved for week labels
    pub label_height: u32,
    /// Title height in pixels
    pub title_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Chart title
    pub title: String,
    /// Color of the cumulative curve
    pub curve_color: String,
    /// Color of the weekly delta bars
    pub bar_color: String,
    /// Color of the "today" marker
    pub today_color: String,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgCurveRenderer {
    fn default() -> Self {
        Self {
            plot_width: 720,
            plot_height: 320,
            axis_width: 48,
            label_height: 70,
            title_height: 30,
            padding: 20,
            title: "Curva S".into(),
            curve_color: "#1f77b4".into(),
            bar_color: "#aec7e8".into(),
            today_color: "#e74c3c".into(),
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 11,
        }
    }
}

impl SvgCurveRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the chart title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Configure plot width
    pub fn plot_width(mut self, width: u32) -> Self {
        self.plot_width = width;
        self
    }

    fn total_width(&self) -> u32 {
        self.padding * 2 + self.axis_width + self.plot_width
    }

    fn total_height(&self) -> u32 {
        self.padding * 2 + self.title_height + self.plot_height + self.label_height
    }

    fn plot_left(&self) -> f64 {
        (self.padding + self.axis_width) as f64
    }

    fn plot_top(&self) -> f64 {
        (self.padding + self.title_height) as f64
    }

    fn plot_bottom(&self) -> f64 {
        self.plot_top() + self.plot_height as f64
    }

    /// Horizontal distance between two weekly points
    fn step(&self, points: usize) -> f64 {
        self.plot_width as f64 / points.saturating_sub(1).max(1) as f64
    }

    fn x_at(&self, index: usize, points: usize) -> f64 {
        self.plot_left() + index as f64 * self.step(points)
    }

    /// Convert a percentage to a y position
    fn y_at(&self, percent: f64) -> f64 {
        self.plot_bottom() - percent.clamp(0.0, 100.0) / 100.0 * self.plot_height as f64
    }

    /// Horizontal grid lines and percentage labels every 20%
    fn render_axis(&self) -> Group {
        let mut group = Group::new().set("class", "axis");

        for step in 0..=5 {
            let percent = f64::from(step) * 20.0;
            let y = self.y_at(percent);

            let line = Line::new()
                .set("x1", self.plot_left())
                .set("y1", y)
                .set("x2", self.plot_left() + self.plot_width as f64)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);

            let label = Text::new(format!("{percent:.0}%"))
                .set("x", self.plot_left() - 6.0)
                .set("y", y + 4.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size)
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "end");
            group = group.add(label);
        }

        group
    }

    /// Week labels, thinned out so at most about a dozen are drawn
    fn render_week_labels(&self, timeline: &ProgressTimeline) -> Group {
        let mut group = Group::new().set("class", "weeks");
        let count = timeline.len();
        let every = count.div_ceil(12).max(1);

        for (i, point) in timeline.points.iter().enumerate() {
            if i % every != 0 && i + 1 != count {
                continue;
            }
            let x = self.x_at(i, count);
            let y = self.plot_bottom() + 12.0;
            let label = Text::new(point.label.as_str())
                .set("x", x)
                .set("y", y)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 1)
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "end")
                .set("transform", format!("rotate(-45 {x} {y})"));
            group = group.add(label);
        }

        group
    }

    /// Weekly delta bars behind the curve
    fn render_bars(&self, timeline: &ProgressTimeline) -> Group {
        let mut group = Group::new().set("class", "deltas");
        let count = timeline.len();
        let width = (self.step(count) * 0.6).clamp(2.0, 24.0);

        for (i, point) in timeline.points.iter().enumerate() {
            if point.delta <= 0.0 {
                continue;
            }
            let top = self.y_at(point.delta);
            let bar = Rectangle::new()
                .set("x", self.x_at(i, count) - width / 2.0)
                .set("y", top)
                .set("width", width)
                .set("height", self.plot_bottom() - top)
                .set("fill", self.bar_color.as_str());
            group = group.add(bar);
        }

        group
    }

    /// Cumulative curve with a marker per week
    fn render_curve(&self, timeline: &ProgressTimeline) -> Group {
        let count = timeline.len();
        let points: Vec<String> = timeline
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{:.2},{:.2}", self.x_at(i, count), self.y_at(p.cumulative)))
            .collect();

        let mut group = Group::new().set("class", "curve").add(
            Polyline::new()
                .set("points", points.join(" "))
                .set("fill", "none")
                .set("stroke", self.curve_color.as_str())
                .set("stroke-width", 2),
        );

        for (i, point) in timeline.points.iter().enumerate() {
            let marker = Circle::new()
                .set("cx", self.x_at(i, count))
                .set("cy", self.y_at(point.cumulative))
                .set("r", 3)
                .set("fill", self.curve_color.as_str());
            group = group.add(marker);
        }

        group
    }

    /// Vertical marker at `today` when it falls inside the plotted weeks
    fn render_today(&self, timeline: &ProgressTimeline, today: NaiveDate) -> Option<Line> {
        let first = timeline.points.first()?.week;
        let last = timeline.points.last()?.week;
        if today < first || today > last || first == last {
            return None;
        }
        let fraction = (today - first).num_days() as f64 / (last - first).num_days() as f64;
        let x = self.plot_left() + fraction * self.plot_width as f64;

        Some(
            Line::new()
                .set("class", "today")
                .set("x1", x)
                .set("y1", self.plot_top())
                .set("x2", x)
                .set("y2", self.plot_bottom())
                .set("stroke", self.today_color.as_str())
                .set("stroke-width", 1)
                .set("stroke-dasharray", "4 3"),
        )
    }
}

impl Renderer for SvgCurveRenderer {
    type Output = String;

    fn render(&self, analysis: &Analysis) -> Result<String, RenderError> {
        let timeline = &analysis.timeline;
        if timeline.is_empty() {
            return Err(RenderError::InvalidData("No S-curve points to render".into()));
        }

        let width = self.total_width();
        let height = self.total_height();

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        let title = Text::new(self.title.as_str())
            .set("x", self.padding)
            .set("y", self.padding + 15)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size + 4)
            .set("font-weight", "bold")
            .set("fill", self.text_color.as_str());
        document = document.add(title);

        document = document
            .add(self.render_axis())
            .add(self.render_bars(timeline))
            .add(self.render_curve(timeline))
            .add(self.render_week_labels(timeline));

        if let Some(marker) = self.render_today(timeline, analysis.activities.today) {
            document = document.add(marker);
        }

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Day-first date for reports, `-` when unknown
pub(crate) fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

/// HTML-escape a string
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_contains_curve_and_labels() {
        let svg = SvgCurveRenderer::new()
            .title("Obra Residencial")
            .render(&fixtures::analysis())
            .unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("04/03/2024"));
        assert!(svg.contains("18/03/2024"));
        assert!(svg.contains("100%"));
        assert!(svg.contains("Obra"));
    }

    #[test]
    fn svg_marks_today_inside_range() {
        let svg = SvgCurveRenderer::default().render(&fixtures::analysis()).unwrap();
        assert!(svg.contains("class=\"today\""));

        let mut outside = fixtures::analysis();
        outside.activities.today = fixtures::date(2024, 6, 1);
        let svg = SvgCurveRenderer::default().render(&outside).unwrap();
        assert!(!svg.contains("class=\"today\""));
    }

    #[test]
    fn svg_single_point_does_not_divide_by_zero() {
        let mut analysis = fixtures::analysis();
        analysis.timeline.points.truncate(1);
        let svg = SvgCurveRenderer::default().render(&analysis).unwrap();
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn svg_empty_timeline_fails() {
        let mut analysis = fixtures::analysis();
        analysis.timeline.points.clear();
        let err = SvgCurveRenderer::default().render(&analysis).unwrap_err();
        assert!(matches!(err, RenderError::InvalidData(_)));
    }

    #[test]
    fn dates_format_day_first() {
        assert_eq!(format_date(Some(fixtures::date(2024, 3, 4))), "04/03/2024");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn html_escape_works() {
        assert_eq!(html_escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }
}
