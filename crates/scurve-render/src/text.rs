//! Plain text tables for terminal output

use scurve_core::{Analysis, PathStatus, RenderError, Renderer, Task};

use crate::format_date;

/// Plain text renderer for console output
#[derive(Clone, Copy, Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    fn critical_path(out: &mut String, analysis: &Analysis) {
        let cp = &analysis.critical_path;
        out.push_str("Critical path\n");
        match &cp.status {
            PathStatus::Computed => {
                out.push_str(&format!("  {} tasks, {} days\n", cp.path.len(), cp.total_weight));
                for (i, id) in cp.path.iter().enumerate() {
                    let task = analysis.schedule.get_task(id);
                    out.push_str(&format!(
                        "  {:>3}. {:<40} {:>10} {:>10}\n",
                        i + 1,
                        id,
                        format_date(task.and_then(|t| t.start)),
                        format_date(task.and_then(|t| t.end)),
                    ));
                }
            }
            PathStatus::ColumnMissing => {
                out.push_str("  not computed: no predecessor column\n");
            }
            PathStatus::EmptyGraph => {
                out.push_str("  not computed: no dependencies could be built\n");
            }
            PathStatus::Cycle { tasks } => {
                out.push_str(&format!("  not computed: cycle among {}\n", tasks.join(", ")));
            }
            PathStatus::Overflow { task } => {
                out.push_str(&format!("  not computed: path length overflows at {task}\n"));
            }
        }
    }

    fn task_table(out: &mut String, title: &str, tasks: &[Task]) {
        out.push_str(&format!("{title} ({})\n", tasks.len()));
        if tasks.is_empty() {
            out.push_str("  none\n");
            return;
        }
        out.push_str(&format!(
            "  {:>5}  {:<40} {:>10} {:>10} {:>8}\n",
            "line", "task", "start", "end", "days"
        ));
        for task in tasks {
            out.push_str(&format!(
                "  {:>5}  {:<40} {:>10} {:>10} {:>8}\n",
                task.line,
                task.id,
                format_date(task.start),
                format_date(task.end),
                task.duration.map_or_else(|| "-".to_string(), |d| d.to_string()),
            ));
        }
    }

    fn timeline(out: &mut String, analysis: &Analysis) {
        let timeline = &analysis.timeline;
        out.push_str(&format!("S-curve ({} weeks)\n", timeline.len()));
        if timeline.is_empty() {
            out.push_str("  no week boundary in the reporting window\n");
            return;
        }
        out.push_str(&format!(
            "  {:<10}  {:>9}  {:>10}  {:>8}\n",
            "week", "increment", "cumulative", "delta"
        ));
        for point in &timeline.points {
            out.push_str(&format!(
                "  {:<10}  {:>9.2}  {:>9.2}%  {:>7.2}%\n",
                point.label, point.increment, point.cumulative, point.delta
            ));
        }
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, analysis: &Analysis) -> Result<String, RenderError> {
        let mut out = String::new();
        let today = analysis.activities.today;

        out.push_str(&format!(
            "Window {} - {}, today {}\n",
            analysis.window.start.format("%d/%m/%Y"),
            analysis.window.end.format("%d/%m/%Y"),
            today.format("%d/%m/%Y"),
        ));
        out.push('\n');

        Self::critical_path(&mut out, analysis);
        out.push('\n');
        Self::task_table(&mut out, "Root activities", &analysis.critical_path.roots);
        out.push('\n');
        Self::timeline(&mut out, analysis);
        out.push('\n');
        Self::task_table(&mut out, "Overdue", &analysis.activities.overdue);
        out.push('\n');
        Self::task_table(&mut out, "Next 7 days", &analysis.activities.next_7_days);
        out.push('\n');
        Self::task_table(&mut out, "Next 15 days", &analysis.activities.next_15_days);

        Ok(out)
    }
}
