//! Analysis facade: every view derived from one schedule
//!
//! Each view is computed independently. A cycle in the dependencies leaves
//! the S-curve and the activity filters untouched, and an S-curve without
//! data never blocks the critical path.

use chrono::NaiveDate;
use scurve_core::{
    Analysis, AnalysisConfig, DateWindow, Diagnostic, DiagnosticCode, DiagnosticEmitter,
    Distribution, InputError, Schedule,
};
use tracing::{info, instrument};

use crate::critical::CriticalPathEngine;
use crate::filters::activity_windows;
use crate::progress::ProgressAggregator;

/// Build the reporting window, falling back to the schedule's latest end date
/// when `end` is not given.
pub fn resolve_window(
    schedule: &Schedule,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<DateWindow, InputError> {
    let end = match end {
        Some(end) => end,
        None => schedule.latest_end().ok_or(InputError::NoEndDate)?,
    };
    DateWindow::new(start, end)
}

/// Runs the critical path engine, the progress aggregator and the filters
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    engine: CriticalPathEngine,
    aggregator: ProgressAggregator,
}

impl Analyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            engine: CriticalPathEngine::new(),
            aggregator: ProgressAggregator::new(config.progress.distribution),
        }
    }

    /// Analyze a schedule. Diagnostics raised here go to `emitter` and are
    /// also kept on the returned [`Analysis`].
    #[instrument(skip_all, fields(tasks = schedule.len()))]
    pub fn analyze(
        &self,
        schedule: Schedule,
        window: DateWindow,
        today: NaiveDate,
        emitter: &mut impl DiagnosticEmitter,
    ) -> Analysis {
        let mut collected: Vec<Diagnostic> = Vec::new();
        let mut sink = (&mut collected, emitter);

        let critical_path = self.engine.compute(&schedule, &mut sink);

        let timeline = self.aggregator.aggregate(&schedule, window.start, window.end);
        if timeline.is_empty() {
            sink.emit(
                Diagnostic::new(
                    DiagnosticCode::W007EmptyWeekWindow,
                    format!(
                        "no Monday between {} and {}; the S-curve is empty",
                        window.start.format("%d/%m/%Y"),
                        window.end.format("%d/%m/%Y")
                    ),
                )
                .with_hint("widen the reporting window to at least one full week"),
            );
        } else if timeline.is_degenerate() {
            let note = match self.aggregator.distribution {
                Distribution::Weekly => "progress is only credited to tasks with both a start and an end date",
                Distribution::Daily => {
                    "daily progress is only credited to tasks with both dates and an end after the start"
                }
            };
            sink.emit(
                Diagnostic::new(
                    DiagnosticCode::W006NoProgressData,
                    "no task contributed progress; the S-curve stays at 0%",
                )
                .with_note(note),
            );
        }

        let activities = activity_windows(&schedule, today);

        let summary = format!(
            "{} tasks, critical path of {} tasks ({} days), {} weeks, {} overdue",
            schedule.len(),
            critical_path.path.len(),
            critical_path.total_weight,
            timeline.len(),
            activities.overdue.len()
        );
        info!("{summary}");
        sink.emit(Diagnostic::new(DiagnosticCode::I001AnalysisSummary, summary));

        Analysis {
            schedule,
            window,
            critical_path,
            timeline,
            activities,
            diagnostics: collected,
        }
    }
}

/// Analyze with the given configuration
pub fn analyze(
    schedule: Schedule,
    window: DateWindow,
    today: NaiveDate,
    config: &AnalysisConfig,
    emitter: &mut impl DiagnosticEmitter,
) -> Analysis {
    Analyzer::new(config).analyze(schedule, window, today, emitter)
}
