//! S-curve progress aggregation
//!
//! Every task with both dates is worth one unit of progress. The unit is
//! spread over weekly buckets anchored on Mondays, accumulated in week order
//! and normalized so the curve ends at 100%.
//!
//! Two distributions are available:
//! - [`Distribution::Weekly`]: the unit is split evenly across the Mondays
//!   inside `[start, end]`; a task covering no Monday credits its whole unit
//!   to the week containing its start.
//! - [`Distribution::Daily`]: the unit flows at `1 / duration` per calendar
//!   day of `[start, end)`; zero-length tasks contribute nothing.

use std::ops::Range;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use scurve_core::{Distribution, ProgressTimeline, Schedule, TimelinePoint};

/// Mondays in `[start, end]`
pub fn week_boundaries(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let offset = (7 - start.weekday().num_days_from_monday()) % 7;
    let mut current = start + Duration::days(i64::from(offset));
    let mut weeks = Vec::new();
    while current <= end {
        weeks.push(current);
        current += Duration::weeks(1);
    }
    debug_assert!(weeks.iter().all(|w| w.weekday() == Weekday::Mon));
    weeks
}

/// Index of the week containing `date`, clamped to the first and last week
fn bucket_of(weeks: &[NaiveDate], date: NaiveDate) -> usize {
    weeks.partition_point(|w| *w <= date).saturating_sub(1)
}

/// Progress aggregator configured with a distribution
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAggregator {
    pub distribution: Distribution,
}

impl ProgressAggregator {
    pub fn new(distribution: Distribution) -> Self {
        Self { distribution }
    }

    /// Build the timeline for `[start, end]`.
    ///
    /// Returns an empty timeline when the window holds no Monday, and an
    /// all-zero timeline when no task contributed progress.
    pub fn aggregate(&self, schedule: &Schedule, start: NaiveDate, end: NaiveDate) -> ProgressTimeline {
        let weeks = week_boundaries(start, end);
        if weeks.is_empty() {
            return ProgressTimeline::default();
        }

        let mut credit = vec![0.0_f64; weeks.len()];
        for task in &schedule.tasks {
            let (Some(task_start), Some(task_end)) = (task.start, task.end) else {
                continue;
            };
            match self.distribution {
                Distribution::Weekly => credit_weekly(&weeks, &mut credit, task_start, task_end),
                Distribution::Daily => credit_daily(&weeks, &mut credit, task_start, task_end),
            }
        }

        build_timeline(&weeks, &credit)
    }
}

/// Indices of the Mondays inside `[start, end]`; empty for inverted spans
fn weeks_spanned(weeks: &[NaiveDate], start: NaiveDate, end: NaiveDate) -> Range<usize> {
    let first = weeks.partition_point(|w| *w < start);
    let last = weeks.partition_point(|w| *w <= end);
    first..last.max(first)
}

fn credit_weekly(weeks: &[NaiveDate], credit: &mut [f64], start: NaiveDate, end: NaiveDate) {
    let span = weeks_spanned(weeks, start, end);
    if span.is_empty() {
        credit[bucket_of(weeks, start)] += 1.0;
        return;
    }

    let share = 1.0 / span.len() as f64;
    for slot in &mut credit[span] {
        *slot += share;
    }
}

fn credit_daily(weeks: &[NaiveDate], credit: &mut [f64], start: NaiveDate, end: NaiveDate) {
    let days = (end - start).num_days();
    let rate = daily_rate(days);
    if rate == 0.0 {
        return;
    }
    for offset in 0..days {
        credit[bucket_of(weeks, start + Duration::days(offset))] += rate;
    }
}

/// Progress per day for a task lasting `days`; zero for empty or inverted spans
pub fn daily_rate(days: i64) -> f64 {
    if days > 0 {
        1.0 / days as f64
    } else {
        0.0
    }
}

/// Accumulate, normalize and derive deltas
fn build_timeline(weeks: &[NaiveDate], credit: &[f64]) -> ProgressTimeline {
    let mut running = 0.0;
    let raw: Vec<f64> = credit
        .iter()
        .map(|c| {
            running += c;
            running
        })
        .collect();

    let total_raw = running;
    let scale = if total_raw > 0.0 { 100.0 / total_raw } else { 0.0 };

    let mut previous = 0.0;
    let points = weeks
        .iter()
        .zip(credit)
        .zip(&raw)
        .map(|((week, increment), cumulative_raw)| {
            let cumulative = if total_raw > 0.0 {
                if *cumulative_raw == total_raw {
                    100.0
                } else {
                    cumulative_raw * scale
                }
            } else {
                0.0
            };
            let delta = cumulative - previous;
            previous = cumulative;
            TimelinePoint {
                week: *week,
                label: week.format("%d/%m/%Y").to_string(),
                increment: *increment,
                cumulative,
                delta,
            }
        })
        .collect();

    ProgressTimeline { points, total_raw }
}

/// Weekly-distribution S-curve over `[start, end]`
pub fn aggregate(schedule: &Schedule, start: NaiveDate, end: NaiveDate) -> ProgressTimeline {
    ProgressAggregator::default().aggregate(schedule, start, end)
}
