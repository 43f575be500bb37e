//! S-curve property suite
//!
//! Invariants:
//! 1. Non-degenerate curves end at 100% and never decrease
//! 2. A curve is degenerate exactly when no task contributes, and then every
//!    value stays at 0
//! 3. `delta[0] == cumulative[0]` and `delta[i] == cumulative[i] - cumulative[i-1]`
//! 4. Every point sits on a Monday inside the window

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::Config;
use scurve_core::{Distribution, ProgressTimeline, Schedule, Task};
use scurve_solver::ProgressAggregator;

const EPS: f64 = 1e-9;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn origin() -> NaiveDate {
    date(2024, 1, 3)
}

/// Task spans as `(start offset, length)` in days from [`origin`];
/// `None` marks an undated task
fn task_spans() -> impl Strategy<Value = Vec<Option<(i64, i64)>>> {
    vec(proptest::option::weighted(0.85, (0_i64..120, 0_i64..40)), 0..25)
}

/// Reporting window as `(start offset, length)`; always holds a Monday
fn window() -> impl Strategy<Value = (i64, i64)> {
    (-10_i64..110, 6_i64..120)
}

fn distribution() -> impl Strategy<Value = Distribution> {
    prop_oneof![Just(Distribution::Weekly), Just(Distribution::Daily)]
}

fn schedule_from(spans: &[Option<(i64, i64)>]) -> Schedule {
    Schedule::new(
        spans
            .iter()
            .enumerate()
            .map(|(i, span)| {
                let task = Task::new(format!("t{i}")).line(i + 1);
                match span {
                    Some((offset, length)) => {
                        let start = origin() + Duration::days(*offset);
                        task.dates(start, start + Duration::days(*length))
                    }
                    None => task,
                }
            })
            .collect(),
    )
}

fn run(
    distribution: Distribution,
    spans: &[Option<(i64, i64)>],
    (offset, length): (i64, i64),
) -> (ProgressTimeline, NaiveDate, NaiveDate) {
    let start = origin() + Duration::days(offset);
    let end = start + Duration::days(length);
    let timeline = ProgressAggregator::new(distribution).aggregate(&schedule_from(spans), start, end);
    (timeline, start, end)
}

/// Whether any task carries progress under `distribution`
fn contributes(distribution: Distribution, spans: &[Option<(i64, i64)>]) -> bool {
    spans.iter().flatten().any(|(_, length)| match distribution {
        Distribution::Weekly => true,
        Distribution::Daily => *length > 0,
    })
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    // ========================================================================
    // Normalization
    // ========================================================================

    #[test]
    fn curve_ends_at_one_hundred_and_never_decreases(
        d in distribution(),
        spans in task_spans(),
        w in window(),
    ) {
        let (timeline, _, _) = run(d, &spans, w);
        prop_assume!(!timeline.is_degenerate());

        prop_assert!((timeline.final_cumulative() - 100.0).abs() < EPS);
        for pair in timeline.points.windows(2) {
            prop_assert!(
                pair[1].cumulative + EPS >= pair[0].cumulative,
                "{} drops below {}",
                pair[1].label,
                pair[0].label
            );
        }
    }

    // ========================================================================
    // Degenerate input
    // ========================================================================

    #[test]
    fn degenerate_exactly_when_nothing_contributes(
        d in distribution(),
        spans in task_spans(),
        w in window(),
    ) {
        let (timeline, _, _) = run(d, &spans, w);
        prop_assert_eq!(timeline.is_degenerate(), !contributes(d, &spans));

        if timeline.is_degenerate() {
            for point in &timeline.points {
                prop_assert_eq!(point.cumulative, 0.0);
                prop_assert_eq!(point.delta, 0.0);
            }
        }
    }

    // ========================================================================
    // Delta reconstruction
    // ========================================================================

    #[test]
    fn deltas_rebuild_the_cumulative_curve(
        d in distribution(),
        spans in task_spans(),
        w in window(),
    ) {
        let (timeline, _, _) = run(d, &spans, w);
        let points = &timeline.points;
        prop_assert!(!points.is_empty());

        prop_assert!((points[0].delta - points[0].cumulative).abs() < EPS);
        for i in 1..points.len() {
            let expected = points[i].cumulative - points[i - 1].cumulative;
            prop_assert!((points[i].delta - expected).abs() < EPS, "week {}", points[i].label);
        }

        let rebuilt: f64 = points.iter().map(|p| p.delta).sum();
        prop_assert!((rebuilt - timeline.final_cumulative()).abs() < 1e-6);
    }

    // ========================================================================
    // Week boundaries
    // ========================================================================

    #[test]
    fn points_are_every_monday_inside_window(
        d in distribution(),
        spans in task_spans(),
        w in window(),
    ) {
        let (timeline, start, end) = run(d, &spans, w);

        let mondays = start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| day.weekday() == Weekday::Mon)
            .count();
        prop_assert_eq!(timeline.len(), mondays);

        for point in &timeline.points {
            prop_assert_eq!(point.week.weekday(), Weekday::Mon);
            prop_assert!(point.week >= start && point.week <= end);
            prop_assert_eq!(&point.label, &point.week.format("%d/%m/%Y").to_string());
        }
    }
}

#[test]
fn half_dated_tasks_stay_at_zero() {
    let mut half_dated = Task::new("half");
    half_dated.start = Some(date(2024, 1, 8));
    let schedule = Schedule::new(vec![Task::new("a").duration(5), half_dated]);

    for d in [Distribution::Weekly, Distribution::Daily] {
        let timeline = ProgressAggregator::new(d).aggregate(&schedule, date(2024, 1, 1), date(2024, 2, 26));
        assert_eq!(timeline.len(), 9);
        assert!(timeline.is_degenerate());
        assert!(timeline
            .points
            .iter()
            .all(|p| p.cumulative == 0.0 && p.delta == 0.0 && !p.cumulative.is_nan()));
    }
}

#[test]
fn window_narrower_than_schedule_still_normalizes() {
    let schedule = schedule_from(&[Some((0, 10)), Some((12, 30)), Some((40, 20))]);
    let timeline = ProgressAggregator::default().aggregate(&schedule, date(2024, 1, 15), date(2024, 2, 5));

    assert_eq!(timeline.len(), 4);
    assert!((timeline.final_cumulative() - 100.0).abs() < EPS);
}
