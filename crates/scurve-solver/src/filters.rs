//! Time-windowed activity filters
//!
//! All filters take `today` as a parameter; tasks missing the dates a filter
//! needs are left out.

use chrono::{Duration, NaiveDate};
use scurve_core::{ActivityWindows, Schedule, Task};

/// Tasks whose end date is before `today`
pub fn overdue(schedule: &Schedule, today: NaiveDate) -> Vec<Task> {
    schedule
        .tasks
        .iter()
        .filter(|t| t.end.is_some_and(|end| end < today))
        .cloned()
        .collect()
}

/// Tasks active at some point between `today` and `today + days`
pub fn upcoming(schedule: &Schedule, today: NaiveDate, days: i64) -> Vec<Task> {
    let horizon = today + Duration::days(days);
    schedule
        .tasks
        .iter()
        .filter(|t| match (t.start, t.end) {
            (Some(start), Some(end)) => start <= horizon && end >= today,
            _ => false,
        })
        .cloned()
        .collect()
}

/// Overdue, next 7 days and next 15 days in one pass over the schedule
pub fn activity_windows(schedule: &Schedule, today: NaiveDate) -> ActivityWindows {
    ActivityWindows {
        today,
        overdue: overdue(schedule, today),
        next_7_days: upcoming(schedule, today, 7),
        next_15_days: upcoming(schedule, today, 15),
    }
}
