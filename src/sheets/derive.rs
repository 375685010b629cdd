use serde::Serialize;

use crate::sheets::models::{DailyTask, TimesheetAction, TimesheetStatus};

/// Logged hours at which a week counts as complete.
pub const COMPLETED_HOURS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimesheetTotals {
    pub hours: f64,
    pub status: TimesheetStatus,
    pub action: TimesheetAction,
}

pub fn derive_summary(tasks: &[DailyTask]) -> TimesheetTotals {
    // Folding from +0.0 keeps an empty week from reporting -0.0.
    let hours = tasks.iter().fold(0.0, |sum, task| sum + task.hours);
    let status = status_for_hours(hours);

    TimesheetTotals {
        hours,
        status,
        action: status.action(),
    }
}

pub fn status_for_hours(hours: f64) -> TimesheetStatus {
    if hours >= COMPLETED_HOURS {
        TimesheetStatus::Completed
    } else if hours > 0.0 {
        TimesheetStatus::Incomplete
    } else {
        TimesheetStatus::Missing
    }
}
