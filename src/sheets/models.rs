use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::sheets::changes::TaskChangeError;
use crate::sheets::derive::derive_summary;

/// Working days covered by one timesheet.
pub const WINDOW_DAYS: i64 = 5;

const WEEKS_PER_BLOCK: u32 = 5;
const DAYS_BETWEEN_TIMESHEETS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    Completed,
    Incomplete,
    Missing,
}

impl TimesheetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Incomplete => "incomplete",
            Self::Missing => "missing",
        }
    }

    /// What the dashboard offers for a row in this state.
    pub fn action(self) -> TimesheetAction {
        match self {
            Self::Completed => TimesheetAction::View,
            Self::Incomplete => TimesheetAction::Update,
            Self::Missing => TimesheetAction::Create,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimesheetAction {
    View,
    Update,
    Create,
}

/// The identity and 5-day date span of one timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    id: u32,
    start_date: NaiveDate,
}

impl WeekWindow {
    pub fn new(id: u32, start_date: NaiveDate) -> Self {
        Self { id, start_date }
    }

    /// Timesheet `id` starts `id` weeks after the first Monday of 2024.
    pub fn for_id(id: u32) -> Self {
        let epoch = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
        Self::new(
            id,
            epoch + Duration::days(i64::from(id) * DAYS_BETWEEN_TIMESHEETS),
        )
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn week(&self) -> u32 {
        self.id.div_ceil(WEEKS_PER_BLOCK)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(WINDOW_DAYS - 1)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start_date = self.start_date;
        (0..WINDOW_DAYS).map(move |offset| start_date + Duration::days(offset))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date()
    }

    /// Human readable span, e.g. `8 January - 12 January, 2024`.
    pub fn date_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%-d %B"),
            self.end_date().format("%-d %B, %Y")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTask {
    pub id: String,
    pub date: NaiveDate,
    pub project_name: String,
    pub type_of_work: String,
    pub description: String,
    pub hours: f64,
}

/// Aggregate view of one week. Hours, status and action are always derived
/// from a task list and cannot be set on their own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetSummary {
    id: u32,
    week: u32,
    date_range: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    hours: f64,
    status: TimesheetStatus,
    action: TimesheetAction,
}

impl TimesheetSummary {
    pub fn derive(window: &WeekWindow, tasks: &[DailyTask]) -> Self {
        let totals = derive_summary(tasks);
        Self {
            id: window.id(),
            week: window.week(),
            date_range: window.date_range_label(),
            start_date: window.start_date(),
            end_date: window.end_date(),
            hours: totals.hours,
            status: totals.status,
            action: totals.action,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn status(&self) -> TimesheetStatus {
        self.status
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimesheetDetails {
    #[serde(flatten)]
    summary: TimesheetSummary,
    tasks: Vec<DailyTask>,
    #[serde(skip)]
    window: WeekWindow,
}

impl TimesheetDetails {
    /// Builds a timesheet from its tasks, rejecting any task dated outside
    /// the window so the totals always match what the week displays.
    pub fn new(window: WeekWindow, tasks: Vec<DailyTask>) -> Result<Self, TaskChangeError> {
        if let Some(task) = tasks.iter().find(|task| !window.contains(task.date)) {
            return Err(TaskChangeError::OutsideWindow {
                date: task.date,
                start: window.start_date(),
                end: window.end_date(),
            });
        }

        Ok(Self {
            summary: TimesheetSummary::derive(&window, &tasks),
            tasks,
            window,
        })
    }

    pub fn summary(&self) -> &TimesheetSummary {
        &self.summary
    }

    pub fn tasks(&self) -> &[DailyTask] {
        &self.tasks
    }

    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn id(&self) -> u32 {
        self.summary.id()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
    }

    fn task(id: &str, date: NaiveDate, hours: f64) -> DailyTask {
        DailyTask {
            id: id.to_string(),
            date,
            project_name: "Project A".to_string(),
            type_of_work: "Bug fixes".to_string(),
            description: "triage".to_string(),
            hours,
        }
    }

    #[test]
    fn window_for_id_steps_one_week_per_id() {
        let first = WeekWindow::for_id(1);
        assert_eq!(first.start_date(), date(1, 8));
        assert_eq!(first.end_date(), date(1, 12));
        assert_eq!(first.week(), 1);

        let sixth = WeekWindow::for_id(6);
        assert_eq!(sixth.start_date(), date(2, 12));
        assert_eq!(sixth.week(), 2);
    }

    #[test]
    fn window_label_spans_months() {
        let window = WeekWindow::new(3, date(1, 29));
        assert_eq!(window.date_range_label(), "29 January - 2 February, 2024");
        assert_eq!(window.days().count(), 5);
    }

    #[test]
    fn details_reject_tasks_outside_window() {
        let window = WeekWindow::new(1, date(1, 8));
        let result = TimesheetDetails::new(window, vec![task("a", date(1, 13), 4.0)]);
        assert_eq!(
            result,
            Err(TaskChangeError::OutsideWindow {
                date: date(1, 13),
                start: date(1, 8),
                end: date(1, 12),
            })
        );
    }

    #[test]
    fn details_summary_tracks_task_hours() {
        let window = WeekWindow::new(1, date(1, 8));
        let details = TimesheetDetails::new(
            window,
            vec![task("a", date(1, 8), 8.0), task("b", date(1, 12), 0.0)],
        )
        .expect("tasks are inside the window");

        assert_eq!(details.summary().hours(), 8.0);
        assert_eq!(details.summary().status(), TimesheetStatus::Incomplete);
        let json = serde_json::to_value(details.summary()).expect("summary serializes");
        assert_eq!(json["action"], "Update");
    }

    #[test]
    fn details_serialize_flat_with_camel_case_fields() {
        let window = WeekWindow::new(1, date(1, 8));
        let details = TimesheetDetails::new(window, vec![task("a", date(1, 9), 40.0)])
            .expect("task is inside the window");
        let json = serde_json::to_value(&details).expect("details serialize");

        assert_eq!(json["dateRange"], "8 January - 12 January, 2024");
        assert_eq!(json["startDate"], "2024-01-08");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["action"], "View");
        assert_eq!(json["tasks"][0]["projectName"], "Project A");
        assert!(json.get("window").is_none());
    }

    #[test]
    fn empty_details_serialize_zero_hours() {
        let window = WeekWindow::new(4, date(2, 5));
        let details = TimesheetDetails::new(window, Vec::new()).expect("empty week is valid");
        let body = serde_json::to_string(&details).expect("details serialize");

        assert_eq!(details.id(), 4);
        assert!(body.contains("\"hours\":0.0"), "unexpected body: {body}");
        assert!(!body.contains("-0.0"));
    }
}
