use chrono::NaiveDate;
use thiserror::Error;

use crate::sheets::models::{DailyTask, TimesheetDetails};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskChangeError {
    #[error("task '{0}' does not exist in this timesheet")]
    TaskNotFound(String),

    #[error("task '{0}' already exists in this timesheet")]
    DuplicateTaskId(String),

    #[error("task date {date} is outside the timesheet window {start} to {end}")]
    OutsideWindow {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Fields to overwrite on an existing task. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub date: Option<NaiveDate>,
    pub project_name: Option<String>,
    pub type_of_work: Option<String>,
    pub description: Option<String>,
    pub hours: Option<f64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.project_name.is_none()
            && self.type_of_work.is_none()
            && self.description.is_none()
            && self.hours.is_none()
    }

    fn apply_to(self, task: &mut DailyTask) {
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(project_name) = self.project_name {
            task.project_name = project_name;
        }
        if let Some(type_of_work) = self.type_of_work {
            task.type_of_work = type_of_work;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(hours) = self.hours {
            task.hours = hours;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskChange {
    Add(DailyTask),
    Edit { id: String, patch: TaskPatch },
    Delete { id: String },
}

/// Produces the timesheet that results from one task mutation. The input is
/// left untouched and the returned value carries freshly derived totals.
pub fn apply_task_change(
    details: &TimesheetDetails,
    change: TaskChange,
) -> Result<TimesheetDetails, TaskChangeError> {
    let mut tasks = details.tasks().to_vec();

    match change {
        TaskChange::Add(task) => {
            if tasks.iter().any(|existing| existing.id == task.id) {
                return Err(TaskChangeError::DuplicateTaskId(task.id));
            }
            tasks.push(task);
        }
        TaskChange::Edit { id, patch } => {
            let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
                return Err(TaskChangeError::TaskNotFound(id));
            };
            patch.apply_to(task);
        }
        TaskChange::Delete { id } => {
            let Some(position) = tasks.iter().position(|task| task.id == id) else {
                return Err(TaskChangeError::TaskNotFound(id));
            };
            tasks.remove(position);
        }
    }

    TimesheetDetails::new(*details.window(), tasks)
}
