pub mod changes;
pub mod derive;
pub mod models;
pub mod query;

pub use changes::{apply_task_change, TaskChange, TaskChangeError, TaskPatch};
pub use models::{DailyTask, TimesheetDetails, TimesheetSummary};
pub use query::{
    query_timesheets, DateRange, PageRequest, SortField, SortOrder, SortSpec, TimesheetFilters,
};
