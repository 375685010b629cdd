use std::collections::BTreeMap;

use crate::sheets::models::{DailyTask, TimesheetDetails, WeekWindow};
use crate::sheets::TaskChangeError;

const TASK_SEED_FACTOR: u32 = 54321;
const MAX_TASKS_PER_DAY: f64 = 4.0;
const GENERATED_TASK_HOURS: f64 = 4.0;

/// Small deterministic PRNG, so every fresh session sees the same demo data.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}

/// Zero to three four-hour tasks on each day of the window.
pub fn seed_timesheet(id: u32) -> Result<TimesheetDetails, TaskChangeError> {
    let window = WeekWindow::for_id(id);
    let mut rng = Mulberry32::new(id.wrapping_mul(TASK_SEED_FACTOR));
    let mut tasks = Vec::new();

    for (day_index, date) in window.days().enumerate() {
        let task_count = (rng.next_f64() * MAX_TASKS_PER_DAY).floor() as usize;
        for task_index in 0..task_count {
            tasks.push(DailyTask {
                id: format!("{id}-{day_index}-{task_index}"),
                date,
                project_name: "Project Name".to_string(),
                type_of_work: "Feature Development".to_string(),
                description: "Homepage Development".to_string(),
                hours: GENERATED_TASK_HOURS,
            });
        }
    }

    TimesheetDetails::new(window, tasks)
}

pub fn seed_collection(size: u32) -> BTreeMap<u32, TimesheetDetails> {
    (1..=size)
        .filter_map(|id| match seed_timesheet(id) {
            Ok(details) => Some((id, details)),
            Err(error) => {
                tracing::error!(id, %error, "skipping generated timesheet");
                None
            }
        })
        .collect()
}
