pub mod seed;

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{AppError, AppResult};
use crate::sheets::{apply_task_change, TaskChange, TimesheetDetails, TimesheetSummary};

/// Source of truth for timesheets, scoped by an opaque session identity.
pub trait TimesheetRepository: Send + Sync {
    /// Every summary visible to `session`, in id order. Filtering, sorting
    /// and paging happen in the query pipeline.
    fn list(&self, session: &str) -> Vec<TimesheetSummary>;

    fn get(&self, session: &str, id: u32) -> AppResult<TimesheetDetails>;

    fn save(&self, session: &str, details: TimesheetDetails) -> AppResult<()>;

    /// Applies one task change and stores the result. Implementations that
    /// can hold a lock across the read and the write should override this.
    fn update(&self, session: &str, id: u32, change: TaskChange) -> AppResult<TimesheetDetails> {
        let current = self.get(session, id)?;
        let updated = apply_task_change(&current, change)?;
        self.save(session, updated.clone())?;
        Ok(updated)
    }
}

type SessionSheets = BTreeMap<u32, TimesheetDetails>;

#[derive(Debug, Default)]
struct Sessions {
    sheets: HashMap<String, SessionSheets>,
    // Seeding order, oldest first.
    order: VecDeque<String>,
}

/// In-memory store. Each session gets its own copy of the generated dataset
/// the first time it is seen. Once `max_sessions` are held, seeding a new one
/// evicts the oldest.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    sessions: Arc<Mutex<Sessions>>,
    dataset_size: u32,
    max_sessions: usize,
}

impl MemoryStore {
    pub fn new(dataset_size: u32, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(Sessions::default())),
            dataset_size,
            max_sessions: max_sessions.max(1),
        }
    }

    #[cfg(test)]
    fn session_count(&self) -> usize {
        lock_or_recover(&self.sessions).sheets.len()
    }

    fn with_session<F, T>(&self, session: &str, f: F) -> T
    where
        F: FnOnce(&mut SessionSheets) -> T,
    {
        let mut guard = lock_or_recover(&self.sessions);
        let inner = &mut *guard;

        if !inner.sheets.contains_key(session) {
            while inner.sheets.len() >= self.max_sessions {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.sheets.remove(&oldest);
                tracing::info!(max_sessions = self.max_sessions, "evicted oldest session");
            }
            inner.order.push_back(session.to_string());
        }

        let sheets = inner
            .sheets
            .entry(session.to_string())
            .or_insert_with(|| {
                tracing::info!(
                    dataset_size = self.dataset_size,
                    max_sessions = self.max_sessions,
                    "seeding timesheets for new session"
                );
                seed::seed_collection(self.dataset_size)
            });
        f(sheets)
    }
}

impl TimesheetRepository for MemoryStore {
    fn list(&self, session: &str) -> Vec<TimesheetSummary> {
        self.with_session(session, |sheets| {
            sheets
                .values()
                .map(|details| details.summary().clone())
                .collect()
        })
    }

    fn get(&self, session: &str, id: u32) -> AppResult<TimesheetDetails> {
        self.with_session(session, |sheets| {
            sheets.get(&id).cloned().ok_or_else(|| not_found(id))
        })
    }

    fn save(&self, session: &str, details: TimesheetDetails) -> AppResult<()> {
        self.with_session(session, |sheets| {
            let Some(slot) = sheets.get_mut(&details.id()) else {
                return Err(not_found(details.id()));
            };
            *slot = details;
            Ok(())
        })
    }

    fn update(&self, session: &str, id: u32, change: TaskChange) -> AppResult<TimesheetDetails> {
        self.with_session(session, |sheets| {
            let slot = sheets.get_mut(&id).ok_or_else(|| not_found(id))?;
            let updated = apply_task_change(slot, change)?;
            *slot = updated.clone();
            tracing::debug!(
                timesheet_id = id,
                hours = updated.summary().hours(),
                status = updated.summary().status().as_str(),
                "timesheet updated"
            );
            Ok(updated)
        })
    }
}

fn not_found(id: u32) -> AppError {
    AppError::NotFound(format!("timesheet {id} not found"))
}

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("timesheet store mutex poisoned, recovering");
            poisoned.into_inner()
        }
    }
}
