use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{patch, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::auth::Session;
use crate::api::simulate_latency;
use crate::error::{AppError, AppResult};
use crate::sheets::{DailyTask, TaskChange, TaskPatch, TimesheetDetails};
use crate::state::AppState;

/// Per-entry cap enforced at input time; totals are not capped.
const MAX_TASK_HOURS: f64 = 24.0;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/timesheets/{id}/tasks", post(create_task))
        .route(
            "/timesheets/{id}/tasks/{task_id}",
            patch(update_task).delete(delete_task),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskRequest {
    date: NaiveDate,
    project_name: String,
    type_of_work: String,
    description: String,
    hours: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskRequest {
    date: Option<NaiveDate>,
    project_name: Option<String>,
    type_of_work: Option<String>,
    description: Option<String>,
    hours: Option<f64>,
}

async fn create_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<u32>,
    Json(payload): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<TimesheetDetails>)> {
    let task = DailyTask {
        id: Uuid::new_v4().to_string(),
        date: payload.date,
        project_name: required_text("projectName", payload.project_name)?,
        type_of_work: required_text("typeOfWork", payload.type_of_work)?,
        description: required_text("description", payload.description)?,
        hours: validate_hours(payload.hours)?,
    };
    let task_id = task.id.clone();

    simulate_latency(&state.config).await;
    let details = state
        .store
        .update(session.as_str(), id, TaskChange::Add(task))?;

    tracing::info!(timesheet_id = id, %task_id, "task added");
    Ok((StatusCode::CREATED, Json(details)))
}

async fn update_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((id, task_id)): Path<(u32, String)>,
    Json(payload): Json<UpdateTaskRequest>,
) -> AppResult<Json<TimesheetDetails>> {
    let patch = TaskPatch {
        date: payload.date,
        project_name: payload
            .project_name
            .map(|value| required_text("projectName", value))
            .transpose()?,
        type_of_work: payload
            .type_of_work
            .map(|value| required_text("typeOfWork", value))
            .transpose()?,
        description: payload
            .description
            .map(|value| required_text("description", value))
            .transpose()?,
        hours: payload.hours.map(validate_hours).transpose()?,
    };

    if patch.is_empty() {
        return Err(AppError::BadRequest(
            "at least one field must be provided".to_string(),
        ));
    }

    simulate_latency(&state.config).await;
    let details = state.store.update(
        session.as_str(),
        id,
        TaskChange::Edit {
            id: task_id.clone(),
            patch,
        },
    )?;

    tracing::info!(timesheet_id = id, %task_id, "task updated");
    Ok(Json(details))
}

async fn delete_task(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path((id, task_id)): Path<(u32, String)>,
) -> AppResult<Json<TimesheetDetails>> {
    simulate_latency(&state.config).await;
    let details = state.store.update(
        session.as_str(),
        id,
        TaskChange::Delete {
            id: task_id.clone(),
        },
    )?;

    tracing::info!(timesheet_id = id, %task_id, "task deleted");
    Ok(Json(details))
}

fn required_text(field: &str, value: String) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn validate_hours(hours: f64) -> AppResult<f64> {
    if !hours.is_finite() || !(0.0..=MAX_TASK_HOURS).contains(&hours) {
        return Err(AppError::BadRequest(format!(
            "hours must be between 0 and {MAX_TASK_HOURS}"
        )));
    }
    Ok(hours)
}
