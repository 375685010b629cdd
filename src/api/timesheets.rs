use axum::extract::{Path, Query, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::auth::Session;
use crate::api::simulate_latency;
use crate::error::AppResult;
use crate::sheets::{
    query_timesheets, DateRange, PageRequest, SortField, SortOrder, SortSpec, TimesheetDetails,
    TimesheetFilters,
};
use crate::state::AppState;

const TOTAL_PAGES_HEADER: &str = "x-total-pages";
const FILTER_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/timesheets", get(list_timesheets))
        .route("/timesheets/{id}", get(get_timesheet))
}

/// Raw query parameters. Everything is optional text so malformed values
/// fall back to defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimesheetListQuery {
    page: Option<String>,
    limit: Option<String>,
    status: Option<String>,
    date_start: Option<String>,
    date_end: Option<String>,
    sort_field: Option<String>,
    sort_order: Option<String>,
}

impl TimesheetListQuery {
    fn filters(&self) -> TimesheetFilters {
        TimesheetFilters {
            status: non_empty(self.status.as_deref()).map(ToOwned::to_owned),
            date_range: self.date_range(),
        }
    }

    fn date_range(&self) -> Option<DateRange> {
        let start = non_empty(self.date_start.as_deref())?;
        let end = non_empty(self.date_end.as_deref())?;

        match (
            NaiveDate::parse_from_str(start, FILTER_DATE_FORMAT),
            NaiveDate::parse_from_str(end, FILTER_DATE_FORMAT),
        ) {
            (Ok(start), Ok(end)) => Some(DateRange { start, end }),
            _ => {
                tracing::debug!(
                    date_start = start,
                    date_end = end,
                    "ignoring malformed date filter"
                );
                None
            }
        }
    }

    fn sort(&self) -> Option<SortSpec> {
        let field = SortField::parse(self.sort_field.as_deref()?)?;
        let order = self
            .sort_order
            .as_deref()
            .map(SortOrder::parse)
            .unwrap_or_default();
        Some(SortSpec { field, order })
    }

    fn page_request(&self, default_limit: usize) -> PageRequest {
        PageRequest::new(
            parse_count(self.page.as_deref()).unwrap_or(1),
            parse_count(self.limit.as_deref()).unwrap_or(default_limit),
        )
    }
}

async fn list_timesheets(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<TimesheetListQuery>,
) -> Response {
    simulate_latency(&state.config).await;

    let page = query_timesheets(
        state.store.list(session.as_str()),
        &query.filters(),
        query.sort(),
        query.page_request(state.config.default_page_size),
    );
    let display_pages = HeaderValue::from(page.display_total_pages());

    ([(TOTAL_PAGES_HEADER, display_pages)], Json(page)).into_response()
}

async fn get_timesheet(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<u32>,
) -> AppResult<Json<TimesheetDetails>> {
    simulate_latency(&state.config).await;

    let details = state.store.get(session.as_str(), id)?;
    Ok(Json(details))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_count(value: Option<&str>) -> Option<usize> {
    non_empty(value)?
        .parse::<usize>()
        .ok()
        .filter(|count| *count > 0)
}
