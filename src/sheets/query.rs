use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::sheets::models::TimesheetSummary;

/// Status filter value that disables status filtering.
pub const ALL_STATUSES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Overlap test: a summary only partially inside the range still matches.
    pub fn overlaps(&self, summary: &TimesheetSummary) -> bool {
        summary.start_date() <= self.end && summary.end_date() >= self.start
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimesheetFilters {
    pub status: Option<String>,
    pub date_range: Option<DateRange>,
}

impl TimesheetFilters {
    pub fn matches(&self, summary: &TimesheetSummary) -> bool {
        let status_matches = match self.status.as_deref() {
            None | Some(ALL_STATUSES) => true,
            Some(status) => summary.status().as_str() == status,
        };

        status_matches
            && self
                .date_range
                .map_or(true, |date_range| date_range.overlaps(summary))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Week,
    DateRange,
    Hours,
    Status,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "week" => Some(Self::Week),
            "dateRange" => Some(Self::DateRange),
            "hours" => Some(Self::Hours),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    fn compare(self, left: &TimesheetSummary, right: &TimesheetSummary) -> Ordering {
        match self {
            Self::Week => left.week().cmp(&right.week()),
            // The display string is not date ordered, so compare the start dates.
            Self::DateRange => left.start_date().cmp(&right.start_date()),
            Self::Hours => left
                .hours()
                .partial_cmp(&right.hours())
                .unwrap_or(Ordering::Equal),
            Self::Status => left.status().as_str().cmp(right.status().as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        if value == "desc" {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    limit: usize,
}

impl PageRequest {
    pub const DEFAULT_LIMIT: usize = 5;

    /// Zero values fall back to page 1 and the default limit.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            limit: if limit == 0 { Self::DEFAULT_LIMIT } else { limit },
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// An empty result still renders as a single page.
    pub fn display_total_pages(&self) -> usize {
        self.total_pages.max(1)
    }
}

pub fn apply_filters(
    summaries: Vec<TimesheetSummary>,
    filters: &TimesheetFilters,
) -> Vec<TimesheetSummary> {
    summaries
        .into_iter()
        .filter(|summary| filters.matches(summary))
        .collect()
}

/// Stable: summaries that compare equal keep their incoming order.
pub fn sort_timesheets(summaries: &mut [TimesheetSummary], sort: SortSpec) {
    summaries.sort_by(|left, right| {
        let ordering = sort.field.compare(left, right);
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let data = items
        .into_iter()
        .skip(request.offset())
        .take(request.limit())
        .collect();

    Page {
        data,
        total,
        page: request.page(),
        limit: request.limit(),
        total_pages: total.div_ceil(request.limit()),
    }
}

pub fn sort_and_paginate(
    mut summaries: Vec<TimesheetSummary>,
    sort: Option<SortSpec>,
    request: PageRequest,
) -> Page<TimesheetSummary> {
    if let Some(sort) = sort {
        sort_timesheets(&mut summaries, sort);
    }
    paginate(summaries, request)
}

/// Full pipeline: filter, then sort, then paginate.
pub fn query_timesheets(
    all: Vec<TimesheetSummary>,
    filters: &TimesheetFilters,
    sort: Option<SortSpec>,
    request: PageRequest,
) -> Page<TimesheetSummary> {
    sort_and_paginate(apply_filters(all, filters), sort, request)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::sheets::models::{DailyTask, TimesheetStatus, WeekWindow};

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
    }

    fn summary(id: u32, start: NaiveDate, hours: &[f64]) -> TimesheetSummary {
        let window = WeekWindow::new(id, start);
        let tasks: Vec<DailyTask> = hours
            .iter()
            .enumerate()
            .map(|(index, hours)| DailyTask {
                id: format!("{id}-{index}"),
                date: start,
                project_name: "Project Name".to_string(),
                type_of_work: "Feature Development".to_string(),
                description: "Homepage Development".to_string(),
                hours: *hours,
            })
            .collect();
        TimesheetSummary::derive(&window, &tasks)
    }

    fn generated(count: u32) -> Vec<TimesheetSummary> {
        (1..=count)
            .map(|id| {
                let hours = match id % 3 {
                    0 => vec![40.0],
                    1 => vec![4.0, 4.0],
                    _ => Vec::new(),
                };
                summary(id, WeekWindow::for_id(id).start_date(), &hours)
            })
            .collect()
    }

    fn ids(page: &Page<TimesheetSummary>) -> Vec<u32> {
        page.data.iter().map(TimesheetSummary::id).collect()
    }

    #[test]
    fn status_filter_only_returns_requested_status() {
        let filters = TimesheetFilters {
            status: Some("incomplete".to_string()),
            ..TimesheetFilters::default()
        };
        let page = query_timesheets(generated(30), &filters, None, PageRequest::new(1, 100));

        assert_eq!(page.total, 10);
        assert!(page
            .data
            .iter()
            .all(|summary| summary.status() == TimesheetStatus::Incomplete));
    }

    #[test]
    fn status_filter_all_and_unknown_values() {
        let all = TimesheetFilters {
            status: Some(ALL_STATUSES.to_string()),
            ..TimesheetFilters::default()
        };
        assert_eq!(
            query_timesheets(generated(12), &all, None, PageRequest::default()).total,
            12
        );

        let capitalized = TimesheetFilters {
            status: Some("Completed".to_string()),
            ..TimesheetFilters::default()
        };
        assert_eq!(
            query_timesheets(generated(12), &capitalized, None, PageRequest::default()).total,
            0
        );
    }

    #[test]
    fn date_filter_uses_overlap() {
        let week = summary(1, date(1, 8), &[]);
        let overlapping = DateRange {
            start: date(1, 10),
            end: date(1, 20),
        };
        let disjoint = DateRange {
            start: date(1, 20),
            end: date(1, 25),
        };
        let touching = DateRange {
            start: date(1, 12),
            end: date(1, 12),
        };

        assert!(overlapping.overlaps(&week));
        assert!(!disjoint.overlaps(&week));
        assert!(touching.overlaps(&week));
    }

    #[test]
    fn date_filter_applies_in_pipeline() {
        let filters = TimesheetFilters {
            date_range: Some(DateRange {
                start: date(1, 10),
                end: date(1, 20),
            }),
            ..TimesheetFilters::default()
        };
        let page = query_timesheets(generated(10), &filters, None, PageRequest::default());
        assert_eq!(ids(&page), vec![1, 2]);
    }

    #[test]
    fn sort_by_date_range_uses_start_date() {
        let summaries = vec![
            summary(3, date(1, 22), &[]),
            summary(1, date(1, 1), &[]),
            summary(2, date(1, 8), &[]),
        ];
        let sort = SortSpec {
            field: SortField::DateRange,
            order: SortOrder::Asc,
        };
        let page = query_timesheets(
            summaries,
            &TimesheetFilters::default(),
            Some(sort),
            PageRequest::default(),
        );

        let starts: Vec<NaiveDate> = page.data.iter().map(|s| s.start_date()).collect();
        assert_eq!(starts, vec![date(1, 1), date(1, 8), date(1, 22)]);
    }

    #[test]
    fn sort_is_stable_for_ties_in_both_orders() {
        let summaries = vec![
            summary(1, date(1, 1), &[8.0]),
            summary(2, date(1, 8), &[]),
            summary(3, date(1, 15), &[8.0]),
            summary(4, date(1, 22), &[]),
        ];

        let mut ascending = summaries.clone();
        sort_timesheets(
            &mut ascending,
            SortSpec {
                field: SortField::Hours,
                order: SortOrder::Asc,
            },
        );
        assert_eq!(
            ascending.iter().map(TimesheetSummary::id).collect::<Vec<_>>(),
            vec![2, 4, 1, 3]
        );

        let mut descending = summaries;
        sort_timesheets(
            &mut descending,
            SortSpec {
                field: SortField::Hours,
                order: SortOrder::Desc,
            },
        );
        assert_eq!(
            descending.iter().map(TimesheetSummary::id).collect::<Vec<_>>(),
            vec![1, 3, 2, 4]
        );
    }

    #[test]
    fn sort_by_status_is_alphabetical() {
        let summaries = vec![
            summary(1, date(1, 1), &[]),
            summary(2, date(1, 8), &[40.0]),
            summary(3, date(1, 15), &[1.0]),
        ];
        let sort = SortSpec {
            field: SortField::Status,
            order: SortOrder::Asc,
        };
        let page = sort_and_paginate(summaries, Some(sort), PageRequest::default());
        assert_eq!(ids(&page), vec![2, 3, 1]);
    }

    #[test]
    fn sort_by_hours_keeps_zero_hour_ties_in_input_order() {
        let summaries = vec![
            summary(1, date(1, 1), &[0.0]),
            summary(2, date(1, 8), &[]),
            summary(3, date(1, 15), &[4.0]),
            summary(4, date(1, 22), &[0.0, 0.0]),
        ];
        let sort = SortSpec {
            field: SortField::Hours,
            order: SortOrder::Asc,
        };
        let page = sort_and_paginate(summaries, Some(sort), PageRequest::default());
        assert_eq!(ids(&page), vec![1, 2, 4, 3]);
        assert!(page.data[1].hours().is_sign_positive());
    }

    #[test]
    fn unknown_sort_field_keeps_order() {
        assert_eq!(SortField::parse("action"), None);
        assert_eq!(SortField::parse("Week"), None);
        assert_eq!(SortField::parse("dateRange"), Some(SortField::DateRange));
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);

        let page = sort_and_paginate(generated(5), None, PageRequest::default());
        assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn pagination_reports_totals_and_empty_pages() {
        let page = query_timesheets(
            generated(200),
            &TimesheetFilters::default(),
            None,
            PageRequest::new(41, 5),
        );
        assert!(page.data.is_empty());
        assert_eq!(page.total, 200);
        assert_eq!(page.total_pages, 40);
        assert_eq!(page.page, 41);
        assert_eq!(page.limit, 5);

        let last = query_timesheets(
            generated(200),
            &TimesheetFilters::default(),
            None,
            PageRequest::new(40, 5),
        );
        assert_eq!(ids(&last), vec![196, 197, 198, 199, 200]);
    }

    #[test]
    fn pagination_handles_partial_and_empty_collections() {
        let partial = paginate(generated(7), PageRequest::new(2, 5));
        assert_eq!(ids(&partial), vec![6, 7]);
        assert_eq!(partial.total_pages, 2);

        let empty = paginate(Vec::<TimesheetSummary>::new(), PageRequest::default());
        assert!(empty.data.is_empty());
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.display_total_pages(), 1);
    }

    #[test]
    fn page_request_defaults_zero_values() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), PageRequest::DEFAULT_LIMIT);

        let huge = paginate(generated(3), PageRequest::new(usize::MAX, 10));
        assert!(huge.data.is_empty());
        assert_eq!(huge.total, 3);
    }

    #[test]
    fn filters_apply_before_sort_and_pagination() {
        let filters = TimesheetFilters {
            status: Some("completed".to_string()),
            ..TimesheetFilters::default()
        };
        let sort = SortSpec {
            field: SortField::Week,
            order: SortOrder::Desc,
        };
        let page = query_timesheets(generated(30), &filters, Some(sort), PageRequest::new(1, 3));

        assert_eq!(page.total, 10);
        assert_eq!(page.total_pages, 4);
        assert_eq!(ids(&page), vec![27, 30, 21]);
    }
}
