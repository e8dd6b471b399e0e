//! Date badges for due dates and exams
//!
//! All comparisons work on calendar dates, so the time of day at which
//! "today" is taken never changes the outcome.

use chrono::{Local, NaiveDate};
use serde::Serialize;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days ahead that still count as due soon for a to-do
const DUE_SOON_DAYS: i64 = 3;

/// Days ahead that still count as "this week" for an exam
const EXAM_WEEK_DAYS: i64 = 7;

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a stored date. Accepts a plain `YYYY-MM-DD` value or a timestamp
/// starting with one (`2025-01-15T09:00`, RFC 3339); only the calendar
/// date is kept.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = match value.get(10..11) {
        None if value.len() == 10 => value,
        Some("T") | Some(" ") => &value[..10],
        _ => return None,
    };
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

/// Whole days from `today` until `date`; negative once the date has passed
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DueDateStatus {
    Danger,
    Warning,
    Success,
}

impl DueDateStatus {
    pub fn color(self) -> &'static str {
        match self {
            DueDateStatus::Danger => "danger",
            DueDateStatus::Warning => "warning",
            DueDateStatus::Success => "success",
        }
    }
}

pub fn due_date_status(date: NaiveDate, today: NaiveDate) -> DueDateStatus {
    match days_until(date, today) {
        d if d < 0 => DueDateStatus::Danger,
        d if d <= DUE_SOON_DAYS => DueDateStatus::Warning,
        _ => DueDateStatus::Success,
    }
}

/// Badge for an optional stored due date; `None` when there is no date or
/// it cannot be parsed
pub fn due_date_badge(date: Option<&str>, today: NaiveDate) -> Option<DueDateStatus> {
    date.and_then(parse_date)
        .map(|date| due_date_status(date, today))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExamStatus {
    Passed,
    Today,
    ThisWeek,
    Upcoming,
}

impl ExamStatus {
    pub fn label(self) -> &'static str {
        match self {
            ExamStatus::Passed => "Passed",
            ExamStatus::Today => "Today",
            ExamStatus::ThisWeek => "This Week",
            ExamStatus::Upcoming => "Upcoming",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ExamStatus::Passed => "gray",
            ExamStatus::Today => "danger",
            ExamStatus::ThisWeek => "warning",
            ExamStatus::Upcoming => "success",
        }
    }
}

pub fn exam_status(date: NaiveDate, today: NaiveDate) -> ExamStatus {
    match days_until(date, today) {
        d if d < 0 => ExamStatus::Passed,
        0 => ExamStatus::Today,
        d if d <= EXAM_WEEK_DAYS => ExamStatus::ThisWeek,
        _ => ExamStatus::Upcoming,
    }
}
