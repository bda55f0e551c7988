//! Read-side queries over the task sequence.
//!
//! Nothing here mutates tasks or touches storage. Due dates are stored as
//! text and only parsed when a query needs them; a task whose due date does
//! not parse is skipped and reported in [`DueScan::warnings`].

use crate::error::AppError;
use crate::model::{StatusFilter, Task};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A parsed due date. Date-only values cover the whole calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDate {
    Day(Date),
    At(PrimitiveDateTime),
}

impl DueDate {
    pub fn date(self) -> Date {
        match self {
            Self::Day(date) => date,
            Self::At(at) => at.date(),
        }
    }

    fn within_window(self, now: PrimitiveDateTime, window: Duration) -> bool {
        match self {
            Self::Day(date) => {
                let today = now.date();
                let last = today.checked_add(window).unwrap_or(Date::MAX);
                today <= date && date <= last
            }
            Self::At(at) => {
                let last = now.checked_add(window).unwrap_or(PrimitiveDateTime::MAX);
                now <= at && at <= last
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDateWarning {
    pub task_id: u32,
    pub due_date: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueScan {
    pub tasks: Vec<Task>,
    pub warnings: Vec<DueDateWarning>,
}

pub fn parse_due_date(value: &str) -> Result<DueDate, AppError> {
    let trimmed = value.trim();
    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Ok(DueDate::Day(date));
    }

    let normalized = trimmed.replacen('T', " ", 1);
    if let Ok(at) = PrimitiveDateTime::parse(
        &normalized,
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    ) {
        return Ok(DueDate::At(at));
    }
    if let Ok(at) = PrimitiveDateTime::parse(
        &normalized,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        return Ok(DueDate::At(at));
    }

    Err(AppError::invalid_input(format!(
        "due date '{trimmed}' must be YYYY-MM-DD or YYYY-MM-DD HH:MM"
    )))
}

pub fn local_now() -> PrimitiveDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let now = OffsetDateTime::now_utc().to_offset(offset);
    PrimitiveDateTime::new(now.date(), now.time())
}

pub fn list(tasks: &[Task], filter: StatusFilter, search_term: Option<&str>) -> Vec<Task> {
    let needle = search_term
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .filter(|task| match needle.as_deref() {
            Some(needle) => task.title.to_lowercase().contains(needle),
            None => true,
        })
        .cloned()
        .collect()
}

pub fn due_today(tasks: &[Task], today: Date) -> DueScan {
    scan_due_dates(tasks, |_, due| due.date() == today)
}

/// Incomplete tasks due between `now` and `window_days` days later,
/// both ends inclusive.
pub fn due_within_window(tasks: &[Task], now: PrimitiveDateTime, window_days: u32) -> DueScan {
    let window = Duration::days(i64::from(window_days));
    scan_due_dates(tasks, |task, due| {
        !task.completed && due.within_window(now, window)
    })
}

fn scan_due_dates<F>(tasks: &[Task], mut keep: F) -> DueScan
where
    F: FnMut(&Task, DueDate) -> bool,
{
    let mut scan = DueScan::default();
    for task in tasks {
        let Some(raw) = task.due_date.as_deref() else {
            continue;
        };

        match parse_due_date(raw) {
            Ok(due) => {
                if keep(task, due) {
                    scan.tasks.push(task.clone());
                }
            }
            Err(err) => {
                tracing::warn!(task_id = task.id, due_date = raw, "skipping unparseable due date");
                scan.warnings.push(DueDateWarning {
                    task_id: task.id,
                    due_date: raw.to_string(),
                    message: err.message().to_string(),
                });
            }
        }
    }
    scan
}
