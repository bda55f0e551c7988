use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskmgr_core::config::Palette;
use taskmgr_core::error::AppError;
use taskmgr_core::model::Task;
use taskmgr_core::query::DueDateWarning;

pub const NO_TASKS: &str = "No tasks found.";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Category")]
    category: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            status: status_label(task),
            priority: dash(task.priority.as_deref()),
            due: dash(task.due_date.as_deref()),
            category: dash(task.category.as_deref()),
        }
    }
}

pub fn status_label(task: &Task) -> &'static str {
    if task.completed { "completed" } else { "pending" }
}

fn dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

pub fn task_table(tasks: &[Task], palette: &Palette) -> String {
    if tasks.is_empty() {
        return palette.mutedize(NO_TASKS);
    }

    let mut table = Table::new(tasks.iter().map(TaskRow::from));
    table.with(Style::rounded());
    table.to_string()
}

pub fn tasks_json(tasks: &[Task]) -> Result<String, AppError> {
    serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn task_json(task: &Task) -> Result<String, AppError> {
    serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn not_found_json(id: u32) -> String {
    serde_json::json!({ "error": "not_found", "id": id }).to_string()
}

pub fn warning_line(warning: &DueDateWarning) -> String {
    format!(
        "WARNING: task {} has unparseable due date '{}': {}",
        warning.task_id, warning.due_date, warning.message
    )
}
