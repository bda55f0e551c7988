//! The task store: an ordered task sequence mirrored to one JSON file.
//!
//! Task IDs are positional. After load, add and delete every task's `id`
//! is `1 + index`, so deleting task `k` shifts every later task down by one.

use crate::error::AppError;
use crate::model::Task;
use crate::oplog::logged;
use crate::query::parse_due_date;
use crate::storage::json_store;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Input for [`TaskStore::add`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

impl NewTask {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Loads the store from `path`. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        logged("load", || {
            let mut tasks = json_store::load_tasks(path)?;
            reindex(&mut tasks);
            tracing::debug!(path = %path.display(), count = tasks.len(), "tasks loaded");
            Ok(Self {
                path: path.to_path_buf(),
                tasks,
            })
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn save(&self) -> Result<(), AppError> {
        logged("save", || json_store::save_tasks(&self.path, &self.tasks))
    }

    pub fn add(&mut self, new_task: NewTask) -> Result<Task, AppError> {
        logged("add", || {
            let title = new_task.title.trim();
            if title.is_empty() {
                return Err(AppError::invalid_input("title is required"));
            }

            let due_date = non_blank(new_task.due_date);
            if let Some(value) = due_date.as_deref() {
                parse_due_date(value)?;
            }

            let created_at = OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .map_err(|err| AppError::invalid_data(err.to_string()))?;

            self.tasks.push(Task {
                id: 0,
                title: title.to_string(),
                completed: false,
                due_date,
                priority: non_blank(new_task.priority),
                category: non_blank(new_task.category),
                created_at,
            });
            reindex(&mut self.tasks);
            let task = self.tasks[self.tasks.len() - 1].clone();
            self.save()?;

            Ok(task)
        })
    }

    /// Removes the task with `id`. Returns `Ok(None)` without writing when
    /// no task has that id.
    pub fn delete(&mut self, id: u32) -> Result<Option<Task>, AppError> {
        logged("delete", || {
            let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
                return Ok(None);
            };

            let removed = self.tasks.remove(index);
            reindex(&mut self.tasks);
            self.save()?;

            Ok(Some(removed))
        })
    }

    /// Marks the task with `id` completed. Returns `Ok(None)` without writing
    /// when no task has that id.
    pub fn mark_completed(&mut self, id: u32) -> Result<Option<Task>, AppError> {
        logged("mark_completed", || {
            let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
                return Ok(None);
            };

            task.completed = true;
            let updated = task.clone();
            self.save()?;

            Ok(Some(updated))
        })
    }
}

/// Parses user input into a task id.
pub fn parse_task_id(value: &str) -> Result<u32, AppError> {
    match value.trim().parse::<u32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::invalid_input(format!(
            "invalid task id '{}'",
            value.trim()
        ))),
    }
}

fn reindex(tasks: &mut [Task]) {
    for (index, task) in tasks.iter_mut().enumerate() {
        task.id = index as u32 + 1;
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{NewTask, TaskStore, parse_task_id};
    use crate::model::Task;
    use crate::storage::json_store;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("taskmgr-{nanos}-{file_name}"))
    }

    fn assert_positional_ids(tasks: &[Task]) {
        for (index, task) in tasks.iter().enumerate() {
            assert_eq!(task.id as usize, index + 1, "task {:?}", task.title);
        }
    }

    fn titles(store: &TaskStore) -> Vec<&str> {
        store.tasks().iter().map(|task| task.title.as_str()).collect()
    }

    #[test]
    fn load_missing_file_returns_empty_store() {
        let path = temp_path("missing.json");
        let store = TaskStore::load(&path).unwrap();

        assert!(store.tasks().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn load_reindexes_stored_ids() {
        let path = temp_path("gappy.json");
        let content = serde_json::json!([
            {"id": 4, "title": "a", "completed": false, "created_at": "2026-01-01T00:00:00Z"},
            {"id": 9, "title": "b", "completed": true, "created_at": "2026-01-01T00:00:00Z"},
            {"id": 9, "title": "c", "completed": false, "created_at": "2026-01-01T00:00:00Z"}
        ]);
        std::fs::write(&path, content.to_string()).unwrap();

        let store = TaskStore::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(titles(&store), ["a", "b", "c"]);
        assert_positional_ids(store.tasks());
    }

    #[test]
    fn load_rejects_malformed_storage() {
        let path = temp_path("malformed.json");
        std::fs::write(&path, "{ not a task list").unwrap();

        let err = TaskStore::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn add_appends_and_persists() {
        let path = temp_path("add.json");
        let mut store = TaskStore::load(&path).unwrap();

        let task = store
            .add(NewTask {
                title: "  Pay rent ".to_string(),
                due_date: Some("2026-02-01".to_string()),
                priority: Some("High".to_string()),
                category: Some(" ".to_string()),
            })
            .unwrap();
        let persisted = json_store::load_tasks(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Pay rent");
        assert!(!task.completed);
        assert_eq!(task.due_date.as_deref(), Some("2026-02-01"));
        assert_eq!(task.priority.as_deref(), Some("High"));
        assert_eq!(task.category, None);
        assert!(!task.created_at.is_empty());
        assert_eq!(persisted, vec![task]);
    }

    #[test]
    fn add_rejects_blank_title_without_writing() {
        let path = temp_path("blank-title.json");
        let mut store = TaskStore::load(&path).unwrap();

        let err = store.add(NewTask::new("   ")).unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(store.tasks().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn add_rejects_unparseable_due_date() {
        let path = temp_path("bad-due.json");
        let mut store = TaskStore::load(&path).unwrap();

        let err = store
            .add(NewTask {
                due_date: Some("tomorrow-ish".to_string()),
                ..NewTask::new("demo")
            })
            .unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn delete_then_readd_renumbers() {
        let path = temp_path("renumber.json");
        let mut store = TaskStore::load(&path).unwrap();
        for title in ["A", "B", "C"] {
            store.add(NewTask::new(title)).unwrap();
        }

        let removed = store.delete(2).unwrap().expect("task 2 exists");
        assert_eq!(removed.title, "B");
        assert_eq!(titles(&store), ["A", "C"]);
        assert_positional_ids(store.tasks());

        let added = store.add(NewTask::new("D")).unwrap();
        let reloaded = TaskStore::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(added.id, 3);
        assert_eq!(titles(&store), ["A", "C", "D"]);
        assert_positional_ids(store.tasks());
        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn ids_stay_positional_across_mixed_operations() {
        let path = temp_path("mixed.json");
        let mut store = TaskStore::load(&path).unwrap();

        for step in 0..12u32 {
            if step % 3 == 2 {
                store.delete(1).unwrap();
            } else {
                store.add(NewTask::new(format!("task {step}"))).unwrap();
            }
            assert_positional_ids(store.tasks());
        }
        let last = store.tasks().len() as u32;
        store.delete(last).unwrap();
        assert_positional_ids(store.tasks());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn delete_unknown_id_is_a_no_op() {
        let path = temp_path("delete-missing.json");
        let mut store = TaskStore::load(&path).unwrap();
        store.add(NewTask::new("only")).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let result = store.delete(5).unwrap();
        let after = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(result, None);
        assert_eq!(titles(&store), ["only"]);
        assert_eq!(before, after);
    }

    #[test]
    fn mark_completed_sets_flag_and_persists() {
        let path = temp_path("complete.json");
        let mut store = TaskStore::load(&path).unwrap();
        store.add(NewTask::new("first")).unwrap();
        store.add(NewTask::new("second")).unwrap();

        let updated = store.mark_completed(2).unwrap().expect("task 2 exists");
        let persisted = json_store::load_tasks(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(updated.completed);
        assert_eq!(updated.title, "second");
        assert!(!persisted[0].completed);
        assert!(persisted[1].completed);
    }

    #[test]
    fn mark_completed_unknown_id_returns_none() {
        let path = temp_path("complete-missing.json");
        let mut store = TaskStore::load(&path).unwrap();

        assert_eq!(store.mark_completed(1).unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("round-trip.json");
        let mut store = TaskStore::load(&path).unwrap();
        store
            .add(NewTask {
                due_date: Some("2026-03-01 09:15".to_string()),
                category: Some("work".to_string()),
                ..NewTask::new("report")
            })
            .unwrap();
        store.add(NewTask::new("gym")).unwrap();
        store.mark_completed(2).unwrap();
        store.save().unwrap();

        let reloaded = TaskStore::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.tasks(), store.tasks());
        assert_positional_ids(reloaded.tasks());
    }

    #[test]
    fn failed_save_keeps_in_memory_mutation() {
        let dir = temp_path("not-a-dir");
        std::fs::write(&dir, "file in the way").unwrap();
        let path = dir.join("tasks.json");
        let mut store = TaskStore::load(&path).unwrap();

        let err = store.add(NewTask::new("unsaved")).unwrap_err();
        std::fs::remove_file(&dir).ok();

        assert_eq!(err.code(), "io_error");
        assert_eq!(titles(&store), ["unsaved"]);
    }

    #[test]
    fn parse_task_id_rejects_non_numeric_input() {
        assert_eq!(parse_task_id(" 3 ").unwrap(), 3);
        for value in ["abc", "", "0", "-1", "1.5"] {
            let err = parse_task_id(value).unwrap_err();
            assert_eq!(err.code(), "invalid_input", "value {value:?}");
        }
    }
}
