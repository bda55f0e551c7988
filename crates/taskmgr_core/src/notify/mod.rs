use crate::error::AppError;
use crate::model::Task;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

const SUMMARY: &str = "taskmgr reminder";

pub trait Notifier {
    fn notify(&self, task: &Task) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _task: &Task) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug)]
pub struct NotificationOutcome {
    pub tasks: Vec<Task>,
    pub failures: Vec<NotificationFailure>,
}

#[derive(Debug)]
pub struct NotificationFailure {
    pub task_id: u32,
    pub error: AppError,
}

pub fn notifier_from_env() -> Result<Box<dyn Notifier>, AppError> {
    if std::env::var("TASKMGR_DISABLE_NOTIFICATIONS").is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier() {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => Ok(Box::new(NoopNotifier)),
            other => Err(other),
        },
    }
}

/// Sends one notification per task. A failed notification is recorded and
/// the remaining tasks are still notified.
pub fn notify_reminders(tasks: &[Task], notifier: &dyn Notifier) -> NotificationOutcome {
    let mut notified = Vec::new();
    let mut failures = Vec::new();

    for task in tasks {
        match notifier.notify(task) {
            Ok(()) => notified.push(task.clone()),
            Err(error) => {
                tracing::warn!(task_id = task.id, %error, "notification failed");
                failures.push(NotificationFailure {
                    task_id: task.id,
                    error,
                });
            }
        }
    }

    NotificationOutcome {
        tasks: notified,
        failures,
    }
}

fn notification_body(task: &Task) -> String {
    match task.due_date.as_deref() {
        Some(due) => format!("{} (#{}, due {})", task.title, task.id, due),
        None => format!("{} (#{})", task.title, task.id),
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::{Notifier, notification_body, notify_reminders};
    use crate::error::AppError;
    use crate::model::Task;
    use std::cell::RefCell;

    fn task(id: u32, title: &str, due_date: Option<&str>) -> Task {
        Task {
            id,
            title: title.to_string(),
            completed: false,
            due_date: due_date.map(str::to_string),
            priority: None,
            category: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    struct RecordingNotifier {
        seen: RefCell<Vec<u32>>,
        fail_on: Option<u32>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, task: &Task) -> Result<(), AppError> {
            self.seen.borrow_mut().push(task.id);
            if self.fail_on == Some(task.id) {
                return Err(AppError::io("notification daemon unavailable"));
            }
            Ok(())
        }
    }

    #[test]
    fn notify_reminders_notifies_every_task() {
        let notifier = RecordingNotifier {
            seen: RefCell::new(Vec::new()),
            fail_on: None,
        };
        let tasks = vec![task(1, "a", Some("2026-01-02")), task(2, "b", None)];

        let outcome = notify_reminders(&tasks, &notifier);

        assert_eq!(*notifier.seen.borrow(), vec![1, 2]);
        assert_eq!(outcome.tasks.len(), 2);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn notify_reminders_reports_failures_and_continues() {
        let notifier = RecordingNotifier {
            seen: RefCell::new(Vec::new()),
            fail_on: Some(1),
        };
        let tasks = vec![task(1, "a", None), task(2, "b", None)];

        let outcome = notify_reminders(&tasks, &notifier);

        assert_eq!(*notifier.seen.borrow(), vec![1, 2]);
        assert_eq!(outcome.tasks.len(), 1);
        assert_eq!(outcome.tasks[0].id, 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].task_id, 1);
        assert_eq!(outcome.failures[0].error.code(), "io_error");
    }

    #[test]
    fn notification_body_mentions_due_date_when_present() {
        assert_eq!(
            notification_body(&task(3, "Pay rent", Some("2026-02-01"))),
            "Pay rent (#3, due 2026-02-01)"
        );
        assert_eq!(notification_body(&task(4, "Stretch", None)), "Stretch (#4)");
    }
}
