use crate::error::AppError;
use crate::model::Task;
use crate::notify::{Notifier, SUMMARY, notification_body};
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, task: &Task) -> Result<(), AppError> {
        Notification::new()
            .summary(SUMMARY)
            .body(&notification_body(task))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
