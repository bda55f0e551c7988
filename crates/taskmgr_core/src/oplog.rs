use crate::error::AppError;
use tracing::{debug, warn};

/// Runs a store operation between "started" and "completed" log events.
///
/// Failures are logged at warn level and returned unchanged.
pub fn logged<T, F>(operation: &'static str, run: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError>,
{
    debug!(operation, "{operation} started");
    let result = run();
    match &result {
        Ok(_) => debug!(operation, "{operation} completed"),
        Err(err) => warn!(operation, code = err.code(), "{operation} failed: {err}"),
    }
    result
}
