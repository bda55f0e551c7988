use crate::config;
use crate::error::AppError;
use crate::model::Task;
use std::path::{Path, PathBuf};

pub const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKMGR_STORE_PATH";

/// Resolves the task file: the environment wins, then the configured path,
/// then `tasks.json` in the application directory.
pub fn store_path(configured: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    Ok(config::app_dir()?.join(STORE_FILE_NAME))
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(tasks)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    Ok(())
}
