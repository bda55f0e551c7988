use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskmgr_core::config::{ConfigOverrides, canonical_key};
use taskmgr_core::error::AppError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskmgr add "Buy milk" --due 2026-01-31 --priority High
    Add {
        title: Option<String>,
        /// Due date, YYYY-MM-DD or "YYYY-MM-DD HH:MM"
        #[arg(long)]
        due: Option<String>,
        /// Priority, e.g. High, Medium or Low
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// List tasks
    ///
    /// Example: taskmgr list --filter pending --search milk
    List {
        /// all, completed or pending
        #[arg(long, default_value = "all")]
        filter: String,
        /// Case-insensitive title search
        #[arg(long)]
        search: Option<String>,
    },
    /// List tasks due today
    ///
    /// Example: taskmgr today
    Today,
    /// Mark a task as completed
    ///
    /// Example: taskmgr done 2
    Done { id: String },
    /// Delete a task; later tasks are renumbered
    ///
    /// Example: taskmgr delete 2
    Delete { id: String },
    /// Show incomplete tasks due soon
    ///
    /// Example: taskmgr remind --days 3 --notify
    Remind {
        /// Look-ahead window in days (defaults to the configured value)
        #[arg(long)]
        days: Option<u32>,
        /// Also send a desktop notification per task
        #[arg(long)]
        notify: bool,
    },
    /// Open the interactive menu (the default without a command)
    Menu,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    StorePath,
    ReminderDays,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field = canonical_key(key_raw);
    let target = match field.as_str() {
        "" => return Err("override key cannot be empty".to_string()),
        "theme" => ConfigOverrideTarget::Theme,
        "store_path" | "store" => ConfigOverrideTarget::StorePath,
        "reminder_days" | "days" => ConfigOverrideTarget::ReminderDays,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override '{field}' needs a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::StorePath => {
                overrides.store_path = Some(PathBuf::from(parsed.value))
            }
            ConfigOverrideTarget::ReminderDays => {
                let days = parsed.value.parse::<u32>().map_err(|_| {
                    AppError::invalid_input(format!(
                        "reminder_days must be a whole number, got '{}'",
                        parsed.value
                    ))
                })?;
                overrides.reminder_days = Some(days);
            }
        }
    }
    Ok(overrides)
}
