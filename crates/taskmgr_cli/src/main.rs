use clap::Parser;
use std::io;
use taskmgr_cli::app::App;
use taskmgr_cli::cli::{Cli, Command, collect_overrides};
use taskmgr_cli::{menu, render};
use taskmgr_core::config::{self, Config, Palette};
use taskmgr_core::error::AppError;
use taskmgr_core::model::{StatusFilter, Task};
use taskmgr_core::notify::{notifier_from_env, notify_reminders};
use taskmgr_core::query::{self, DueScan};
use taskmgr_core::storage::json_store;
use taskmgr_core::store::{NewTask, TaskStore, parse_task_id};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKMGR_LOG";
const DEFAULT_LOG_DIRECTIVE: &str = "taskmgr_core=debug,taskmgr=debug";

fn init_logging() {
    let Ok(directive) = std::env::var(LOG_ENV_VAR) else {
        return;
    };
    let filter = if directive.trim().is_empty() {
        EnvFilter::new(DEFAULT_LOG_DIRECTIVE)
    } else {
        EnvFilter::try_new(directive.trim())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn resolve_config(cli: &Cli) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        eprintln!("WARNING: using default configuration: {err}");
    }
    let overrides = collect_overrides(&cli.config_override)?;
    Ok(config::merge_overrides(&loaded.config, &overrides))
}

fn print_warnings(scan: &DueScan) {
    for warning in &scan.warnings {
        eprintln!("{}", render::warning_line(warning));
    }
}

fn print_tasks(tasks: &[Task], palette: &Palette, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", render::tasks_json(tasks)?);
    } else {
        println!("{}", render::task_table(tasks, palette));
    }
    Ok(())
}

fn run_command(app: &mut App, command: Command, json: bool) -> Result<(), AppError> {
    match command {
        Command::Add {
            title,
            due,
            priority,
            category,
        } => {
            let title = match title {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("title is required")),
            };

            let task = app.store.add(NewTask {
                title,
                due_date: due,
                priority,
                category,
            })?;
            if json {
                println!("{}", render::task_json(&task)?);
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::List { filter, search } => {
            let filter = filter.parse::<StatusFilter>()?;
            let tasks = query::list(app.store.tasks(), filter, search.as_deref());
            print_tasks(&tasks, &app.palette, json)?;
        }
        Command::Today => {
            let scan = app.due_today();
            print_warnings(&scan);
            print_tasks(&scan.tasks, &app.palette, json)?;
        }
        Command::Done { id } => {
            let id = parse_task_id(&id)?;
            match app.store.mark_completed(id)? {
                Some(task) if json => println!("{}", render::task_json(&task)?),
                Some(task) => println!("Completed task: {} ({})", task.title, task.id),
                None if json => println!("{}", render::not_found_json(id)),
                None => println!("Task not found: {id}"),
            }
        }
        Command::Delete { id } => {
            let id = parse_task_id(&id)?;
            match app.store.delete(id)? {
                Some(task) if json => println!("{}", render::task_json(&task)?),
                Some(task) => println!("Deleted task: {} (was {})", task.title, id),
                None if json => println!("{}", render::not_found_json(id)),
                None => println!("Task not found: {id}"),
            }
        }
        Command::Remind { days, notify } => {
            let days = days.unwrap_or(app.reminder_days);
            let scan = app.reminders(days);
            print_warnings(&scan);
            if !json {
                println!("{}", app.reminder_heading(days));
            }
            print_tasks(&scan.tasks, &app.palette, json)?;

            if notify {
                let notifier = notifier_from_env()?;
                let outcome = notify_reminders(&scan.tasks, notifier.as_ref());
                for failure in &outcome.failures {
                    eprintln!(
                        "WARNING: could not notify task {}: {}",
                        failure.task_id, failure.error
                    );
                }
            }
        }
        Command::Menu => {
            let stdin = io::stdin();
            menu::run(app, stdin.lock(), io::stdout())?;
        }
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli)?;
    let path = json_store::store_path(config.store_path.as_deref())?;
    tracing::debug!(
        path = %path.display(),
        reminder_days = config.reminder_days(),
        "resolved settings"
    );
    let store = TaskStore::load(&path)?;
    let mut app = App::new(store, &config);

    let command = cli.command.unwrap_or(Command::Menu);
    run_command(&mut app, command, cli.json)
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
