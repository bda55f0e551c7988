use crate::app::App;
use crate::render;
use std::io::{self, BufRead, Write};
use taskmgr_core::error::AppError;
use taskmgr_core::model::StatusFilter;
use taskmgr_core::query::{self, DueScan};
use taskmgr_core::store::{NewTask, parse_task_id};

const MENU: &str = "\
--- Task Manager ---
1. Add a task
2. View tasks due today
3. View all tasks
4. Mark a task as completed
5. Delete a task
6. Show reminders
7. Exit";

enum Flow {
    Continue,
    Exit,
}

/// Failure of one menu step. Console failures end the session; task
/// failures are printed and the menu continues.
enum StepError {
    Console(io::Error),
    Task(AppError),
}

impl From<io::Error> for StepError {
    fn from(err: io::Error) -> Self {
        Self::Console(err)
    }
}

impl From<AppError> for StepError {
    fn from(err: AppError) -> Self {
        Self::Task(err)
    }
}

type Step<T> = Result<T, StepError>;

/// Runs the numbered menu until the user picks exit or input ends.
///
/// Upcoming reminders are shown once before the first menu.
pub fn run<R: BufRead, W: Write>(app: &mut App, input: R, output: W) -> Result<(), AppError> {
    let mut menu = Menu { app, input, output };
    menu.report(|menu| menu.show_reminders().map(|_| Flow::Continue))?;

    loop {
        writeln!(menu.output)?;
        writeln!(menu.output, "{MENU}")?;
        let Some(choice) = menu.prompt("Choose an option: ")? else {
            break;
        };

        let flow = match choice.as_str() {
            "1" => menu.report(Menu::add)?,
            "2" => menu.report(|menu| menu.due_today().map(|_| Flow::Continue))?,
            "3" => menu.report(Menu::view_all)?,
            "4" => menu.report(Menu::mark_completed)?,
            "5" => menu.report(Menu::delete)?,
            "6" => menu.report(|menu| menu.show_reminders().map(|_| Flow::Continue))?,
            "7" => {
                writeln!(menu.output, "Goodbye. Have a productive day!")?;
                break;
            }
            _ => {
                writeln!(menu.output, "Invalid choice, please try again.")?;
                Flow::Continue
            }
        };

        if let Flow::Exit = flow {
            break;
        }
    }

    Ok(())
}

struct Menu<'a, R, W> {
    app: &'a mut App,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<'_, R, W> {
    /// Runs one step, printing task errors instead of returning them.
    fn report<F>(&mut self, step: F) -> io::Result<Flow>
    where
        F: FnOnce(&mut Self) -> Step<Flow>,
    {
        match step(self) {
            Ok(flow) => Ok(flow),
            Err(StepError::Console(err)) => Err(err),
            Err(StepError::Task(err)) => {
                writeln!(self.output, "ERROR: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Returns `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn optional(&mut self, text: &str) -> io::Result<Option<Option<String>>> {
        Ok(self
            .prompt(text)?
            .map(|value| Some(value).filter(|value| !value.is_empty())))
    }

    fn add(&mut self) -> Step<Flow> {
        let Some(title) = self.prompt("Task title: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(due_date) = self.optional("Due date (YYYY-MM-DD or YYYY-MM-DD HH:MM, optional): ")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(priority) = self.optional("Priority (High/Medium/Low, optional): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(category) = self.optional("Category (optional): ")? else {
            return Ok(Flow::Exit);
        };

        let task = self.app.store.add(NewTask {
            title,
            due_date,
            priority,
            category,
        })?;
        writeln!(self.output, "Added task: {} ({})", task.title, task.id)?;
        Ok(Flow::Continue)
    }

    fn due_today(&mut self) -> Step<()> {
        let scan = self.app.due_today();
        let heading = self.app.palette.accentize("Tasks due today");
        writeln!(self.output, "{heading}")?;
        self.write_scan(&scan)
    }

    fn view_all(&mut self) -> Step<Flow> {
        let Some(raw_filter) = self.prompt("Filter by status (completed/pending/all): ")? else {
            return Ok(Flow::Exit);
        };
        let filter = raw_filter.parse::<StatusFilter>().unwrap_or_default();
        let Some(search) = self.optional("Search title (optional): ")? else {
            return Ok(Flow::Exit);
        };

        let tasks = query::list(self.app.store.tasks(), filter, search.as_deref());
        writeln!(
            self.output,
            "{}",
            render::task_table(&tasks, &self.app.palette)
        )?;
        Ok(Flow::Continue)
    }

    fn mark_completed(&mut self) -> Step<Flow> {
        let Some(raw_id) = self.prompt("Task ID to mark as completed: ")? else {
            return Ok(Flow::Exit);
        };
        let id = parse_task_id(&raw_id)?;

        match self.app.store.mark_completed(id)? {
            Some(task) => writeln!(self.output, "Completed task: {} ({})", task.title, task.id)?,
            None => writeln!(self.output, "Task not found: {id}")?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> Step<Flow> {
        let Some(raw_id) = self.prompt("Task ID to delete: ")? else {
            return Ok(Flow::Exit);
        };
        let id = parse_task_id(&raw_id)?;

        match self.app.store.delete(id)? {
            Some(task) => writeln!(self.output, "Deleted task: {} (was {})", task.title, id)?,
            None => writeln!(self.output, "Task not found: {id}")?,
        }
        Ok(Flow::Continue)
    }

    fn show_reminders(&mut self) -> Step<()> {
        let days = self.app.reminder_days;
        let scan = self.app.reminders(days);
        writeln!(self.output, "{}", self.app.reminder_heading(days))?;
        self.write_scan(&scan)
    }

    fn write_scan(&mut self, scan: &DueScan) -> Step<()> {
        for warning in &scan.warnings {
            writeln!(self.output, "{}", render::warning_line(warning))?;
        }
        writeln!(
            self.output,
            "{}",
            render::task_table(&scan.tasks, &self.app.palette)
        )?;
        Ok(())
    }
}
