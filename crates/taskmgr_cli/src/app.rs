use taskmgr_core::config::{Config, Palette, palette_for_theme};
use taskmgr_core::query::{self, DueScan};
use taskmgr_core::store::TaskStore;

/// Everything a command needs: the one task store of this process plus the
/// settings resolved from config and overrides.
pub struct App {
    pub store: TaskStore,
    pub reminder_days: u32,
    pub palette: Palette,
}

impl App {
    pub fn new(store: TaskStore, config: &Config) -> Self {
        Self {
            store,
            reminder_days: config.reminder_days(),
            palette: palette_for_theme(config.theme.as_deref()),
        }
    }

    pub fn due_today(&self) -> DueScan {
        query::due_today(self.store.tasks(), query::local_now().date())
    }

    pub fn reminders(&self, window_days: u32) -> DueScan {
        query::due_within_window(self.store.tasks(), query::local_now(), window_days)
    }

    pub fn reminder_heading(&self, window_days: u32) -> String {
        let span = match window_days {
            0 => "today".to_string(),
            1 => "the next day".to_string(),
            days => format!("the next {days} days"),
        };
        self.palette
            .accentize(&format!("Upcoming reminders (due within {span})"))
    }
}
