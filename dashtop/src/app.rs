//! App state and main loop: input handling, snapshot refresh, drawing.

use std::{io, sync::Arc, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::debug;

use dashtop_engine::prefs::{self, Preferences, RamUnit};
use dashtop_engine::sources::kill_process;
use dashtop_engine::{MetricsSnapshot, Monitor, MonitorConfig};

use crate::ui::{self, processes::ProcSortBy};

pub struct App {
    /// Latest published snapshot; starts as the engine's neutral default.
    pub snapshot: Arc<MetricsSnapshot>,
    rx: watch::Receiver<Arc<MetricsSnapshot>>,
    pub prefs: Preferences,
    pub sort_by: ProcSortBy,
    /// Selected row in the sorted process view.
    pub selected: usize,
    pub procs_scroll: usize,
    should_quit: bool,
    prefs_dirty: bool,
}

pub async fn run_dashboard(interval_ms: u64) -> anyhow::Result<()> {
    let prefs = prefs::load_preferences();
    let mut monitor = Monitor::new(MonitorConfig {
        fast_interval: Duration::from_millis(interval_ms),
        ..MonitorConfig::default()
    });
    monitor.start();
    let mut app = App::new(monitor.subscribe(), prefs);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = app.event_loop(&mut terminal).await;

    // Teardown
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    monitor.stop().await;
    if app.prefs_dirty {
        if let Err(e) = prefs::save_preferences(&app.prefs) {
            debug!(error = %e, "could not persist preferences");
        }
    }
    res
}

impl App {
    pub fn new(rx: watch::Receiver<Arc<MetricsSnapshot>>, prefs: Preferences) -> Self {
        let snapshot = rx.borrow().clone();
        App {
            snapshot,
            rx,
            prefs,
            sort_by: ProcSortBy::default(),
            selected: 0,
            procs_scroll: 0,
            should_quit: false,
            prefs_dirty: false,
        }
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    self.handle_key(k);
                }
            }
            if self.should_quit {
                break;
            }

            // Pull the newest snapshot if one was published since last frame.
            if self.rx.has_changed().unwrap_or(false) {
                self.snapshot = self.rx.borrow_and_update().clone();
                self.clamp_selection();
            }

            terminal.draw(|f| ui::draw(f, self))?;

            sleep(Duration::from_millis(100)).await;
        }
        Ok(())
    }

    fn handle_key(&mut self, k: KeyEvent) {
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                self.selected += 1;
                self.clamp_selection();
            }
            KeyCode::Char('c') => {
                self.sort_by = ProcSortBy::CpuDesc;
                self.selected = 0;
            }
            KeyCode::Char('m') => {
                self.sort_by = ProcSortBy::MemDesc;
                self.selected = 0;
            }
            KeyCode::Char('k') => {
                if let Some(pid) = self.selected_pid() {
                    // Fire and forget; the next process cycle shows the result.
                    kill_process(pid);
                }
            }
            KeyCode::Char('s') => {
                self.prefs.sidebar_collapsed = !self.prefs.sidebar_collapsed;
                self.prefs_dirty = true;
            }
            KeyCode::Char('u') => {
                self.prefs.ram_unit = match self.prefs.ram_unit {
                    RamUnit::Percent => RamUnit::Gigabytes,
                    RamUnit::Gigabytes => RamUnit::Percent,
                };
                self.prefs_dirty = true;
            }
            _ => {}
        }
    }

    fn clamp_selection(&mut self) {
        let rows = self.snapshot.processes.len();
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    fn selected_pid(&self) -> Option<u32> {
        let order = ui::processes::sorted_indices(&self.snapshot.processes, self.sort_by);
        order
            .get(self.selected)
            .map(|&ix| self.snapshot.processes[ix].pid)
    }
}
