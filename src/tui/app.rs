//! Main TUI application
//!
//! Event-driven history viewer that coordinates:
//! - Terminal rendering with ratatui
//! - User input handling
//! - Background repository loads

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, info};

use super::event::{AppEvent, EventLoop, InputEvent, UserCommand};
use super::theme::Theme;
use super::widgets::{status_entries, GraphView, ScrollState, StatusEntry, StatusList};
use crate::config::Config;
use crate::error::{Result, TuiError};
use crate::git::{GitRunner, RepoSnapshot};
use crate::graph::GraphRow;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPane {
    #[default]
    Graph,
    Status,
}

impl FocusedPane {
    fn next(self) -> Self {
        match self {
            FocusedPane::Graph => FocusedPane::Status,
            FocusedPane::Status => FocusedPane::Graph,
        }
    }
}

/// Application UI state
#[derive(Default)]
pub struct AppUiState {
    /// Most recently loaded repository state
    pub snapshot: RepoSnapshot,
    /// Graph rows for `snapshot.commits`
    pub rows: Vec<GraphRow>,
    /// Flattened status tree
    pub status_entries: Vec<StatusEntry>,
    pub graph_scroll: ScrollState,
    pub status_scroll: ScrollState,
    pub focused_pane: FocusedPane,
    pub show_help: bool,
    /// A background load is in flight
    pub loading: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl AppUiState {
    /// Replace the displayed repository state
    pub fn apply_snapshot(&mut self, snapshot: RepoSnapshot) {
        self.rows = snapshot.graph();
        self.status_entries = status_entries(&snapshot.status, &snapshot.root);
        self.status_message = if snapshot.is_repo {
            None
        } else {
            Some(format!("{} is not a git repository", snapshot.root.display()))
        };
        self.snapshot = snapshot;
        self.loading = false;
    }

    fn focused_scroll(&mut self) -> &mut ScrollState {
        match self.focused_pane {
            FocusedPane::Graph => &mut self.graph_scroll,
            FocusedPane::Status => &mut self.status_scroll,
        }
    }

    /// Apply a command that only touches view state
    ///
    /// Returns `true` when the command asks for a reload.
    pub fn handle_command(&mut self, cmd: UserCommand) -> bool {
        if self.show_help {
            // any key closes the help overlay, quit still quits
            self.show_help = false;
            if cmd == UserCommand::Quit {
                self.should_quit = true;
            }
            return false;
        }

        match cmd {
            UserCommand::ScrollUp => self.focused_scroll().scroll_up(1),
            UserCommand::ScrollDown => self.focused_scroll().scroll_down(1),
            UserCommand::PageUp => self.focused_scroll().page_up(),
            UserCommand::PageDown => self.focused_scroll().page_down(),
            UserCommand::ScrollTop => self.focused_scroll().scroll_to_top(),
            UserCommand::SwitchPane => self.focused_pane = self.focused_pane.next(),
            UserCommand::Refresh => return true,
            UserCommand::ShowHelp => self.show_help = true,
            UserCommand::Cancel => {}
            UserCommand::Quit => self.should_quit = true,
        }
        false
    }
}

/// Main TUI application
pub struct App {
    config: Config,
    runner: Arc<GitRunner>,
    /// Directory being viewed
    cwd: PathBuf,
    theme: Theme,
    ui_state: AppUiState,
    event_loop: EventLoop,
}

impl App {
    /// Create a new application viewing `cwd`
    pub fn new(config: Config, cwd: PathBuf) -> Self {
        let runner = Arc::new(config.runner());

        Self {
            config,
            runner,
            cwd,
            theme: Theme::default(),
            ui_state: AppUiState::default(),
            event_loop: EventLoop::new(),
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        let fps = u64::from(self.config.ui_refresh_fps.max(1));
        let tick_rate = Duration::from_millis(1000 / fps);
        let refresh_every = (self.config.refresh_interval_secs > 0)
            .then(|| Duration::from_secs(self.config.refresh_interval_secs));
        self.event_loop.start(tick_rate, refresh_every);

        // Initial load happens behind the first frame
        self.request_refresh();

        let mut terminal = self.setup_terminal()?;

        info!("Entering main loop");
        let result = self.main_loop(&mut terminal).await;
        info!("Main loop exited with result: {:?}", result.is_ok());

        // A load still in flight gives up instead of starting more git processes
        self.runner.close();

        self.restore_terminal(&mut terminal)?;
        result
    }

    /// Load a fresh snapshot in the background
    ///
    /// Requests made while a load is in flight are dropped.
    fn request_refresh(&mut self) {
        if self.ui_state.loading {
            debug!("Refresh already in flight");
            return;
        }
        self.ui_state.loading = true;

        let sender = self.event_loop.sender();
        let runner = self.runner.clone();
        let cwd = self.cwd.clone();
        let max_count = self.config.max_commits;

        tokio::spawn(async move {
            let snapshot = RepoSnapshot::load(runner.as_ref(), &cwd, max_count).await;
            let _ = sender.send(AppEvent::Loaded(Box::new(snapshot))).await;
        });
    }

    /// Setup terminal for TUI
    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode().map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| TuiError::InitFailed(e.to_string()))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(|e| TuiError::InitFailed(e.to_string()))?;

        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode().map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        terminal
            .show_cursor()
            .map_err(|e| TuiError::RestoreFailed(e.to_string()))?;

        info!("Terminal restored");
        Ok(())
    }

    /// Main event loop
    async fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal
                .draw(|f| self.render(f))
                .map_err(|e| TuiError::RenderError(e.to_string()))?;

            let Some(event) = self.event_loop.next().await else {
                break;
            };

            match event {
                AppEvent::Input(InputEvent::Key(key)) => {
                    if let Some(cmd) = UserCommand::from_key(key) {
                        if self.ui_state.handle_command(cmd) {
                            self.request_refresh();
                        }
                    }
                }
                // Next draw picks up the new size
                AppEvent::Input(InputEvent::Resize(_, _)) => {}
                AppEvent::Loaded(snapshot) => self.ui_state.apply_snapshot(*snapshot),
                AppEvent::RefreshDue => self.request_refresh(),
                AppEvent::Tick => {}
            }

            if self.ui_state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(size);

        // Graph on the left, working tree on the right
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(rows[0]);

        self.render_graph(frame, panes[0]);
        self.render_status(frame, panes[1]);
        self.render_status_bar(frame, rows[1]);

        if self.ui_state.show_help {
            self.render_help(frame, size);
        }
    }

    fn pane_block(&self, title: String, pane: FocusedPane) -> Block<'static> {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.ui_state.focused_pane == pane))
    }

    fn render_graph(&mut self, frame: &mut Frame, area: Rect) {
        let title = match self.ui_state.snapshot.current_branch() {
            Some(branch) => format!(" History ({}) ", branch.name),
            None => " History ".to_string(),
        };
        let block = self.pane_block(title, FocusedPane::Graph);

        let view = GraphView::new(&self.ui_state.rows, &self.theme);
        let total = view.lines().len();
        self.ui_state
            .graph_scroll
            .set_content(total, area.height.saturating_sub(2));

        let view = view
            .block(block)
            .scroll(self.ui_state.graph_scroll.scroll_offset);
        frame.render_widget(view, area);
    }

    fn render_status(&mut self, frame: &mut Frame, area: Rect) {
        let files = self
            .ui_state
            .status_entries
            .iter()
            .filter(|e| !e.is_dir)
            .count();
        let block = self.pane_block(format!(" Changes ({}) ", files), FocusedPane::Status);

        self.ui_state
            .status_scroll
            .set_content(self.ui_state.status_entries.len(), area.height.saturating_sub(2));

        let list = StatusList::new(&self.ui_state.status_entries, &self.theme)
            .block(block)
            .scroll(self.ui_state.status_scroll.scroll_offset);
        frame.render_widget(list, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let text = if let Some(ref msg) = self.ui_state.status_message {
            msg.clone()
        } else {
            let loading = if self.ui_state.loading { " | loading..." } else { "" };
            format!(
                " {} | {} commits | ? for help{}",
                self.ui_state.snapshot.root.display(),
                self.ui_state.snapshot.commits.len(),
                loading
            )
        };

        let paragraph = Paragraph::new(text).style(self.theme.status_bar());
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let modal_area = centered_rect(50, 50, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(self.theme.border(true));

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let key_style = Style::default()
            .fg(self.theme.text_accent)
            .add_modifier(Modifier::BOLD);
        let lines: Vec<Line> = HELP_KEYS
            .iter()
            .map(|(keys, what)| {
                Line::from(vec![
                    Span::styled(format!("  {:<14}", keys), key_style),
                    Span::raw(*what),
                ])
            })
            .chain([Line::raw(""), Line::raw("  Press any key to close.")])
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

const HELP_KEYS: &[(&str, &str)] = &[
    ("j/k, Up/Down", "Scroll focused pane"),
    ("Ctrl+u/d", "Page up/down"),
    ("g, Home", "Scroll to top"),
    ("Tab", "Switch between panes"),
    ("r", "Refresh now"),
    ("?", "Show this help"),
    ("q, Ctrl+c", "Quit"),
];

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{Commit, FileStatus};

    fn snapshot() -> RepoSnapshot {
        RepoSnapshot {
            root: PathBuf::from("/repo"),
            is_repo: true,
            commits: vec![Commit::new("b", &["a"]), Commit::new("a", &[])],
            branches: Vec::new(),
            status: [(PathBuf::from("/repo/a.txt"), FileStatus::Modified)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(50, 50, area);

        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < area.width);
        assert!(centered.height < area.height);
    }

    #[test]
    fn test_ui_state_default() {
        let state = AppUiState::default();
        assert!(state.rows.is_empty());
        assert_eq!(state.focused_pane, FocusedPane::Graph);
        assert!(!state.show_help);
        assert!(!state.should_quit);
    }

    #[test]
    fn test_apply_snapshot() {
        let mut state = AppUiState {
            loading: true,
            ..AppUiState::default()
        };
        state.apply_snapshot(snapshot());

        assert_eq!(state.rows.len(), 2);
        assert_eq!(state.status_entries.len(), 1);
        assert!(!state.loading);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_non_repo_sets_message() {
        let mut state = AppUiState::default();
        state.apply_snapshot(RepoSnapshot {
            root: PathBuf::from("/tmp"),
            ..RepoSnapshot::default()
        });

        assert!(state.status_message.is_some());
        assert!(state.rows.is_empty());
    }

    #[test]
    fn test_commands() {
        let mut state = AppUiState::default();

        state.handle_command(UserCommand::SwitchPane);
        assert_eq!(state.focused_pane, FocusedPane::Status);
        state.handle_command(UserCommand::SwitchPane);
        assert_eq!(state.focused_pane, FocusedPane::Graph);

        assert!(state.handle_command(UserCommand::Refresh));

        state.handle_command(UserCommand::ShowHelp);
        assert!(state.show_help);
        // closes help without scrolling
        assert!(!state.handle_command(UserCommand::Refresh));
        assert!(!state.show_help);

        state.handle_command(UserCommand::Quit);
        assert!(state.should_quit);
    }

    #[test]
    fn test_scroll_targets_focused_pane() {
        let mut state = AppUiState::default();
        state.graph_scroll.set_content(50, 10);
        state.status_scroll.set_content(50, 10);

        state.handle_command(UserCommand::ScrollDown);
        assert_eq!(state.graph_scroll.scroll_offset, 1);
        assert_eq!(state.status_scroll.scroll_offset, 0);

        state.handle_command(UserCommand::SwitchPane);
        state.handle_command(UserCommand::PageDown);
        assert_eq!(state.status_scroll.scroll_offset, 8);
    }
}
