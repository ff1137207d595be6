//! Browser Application
//!
//! Owns the UI state and runs the cooperative event loop. File selections and
//! prompt submissions that need the model are spawned as tokio tasks tagged
//! with a generation number; a newer interaction aborts the one in flight and
//! any result carrying an older generation is dropped.

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, terminal,
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use serde_json::{Map, Value};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::commands::Action;
use super::config::Config;
use super::editor::{CursorDirection, PromptEditor};
use super::file_browser::{DirectoryTree, SelectionResult};
use super::highlight::{HighlightedFile, Highlighter, RenderOutcome};
use super::keymap;
use super::ui;
use crate::orchestrator::{Orchestrator, OrchestratorError};

const PAGE: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Compose,
}

/// What the content pane currently shows
#[derive(Debug, Clone)]
pub enum ContentView {
    Empty,
    File(HighlightedFile),
    Failed { path: PathBuf, trace: Vec<String> },
}

impl ContentView {
    pub fn line_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::File(file) => file.line_count(),
            Self::Failed { trace, .. } => trace.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerState {
    Idle,
    Pending,
    Answered(String),
    Failed(String),
}

#[derive(Debug)]
struct InteractionResult {
    generation: u64,
    outcome: Result<String, OrchestratorError>,
}

pub struct App<'a> {
    config: &'a Config,
    tree: DirectoryTree,
    highlighter: Highlighter,
    orchestrator: Arc<Orchestrator>,
    prompt: PromptEditor,
    mode: Mode,
    focus: Focus,
    show_tree: bool,
    content: ContentView,
    scroll: (u16, u16),
    sub_title: String,
    current_file: Option<PathBuf>,
    answer: AnswerState,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    results_tx: UnboundedSender<InteractionResult>,
    results_rx: UnboundedReceiver<InteractionResult>,
    should_exit: bool,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, root: PathBuf, orchestrator: Orchestrator) -> io::Result<Self> {
        let tree = DirectoryTree::new(root, true)?;
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            tree,
            highlighter: Highlighter::new(config.syntax.clone()),
            orchestrator: Arc::new(orchestrator),
            prompt: PromptEditor::from_text(&config.prompt),
            mode: Mode::Browse,
            focus: Focus::Tree,
            show_tree: true,
            content: ContentView::Empty,
            scroll: (0, 0),
            sub_title: String::new(),
            current_file: None,
            answer: AnswerState::Idle,
            generation: 0,
            in_flight: None,
            results_tx,
            results_rx,
            should_exit: false,
        })
    }

    pub fn sub_title(&self) -> &str {
        &self.sub_title
    }

    pub fn content(&self) -> &ContentView {
        &self.content
    }

    pub fn answer(&self) -> &AnswerState {
        &self.answer
    }

    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        info!(root = %self.tree.root().display(), "browser started");

        let mut reader = EventStream::new();
        while !self.should_exit {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                Some(result) = self.results_rx.recv() => self.apply_result(result),
                event = reader.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key)
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => break,
                },
            }
        }

        self.cancel_in_flight();
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return;
        }

        match self.mode {
            Mode::Compose => self.handle_compose_key(key),
            Mode::Browse => {
                if let Some(action) = Action::from_key(&keymap::remap(key)) {
                    self.dispatch(action);
                }
            }
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => self.prompt.move_cursor(CursorDirection::Home),
                KeyCode::Char('e') => self.prompt.move_cursor(CursorDirection::End),
                KeyCode::Char('u') => self.prompt.delete_line(),
                KeyCode::Char('w') => self.prompt.delete_word_backward(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                self.start_interaction();
            }
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Char(ch) => self.prompt.insert_char(ch),
            KeyCode::Backspace => self.prompt.delete_char(),
            KeyCode::Delete => self.prompt.delete_char_forward(),
            KeyCode::Left => self.prompt.move_cursor(CursorDirection::Left),
            KeyCode::Right => self.prompt.move_cursor(CursorDirection::Right),
            KeyCode::Home => self.prompt.move_cursor(CursorDirection::Home),
            KeyCode::End => self.prompt.move_cursor(CursorDirection::End),
            _ => {}
        }
    }

    fn dispatch(&mut self, action: Action) {
        debug!(?action, focus = ?self.focus, "dispatching action");
        match action {
            Action::Quit => self.should_exit = true,
            Action::ToggleFiles => {
                self.show_tree = !self.show_tree;
                self.focus = if self.show_tree { Focus::Tree } else { Focus::Content };
            }
            Action::ToggleHidden => {
                let shown = self.tree.toggle_hidden();
                debug!(show_hidden = shown, "toggled hidden files");
            }
            Action::Compose => self.mode = Mode::Compose,
            Action::SwitchFocus => {
                self.focus = match self.focus {
                    Focus::Tree => Focus::Content,
                    Focus::Content if self.show_tree => Focus::Tree,
                    Focus::Content => Focus::Content,
                };
            }
            Action::PageUp => self.scroll_by(-(PAGE as i32)),
            Action::PageDown => self.scroll_by(PAGE as i32),
            Action::Top => match self.focus {
                Focus::Tree => self.tree.move_to_top(),
                Focus::Content => self.scroll = (0, 0),
            },
            Action::Up | Action::Down | Action::Left | Action::Right | Action::Select => {
                match self.focus {
                    Focus::Tree => self.navigate_tree(action),
                    Focus::Content => self.navigate_content(action),
                }
            }
        }
    }

    fn navigate_tree(&mut self, action: Action) {
        let result = match action {
            Action::Up => {
                self.tree.move_up();
                SelectionResult::Nothing
            }
            Action::Down => {
                self.tree.move_down();
                SelectionResult::Nothing
            }
            Action::Left => self.tree.collapse(),
            Action::Right => self.tree.expand(),
            Action::Select => self.tree.activate(),
            _ => SelectionResult::Nothing,
        };

        if let SelectionResult::FileSelected(path) = result {
            self.select_file(path);
        }
    }

    fn navigate_content(&mut self, action: Action) {
        match action {
            Action::Up => self.scroll_by(-1),
            Action::Down => self.scroll_by(1),
            Action::Left if !self.config.syntax.word_wrap => {
                self.scroll.1 = self.scroll.1.saturating_sub(4)
            }
            Action::Right if !self.config.syntax.word_wrap => {
                self.scroll.1 = self.scroll.1.saturating_add(4)
            }
            _ => {}
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = u16::try_from(self.content.line_count().saturating_sub(1)).unwrap_or(u16::MAX);
        let next = (i32::from(self.scroll.0) + delta).clamp(0, i32::from(max));
        self.scroll.0 = u16::try_from(next).unwrap_or(max);
    }

    /// Render `path` into the content pane and ask the model about it
    pub fn select_file(&mut self, path: PathBuf) {
        match self.highlighter.render_file(&path) {
            RenderOutcome::Rendered(file) => {
                self.sub_title = path.display().to_string();
                self.content = ContentView::File(file);
            }
            RenderOutcome::RenderFailed(failure) => {
                self.sub_title = "ERROR".to_string();
                self.content = ContentView::Failed {
                    path: path.clone(),
                    trace: failure.trace(),
                };
            }
        }
        self.scroll = (0, 0);
        self.current_file = Some(path);
        self.start_interaction();
    }

    /// Supersede any earlier interaction, then send the current prompt and
    /// selected file to the orchestrator. An empty prompt leaves the answer
    /// pane idle.
    fn start_interaction(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        self.answer = AnswerState::Idle;
        let generation = self.generation;

        let message = self.prompt.text().trim().to_string();
        if message.is_empty() {
            return;
        }

        let mut context = Map::new();
        if let Some(path) = &self.current_file {
            let relative = context_path(self.tree.root(), path);
            context.insert(
                "file".to_string(),
                Value::String(relative.display().to_string()),
            );
        }

        info!(generation, file = ?context.get("file"), "starting interaction");
        let orchestrator = Arc::clone(&self.orchestrator);
        let preamble = self.config.preamble.clone();
        let results_tx = self.results_tx.clone();
        self.answer = AnswerState::Pending;
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = orchestrator.query(&message, &preamble, &context).await;
            // The receiver only goes away when the app shuts down
            let _ = results_tx.send(InteractionResult {
                generation,
                outcome,
            });
        }));
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!(generation = self.generation, "superseding in-flight interaction");
                handle.abort();
            }
        }
    }

    fn apply_result(&mut self, result: InteractionResult) {
        if result.generation != self.generation {
            debug!(
                stale = result.generation,
                current = self.generation,
                "discarding stale interaction result"
            );
            return;
        }

        self.in_flight = None;
        self.answer = match result.outcome {
            Ok(text) => AnswerState::Answered(text),
            Err(e) => {
                warn!(error = %e, "interaction failed");
                AnswerState::Failed(e.to_string())
            }
        };
    }

    fn draw(&self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(8),
                Constraint::Length(1),
            ])
            .split(f.size());

        f.render_widget(ui::header(&self.sub_title, self.sub_title == "ERROR"), rows[0]);

        let content_area = if self.show_tree {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(rows[1]);
            let (list, mut state) = ui::tree_list(&self.tree, self.focus == Focus::Tree);
            f.render_stateful_widget(list, columns[0], &mut state);
            columns[1]
        } else {
            rows[1]
        };

        f.render_widget(
            ui::content_view(
                &self.content,
                self.scroll,
                self.config.syntax.word_wrap,
                self.focus == Focus::Content,
            ),
            content_area,
        );

        let composing = self.mode == Mode::Compose;
        f.render_widget(ui::prompt_box(&self.prompt, composing), rows[2]);
        if composing {
            let x = rows[2].x + 1 + self.prompt.cursor() as u16;
            f.set_cursor(x.min(rows[2].right().saturating_sub(2)), rows[2].y + 1);
        }

        f.render_widget(ui::answer_view(&self.answer), rows[3]);
        f.render_widget(ui::footer(), rows[4]);
    }
}

/// Raw-mode alternate-screen terminal, restored on drop
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    fn cleanup(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Path shown to the model for a selected file
pub fn context_path<'p>(root: &Path, path: &'p Path) -> &'p Path {
    path.strip_prefix(root).unwrap_or(path)
}
