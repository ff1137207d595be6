//! Terminal Browser Module
//!
//! The interactive side of the application: a directory tree and a
//! syntax-highlighted content pane, a one-line prompt, and the model's answer.
//!
//! ## Module Structure
//!
//! - `app` - Application state, event loop and terminal setup
//! - `commands` - Browse-mode actions and footer hints
//! - `config` - JSON configuration file
//! - `editor` - Single-line prompt editor
//! - `file_browser` - Lazily expanded directory tree
//! - `highlight` - File rendering with syntect
//! - `keymap` - Vi-style navigation aliases
//! - `ui` - Widget builders

pub mod app;
pub mod commands;
pub mod config;
pub mod editor;
pub mod file_browser;
pub mod highlight;
pub mod keymap;
pub mod ui;

// Re-export main types for convenience
pub use app::{AnswerState, App, ContentView, TerminalGuard};
pub use commands::Action;
pub use config::{Config, ConfigError, SyntaxOptions};
pub use editor::{CursorDirection, PromptEditor};
pub use file_browser::{DirectoryTree, FileEntry, SelectionResult};
pub use highlight::{HighlightedFile, Highlighter, RenderFailure, RenderOutcome};
