//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`Effect`]: Side effects requested by `update`
//! - [`Runtime`]: Executes effects and feeds results back as messages
//! - [`App::run`]: Main event loop with rendering

mod command;
mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use command::{Command, CommandError};
pub use effects::{Effect, Runtime};
pub use event_loop::Program;
pub use input::Key;
pub use model::{ItemsView, Model, Notice, NoticeLevel, Screen};
pub use update::{Message, init, reduce, update};

use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};

use crate::collection::{GlobDiscovery, JsonLoader};
use crate::ui::TerminalDisplay;
use crate::watcher::NotifyWatch;

/// Main application struct that owns the terminal and runs the event loop.
#[derive(Debug, Clone)]
pub struct App {
    pattern: String,
    watch_enabled: bool,
}

impl App {
    /// Create a new application browsing collections matching `pattern`.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            watch_enabled: false,
        }
    }

    /// Enable or disable file watching.
    #[must_use]
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization fails or reading
    /// terminal events fails.
    pub fn run(self) -> Result<()> {
        let root = std::env::current_dir()
            .and_then(|dir| dir.canonicalize())
            .unwrap_or_else(|_| PathBuf::from("."));

        let terminal = ratatui::try_init()
            .context("Failed to initialize terminal - sandbox requires an interactive terminal")?;
        let size = match terminal.size() {
            Ok(size) => size,
            Err(err) => {
                ratatui::restore();
                return Err(err).context("Failed to read terminal size");
            }
        };
        tracing::info!(
            pattern = %self.pattern,
            watch = self.watch_enabled,
            width = size.width,
            height = size.height,
            "starting"
        );

        let (sender, receiver) = mpsc::channel();
        let runtime = Runtime::new(
            GlobDiscovery,
            JsonLoader,
            NotifyWatch,
            TerminalDisplay::new(terminal),
            sender,
        );
        let model = Model::new(self.pattern, (size.width, size.height))
            .with_watch(self.watch_enabled)
            .with_root(root);

        let mut program = Program::start(model, runtime);
        let result = event_loop::run_event_loop(&mut program, &receiver);
        drop(program);

        ratatui::restore();
        result
    }
}
