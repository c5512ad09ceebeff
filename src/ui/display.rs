use std::io::Stdout;

use anyhow::{Result, anyhow};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::text::Text;
use ratatui::widgets::Paragraph;

/// Where rendered screens are shown.
pub trait Display {
    /// Wipe the screen so the next render starts from a blank terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be written.
    fn clear(&mut self) -> Result<()>;

    /// Replace the screen contents with `content`.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be written.
    fn render(&mut self, content: &Text<'_>) -> Result<()>;
}

/// [`Display`] drawing through a ratatui terminal.
///
/// The default backend is the one behind `ratatui::DefaultTerminal`.
pub struct TerminalDisplay<B: Backend = CrosstermBackend<Stdout>> {
    terminal: Terminal<B>,
}

impl<B: Backend> TerminalDisplay<B> {
    pub const fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    pub const fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> Display for TerminalDisplay<B> {
    fn clear(&mut self) -> Result<()> {
        self.terminal
            .clear()
            .map_err(|err| anyhow!("Failed to clear terminal: {err}"))
    }

    fn render(&mut self, content: &Text<'_>) -> Result<()> {
        self.terminal
            .draw(|frame| {
                let area = frame.area();
                frame.render_widget(Paragraph::new(content.clone()), area);
            })
            .map(|_| ())
            .map_err(|err| anyhow!("Failed to draw: {err}"))
    }
}

impl<B: Backend> std::fmt::Debug for TerminalDisplay<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDisplay").finish_non_exhaustive()
    }
}
