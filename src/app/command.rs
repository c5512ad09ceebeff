//! Slash commands typed at the `/` prompt.

use thiserror::Error;

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help`
    Help,
    /// `/focus <query>`; an empty query leaves focus
    Focus(String),
    /// `/sandboxes`
    Sandboxes,
    /// `/switch <file>`
    Switch(String),
    /// `/clear`
    Clear,
    /// `/exit`
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (try /help)")]
    Unknown(String),
    #[error("Usage: {0}")]
    MissingArgument(&'static str),
}

impl Command {
    /// Parse prompt input. The leading `/` is optional.
    ///
    /// # Errors
    /// Returns an error for unknown commands or a missing `/switch` argument.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let trimmed = input.trim();
        let body = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let (name, arg) = body
            .split_once(char::is_whitespace)
            .map_or((body, ""), |(name, arg)| (name, arg.trim()));
        match name {
            "help" => Ok(Self::Help),
            "focus" => Ok(Self::Focus(arg.to_string())),
            "sandboxes" => Ok(Self::Sandboxes),
            "switch" if arg.is_empty() => Err(CommandError::MissingArgument("/switch <file>")),
            "switch" => Ok(Self::Switch(arg.to_string())),
            "clear" => Ok(Self::Clear),
            "exit" => Ok(Self::Exit),
            _ => Err(CommandError::Unknown(format!("/{body}"))),
        }
    }
}
