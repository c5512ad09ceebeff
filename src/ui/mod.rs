//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`window`]: Which slice of a long list fits on screen
//! - [`view`]: Builds the full-screen text for the current model
//! - [`Display`]: Where that text ends up
//! - [`style`]: Theming and colors

pub mod style;
pub mod window;

mod display;
mod render;

pub use display::{Display, TerminalDisplay};
pub use render::{collections_capacity, help_text, items_capacity, view};

/// Rows around the collection list taken by title, hints and footer.
pub const COLLECTIONS_RESERVED_ROWS: usize = 8;
/// Fewest collection rows shown, however small the terminal.
pub const MIN_VISIBLE_COLLECTIONS: usize = 3;
/// Rows around the example list taken by header and footer.
pub const ITEMS_RESERVED_ROWS: usize = 6;
/// Rows budgeted per rendered example.
pub const ROWS_PER_ITEM: usize = 7;
