// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. collection::CollectionFile)
    clippy::module_name_repetitions
)]

//! # Sandbox
//!
//! A terminal browser for previewing example renderers.
//!
//! Sandbox finds collection files matching a glob pattern, captures what each
//! example in a collection prints, and lets you browse the results with:
//! - A scrolling list of collections and of examples
//! - A focused view for a single example
//! - Slash commands (`/focus`, `/switch`, ...)
//! - File watching for live reload
//!
//! ## Architecture
//!
//! Sandbox uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions returning effects
//! - **Runtime**: Executes effects, feeding results back as messages
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`collection`]: Discovering, loading and capturing examples
//! - [`ui`]: Terminal UI components
//! - [`watcher`]: File watching
//! - [`config`]: Flag-file defaults
//! - [`logging`]: Diagnostic log file

pub mod app;
pub mod collection;
pub mod config;
pub mod logging;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Effect, Message, Model, Program, Runtime, Screen};
    pub use crate::collection::{Discover, ExampleSpec, Item, Load};
    pub use crate::ui::window::{Window, compute_window};
}
