use std::collections::VecDeque;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Instant;

use ratatui::text::Text;

use crate::app::{Message, Model, Notice};
use crate::collection::{self, Discover, Load};
use crate::ui::{self, Display};
use crate::watcher::{Watch, WatchEvent, WatchHandle, WatchSink};

/// A side effect requested by [`update`](crate::app::update).
///
/// Effects are plain data. The [`Runtime`] is the only place they turn into
/// terminal output, filesystem access or watcher changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Draw this content over the whole screen
    Render(Text<'static>),
    /// Wipe the terminal before the next draw
    ClearScreen,
    /// Find collection files for a pattern
    DiscoverCollections(String),
    /// Load and materialize one collection
    LoadCollection(std::path::PathBuf),
    /// Watch collection files matching a pattern
    StartWatching(String),
    StopWatching,
    Exit,
    /// Run effects in order
    Batch(Vec<Effect>),
    NoOp,
}

impl Effect {
    /// Render the current view of `model`.
    pub fn render(model: &Model) -> Self {
        Self::Render(ui::view(model))
    }

    /// Clear the terminal, then render the current view of `model`.
    pub fn render_with_clear(model: &Model) -> Self {
        Self::Batch(vec![Self::ClearScreen, Self::render(model)])
    }

    /// Combine effects, flattening nested batches and dropping no-ops.
    pub fn batch(effects: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for effect in effects {
            match effect {
                Self::NoOp => {}
                Self::Batch(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Self::NoOp,
            1 => flat.pop().unwrap_or(Self::NoOp),
            _ => Self::Batch(flat),
        }
    }
}

/// Executes effects against the outside world.
///
/// Results come back as messages pushed onto the caller's queue, so every
/// state change still goes through `update`.
pub struct Runtime {
    discover: Box<dyn Discover>,
    loader: Box<dyn Load>,
    watcher: Box<dyn Watch>,
    display: Box<dyn Display>,
    /// Where watch callbacks deliver their messages
    events: Sender<Message>,
    watch: Option<WatchHandle>,
    exited: bool,
}

impl Runtime {
    pub fn new(
        discover: impl Discover + 'static,
        loader: impl Load + 'static,
        watcher: impl Watch + 'static,
        display: impl Display + 'static,
        events: Sender<Message>,
    ) -> Self {
        Self {
            discover: Box::new(discover),
            loader: Box::new(loader),
            watcher: Box::new(watcher),
            display: Box::new(display),
            events,
            watch: None,
            exited: false,
        }
    }

    /// Whether an [`Effect::Exit`] has been executed.
    pub const fn exited(&self) -> bool {
        self.exited
    }

    /// Whether a watch is currently active.
    pub const fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Carry out `effect`, queueing any resulting messages.
    pub fn execute(&mut self, effect: Effect, queue: &mut VecDeque<Message>) {
        if self.exited {
            return;
        }
        match effect {
            Effect::Render(text) => {
                if let Err(err) = self.display.render(&text) {
                    tracing::warn!("render failed: {err:#}");
                }
            }
            Effect::ClearScreen => {
                if let Err(err) = self.display.clear() {
                    tracing::warn!("clear failed: {err:#}");
                }
            }
            Effect::DiscoverCollections(pattern) => self.discover_collections(&pattern, queue),
            Effect::LoadCollection(path) => self.load_collection(&path, queue),
            Effect::StartWatching(pattern) => self.start_watching(&pattern, queue),
            Effect::StopWatching => self.stop_watching(),
            Effect::Exit => {
                self.stop_watching();
                self.exited = true;
            }
            Effect::Batch(effects) => {
                for effect in effects {
                    self.execute(effect, queue);
                }
            }
            Effect::NoOp => {}
        }
    }

    fn discover_collections(&self, pattern: &str, queue: &mut VecDeque<Message>) {
        match self.discover.discover(pattern) {
            Ok(paths) => {
                tracing::debug!(pattern, found = paths.len(), "discovered collections");
                let empty = paths.is_empty();
                queue.push_back(Message::CollectionsDiscovered(paths));
                if empty {
                    queue.push_back(Message::Notify(Notice::warning(format!(
                        "No sandbox files found matching pattern: {pattern}"
                    ))));
                }
            }
            Err(err) => {
                tracing::warn!(pattern, "discovery failed: {err:#}");
                queue.push_back(Message::CollectionsDiscovered(Vec::new()));
                queue.push_back(Message::Notify(Notice::warning(format!(
                    "Error discovering sandboxes: {err:#}"
                ))));
            }
        }
    }

    fn load_collection(&self, path: &Path, queue: &mut VecDeque<Message>) {
        let started = Instant::now();
        match self.loader.load(path) {
            Ok(specs) => {
                let items = collection::materialize(path, specs);
                tracing::debug!(
                    file = %path.display(),
                    items = items.len(),
                    elapsed_ms = started.elapsed().as_millis(),
                    "loaded collection"
                );
                queue.push_back(Message::ItemsLoaded {
                    collection_id: path.to_path_buf(),
                    items,
                });
            }
            Err(err) => {
                tracing::warn!(file = %path.display(), "load failed: {err:#}");
                queue.push_back(Message::ItemsLoaded {
                    collection_id: path.to_path_buf(),
                    items: Vec::new(),
                });
                queue.push_back(Message::Notify(Notice::error(format!(
                    "Error loading sandbox: {err:#}"
                ))));
            }
        }
    }

    fn start_watching(&mut self, pattern: &str, queue: &mut VecDeque<Message>) {
        self.stop_watching();
        let events = self.events.clone();
        let sink: WatchSink = Box::new(move |event| {
            let msg = match event {
                WatchEvent::Changed(path) => Message::FileChanged(path),
                WatchEvent::Added(paths) => Message::FileAdded(paths),
                WatchEvent::Removed(path) => Message::FileRemoved(path),
            };
            // The receiver is gone once the program loop has finished.
            let _ = events.send(msg);
        });
        match self.watcher.watch(pattern, sink) {
            Ok(handle) => {
                tracing::info!(pattern, "watching for changes");
                self.watch = Some(handle);
            }
            Err(err) => {
                tracing::warn!(pattern, "watch unavailable: {err:#}");
                queue.push_back(Message::Notify(Notice::warning(format!(
                    "Watch unavailable: {err:#}"
                ))));
            }
        }
    }

    fn stop_watching(&mut self) {
        if let Some(handle) = self.watch.take() {
            tracing::debug!("stopped watching");
            handle.cancel();
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("watching", &self.watch.is_some())
            .field("exited", &self.exited)
            .finish_non_exhaustive()
    }
}
