//! File watching for live reload.
//!
//! Uses notify crate for cross-platform file system events. A watch covers
//! every file matching a glob pattern and reports changes, additions and
//! removals through a [`WatchSink`]. Dropping the [`WatchHandle`] stops it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::collection::{GlobPattern, in_skipped_dir};

/// A filesystem change relevant to a watched pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Changed(PathBuf),
    Added(Vec<PathBuf>),
    Removed(PathBuf),
}

/// Receives watch events. Called from the watcher's own thread.
pub type WatchSink = Box<dyn Fn(WatchEvent) + Send + 'static>;

/// Keeps a watch alive; dropping it cancels the watch.
pub struct WatchHandle {
    _guard: Box<dyn Send>,
}

impl WatchHandle {
    pub fn new(guard: impl Send + 'static) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }

    /// Stop watching.
    pub fn cancel(self) {
        drop(self);
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle").finish_non_exhaustive()
    }
}

/// Starts watches for glob patterns.
pub trait Watch {
    /// Watch files matching `pattern`, reporting to `sink`.
    ///
    /// # Errors
    /// Returns an error if the pattern is invalid or the watch cannot be set up.
    fn watch(&self, pattern: &str, sink: WatchSink) -> Result<WatchHandle>;
}

/// [`Watch`] backed by the platform's recommended notify watcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotifyWatch;

impl Watch for NotifyWatch {
    fn watch(&self, pattern: &str, sink: WatchSink) -> Result<WatchHandle> {
        let pattern = GlobPattern::new(pattern)?;
        // Canonicalize so event paths from the OS (which are always absolute
        // and canonical) match our stored paths.
        let root = pattern
            .base()
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", pattern.base().display()))?;
        let mode = if pattern.spans_directories() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        let filter = PatternFilter {
            pattern,
            root: root.clone(),
        };
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for watch_event in filter.classify(&event) {
                    sink(watch_event);
                }
            }
            Err(err) => tracing::warn!("watch error: {err}"),
        })?;
        watcher
            .watch(&root, mode)
            .with_context(|| format!("Failed to watch {}", root.display()))?;
        tracing::info!(root = %root.display(), "watching for collection changes");

        Ok(WatchHandle::new(ClosingWatcher { watcher, root }))
    }
}

struct ClosingWatcher {
    watcher: RecommendedWatcher,
    root: PathBuf,
}

impl Drop for ClosingWatcher {
    fn drop(&mut self) {
        let _ = self.watcher.unwatch(&self.root);
        tracing::info!(root = %self.root.display(), "stopped watching");
    }
}

struct PatternFilter {
    pattern: GlobPattern,
    root: PathBuf,
}

impl PatternFilter {
    fn is_relevant(&self, path: &Path) -> bool {
        self.pattern.matches_under(&self.root, path) && !in_skipped_dir(&self.root, path)
    }

    fn relevant(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths
            .iter()
            .filter(|path| self.is_relevant(path))
            .cloned()
            .collect()
    }

    /// Translate a notify event into zero or more watch events.
    fn classify(&self, event: &Event) -> Vec<WatchEvent> {
        match event.kind {
            EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                let added = self.relevant(&event.paths);
                if added.is_empty() {
                    Vec::new()
                } else {
                    vec![WatchEvent::Added(added)]
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                let mut events = Vec::new();
                if let Some(from) = event.paths.first().filter(|p| self.is_relevant(p)) {
                    events.push(WatchEvent::Removed(from.clone()));
                }
                if let Some(to) = event.paths.get(1).filter(|p| self.is_relevant(p)) {
                    events.push(WatchEvent::Added(vec![to.clone()]));
                }
                events
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) | EventKind::Remove(_) => self
                .relevant(&event.paths)
                .into_iter()
                .map(WatchEvent::Removed)
                .collect(),
            EventKind::Modify(_) => self
                .relevant(&event.paths)
                .into_iter()
                .map(WatchEvent::Changed)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RemoveKind};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn filter_for(root: &Path, glob: &str) -> PatternFilter {
        PatternFilter {
            pattern: GlobPattern::new(&format!("{}/{glob}", root.display())).unwrap(),
            root: root.to_path_buf(),
        }
    }

    fn event(kind: EventKind, paths: Vec<PathBuf>) -> Event {
        Event {
            kind,
            paths,
            attrs: notify::event::EventAttributes::new(),
        }
    }

    #[test]
    fn test_modify_of_matching_file_is_change() {
        let root = PathBuf::from("/work");
        let filter = filter_for(&root, "**/*.sandbox.json");
        let path = root.join("demo/a.sandbox.json");
        let events = filter.classify(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            vec![path.clone()],
        ));
        assert_eq!(events, vec![WatchEvent::Changed(path)]);
    }

    #[test]
    fn test_non_matching_paths_are_dropped() {
        let root = PathBuf::from("/work");
        let filter = filter_for(&root, "**/*.sandbox.json");
        let events = filter.classify(&event(
            EventKind::Create(CreateKind::File),
            vec![root.join("notes.md"), root.join("node_modules/x.sandbox.json")],
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn test_paths_in_skipped_dirs_are_dropped() {
        let root = PathBuf::from("/work");
        let filter = filter_for(&root, "**/*.sandbox.json");
        let events = filter.classify(&event(
            EventKind::Create(CreateKind::File),
            vec![
                root.join("target/x.sandbox.json"),
                root.join(".cache/y.sandbox.json"),
                root.join("demo/z.sandbox.json"),
            ],
        ));
        assert_eq!(
            events,
            vec![WatchEvent::Added(vec![root.join("demo/z.sandbox.json")])]
        );
    }

    #[test]
    fn test_create_and_remove_are_classified() {
        let root = PathBuf::from("/work");
        let filter = filter_for(&root, "*.json");
        let path = root.join("a.json");

        let added = filter.classify(&event(EventKind::Create(CreateKind::File), vec![path.clone()]));
        assert_eq!(added, vec![WatchEvent::Added(vec![path.clone()])]);

        let removed = filter.classify(&event(EventKind::Remove(RemoveKind::File), vec![path.clone()]));
        assert_eq!(removed, vec![WatchEvent::Removed(path)]);
    }

    #[test]
    fn test_rename_both_reports_remove_then_add() {
        let root = PathBuf::from("/work");
        let filter = filter_for(&root, "*.json");
        let from = root.join("old.json");
        let to = root.join("new.json");
        let events = filter.classify(&event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            vec![from.clone(), to.clone()],
        ));
        assert_eq!(events, vec![WatchEvent::Removed(from), WatchEvent::Added(vec![to])]);
    }

    #[test]
    fn test_real_file_modification_detected() {
        let dir = tempdir().expect("tempdir");
        let canonical_dir = dir.path().canonicalize().expect("canonicalize");
        let path = canonical_dir.join("watched.sandbox.json");
        std::fs::write(&path, "[]").expect("write");

        let (tx, rx) = mpsc::channel();
        let pattern = format!("{}/*.sandbox.json", canonical_dir.display());
        let handle = NotifyWatch
            .watch(
                &pattern,
                Box::new(move |event| {
                    let _ = tx.send(event);
                }),
            )
            .expect("watcher");

        // Give FSEvents time to register the watch
        std::thread::sleep(Duration::from_millis(500));

        std::fs::write(&path, "[{\"value\": \"x\"}]").expect("write");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut detected = false;
        while Instant::now() < deadline {
            if let Ok(event) = rx.recv_timeout(Duration::from_millis(100)) {
                if matches!(&event, WatchEvent::Changed(p) if p == &path)
                    || matches!(&event, WatchEvent::Added(ps) if ps.contains(&path))
                {
                    detected = true;
                    break;
                }
            }
        }
        handle.cancel();

        assert!(
            detected,
            "watcher should detect real file modification within 5 seconds"
        );
    }

    #[test]
    fn test_watch_missing_base_is_error() {
        let dir = tempdir().expect("tempdir");
        let pattern = format!("{}/missing/*.json", dir.path().display());
        assert!(NotifyWatch.watch(&pattern, Box::new(|_| {})).is_err());
    }
}
