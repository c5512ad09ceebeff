use std::path::{Path, PathBuf};

use crate::collection::Item;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A one-line message shown under the current screen until the next key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// The items of one loaded collection and the selection among them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsView {
    /// Path of the collection file
    pub collection_id: PathBuf,
    pub items: Vec<Item>,
    pub selected_index: usize,
}

impl ItemsView {
    pub fn new(collection_id: PathBuf, items: Vec<Item>) -> Self {
        Self {
            collection_id,
            items,
            selected_index: 0,
        }
    }

    pub fn selected(&self) -> Option<&Item> {
        self.items.get(self.selected_index)
    }

    /// Swap in freshly loaded items, keeping the selection in range.
    pub(super) fn replace_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.selected_index = clamp_index(self.selected_index, self.items.len());
    }
}

/// Where the user currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Browsing the discovered collection files
    Collections { selected_index: usize },
    /// Browsing the items of one collection
    Items(ItemsView),
    /// One item shown on its own; `list` is restored when focus ends
    FocusedItem { item: Item, list: ItemsView },
}

impl Default for Screen {
    fn default() -> Self {
        Self::Collections { selected_index: 0 }
    }
}

impl Screen {
    /// The collection whose items are loaded, if any.
    pub fn collection_id(&self) -> Option<&Path> {
        match self {
            Self::Collections { .. } => None,
            Self::Items(view) | Self::FocusedItem { list: view, .. } => {
                Some(view.collection_id.as_path())
            }
        }
    }

    pub const fn is_collections(&self) -> bool {
        matches!(self, Self::Collections { .. })
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. The program loop
/// owns exactly one and replaces it with the result of every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Glob pattern for collection files
    pub pattern: String,
    /// Discovered collection files
    pub collection_paths: Vec<PathBuf>,
    /// Current screen
    pub screen: Screen,
    /// Whether collection files are watched for changes
    pub watch_enabled: bool,
    /// Terminal size as (width, height)
    pub terminal_size: (u16, u16),
    /// Directory collection paths are shown relative to
    pub root: PathBuf,
    /// Whether the help screen is visible
    pub help_visible: bool,
    /// Slash-command prompt contents while the prompt is open
    pub command_input: Option<String>,
    /// Latest notice, cleared on the next key press
    pub notice: Option<Notice>,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(String::new(), (80, 24))
    }
}

impl Model {
    /// Create the startup model: no collections, collections screen.
    pub fn new(pattern: impl Into<String>, terminal_size: (u16, u16)) -> Self {
        Self {
            pattern: pattern.into(),
            collection_paths: Vec::new(),
            screen: Screen::default(),
            watch_enabled: false,
            terminal_size,
            root: PathBuf::from("."),
            help_visible: false,
            command_input: None,
            notice: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = root;
        self
    }

    /// The collection highlighted on the collections screen.
    pub fn selected_collection(&self) -> Option<&Path> {
        match self.screen {
            Screen::Collections { selected_index } => self
                .collection_paths
                .get(selected_index)
                .map(PathBuf::as_path),
            _ => None,
        }
    }

    /// Path shown for a collection, relative to [`Self::root`] when possible.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    /// Index of `path` in the collection list, or 0.
    pub(super) fn collection_index(&self, path: &Path) -> usize {
        self.collection_paths
            .iter()
            .position(|p| p == path)
            .unwrap_or(0)
    }

    pub(super) fn clamp_collection_selection(&mut self) {
        if let Screen::Collections { selected_index } = &mut self.screen {
            *selected_index = clamp_index(*selected_index, self.collection_paths.len());
        }
    }
}

/// Clamp `index` into `[0, len - 1]`; 0 for an empty list.
pub(super) const fn clamp_index(index: usize, len: usize) -> usize {
    if index >= len {
        len.saturating_sub(1)
    } else {
        index
    }
}
