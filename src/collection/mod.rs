//! Collections of examples and the capabilities that produce them.
//!
//! A collection is a file on disk listing examples. [`Discover`] finds
//! collection files for a glob pattern, [`Load`] turns one file into
//! [`ExampleSpec`]s, and [`materialize`] captures every example's output
//! into the [`Item`]s the browser displays.

mod discover;
mod loader;

use std::cell::Cell;
use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub use discover::{GlobDiscovery, GlobPattern, PatternError, in_skipped_dir, is_skipped_dir};
pub use loader::{CommandRender, JsonLoader, LoadError};

/// Finds collection files matching a pattern.
pub trait Discover {
    /// Return matching files in a stable order.
    ///
    /// # Errors
    /// Returns an error if the pattern is invalid or the search fails.
    fn discover(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Reads the examples declared by one collection file.
pub trait Load {
    /// Load the example specs of `path`, in declaration order.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn load(&self, path: &Path) -> Result<Vec<ExampleSpec>>;
}

/// Something that prints an example's output.
pub trait Render: Send {
    /// Write the example's output to `out`.
    ///
    /// # Errors
    /// Any error is shown inline in place of the example's output.
    fn render(&self, out: &mut dyn Write) -> Result<()>;
}

impl<F> Render for F
where
    F: Fn(&mut dyn Write) -> Result<()> + Send,
{
    fn render(&self, out: &mut dyn Write) -> Result<()> {
        self(out)
    }
}

/// How an example produces its output.
pub enum ExampleBody {
    /// Invoke a renderer and capture what it prints
    Render(Box<dyn Render>),
    /// Precomputed output
    Value(String),
    /// Nothing to show
    Empty,
}

impl fmt::Debug for ExampleBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(_) => f.write_str("Render(..)"),
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// One example as declared by a loader, before its output is captured.
#[derive(Debug)]
pub struct ExampleSpec {
    pub name: Option<String>,
    pub description: Option<String>,
    pub body: ExampleBody,
}

impl ExampleSpec {
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            body: ExampleBody::Value(value.into()),
        }
    }

    pub fn render(name: impl Into<String>, render: impl Render + 'static) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            body: ExampleBody::Render(Box::new(render)),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Captured output of an example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleOutput {
    /// Text printed by the example (may contain ANSI escapes)
    Text(String),
    /// The example printed nothing
    Empty,
    /// Rendering failed; the reason is shown inline
    Failed(String),
}

impl ExampleOutput {
    /// The text shown in place of the example.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Empty => "[No output]".to_string(),
            Self::Failed(reason) => format!("Error rendering example: {reason}"),
        }
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A materialized example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub name: Option<String>,
    pub description: Option<String>,
    pub output: ExampleOutput,
}

/// An example within a loaded collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Stable identifier, `"{source_file}-{index}"`
    pub id: String,
    /// Position within the collection
    pub index: usize,
    pub example: Example,
    /// Collection file the item came from
    pub source_file: PathBuf,
}

impl Item {
    /// Display name, falling back to `"Example {n}"`.
    pub fn title(&self) -> String {
        self.example
            .name
            .clone()
            .unwrap_or_else(|| format!("Example {}", self.index + 1))
    }

    /// Case-insensitive substring match against name and description.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.example.name, &self.example.description]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
}

/// Silence the panic hook for panics raised inside [`capture`] on the
/// capturing thread. Other panics still reach the previous hook.
fn install_quiet_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !CAPTURING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Run `render` against a fresh buffer and return what it printed.
///
/// Errors and panics raised by the renderer are both converted into
/// [`ExampleOutput::Failed`]; the caller always gets a displayable value.
/// A renderer panic is reported only inline, never on stderr, since the
/// terminal belongs to the UI.
///
/// Output is kept as printed apart from trailing whitespace, so leading
/// indentation and blank lines survive.
pub fn capture(render: &dyn Render) -> ExampleOutput {
    install_quiet_panic_hook();
    let mut buffer: Vec<u8> = Vec::new();
    let was_capturing = CAPTURING.replace(true);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| render.render(&mut buffer)));
    CAPTURING.set(was_capturing);
    match outcome {
        Ok(Ok(())) => {
            let text = String::from_utf8_lossy(&buffer);
            if text.trim().is_empty() {
                ExampleOutput::Empty
            } else {
                ExampleOutput::Text(text.trim_end().to_string())
            }
        }
        Ok(Err(err)) => ExampleOutput::Failed(format!("{err:#}")),
        Err(payload) => ExampleOutput::Failed(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "renderer panicked".to_string())
}

/// Capture every spec's output and build the collection's items.
pub fn materialize(source_file: &Path, specs: Vec<ExampleSpec>) -> Vec<Item> {
    specs
        .into_iter()
        .enumerate()
        .map(|(index, spec)| {
            let output = match spec.body {
                ExampleBody::Render(render) => capture(render.as_ref()),
                ExampleBody::Value(value) if value.trim().is_empty() => ExampleOutput::Empty,
                ExampleBody::Value(value) => ExampleOutput::Text(value),
                ExampleBody::Empty => ExampleOutput::Empty,
            };
            if let ExampleOutput::Failed(reason) = &output {
                tracing::debug!(
                    file = %source_file.display(),
                    index,
                    "example render failed: {reason}"
                );
            }
            Item {
                id: format!("{}-{index}", source_file.display()),
                index,
                example: Example {
                    name: spec.name,
                    description: spec.description,
                    output,
                },
                source_file: source_file.to_path_buf(),
            }
        })
        .collect()
}
