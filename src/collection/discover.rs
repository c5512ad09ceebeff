//! Glob-based collection discovery.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

use super::Discover;

/// Directories never descended into while searching.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

/// Whether a directory named `name` is left out of discovery and watching.
pub fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}

/// Whether any directory between `root` and `path` is skipped.
pub fn in_skipped_dir(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root).is_ok_and(|relative| {
        relative.parent().is_some_and(|dirs| {
            dirs.components()
                .any(|c| is_skipped_dir(&c.as_os_str().to_string_lossy()))
        })
    })
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,
    #[error("unclosed '{0}' in pattern {1:?}")]
    Unclosed(char, String),
    #[error("invalid pattern {0:?}: {1}")]
    Regex(String, #[source] regex::Error),
}

/// A compiled glob pattern.
///
/// The pattern is split into a literal base directory and a glob part that
/// is matched against paths relative to that base. Supported syntax: `*`,
/// `**`, `?`, `[abc]`, `[!abc]` and `{a,b}`.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    base: PathBuf,
    glob: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile `pattern`.
    ///
    /// # Errors
    /// Returns an error for empty patterns or unbalanced brackets/braces.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }
        let normalized = trimmed.replace('\\', "/");
        let (base, glob) = split_base(&normalized);
        let source = glob_to_regex(&glob)
            .map_err(|open| PatternError::Unclosed(open, trimmed.to_string()))?;
        let regex = Regex::new(&source)
            .map_err(|err| PatternError::Regex(trimmed.to_string(), err))?;
        Ok(Self {
            raw: trimmed.to_string(),
            base,
            glob,
            regex,
        })
    }

    /// The pattern as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Literal directory the pattern is rooted at.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Whether the glob part may match below the first directory level.
    pub fn is_recursive(&self) -> bool {
        self.glob.contains("**")
    }

    /// Whether matches can sit in subdirectories of the base.
    pub fn spans_directories(&self) -> bool {
        self.is_recursive() || self.glob.contains('/')
    }

    /// Maximum directory depth the glob can match, if bounded.
    fn max_depth(&self) -> Option<usize> {
        if self.is_recursive() {
            None
        } else {
            Some(self.glob.split('/').count())
        }
    }

    /// Match a path relative to [`Self::base`].
    pub fn is_match(&self, relative: &Path) -> bool {
        let Some(joined) = join_components(relative) else {
            return false;
        };
        self.regex.is_match(&joined)
    }

    /// Match an absolute path against the pattern rooted at `root`.
    ///
    /// `root` must be the canonical form of [`Self::base`].
    pub fn matches_under(&self, root: &Path, path: &Path) -> bool {
        path.strip_prefix(root)
            .is_ok_and(|relative| self.is_match(relative))
    }
}

fn join_components(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

fn split_base(pattern: &str) -> (PathBuf, String) {
    let absolute = pattern.starts_with('/');
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let literal = segments
        .iter()
        .take_while(|segment| !has_glob_meta(segment))
        .count();
    // A pattern without wildcards names a file; its parent is the base.
    let literal = if literal == segments.len() {
        literal.saturating_sub(1)
    } else {
        literal
    };

    let mut base = if absolute {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    for segment in &segments[..literal] {
        base.push(segment);
    }
    if base.as_os_str().is_empty() {
        base.push(".");
    }
    (base, segments[literal..].join("/"))
}

/// Translate glob syntax into an anchored regex.
///
/// Returns the unclosed delimiter on failure.
fn glob_to_regex(glob: &str) -> Result<String, char> {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::from("^");
    let mut brace_depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .ok_or('[')?;
                let class: String = chars[i + 1..i + 1 + close].iter().collect();
                let (negated, class) = match class.strip_prefix('!') {
                    Some(rest) => (true, rest),
                    None => (false, class.as_str()),
                };
                out.push('[');
                if negated {
                    out.push('^');
                }
                out.push_str(&class.replace('\\', "\\\\"));
                out.push(']');
                i += close + 2;
                continue;
            }
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            '}' if brace_depth > 0 => {
                brace_depth -= 1;
                out.push(')');
            }
            ',' if brace_depth > 0 => out.push('|'),
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    if brace_depth > 0 {
        return Err('{');
    }
    out.push('$');
    Ok(out)
}

/// Filesystem discovery relative to the working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobDiscovery;

impl GlobDiscovery {
    fn walk(
        pattern: &GlobPattern,
        root: &Path,
        dir: &Path,
        depth: usize,
        found: &mut Vec<PathBuf>,
    ) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(dir = %dir.display(), "skipping unreadable directory: {err}");
                return;
            }
        };
        for entry in entries.filter_map(std::result::Result::ok) {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if is_skipped_dir(&entry.file_name().to_string_lossy()) {
                    continue;
                }
                if pattern.max_depth().is_none_or(|max| depth + 1 < max) {
                    Self::walk(pattern, root, &path, depth + 1, found);
                }
            } else if pattern.matches_under(root, &path) {
                found.push(path.canonicalize().unwrap_or(path));
            }
        }
    }
}

impl Discover for GlobDiscovery {
    fn discover(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = GlobPattern::new(pattern)?;
        if !pattern.base().is_dir() {
            return Ok(Vec::new());
        }
        let root = pattern
            .base()
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", pattern.base().display()))?;
        let mut found = Vec::new();
        Self::walk(&pattern, &root, &root, 0, &mut found);
        found.sort();
        found.dedup();
        Ok(found)
    }
}
