//! JSON/JSON5 collection files.
//!
//! A collection file is an array of examples (or an object with an
//! `examples` array):
//!
//! ```json5
//! [
//!   { name: "Basic Error", description: "Red text", command: "printf 'Error\\n'" },
//!   { name: "Argv form", command: ["echo", "hello"] },
//!   { name: "Static", value: "precomputed output" },
//! ]
//! ```
//!
//! `command` is the example's renderer; it runs in the collection file's
//! directory with stdin closed, and stdout followed by stderr is captured.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use super::{ExampleBody, ExampleSpec, Load, Render};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("example {index} in {path}: {reason}")]
    InvalidEntry {
        path: PathBuf,
        index: usize,
        reason: &'static str,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CollectionFile {
    List(Vec<EntryFile>),
    Wrapped { examples: Vec<EntryFile> },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryFile {
    name: Option<String>,
    description: Option<String>,
    command: Option<CommandFile>,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandFile {
    Shell(String),
    Argv(Vec<String>),
}

/// Renders an example by running a process and capturing its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRender {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandRender {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }

    /// Run `script` through the platform shell.
    pub fn shell(script: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        #[cfg(windows)]
        let (program, flag) = ("cmd", "/C");
        #[cfg(not(windows))]
        let (program, flag) = ("sh", "-c");
        Self::new(program, vec![flag.to_string(), script.into()], cwd)
    }
}

impl Render for CommandRender {
    fn render(&self, out: &mut dyn Write) -> Result<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.cwd)
            .env("FORCE_COLOR", "1")
            .env("CLICOLOR_FORCE", "1")
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run `{}`", self.program))?;
        out.write_all(&output.stdout)?;
        out.write_all(&output.stderr)?;
        if !output.status.success() && output.stdout.is_empty() && output.stderr.is_empty() {
            anyhow::bail!("`{}` exited with {}", self.program, output.status);
        }
        Ok(())
    }
}

/// Loads collection files written as JSON (or JSON5 for `.json5` files).
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLoader;

impl JsonLoader {
    fn parse(path: &Path, content: &str) -> Result<Vec<EntryFile>, LoadError> {
        let is_json5 = path.extension().is_some_and(|ext| ext == "json5");
        let parsed: Result<CollectionFile, String> = if is_json5 {
            json5::from_str(content).map_err(|err| err.to_string())
        } else {
            serde_json::from_str(content).map_err(|err| err.to_string())
        };
        let file = parsed.map_err(|message| LoadError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(match file {
            CollectionFile::List(entries) | CollectionFile::Wrapped { examples: entries } => {
                entries
            }
        })
    }

    fn spec_for(path: &Path, index: usize, entry: EntryFile) -> Result<ExampleSpec, LoadError> {
        let invalid = |reason| LoadError::InvalidEntry {
            path: path.to_path_buf(),
            index,
            reason,
        };
        let cwd = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let body = match (entry.command, entry.value) {
            (Some(_), Some(_)) => return Err(invalid("has both `command` and `value`")),
            (Some(CommandFile::Shell(script)), None) => {
                ExampleBody::Render(Box::new(CommandRender::shell(script, cwd)))
            }
            (Some(CommandFile::Argv(mut argv)), None) => {
                if argv.is_empty() {
                    return Err(invalid("`command` array is empty"));
                }
                let program = argv.remove(0);
                ExampleBody::Render(Box::new(CommandRender::new(program, argv, cwd)))
            }
            (None, Some(value)) => ExampleBody::Value(value),
            (None, None) => ExampleBody::Empty,
        };
        Ok(ExampleSpec {
            name: entry.name,
            description: entry.description,
            body,
        })
    }
}

impl Load for JsonLoader {
    fn load(&self, path: &Path) -> Result<Vec<ExampleSpec>> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let specs = Self::parse(path, &content)?
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Self::spec_for(path, index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(file = %path.display(), count = specs.len(), "loaded collection");
        Ok(specs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{ExampleOutput, materialize};
    use tempfile::tempdir;

    #[test]
    fn test_load_json_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.sandbox.json");
        fs::write(
            &path,
            r#"[
                {"name": "Static", "description": "plain", "value": "hello"},
                {"name": "Nothing"}
            ]"#,
        )
        .unwrap();

        let specs = JsonLoader.load(&path).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name.as_deref(), Some("Static"));
        assert_eq!(specs[0].description.as_deref(), Some("plain"));
        assert!(matches!(&specs[0].body, ExampleBody::Value(v) if v == "hello"));
        assert!(matches!(specs[1].body, ExampleBody::Empty));
    }

    #[test]
    fn test_load_json5_wrapped_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.json5");
        fs::write(
            &path,
            "// comments are fine here\n{ examples: [ { name: 'One', value: 'x', }, ] }",
        )
        .unwrap();

        let specs = JsonLoader.load(&path).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name.as_deref(), Some("One"));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = JsonLoader.load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err.downcast_ref::<LoadError>(), Some(LoadError::Read { .. })));
    }

    #[test]
    fn test_load_malformed_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "[{\"name\": ").unwrap();
        let err = JsonLoader.load(&path).unwrap_err();
        assert!(matches!(err.downcast_ref::<LoadError>(), Some(LoadError::Parse { .. })));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_entry_with_command_and_value_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("both.json");
        fs::write(&path, r#"[{"command": "echo hi", "value": "hi"}]"#).unwrap();
        let err = JsonLoader.load(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::InvalidEntry { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_argv_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("argv.json");
        fs::write(&path, r#"[{"command": []}]"#).unwrap();
        assert!(JsonLoader.load(&path).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_command_output_is_captured() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cmd.json");
        fs::write(
            &path,
            r#"[
                {"name": "out", "command": "echo out; echo err 1>&2"},
                {"name": "argv", "command": ["printf", "%s", "argv"]},
                {"name": "fails", "command": "exit 3"}
            ]"#,
        )
        .unwrap();

        let items = materialize(&path, JsonLoader.load(&path).unwrap());
        assert_eq!(items[0].example.output, ExampleOutput::Text("out\nerr".to_string()));
        assert_eq!(items[1].example.output, ExampleOutput::Text("argv".to_string()));
        assert!(items[2].example.output.is_failed());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_runs_in_collection_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("fixture.txt"), "from fixture").unwrap();
        let path = dir.path().join("cwd.json");
        fs::write(&path, r#"[{"command": "cat fixture.txt"}]"#).unwrap();

        let items = materialize(&path, JsonLoader.load(&path).unwrap());
        assert_eq!(
            items[0].example.output,
            ExampleOutput::Text("from fixture".to_string())
        );
    }

    #[test]
    fn test_missing_program_is_inline_failure() {
        let render = CommandRender::new("definitely-not-a-real-program-xyz", Vec::new(), ".");
        let output = crate::collection::capture(&render);
        assert!(output.is_failed());
        assert!(output.display_text().contains("definitely-not-a-real-program-xyz"));
    }
}
