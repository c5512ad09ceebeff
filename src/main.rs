//! Sandbox - browse example renderers in the terminal.
//!
//! # Usage
//!
//! ```bash
//! sandbox
//! sandbox --watch
//! sandbox "demos/**/*.sandbox.json5"
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;

use sandbox::app::App;
use sandbox::collection::GlobPattern;
use sandbox::config::{
    ConfigFlags, DEFAULT_PATTERN, global_config_path, load_config_flags, local_override_path,
};
use sandbox::logging;

const AFTER_HELP: &str = "\
Examples:
  sandbox                            Find all **/*.sandbox.json files
  sandbox \"demos/**/*.json5\"         Custom pattern
  sandbox -w                         Reload when sandbox files change";

/// Interactive visual testing environment for CLI rendering
#[derive(Parser, Debug)]
#[command(name = "sandbox", about, long_about = None, after_help = AFTER_HELP)]
struct Cli {
    #[arg(value_name = "PATTERN", help = format!("Glob pattern for sandbox files (default: {DEFAULT_PATTERN})"))]
    pattern: Option<String>,

    /// Watch files for changes
    #[arg(short, long)]
    watch: bool,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp) => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    };

    let global_flags = load_config_flags(&global_config_path())?;
    let local_flags = load_config_flags(&local_override_path())?;
    let cli_flags = ConfigFlags {
        watch: cli.watch,
        pattern: cli.pattern,
        log_file: None,
    };
    let effective = global_flags.union(&local_flags).union(&cli_flags);

    if let Some(path) = logging::log_path(effective.log_file.as_deref())
        && let Err(err) = logging::init(&path)
    {
        eprintln!("[warn] {err:#}");
    }

    let pattern = effective.effective_pattern().to_string();
    GlobPattern::new(&pattern).with_context(|| format!("Invalid pattern {pattern:?}"))?;

    App::new(pattern)
        .with_watch(effective.watch)
        .run()
        .context("Application error")
}
