use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;

use sandbox::app::{Key, Message, Model, Program, Runtime, Screen};
use sandbox::collection::{GlobDiscovery, JsonLoader};
use sandbox::ui::TerminalDisplay;
use sandbox::watcher::{NotifyWatch, Watch, WatchHandle, WatchSink};

struct NoWatch;

impl Watch for NoWatch {
    fn watch(&self, _pattern: &str, _sink: WatchSink) -> anyhow::Result<WatchHandle> {
        Ok(WatchHandle::new(()))
    }
}

fn display() -> TerminalDisplay<TestBackend> {
    TerminalDisplay::new(Terminal::new(TestBackend::new(100, 40)).unwrap())
}

fn write_fixtures(root: &Path) {
    fs::write(
        root.join("alpha.sandbox.json"),
        r#"[
            { "name": "greeting", "description": "plain text", "value": "hello" },
            { "name": "empty" }
        ]"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::write(
        root.join("nested/beta.sandbox.json5"),
        "{ examples: [ { name: 'only', value: 'from json5' } ] }",
    )
    .unwrap();
    fs::write(root.join("broken.sandbox.json"), "[ not json").unwrap();
    fs::write(root.join("notes.txt"), "ignored").unwrap();
}

fn press(program: &mut Program, key: Key) {
    program.dispatch(Message::KeyPress(key));
}

fn items(model: &Model) -> Vec<String> {
    match &model.screen {
        Screen::Items(view) | Screen::FocusedItem { list: view, .. } => view
            .items
            .iter()
            .map(|item| item.example.output.display_text())
            .collect(),
        Screen::Collections { .. } => Vec::new(),
    }
}

#[test]
fn test_browse_real_collection_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    write_fixtures(&root);

    let pattern = format!("{}/**/*.sandbox.json*", root.display());
    let (sender, _receiver) = mpsc::channel();
    let runtime = Runtime::new(GlobDiscovery, JsonLoader, NoWatch, display(), sender);
    let model = Model::new(pattern, (100, 40)).with_root(root.clone());
    let mut program = Program::start(model, runtime);

    assert_eq!(
        program.model().collection_paths,
        vec![
            root.join("alpha.sandbox.json"),
            root.join("broken.sandbox.json"),
            root.join("nested/beta.sandbox.json5"),
        ]
    );

    press(&mut program, Key::Enter);
    assert_eq!(items(program.model()), vec!["hello", "[No output]"]);

    press(&mut program, Key::Escape);
    press(&mut program, Key::Down);
    press(&mut program, Key::Enter);
    assert!(items(program.model()).is_empty());
    let notice = program.model().notice.clone().unwrap();
    assert!(notice.message.starts_with("Error loading sandbox:"));

    press(&mut program, Key::Escape);
    press(&mut program, Key::Down);
    press(&mut program, Key::Enter);
    assert_eq!(items(program.model()), vec!["from json5"]);

    press(&mut program, Key::Char('q'));
    assert!(program.is_finished());
}

#[cfg(unix)]
#[test]
fn test_command_examples_are_captured() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::write(
        root.join("cmd.sandbox.json"),
        r#"[
            { "name": "shell", "command": "printf 'one\\ntwo\\n'" },
            { "name": "argv", "command": ["echo", "argv works"] },
            { "name": "fails", "command": "exit 3" }
        ]"#,
    )
    .unwrap();

    let pattern = format!("{}/*.sandbox.json", root.display());
    let (sender, _receiver) = mpsc::channel();
    let runtime = Runtime::new(GlobDiscovery, JsonLoader, NoWatch, display(), sender);
    let mut program = Program::start(Model::new(pattern, (100, 40)), runtime);
    press(&mut program, Key::Enter);

    let outputs = items(program.model());
    assert_eq!(outputs[0], "one\ntwo");
    assert_eq!(outputs[1], "argv works");
    assert!(outputs[2].starts_with("Error rendering example:"));
}

#[test]
fn test_watched_collection_reloads_on_change() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let file = root.join("live.sandbox.json");
    fs::write(&file, r#"[ { "name": "v", "value": "first" } ]"#).unwrap();

    let pattern = format!("{}/*.sandbox.json", root.display());
    let (sender, receiver) = mpsc::channel();
    let runtime = Runtime::new(GlobDiscovery, JsonLoader, NotifyWatch, display(), sender);
    let model = Model::new(pattern, (100, 40)).with_watch(true);
    let mut program = Program::start(model, runtime);
    press(&mut program, Key::Enter);
    assert!(program.runtime().is_watching());
    assert_eq!(items(program.model()), vec!["first"]);

    // Give the watcher a moment to register before writing.
    std::thread::sleep(Duration::from_millis(200));
    fs::write(&file, r#"[ { "name": "v", "value": "second" } ]"#).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while items(program.model()) != vec!["second"] && Instant::now() < deadline {
        if let Ok(msg) = receiver.recv_timeout(Duration::from_millis(100)) {
            program.dispatch(msg);
        }
    }
    assert_eq!(items(program.model()), vec!["second"]);

    press(&mut program, Key::Escape);
    assert!(!program.runtime().is_watching());
}
