use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::app::Model;
use crate::app::command::Command;
use crate::app::effects::Effect;
use crate::app::input::Key;
use crate::app::model::{ItemsView, Notice, Screen, clamp_index};
use crate::collection::Item;

/// All possible events and actions in the application.
///
/// Key presses and filesystem changes come from the event sources; the rest
/// are produced by the effect runtime when I/O completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A key was pressed
    KeyPress(Key),
    /// A watched collection file changed on disk
    FileChanged(PathBuf),
    /// Collection files appeared
    FileAdded(Vec<PathBuf>),
    /// A collection file disappeared
    FileRemoved(PathBuf),
    /// Discovery finished with this list of collection files
    CollectionsDiscovered(Vec<PathBuf>),
    /// A collection finished loading
    ItemsLoaded {
        collection_id: PathBuf,
        items: Vec<Item>,
    },
    /// Show a message to the user
    Notify(Notice),
    /// Terminal resized
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// Startup effect for a fresh model: find the collections.
pub fn init(model: Model) -> (Model, Effect) {
    let effect = Effect::DiscoverCollections(model.pattern.clone());
    (model, effect)
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. Side effects
/// are returned as an [`Effect`] for the runtime to carry out.
pub fn update(mut model: Model, msg: Message) -> (Model, Effect) {
    match msg {
        Message::KeyPress(key) => update_key(model, key),
        Message::FileChanged(path) => {
            if model.screen.collection_id() == Some(path.as_path()) {
                (model, Effect::LoadCollection(path))
            } else {
                (model, Effect::NoOp)
            }
        }
        Message::FileAdded(paths) => file_added(model, paths),
        Message::FileRemoved(path) => file_removed(model, &path),
        Message::CollectionsDiscovered(paths) => {
            model.collection_paths = paths;
            model.clamp_collection_selection();
            redraw(model)
        }
        Message::ItemsLoaded {
            collection_id,
            items,
        } => items_loaded(model, collection_id, items),
        Message::Notify(notice) => {
            model.notice = Some(notice);
            redraw(model)
        }
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            redraw_with_clear(model)
        }
    }
}

/// The model half of [`update`].
pub fn reduce(model: Model, msg: Message) -> Model {
    update(model, msg).0
}

fn redraw(model: Model) -> (Model, Effect) {
    let effect = Effect::render(&model);
    (model, effect)
}

fn redraw_with_clear(model: Model) -> (Model, Effect) {
    let effect = Effect::render_with_clear(&model);
    (model, effect)
}

fn quit(mut model: Model) -> (Model, Effect) {
    model.should_quit = true;
    (model, Effect::Exit)
}

fn update_key(mut model: Model, key: Key) -> (Model, Effect) {
    if key == Key::Unknown {
        return (model, Effect::NoOp);
    }
    if key == Key::Interrupt {
        return quit(model);
    }
    let had_notice = model.notice.take().is_some();
    let (model, effect) = if model.command_input.is_some() {
        update_command_input(model, key)
    } else if model.help_visible {
        if key.is_quit() {
            quit(model)
        } else {
            model.help_visible = false;
            redraw_with_clear(model)
        }
    } else {
        match key {
            Key::Char('q') => quit(model),
            Key::Char('/') => {
                model.command_input = Some(String::new());
                redraw(model)
            }
            Key::Char('?' | 'h') => {
                model.help_visible = true;
                redraw_with_clear(model)
            }
            _ => update_screen_key(model, key),
        }
    };
    // The notice disappears with any key, so repaint even when nothing else changed.
    if had_notice && effect == Effect::NoOp {
        return redraw(model);
    }
    (model, effect)
}

fn update_screen_key(mut model: Model, key: Key) -> (Model, Effect) {
    let direction = match key {
        Key::Up | Key::Char('k') => Some(Direction::Up),
        Key::Down | Key::Char('j') => Some(Direction::Down),
        _ => None,
    };

    match std::mem::take(&mut model.screen) {
        Screen::Collections { selected_index } => {
            model.screen = Screen::Collections { selected_index };
            if let Some(direction) = direction {
                let next = step(selected_index, model.collection_paths.len(), direction);
                if next == selected_index {
                    return (model, Effect::NoOp);
                }
                model.screen = Screen::Collections {
                    selected_index: next,
                };
                return redraw(model);
            }
            match key {
                Key::Enter => match model.selected_collection() {
                    Some(path) => {
                        let path = path.to_path_buf();
                        (model, Effect::LoadCollection(path))
                    }
                    None => (model, Effect::NoOp),
                },
                _ => (model, Effect::NoOp),
            }
        }
        Screen::Items(mut view) => {
            if let Some(direction) = direction {
                let next = step(view.selected_index, view.items.len(), direction);
                let moved = next != view.selected_index;
                view.selected_index = next;
                model.screen = Screen::Items(view);
                return if moved {
                    redraw(model)
                } else {
                    (model, Effect::NoOp)
                };
            }
            match key {
                Key::Enter => {
                    if let Some(item) = view.selected().cloned() {
                        model.screen = Screen::FocusedItem { item, list: view };
                        redraw_with_clear(model)
                    } else {
                        model.screen = Screen::Items(view);
                        (model, Effect::NoOp)
                    }
                }
                Key::Escape => back_to_collections(model, &view.collection_id),
                _ => {
                    model.screen = Screen::Items(view);
                    (model, Effect::NoOp)
                }
            }
        }
        Screen::FocusedItem { item, list } => match key {
            Key::Enter | Key::Escape => {
                model.screen = Screen::Items(list);
                redraw_with_clear(model)
            }
            _ => {
                model.screen = Screen::FocusedItem { item, list };
                (model, Effect::NoOp)
            }
        },
    }
}

const fn step(index: usize, len: usize, direction: Direction) -> usize {
    match direction {
        Direction::Up => clamp_index(index.saturating_sub(1), len),
        Direction::Down => clamp_index(index.saturating_add(1), len),
    }
}

/// Leave the loaded collection: stop watching and rediscover.
fn back_to_collections(mut model: Model, collection_id: &Path) -> (Model, Effect) {
    let selected_index = model.collection_index(collection_id);
    model.screen = Screen::Collections { selected_index };
    let render = Effect::render_with_clear(&model);
    let effect = Effect::batch([
        Effect::StopWatching,
        Effect::DiscoverCollections(model.pattern.clone()),
        render,
    ]);
    (model, effect)
}

fn items_loaded(mut model: Model, collection_id: PathBuf, items: Vec<Item>) -> (Model, Effect) {
    let entering = model.screen.collection_id().is_none();
    let (screen, refreshed) = match std::mem::take(&mut model.screen) {
        Screen::Items(mut view) if view.collection_id == collection_id => {
            view.replace_items(items);
            (Screen::Items(view), true)
        }
        Screen::FocusedItem { mut list, .. } if list.collection_id == collection_id => {
            list.replace_items(items);
            let screen = match list.selected().cloned() {
                Some(item) => Screen::FocusedItem { item, list },
                None => Screen::Items(list),
            };
            (screen, true)
        }
        _ => (Screen::Items(ItemsView::new(collection_id, items)), false),
    };
    model.screen = screen;

    if refreshed {
        return redraw(model);
    }
    let render = Effect::render_with_clear(&model);
    let effect = if entering && model.watch_enabled {
        Effect::batch([Effect::StartWatching(model.pattern.clone()), render])
    } else {
        render
    };
    (model, effect)
}

fn file_added(mut model: Model, paths: Vec<PathBuf>) -> (Model, Effect) {
    let known = model.collection_paths.len();
    let mut merged: BTreeSet<PathBuf> = model.collection_paths.iter().cloned().collect();
    merged.extend(paths);
    if merged.len() == known {
        return (model, Effect::NoOp);
    }
    let selected = model.selected_collection().map(Path::to_path_buf);
    model.collection_paths = merged.into_iter().collect();
    if let Some(selected) = selected {
        model.screen = Screen::Collections {
            selected_index: model.collection_index(&selected),
        };
    }
    model.clamp_collection_selection();
    redraw(model)
}

fn file_removed(mut model: Model, path: &Path) -> (Model, Effect) {
    let Some(position) = model.collection_paths.iter().position(|p| p == path) else {
        return (model, Effect::NoOp);
    };
    let selected = model.selected_collection().map(Path::to_path_buf);
    model.collection_paths.remove(position);

    if model.screen.collection_id() == Some(path) {
        model.screen = Screen::Collections {
            selected_index: clamp_index(position, model.collection_paths.len()),
        };
        model.notice = Some(Notice::warning(format!(
            "{} was removed",
            model.display_path(path)
        )));
        let render = Effect::render_with_clear(&model);
        return (model, Effect::batch([Effect::StopWatching, render]));
    }

    if let Some(selected) = selected {
        let selected_index = if selected == path {
            position
        } else {
            model.collection_index(&selected)
        };
        model.screen = Screen::Collections { selected_index };
    }
    model.clamp_collection_selection();
    redraw(model)
}

fn update_command_input(mut model: Model, key: Key) -> (Model, Effect) {
    let Some(mut input) = model.command_input.take() else {
        return (model, Effect::NoOp);
    };
    match key {
        Key::Escape => redraw(model),
        Key::Enter => run_command(model, &input),
        Key::Backspace => {
            if !input.is_empty() {
                input.pop();
                model.command_input = Some(input);
            }
            redraw(model)
        }
        Key::Char(c) => {
            input.push(c);
            model.command_input = Some(input);
            redraw(model)
        }
        _ => {
            model.command_input = Some(input);
            (model, Effect::NoOp)
        }
    }
}

fn run_command(mut model: Model, input: &str) -> (Model, Effect) {
    match Command::parse(input) {
        Ok(command) => apply_command(model, command),
        Err(err) => {
            model.notice = Some(Notice::error(err.to_string()));
            redraw(model)
        }
    }
}

fn apply_command(mut model: Model, command: Command) -> (Model, Effect) {
    match command {
        Command::Help => {
            model.help_visible = true;
            redraw_with_clear(model)
        }
        Command::Focus(query) => focus_query(model, &query),
        Command::Sandboxes => match model.screen.collection_id().map(Path::to_path_buf) {
            Some(collection_id) => back_to_collections(model, &collection_id),
            None => redraw(model),
        },
        Command::Switch(name) => switch_collection(model, &name),
        Command::Clear => redraw_with_clear(model),
        Command::Exit => quit(model),
    }
}

fn switch_collection(mut model: Model, name: &str) -> (Model, Effect) {
    let Some(position) = model
        .collection_paths
        .iter()
        .position(|p| p.to_string_lossy().contains(name))
    else {
        model.notice = Some(Notice::error(format!("Sandbox not found: {name}")));
        return redraw(model);
    };
    let path = model.collection_paths[position].clone();
    if model.screen.is_collections() {
        model.screen = Screen::Collections {
            selected_index: position,
        };
    }
    let file_name = path
        .file_name()
        .map_or_else(|| model.display_path(&path), |n| n.to_string_lossy().to_string());
    model.notice = Some(Notice::info(format!("Switched to: {file_name}")));
    (model, Effect::LoadCollection(path))
}

fn focus_query(mut model: Model, query: &str) -> (Model, Effect) {
    let view = match &model.screen {
        Screen::Collections { .. } => {
            model.notice = Some(Notice::warning("Open a sandbox before using /focus"));
            return redraw(model);
        }
        Screen::Items(view) | Screen::FocusedItem { list: view, .. } => view,
    };

    if query.is_empty() {
        if let Screen::FocusedItem { list, .. } = std::mem::take(&mut model.screen) {
            model.screen = Screen::Items(list);
        }
        return redraw_with_clear(model);
    }

    let Some(index) = view.items.iter().position(|item| item.matches_query(query)) else {
        model.notice = Some(Notice::warning(format!(
            "No matching examples found for: {query}"
        )));
        return redraw(model);
    };

    let (Screen::Items(mut list) | Screen::FocusedItem { mut list, .. }) =
        std::mem::take(&mut model.screen)
    else {
        return (model, Effect::NoOp);
    };
    list.selected_index = index;
    let item = list.items[index].clone();
    model.notice = Some(Notice::info(format!("Focused on: {}", item.title())));
    model.screen = Screen::FocusedItem { item, list };
    redraw_with_clear(model)
}
