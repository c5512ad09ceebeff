use std::ops::Range;
use std::path::Path;

use ansi_to_tui::IntoText;
use ratatui::text::{Line, Span, Text};

use crate::app::{ItemsView, Model, Screen};
use crate::collection::{ExampleOutput, Item};

use super::window::compute_window;
use super::{
    COLLECTIONS_RESERVED_ROWS, ITEMS_RESERVED_ROWS, MIN_VISIBLE_COLLECTIONS, ROWS_PER_ITEM, style,
};

const TITLE: &str = "Sandbox";

const COLLECTIONS_HINT: &str = "↑↓/jk navigate • Enter open • / command • ? help • q quit";
const ITEMS_HINT: &str = "↑↓/jk navigate • Enter focus • Esc back • / command • ? help • q quit";
const FOCUSED_HINT: &str = "Enter/Esc back to list • / command • ? help • q quit";
const HELP_HINT: &str = "Press any key to close help";

/// Collection rows that fit in a terminal `height` rows tall.
pub fn collections_capacity(height: u16) -> usize {
    usize::from(height)
        .saturating_sub(COLLECTIONS_RESERVED_ROWS)
        .max(MIN_VISIBLE_COLLECTIONS)
}

/// Examples that fit in a terminal `height` rows tall.
pub fn items_capacity(height: u16) -> usize {
    (usize::from(height).saturating_sub(ITEMS_RESERVED_ROWS) / ROWS_PER_ITEM).max(1)
}

/// Key bindings and slash commands, one entry per line.
pub fn help_text() -> Vec<(&'static str, &'static str)> {
    vec![
        ("↑ / k", "Move selection up"),
        ("↓ / j", "Move selection down"),
        ("Enter", "Open sandbox / focus example / back to list"),
        ("Esc", "Back to the previous screen"),
        ("/", "Open the command prompt"),
        ("? / h", "Show this help"),
        ("q / Ctrl-C", "Quit"),
        ("/help", "Show this help"),
        ("/focus <query>", "Focus the first example matching the query"),
        ("/sandboxes", "Back to the sandbox list"),
        ("/switch <file>", "Open the sandbox whose path contains <file>"),
        ("/clear", "Clear and redraw the screen"),
        ("/exit", "Quit"),
    ]
}

/// Build the full-screen text for `model`.
pub fn view(model: &Model) -> Text<'static> {
    // The footer holds the prompt and notices, so it wins over body rows.
    let footer = footer(model, hint(model));
    let body_rows = usize::from(model.terminal_size.1).saturating_sub(footer.len());

    let mut lines: Vec<Line<'static>> = Vec::new();
    if model.help_visible {
        render_help(&mut lines);
    } else {
        match &model.screen {
            Screen::Collections { selected_index } => {
                render_collections(model, *selected_index, &mut lines);
            }
            Screen::Items(list) => render_items(model, list, body_rows, &mut lines),
            Screen::FocusedItem { item, list } => {
                render_focused(model, item, &list.collection_id, &mut lines);
            }
        }
    }
    lines.truncate(body_rows);
    lines.extend(footer);
    Text::from(lines)
}

fn hint(model: &Model) -> &'static str {
    if model.help_visible {
        return HELP_HINT;
    }
    match model.screen {
        Screen::Collections { .. } => COLLECTIONS_HINT,
        Screen::Items(_) => ITEMS_HINT,
        Screen::FocusedItem { .. } => FOCUSED_HINT,
    }
}

fn render_help(lines: &mut Vec<Line<'static>>) {
    lines.push(Line::styled(format!("{TITLE} - Help"), style::title()));
    lines.push(Line::default());
    let width = help_text()
        .iter()
        .map(|(keys, _)| unicode_width::UnicodeWidthStr::width(*keys))
        .max()
        .unwrap_or(0);
    for (keys, description) in help_text() {
        let pad = width - unicode_width::UnicodeWidthStr::width(keys);
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(keys, style::prompt()),
            Span::raw(" ".repeat(pad + 2)),
            Span::raw(description),
        ]));
    }
}

fn render_collections(model: &Model, selected_index: usize, lines: &mut Vec<Line<'static>>) {
    let height = model.terminal_size.1;
    let paths = &model.collection_paths;
    let window = compute_window(paths, selected_index, collections_capacity(height));

    lines.push(Line::styled(TITLE, style::title()));
    lines.push(Line::default());
    lines.push(Line::styled("Select a sandbox to explore:", style::muted()));

    if paths.is_empty() {
        lines.push(Line::styled("  (no sandbox files found)", style::muted()));
    }
    if window.show_scroll_up {
        lines.push(Line::styled(
            format!("  ↑ ({} more above)", window.hidden_above()),
            style::muted(),
        ));
    }
    for (offset, path) in window.slice(paths).iter().enumerate() {
        let selected = window.start + offset == selected_index;
        let marker = if selected {
            Span::styled("▶ ", style::marker())
        } else {
            Span::raw("  ")
        };
        lines.push(Line::from(vec![
            marker,
            Span::styled(model.display_path(path), style::collection_name(selected)),
        ]));
    }
    if window.show_scroll_down {
        lines.push(Line::styled(
            format!("  ↓ ({} more below)", window.hidden_below()),
            style::muted(),
        ));
    }
    lines.push(Line::default());
    if window.is_scrolling() {
        lines.push(Line::styled(
            format!("Position: {}", window.scroll_position),
            style::muted(),
        ));
    }
}

fn header(model: &Model, collection_id: &Path, focused: bool) -> Line<'static> {
    let file_name = collection_id.file_name().map_or_else(
        || model.display_path(collection_id),
        |name| name.to_string_lossy().to_string(),
    );
    let mut spans = vec![
        Span::styled(TITLE, style::title()),
        Span::styled(format!(" - {file_name}"), style::muted()),
    ];
    if focused {
        spans.push(Span::styled(" [FOCUSED]", style::focused_badge()));
    }
    if model.watch_enabled {
        spans.push(Span::styled(" [watching]", style::watching_badge()));
    }
    Line::from(spans)
}

fn render_items(
    model: &Model,
    list: &ItemsView,
    body_rows: usize,
    lines: &mut Vec<Line<'static>>,
) {
    let (width, height) = model.terminal_size;
    lines.push(header(model, &list.collection_id, false));
    lines.push(Line::default());

    if list.items.is_empty() {
        lines.push(Line::styled("No examples to display", style::empty_list()));
        lines.push(Line::default());
        return;
    }

    let window = compute_window(&list.items, list.selected_index, items_capacity(height));
    if window.show_scroll_up {
        lines.push(Line::styled(
            format!("  ↑ ({} more above)", window.hidden_above()),
            style::muted(),
        ));
        lines.push(Line::default());
    }
    let first_item_row = lines.len();
    let mut selected_rows = first_item_row..first_item_row;
    let visible = window.slice(&list.items);
    for (offset, item) in visible.iter().enumerate() {
        let selected = window.start + offset == list.selected_index;
        let start = lines.len();
        render_item_header(item, selected, lines);
        lines.extend(output_text(&item.example.output).lines);
        if selected {
            selected_rows = start..lines.len();
        }
        if offset + 1 < visible.len() {
            lines.push(Line::default());
            lines.push(separator(width));
            lines.push(Line::default());
        }
    }
    if window.show_scroll_down {
        lines.push(Line::default());
        lines.push(Line::styled(
            format!("  ↓ ({} more below)", window.hidden_below()),
            style::muted(),
        ));
    }
    lines.push(Line::default());
    if window.is_scrolling() {
        lines.push(Line::styled(
            format!("Position: {}", window.scroll_position),
            style::muted(),
        ));
    }
    scroll_to_selected(lines, first_item_row, &selected_rows, body_rows);
}

/// Drop item rows above the selected example until it fits in `body_rows`.
///
/// Rows before `first_item_row` (header and the upper scroll indicator)
/// stay put. The selected example's own header is never dropped.
fn scroll_to_selected(
    lines: &mut Vec<Line<'static>>,
    first_item_row: usize,
    selected_rows: &Range<usize>,
    body_rows: usize,
) {
    let overflow = selected_rows.end.saturating_sub(body_rows);
    let skip = overflow.min(selected_rows.start - first_item_row);
    if skip > 0 {
        lines.drain(first_item_row..first_item_row + skip);
    }
}

fn render_item_header(item: &Item, selected: bool, lines: &mut Vec<Line<'static>>) {
    let marker = if selected {
        Span::styled("▶ ", style::marker())
    } else {
        Span::raw("  ")
    };
    lines.push(Line::from(vec![
        marker,
        Span::styled(format!("[{}]", item.index + 1), style::item_number(selected)),
        Span::raw(" "),
        Span::styled(item.title(), style::item_name(selected)),
    ]));
    if let Some(description) = &item.example.description {
        lines.push(Line::styled(
            format!("    {description}"),
            style::item_description(selected),
        ));
    }
    lines.push(Line::default());
}

fn render_focused(model: &Model, item: &Item, collection_id: &Path, lines: &mut Vec<Line<'static>>) {
    lines.push(header(model, collection_id, true));
    lines.push(Line::default());
    lines.push(Line::styled(format!("  {}", item.title()), style::item_name(true)));
    if let Some(description) = &item.example.description {
        lines.push(Line::styled(
            format!("    {description}"),
            style::item_description(true),
        ));
    }
    lines.push(Line::default());
    lines.extend(output_text(&item.example.output).lines);
    lines.push(Line::default());
}

/// Example output as styled text; ANSI escapes become ratatui styles.
fn output_text(output: &ExampleOutput) -> Text<'static> {
    match output {
        ExampleOutput::Failed(_) => Text::styled(output.display_text(), style::render_error()),
        ExampleOutput::Text(_) | ExampleOutput::Empty => {
            let raw = output.display_text();
            raw.into_text().unwrap_or_else(|_| Text::from(raw))
        }
    }
}

fn separator(width: u16) -> Line<'static> {
    Line::styled("─".repeat(usize::from(width.max(1))), style::muted())
}

fn footer(model: &Model, hint: &str) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(hint.to_string(), style::muted())];
    if let Some(notice) = &model.notice {
        lines.push(Line::styled(
            notice.message.clone(),
            style::notice(notice.level),
        ));
    }
    if let Some(input) = &model.command_input {
        lines.push(Line::styled(format!("/{input}"), style::prompt()));
    }
    lines
}
