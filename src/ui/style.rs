//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette. Example
//! output keeps its own colors; these styles only cover the chrome around it.

use ratatui::style::{Color, Modifier, Style};

use crate::app::NoticeLevel;

pub fn title() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

/// Secondary text: hints, indicators, separators.
pub fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn marker() -> Style {
    Style::default().fg(Color::Blue)
}

pub fn collection_name(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn item_number(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        muted()
    }
}

pub fn item_name(selected: bool) -> Style {
    let style = Style::default().fg(Color::Yellow);
    if selected {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn item_description(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::White)
    } else {
        muted()
    }
}

pub fn focused_badge() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn watching_badge() -> Style {
    Style::default().fg(Color::Green)
}

pub fn empty_list() -> Style {
    Style::default().fg(Color::Yellow)
}

pub fn render_error() -> Style {
    Style::default().fg(Color::Red)
}

pub fn notice(level: NoticeLevel) -> Style {
    match level {
        NoticeLevel::Info => Style::default().fg(Color::Cyan),
        NoticeLevel::Warning => Style::default().fg(Color::Yellow),
        NoticeLevel::Error => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

pub fn prompt() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}
