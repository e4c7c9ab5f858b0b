//! Color palette and style constants for the watching-list TUI.

use ratatui::style::{Color, Modifier, Style};

pub const C_TITLE: Color = Color::Indexed(141);
pub const C_WATCHED: Color = Color::Indexed(45);
pub const C_TOTAL: Color = Color::Indexed(39);
pub const C_STATUS_BG: Color = Color::Rgb(52, 52, 51);
pub const C_MUTED: Color = Color::Rgb(115, 115, 138);

pub fn style_title() -> Style {
    Style::default().fg(C_TITLE)
}

pub fn style_watched() -> Style {
    Style::default().fg(C_WATCHED)
}

pub fn style_total() -> Style {
    Style::default().fg(C_TOTAL)
}

pub fn style_status_label() -> Style {
    Style::default().bg(C_STATUS_BG).add_modifier(Modifier::BOLD)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}
