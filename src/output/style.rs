//! Terminal colours for console renderers

use colored::{Color, Colorize};

/// Colours `text` when `enabled`, otherwise returns it unchanged
pub(crate) fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

/// 2xx green, 3xx yellow, anything else (including no response) red
pub(crate) fn status_color(status: Option<u16>) -> Color {
    match status {
        Some(200..=299) => Color::Green,
        Some(300..=399) => Color::Yellow,
        _ => Color::Red,
    }
}
