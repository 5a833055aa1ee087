//! Shared UI theme: per-card colors plus scrollbar constants.

use dashtop_engine::prefs::ThemeChoice;
use ratatui::style::Color;

// Scrollbar colors (same look in both themes)
pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(170, 170, 180);
pub const SB_THUMB: Color = Color::Rgb(170, 170, 180);

pub struct Theme {
    pub cpu: Color,
    pub ram: Color,
    pub gpu: Color,
    pub temp: Color,
    pub text: Color,
}

impl Theme {
    pub fn new(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Self {
                cpu: Color::Cyan,
                ram: Color::Magenta,
                gpu: Color::Green,
                temp: Color::LightRed,
                text: Color::Gray,
            },
            ThemeChoice::Light => Self {
                cpu: Color::Blue,
                ram: Color::Rgb(150, 40, 150),
                gpu: Color::Rgb(20, 110, 20),
                temp: Color::Red,
                text: Color::DarkGray,
            },
        }
    }
}

/// Load-tier coloring shared by the cards and the process table.
pub fn load_color(pct: f64) -> Color {
    match pct {
        x if x < 25.0 => Color::Green,
        x if x < 60.0 => Color::Yellow,
        _ => Color::Red,
    }
}
