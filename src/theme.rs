use once_cell::sync::Lazy;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::env;

/// The one persisted user preference: which palette the reader uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn palette(self) -> &'static Base16Palette {
        match self {
            ThemeMode::Dark => &OCEANIC_NEXT,
            ThemeMode::Light => &PAPER_LIGHT,
        }
    }
}

// Base16-style color roles; only the slots the reader draws with.
#[derive(Clone)]
pub struct Base16Palette {
    pub base_00: Color, // Background
    pub base_01: Color, // Header/status background
    pub base_02: Color, // Selection background
    pub base_03: Color, // Dimmed text, unrevealed sections
    pub base_05: Color, // Default foreground
    pub base_07: Color, // Brightest foreground
    pub base_0a: Color, // Search-match highlight
    pub base_0b: Color, // Progress bar, confirmations
    pub base_0d: Color, // Active TOC link, headings
}

pub static OCEANIC_NEXT: Lazy<Base16Palette> = Lazy::new(|| Base16Palette {
    base_00: Color::Reset,
    base_01: smart_color(0x343D46),
    base_02: smart_color(0x4F5B66),
    base_03: smart_color(0x65737E),
    base_05: smart_color(0xC0C5CE),
    base_07: smart_color(0xF0F4F8),
    base_0a: smart_color(0xFAC863),
    base_0b: smart_color(0x99C794),
    base_0d: smart_color(0x6699CC),
});

pub static PAPER_LIGHT: Lazy<Base16Palette> = Lazy::new(|| Base16Palette {
    base_00: Color::Reset,
    base_01: smart_color(0xE8E4DC),
    base_02: smart_color(0xD0CCC4),
    base_03: smart_color(0x8A857C),
    base_05: smart_color(0x3B3833),
    base_07: smart_color(0x1C1A17),
    base_0a: smart_color(0xC18401),
    base_0b: smart_color(0x50A14F),
    base_0d: smart_color(0x4078F2),
});

impl Base16Palette {
    /// (foreground, background) for a search-match span.
    pub fn highlight_colors(&self, is_selected: bool) -> (Color, Color) {
        if is_selected {
            (self.base_00, self.base_0a)
        } else {
            (self.base_0a, self.base_00)
        }
    }
}

/// Detect truecolor support the way terminals advertise it.
fn supports_true_color() -> bool {
    for var in ["COLORTERM", "TERM"] {
        if let Ok(value) = env::var(var) {
            let value = value.to_lowercase();
            if value.contains("truecolor") || value.contains("24bit") {
                return true;
            }
        }
    }
    false
}

/// Nearest 6x6x6-cube index for terminals without truecolor.
fn rgb_to_256color(r: u8, g: u8, b: u8) -> u8 {
    let r_index = (r as u16 * 5 / 255) as u8;
    let g_index = (g as u16 * 5 / 255) as u8;
    let b_index = (b as u16 * 5 / 255) as u8;
    16 + 36 * r_index + 6 * g_index + b_index
}

pub fn smart_color(rgb: u32) -> Color {
    if supports_true_color() {
        Color::from_u32(rgb)
    } else {
        let r = ((rgb >> 16) & 0xFF) as u8;
        let g = ((rgb >> 8) & 0xFF) as u8;
        let b = (rgb & 0xFF) as u8;
        Color::Indexed(rgb_to_256color(r, g, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }

    #[test]
    fn test_rgb_to_256color_cube_corners() {
        assert_eq!(rgb_to_256color(0, 0, 0), 16);
        assert_eq!(rgb_to_256color(255, 0, 0), 196);
        assert_eq!(rgb_to_256color(0, 255, 0), 46);
        assert_eq!(rgb_to_256color(0, 0, 255), 21);
        assert_eq!(rgb_to_256color(255, 255, 255), 231);
    }

    #[test]
    fn test_theme_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ThemeMode::Light).unwrap(), "\"light\"");
        let parsed: ThemeMode = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(parsed, ThemeMode::Dark);
    }
}
