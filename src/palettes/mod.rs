//! Built-in palette definitions.
//!
//! Provides the fixed palettes the editor offers plus the dynamic `full`
//! palette, which mirrors the recently used colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Maximum length of the recent-colors list.
pub const RECENT_COLORS_CAPACITY: usize = 16;

/// Which palette the editor shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    /// Recently used colors.
    #[default]
    Full,
    Gameboy,
    Nes,
    Custom,
}

/// List of all available palette names.
const MODE_NAMES: &[&str] = &["full", "gameboy", "nes", "custom"];

/// Returns a list of all available palette names.
pub fn list_modes() -> Vec<&'static str> {
    MODE_NAMES.to_vec()
}

impl PaletteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteMode::Full => "full",
            PaletteMode::Gameboy => "gameboy",
            PaletteMode::Nes => "nes",
            PaletteMode::Custom => "custom",
        }
    }

    /// The fixed color table for this mode; empty for `full`.
    pub fn table(&self) -> &'static [[u8; 3]] {
        match self {
            PaletteMode::Full => &[],
            PaletteMode::Gameboy => GAMEBOY,
            PaletteMode::Nes => NES,
            PaletteMode::Custom => CUSTOM,
        }
    }

    /// Colors offered by this mode. `recent` is used for `full`.
    pub fn colors(&self, recent: &RecentColors) -> Vec<Color> {
        match self {
            PaletteMode::Full => recent.as_slice().to_vec(),
            _ => self.table().iter().map(|&[r, g, b]| Color::rgb(r, g, b)).collect(),
        }
    }
}

impl fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(PaletteMode::Full),
            "gameboy" => Ok(PaletteMode::Gameboy),
            "nes" => Ok(PaletteMode::Nes),
            "custom" => Ok(PaletteMode::Custom),
            _ => Err(format!("unknown palette '{}' (expected one of: {})", s, MODE_NAMES.join(", "))),
        }
    }
}

/// Game Boy 4-color green palette, darkest to lightest.
/// Reference: https://lospec.com/palette-list/nintendo-gameboy-bgb
const GAMEBOY: &[[u8; 3]] = &[[0x0F, 0x38, 0x0F], [0x30, 0x62, 0x30], [0x8B, 0xAC, 0x0F], [0x9B, 0xBC, 0x0F]];

/// NES-inspired palette with 16 representative colors.
/// Reference: https://lospec.com/palette-list/nintendo-entertainment-system
const NES: &[[u8; 3]] = &[
    [0x00, 0x00, 0x00],
    [0xFC, 0xFC, 0xFC],
    [0x7C, 0x7C, 0x7C],
    [0xBC, 0xBC, 0xBC],
    [0xA8, 0x00, 0x20],
    [0xF8, 0x38, 0x00],
    [0xF8, 0xD8, 0x00],
    [0x00, 0xA8, 0x00],
    [0x00, 0x58, 0xF8],
    [0x00, 0xB8, 0xD8],
    [0x68, 0x44, 0xFC],
    [0xF8, 0x78, 0xF8],
    [0x50, 0x30, 0x00],
    [0xAC, 0x7C, 0x00],
    [0xFC, 0xB8, 0xB8],
    [0x00, 0x40, 0x58],
];

/// PICO-8 16-color palette.
/// Reference: https://lospec.com/palette-list/pico-8
const CUSTOM: &[[u8; 3]] = &[
    [0x00, 0x00, 0x00],
    [0x1D, 0x2B, 0x53],
    [0x7E, 0x25, 0x53],
    [0x00, 0x87, 0x51],
    [0xAB, 0x52, 0x36],
    [0x5F, 0x57, 0x4F],
    [0xC2, 0xC3, 0xC7],
    [0xFF, 0xF1, 0xE8],
    [0xFF, 0x00, 0x4D],
    [0xFF, 0xA3, 0x00],
    [0xFF, 0xEC, 0x27],
    [0x00, 0xE4, 0x36],
    [0x29, 0xAD, 0xFF],
    [0x83, 0x76, 0x9C],
    [0xFF, 0x77, 0xA8],
    [0xFF, 0xCC, 0xAA],
];

/// Most-recent-first list of colors used in committed edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentColors(Vec<Color>);

impl RecentColors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a stored list, dropping transparent entries and duplicates.
    pub fn from_colors(colors: Vec<Color>) -> Self {
        let mut kept: Vec<Color> = Vec::with_capacity(RECENT_COLORS_CAPACITY);
        for color in colors {
            if !color.is_transparent() && !kept.contains(&color) {
                kept.push(color);
            }
        }
        kept.truncate(RECENT_COLORS_CAPACITY);
        Self(kept)
    }

    /// Put `color` at the front if it is not already listed.
    ///
    /// Returns true when the list changed. Transparent is never recorded.
    pub fn record(&mut self, color: Color) -> bool {
        if color.is_transparent() || self.0.contains(&color) {
            return false;
        }
        self.0.insert(0, color);
        self.0.truncate(RECENT_COLORS_CAPACITY);
        true
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(PaletteMode::Gameboy.table().len(), 4);
        assert_eq!(PaletteMode::Nes.table().len(), 16);
        assert_eq!(PaletteMode::Custom.table().len(), 16);
        assert!(PaletteMode::Full.table().is_empty());
    }

    #[test]
    fn test_full_mirrors_recent() {
        let mut recent = RecentColors::new();
        recent.record(Color::rgb(1, 2, 3));
        recent.record(Color::rgb(4, 5, 6));
        assert_eq!(
            PaletteMode::Full.colors(&recent),
            vec![Color::rgb(4, 5, 6), Color::rgb(1, 2, 3)]
        );
    }

    #[test]
    fn test_gameboy_colors() {
        let colors = PaletteMode::Gameboy.colors(&RecentColors::new());
        assert_eq!(colors[0], Color::rgb(0x0F, 0x38, 0x0F));
        assert_eq!(colors[3].to_string(), "#9bbc0f");
    }

    #[test]
    fn test_recent_ignores_duplicates_and_transparent() {
        let mut recent = RecentColors::new();
        assert!(recent.record(Color::rgb(1, 1, 1)));
        assert!(!recent.record(Color::rgb(1, 1, 1)));
        assert!(!recent.record(Color::Transparent));
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_recent_capped() {
        let mut recent = RecentColors::new();
        for n in 0..20u8 {
            recent.record(Color::rgb(n, 0, 0));
        }
        assert_eq!(recent.len(), RECENT_COLORS_CAPACITY);
        assert_eq!(recent.as_slice()[0], Color::rgb(19, 0, 0));
        assert_eq!(recent.as_slice()[15], Color::rgb(4, 0, 0));
    }

    #[test]
    fn test_from_colors_keeps_order() {
        let stored = vec![Color::rgb(3, 0, 0), Color::Transparent, Color::rgb(2, 0, 0), Color::rgb(3, 0, 0)];
        let recent = RecentColors::from_colors(stored);
        assert_eq!(recent.as_slice(), &[Color::rgb(3, 0, 0), Color::rgb(2, 0, 0)]);
    }

    #[test]
    fn test_mode_names_parse() {
        for name in list_modes() {
            let mode: PaletteMode = name.parse().unwrap();
            assert_eq!(mode.as_str(), name);
        }
        assert!("pico8".parse::<PaletteMode>().is_err());
    }
}
