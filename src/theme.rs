//! Colour table and UI colours: btop-style `theme[key]="value"` files and hex → ratatui Color.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Classic web-canvas colours for cell values 1..=7.
const DEFAULT_PIECES: [&str; 7] = [
    "#FFFF00", // yellow
    "#FF0000", // red
    "#DDA0DD", // plum
    "#0000FF", // blue
    "#FFA500", // orange
    "#7CFC00", // lawn green
    "#00FFFF", // cyan
];

const HIGH_CONTRAST_PIECES: [&str; 7] = [
    "#FFFF00", "#FF0000", "#FF00FF", "#0088FF", "#FF8800", "#00FF00", "#00FFFF",
];

/// Tol's bright scheme plus grey; stays distinguishable without red/green.
const COLORBLIND_PIECES: [&str; 7] = [
    "#CCBB44", "#EE6677", "#AA3377", "#4477AA", "#EE7733", "#228833", "#66CCEE",
];

#[derive(Debug, Clone)]
pub struct Theme {
    /// Cell colours for values 1..=7 (index 0 holds value 1).
    pub pieces: [Color; 7],
    /// Playfield background.
    pub bg: Color,
    /// Border.
    pub div_line: Color,
    /// Text (score).
    pub main_fg: Color,
    /// Titles, row-clear flash.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pieces: hex_table(&DEFAULT_PIECES),
            bg: Color::Rgb(0, 0, 0),
            div_line: Color::Rgb(0x3F, 0x44, 0x4F),
            main_fg: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
        }
    }
}

impl Theme {
    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to defaults if path is None or missing; unknown or bad keys keep their default.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => {
                let s = std::fs::read_to_string(p)?;
                Self::from_map(&parse_theme_file(&s))
            }
            _ => Self::default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override piece colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        match palette {
            crate::Palette::Normal => {}
            crate::Palette::HighContrast => self.pieces = hex_table(&HIGH_CONTRAST_PIECES),
            crate::Palette::Colorblind => self.pieces = hex_table(&COLORBLIND_PIECES),
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let mut theme = Self::default();
        for (i, slot) in theme.pieces.iter_mut().enumerate() {
            if let Some(c) = get(&format!("piece{}", i + 1)) {
                *slot = c;
            }
        }
        if let Some(c) = get("main_bg") {
            theme.bg = c;
        }
        if let Some(c) = get("div_line") {
            theme.div_line = c;
        }
        if let Some(c) = get("main_fg") {
            theme.main_fg = c;
        }
        if let Some(c) = get("title") {
            theme.title = c;
        }
        theme
    }

    /// Colour for a cell value; `None` for 0, which is never painted.
    #[inline]
    pub fn cell_color(&self, value: u8) -> Option<Color> {
        match value {
            0 => None,
            v => self.pieces.get(usize::from(v) - 1).copied(),
        }
    }
}

fn hex_table(hex: &[&str; 7]) -> [Color; 7] {
    hex.map(|h| parse_hex(h).unwrap_or(Color::Gray))
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |range: std::ops::Range<usize>| {
        s.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
            .ok_or_else(invalid)
    };
    let (r, g, b) = match s.len() {
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Palette;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#DDA0DD").unwrap();
        assert!(matches!(c, Color::Rgb(0xDD, 0xA0, 0xDD)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(matches!(parse_hex("#12345"), Err(ThemeError::InvalidHex(_))));
        assert!(matches!(parse_hex("#GGGGGG"), Err(ThemeError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[piece3]="#31353F""##);
        assert_eq!(map.get("piece3"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_from_map_overrides_and_keeps_defaults() {
        let map = parse_theme_file(
            "# comment\ntheme[piece1]=\"#010203\"\ntheme[main_bg]='#111'\ntheme[piece2]=\"nope\"\n",
        );
        let theme = Theme::from_map(&map);
        assert_eq!(theme.pieces[0], Color::Rgb(1, 2, 3));
        assert_eq!(theme.bg, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(theme.pieces[1], Theme::default().pieces[1]);
    }

    #[test]
    fn test_cell_color_skips_empty() {
        let theme = Theme::default();
        assert_eq!(theme.cell_color(0), None);
        assert_eq!(theme.cell_color(1), Some(Color::Rgb(255, 255, 0)));
        assert_eq!(theme.cell_color(7), Some(Color::Rgb(0, 255, 255)));
        assert_eq!(theme.cell_color(8), None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let theme = Theme::load(Some(Path::new("/nonexistent/blockdrop.theme")), Palette::Normal)
            .unwrap();
        assert_eq!(theme.pieces, Theme::default().pieces);
    }

    #[test]
    fn test_load_reads_theme_file() {
        let path = std::env::temp_dir().join(format!("blockdrop-theme-{}.theme", std::process::id()));
        std::fs::write(&path, "theme[piece1]=\"#010203\"\ntheme[main_bg]=\"#111\"\n").unwrap();
        let theme = Theme::load(Some(&path), Palette::Normal);
        std::fs::remove_file(&path).unwrap();

        let theme = theme.unwrap();
        assert_eq!(theme.pieces[0], Color::Rgb(1, 2, 3));
        assert_eq!(theme.bg, Color::Rgb(0x11, 0x11, 0x11));
        assert_eq!(theme.pieces[1], Theme::default().pieces[1]);
    }

    #[test]
    fn test_palette_overrides_pieces() {
        let theme = Theme::load(None, Palette::HighContrast).unwrap();
        assert_eq!(theme.pieces[2], Color::Rgb(255, 0, 255));
    }
}
