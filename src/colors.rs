use crossterm::event::KeyCode;
use crossterm::style::Color;

/// Shared color scheme state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorState {
    pub scheme: u8,
}

impl ColorState {
    pub fn new(default_scheme: u8) -> Self {
        Self { scheme: default_scheme.min(9) }
    }

    /// Handle color scheme key input. Returns true if key was handled.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('!') => self.scheme = 1,  // Shift+1: fire
            KeyCode::Char('@') => self.scheme = 2,  // Shift+2: ice
            KeyCode::Char('#') => self.scheme = 3,  // Shift+3: pink
            KeyCode::Char('$') => self.scheme = 4,  // Shift+4: gold
            KeyCode::Char('%') => self.scheme = 5,  // Shift+5: electric
            KeyCode::Char('^') => self.scheme = 6,  // Shift+6: lava
            KeyCode::Char('&') => self.scheme = 7,  // Shift+7: mono
            KeyCode::Char('*') => self.scheme = 8,  // Shift+8: rainbow
            KeyCode::Char('(') => self.scheme = 9,  // Shift+9: neon
            KeyCode::Char(')') => self.scheme = 0,  // Shift+0: green/matrix
            _ => return false,
        }
        true
    }

    /// Foreground for a glyph, or None for blank cells.
    pub fn tint(&self, ch: char) -> Option<(Color, bool)> {
        glyph_intensity(ch).map(|i| scheme_color(self.scheme, i, true))
    }
}

/// Visual weight of a glyph on the 0-3 intensity scale. Blank cells have none.
pub fn glyph_intensity(ch: char) -> Option<u8> {
    let weight = match ch {
        ' ' => return None,
        '.' | ',' | '\'' | '`' | '·' | '°' | ':' | ';' | '-' | '┆' => 0,
        '~' | '∼' | '=' | '+' | '!' | '|' | '/' | '\\' | '_' | '^' | '*' | '░' => 1,
        '█' | '▓' | '@' | '#' | '%' | '&' | '$' | '≈' | '✦' | '↯' => 3,
        _ => 2,
    };
    Some(weight)
}

/// Get color from scheme based on intensity (0-3)
pub fn scheme_color(scheme: u8, intensity: u8, bold: bool) -> (Color, bool) {
    match scheme {
        1 => match intensity {  // Red/Yellow (fire)
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::DarkYellow, bold),
            _ => (Color::Yellow, true),
        },
        2 => match intensity {  // Blue/Cyan (ice)
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Cyan, bold),
            _ => (Color::Cyan, true),
        },
        3 => match intensity {  // Magenta/Pink (pink)
            0 => (Color::DarkMagenta, false),
            1 => (Color::Magenta, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(13), true),  // Bright magenta
        },
        4 => match intensity {  // Yellow/Gold (gold)
            0 => (Color::DarkYellow, false),
            1 => (Color::Yellow, false),
            2 => (Color::Yellow, bold),
            _ => (Color::AnsiValue(11), true),  // Bright yellow
        },
        5 => match intensity {  // Cyan/Electric (electric)
            0 => (Color::DarkCyan, false),
            1 => (Color::Cyan, false),
            2 => (Color::Cyan, bold),
            _ => (Color::AnsiValue(14), true),  // Bright cyan
        },
        6 => match intensity {  // Red/Magenta (lava)
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(9), true),  // Bright red
        },
        7 => match intensity {  // White/Grey (mono)
            0 => (Color::DarkGrey, false),
            1 => (Color::Grey, false),
            2 => (Color::White, bold),
            _ => (Color::White, true),
        },
        8 => match intensity {  // Rainbow cycling
            0 => (Color::Red, false),
            1 => (Color::Yellow, false),
            2 => (Color::Green, bold),
            _ => (Color::Cyan, true),
        },
        9 => match intensity {  // Blue/Magenta (neon)
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            2 => (Color::Magenta, bold),
            _ => (Color::AnsiValue(13), true),  // Bright magenta
        },
        _ => match intensity {  // Default: Green (matrix)
            0 => (Color::DarkGreen, false),
            1 => (Color::Green, false),
            2 => (Color::Green, true),
            _ => (Color::AnsiValue(10), true),  // Bright green
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_digits_pick_schemes() {
        let mut colors = ColorState::new(0);
        assert!(colors.handle_key(KeyCode::Char('@')));
        assert_eq!(colors.scheme, 2);
        assert!(colors.handle_key(KeyCode::Char(')')));
        assert_eq!(colors.scheme, 0);
        assert!(!colors.handle_key(KeyCode::Char('2')));
        assert_eq!(colors.scheme, 0);
    }

    #[test]
    fn test_blank_cells_are_untinted() {
        let colors = ColorState::new(1);
        assert_eq!(colors.tint(' '), None);
        assert_eq!(glyph_intensity('.'), Some(0));
        assert_eq!(glyph_intensity('█'), Some(3));
        assert_eq!(glyph_intensity('A'), Some(2));
    }
}
