//! Terminal data types.
//!
//! Contains the core data structures for representing terminal state:
//! - Color: ANSI color codes (16 colors, 256-color palette, RGB)
//! - Pen: Text attributes (bold, italic, underline, etc.)
//! - Cell: A single character with its style

use std::fmt::Write as _;

/// A foreground or background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    /// Palette index: 0-7 standard, 8-15 bright, 16-255 extended
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    /// Append the SGR parameters selecting this color.
    ///
    /// `base` is 30 for foreground and 40 for background.
    fn push_sgr(&self, base: u8, buf: &mut String) {
        match *self {
            Color::Default => {}
            Color::Indexed(n) if n < 8 => {
                let _ = write!(buf, ";{}", base + n);
            }
            Color::Indexed(n) if n < 16 => {
                let _ = write!(buf, ";{}", base + 60 + (n - 8));
            }
            Color::Indexed(n) => {
                let _ = write!(buf, ";{};5;{}", base + 8, n);
            }
            Color::Rgb(r, g, b) => {
                let _ = write!(buf, ";{};2;{};{};{}", base + 8, r, g, b);
            }
        }
    }
}

/// Graphic rendition applied to printed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pen {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub inverse: bool,
}

impl Pen {
    pub fn is_default(&self) -> bool {
        *self == Pen::default()
    }

    /// Absolute SGR sequence (reset followed by every set attribute).
    pub fn sgr(&self) -> String {
        let mut buf = String::from("\x1b[0");
        if self.bold {
            buf.push_str(";1");
        }
        if self.dim {
            buf.push_str(";2");
        }
        if self.italic {
            buf.push_str(";3");
        }
        if self.underline {
            buf.push_str(";4");
        }
        if self.inverse {
            buf.push_str(";7");
        }
        self.fg.push_sgr(30, &mut buf);
        self.bg.push_sgr(40, &mut buf);
        buf.push('m');
        buf
    }

    /// Pen used for erased cells: only the background survives.
    pub fn erased(&self) -> Pen {
        Pen {
            bg: self.bg,
            ..Pen::default()
        }
    }
}

/// One screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub pen: Pen,
    /// Display width; 0 marks the right half of a wide character
    pub width: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            pen: Pen::default(),
            width: 1,
        }
    }
}

impl Cell {
    pub fn blank(pen: Pen) -> Self {
        Self {
            pen: pen.erased(),
            ..Cell::default()
        }
    }

    /// Blank with default rendition; trailing runs of these are not drawn.
    pub fn is_plain_blank(&self) -> bool {
        *self == Cell::default()
    }
}
