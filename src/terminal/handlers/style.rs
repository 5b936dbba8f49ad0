//! SGR (Select Graphic Rendition) handler.
//!
//! Handles CSI m sequence for text styling:
//! - Reset (0)
//! - Bold, dim, italic, underline, reverse (1-7) and their resets (21-27)
//! - Standard foreground/background colors (30-47)
//! - Extended colors - 256-color mode (38;5;n, 48;5;n and colon forms)
//! - Extended colors - RGB mode (38;2;r;g;b, 48;2;r;g;b and colon forms)
//! - Bright foreground/background colors (90-107)

use vte::Params;

use crate::terminal::screen::Grid;
use crate::terminal::types::{Color, Pen};

impl Grid {
    pub(in crate::terminal) fn select_graphic_rendition(&mut self, params: &Params) {
        let groups: Vec<&[u16]> = params.iter().collect();
        if groups.is_empty() {
            self.pen = Pen::default();
            return;
        }

        let mut i = 0;
        while i < groups.len() {
            let group = groups[i];
            let code = group.first().copied().unwrap_or(0);

            match code {
                0 => self.pen = Pen::default(),
                1 => self.pen.bold = true,
                2 => self.pen.dim = true,
                3 => self.pen.italic = true,
                4 => self.pen.underline = true,
                7 => self.pen.inverse = true,
                21 | 22 => {
                    self.pen.bold = false;
                    self.pen.dim = false;
                }
                23 => self.pen.italic = false,
                24 => self.pen.underline = false,
                27 => self.pen.inverse = false,
                30..=37 => self.pen.fg = Color::Indexed((code - 30) as u8),
                39 => self.pen.fg = Color::Default,
                40..=47 => self.pen.bg = Color::Indexed((code - 40) as u8),
                49 => self.pen.bg = Color::Default,
                90..=97 => self.pen.fg = Color::Indexed((code - 90 + 8) as u8),
                100..=107 => self.pen.bg = Color::Indexed((code - 100 + 8) as u8),
                38 | 48 => {
                    let color = if group.len() > 1 {
                        // Colon form: everything lives in this group
                        extended_color(&group[1..], true).0
                    } else {
                        let rest: Vec<u16> = groups[i + 1..]
                            .iter()
                            .map(|g| g.first().copied().unwrap_or(0))
                            .collect();
                        let (color, consumed) = extended_color(&rest, false);
                        i += consumed;
                        color
                    };

                    if let Some(color) = color {
                        if code == 38 {
                            self.pen.fg = color;
                        } else {
                            self.pen.bg = color;
                        }
                    }
                }
                _ => tracing::trace!(code, "unhandled SGR parameter"),
            }
            i += 1;
        }
    }
}

/// Parse the arguments following 38/48.
///
/// Returns the color (if valid) and how many arguments were consumed.
fn extended_color(args: &[u16], colon_form: bool) -> (Option<Color>, usize) {
    let channel = |v: u16| v.min(255) as u8;

    match args.first() {
        Some(5) => match args.get(1) {
            Some(&n) => (Some(Color::Indexed(channel(n))), 2),
            None => (None, 1),
        },
        Some(2) => {
            // 38:2:<colorspace>:r:g:b carries an extra (usually empty) slot
            let rgb = if colon_form && args.len() >= 5 {
                &args[2..5]
            } else if args.len() >= 4 {
                &args[1..4]
            } else {
                return (None, args.len());
            };
            (
                Some(Color::Rgb(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))),
                4,
            )
        }
        Some(_) => (None, 1),
        None => (None, 0),
    }
}
