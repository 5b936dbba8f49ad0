//! Screen model: a VT100-subset emulator fed through `vte`.
//!
//! The screen mirrors what a terminal sink displays so the player can
//! reconstruct the cumulative state at any point of a recording.

use unicode_width::UnicodeWidthChar;
use vte::{Params, Parser, Perform};

use super::render::{self, ScreenSnapshot};
use super::types::{Cell, Pen};

/// Cursor state saved by DECSC / CSI s.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct SavedCursor {
    pub row: usize,
    pub col: usize,
    pub pen: Pen,
}

/// Primary screen contents stashed while the alternate screen is active.
#[derive(Debug, Clone)]
pub(super) struct Stash {
    pub lines: Vec<Vec<Cell>>,
    pub row: usize,
    pub col: usize,
}

/// Terminal state mutated by the escape sequence handlers.
#[derive(Debug, Clone)]
pub(super) struct Grid {
    pub cols: usize,
    pub rows: usize,
    pub lines: Vec<Vec<Cell>>,
    pub row: usize,
    /// May equal `cols` after printing in the last column (pending wrap)
    pub col: usize,
    pub pen: Pen,
    pub saved: Option<SavedCursor>,
    pub cursor_visible: bool,
    pub alternate: Option<Stash>,
}

impl Grid {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            lines: vec![vec![Cell::default(); cols]; rows],
            row: 0,
            col: 0,
            pen: Pen::default(),
            saved: None,
            cursor_visible: true,
            alternate: None,
        }
    }

    pub fn blank_line(&self) -> Vec<Cell> {
        vec![Cell::blank(self.pen); self.cols]
    }

    /// Column clamped into the screen (resolves a pending wrap).
    pub fn clamped_col(&self) -> usize {
        self.col.min(self.cols - 1)
    }

    pub fn linefeed(&mut self) {
        if self.row + 1 >= self.rows {
            self.scroll_up(1);
        } else {
            self.row += 1;
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) {
        if self.row >= rows {
            let excess = self.row + 1 - rows;
            self.lines.drain(..excess.min(self.lines.len()));
            self.row -= excess;
        }
        for line in &mut self.lines {
            line.resize(cols, Cell::default());
        }
        self.lines.resize(rows, vec![Cell::default(); cols]);
        self.cols = cols;
        self.rows = rows;
        self.col = self.col.min(cols);
        self.alternate = None;
    }
}

impl Perform for Grid {
    fn print(&mut self, c: char) {
        let width = match c.width() {
            Some(0) | None => return,
            Some(w) => w.min(2).min(self.cols),
        };

        if self.col + width > self.cols {
            self.col = 0;
            self.linefeed();
        }

        let (row, col) = (self.row, self.col);
        self.lines[row][col] = Cell {
            ch: c,
            pen: self.pen,
            width: width as u8,
        };
        if width == 2 {
            self.lines[row][col + 1] = Cell {
                ch: ' ',
                pen: self.pen,
                width: 0,
            };
        }
        self.col += width;
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            // BS
            0x08 => self.col = self.clamped_col().saturating_sub(1),
            // HT
            0x09 => {
                let next = (self.clamped_col() / 8 + 1) * 8;
                self.col = next.min(self.cols - 1);
            }
            // LF, VT, FF
            0x0a..=0x0c => self.linefeed(),
            // CR
            0x0d => self.col = 0,
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore {
            return;
        }

        let args: Vec<u16> = params
            .iter()
            .map(|p| p.first().copied().unwrap_or(0))
            .collect();
        let private = intermediates.first() == Some(&b'?');

        match (private, action) {
            (false, 'A' | 'B' | 'C' | 'D' | 'E' | 'F' | 'G' | '`' | 'H' | 'f' | 'd') => {
                self.move_cursor(action, &args)
            }
            (false, 'J') => self.erase_in_display(arg(&args, 0, 0)),
            (false, 'K') => self.erase_in_line(arg(&args, 0, 0)),
            (false, 'X') => self.erase_chars(count(&args)),
            (false, '@') => self.insert_chars(count(&args)),
            (false, 'P') => self.delete_chars(count(&args)),
            (false, 'L') => self.insert_lines(count(&args)),
            (false, 'M') => self.delete_lines(count(&args)),
            (false, 'S') => self.scroll_up(count(&args)),
            (false, 'T') => self.scroll_down(count(&args)),
            (false, 'm') => self.select_graphic_rendition(params),
            (false, 's') => self.save_cursor(),
            (false, 'u') => self.restore_cursor(),
            (true, 'h') => self.set_private_modes(&args, true),
            (true, 'l') => self.set_private_modes(&args, false),
            _ => tracing::trace!(%action, ?args, "unhandled CSI sequence"),
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        if !intermediates.is_empty() {
            // Charset designations and friends
            return;
        }

        match byte {
            b'7' => self.save_cursor(),
            b'8' => self.restore_cursor(),
            b'D' => self.linefeed(),
            b'E' => {
                self.col = 0;
                self.linefeed();
            }
            b'M' => self.reverse_index(),
            b'c' => *self = Grid::new(self.cols, self.rows),
            _ => tracing::trace!(byte, "unhandled ESC sequence"),
        }
    }
}

/// Parameter at `index`, or `default` when absent.
pub(super) fn arg(args: &[u16], index: usize, default: u16) -> u16 {
    args.get(index).copied().unwrap_or(default)
}

/// First parameter as a repeat count (0 and absent mean 1).
pub(super) fn count(args: &[u16]) -> usize {
    arg(args, 0, 1).max(1) as usize
}

/// A virtual terminal screen.
///
/// ```
/// use termreplay::terminal::Screen;
///
/// let mut screen = Screen::new(20, 3);
/// screen.feed(b"hello\r\n\x1b[1mworld");
/// assert_eq!(screen.text(), "hello\nworld");
/// assert_eq!(screen.cursor(), (1, 5));
/// ```
pub struct Screen {
    parser: Parser,
    grid: Grid,
}

impl Screen {
    /// Create a blank screen. Zero dimensions are bumped to 1.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            parser: Parser::new(),
            grid: Grid::new(cols.max(1) as usize, rows.max(1) as usize),
        }
    }

    /// Feed terminal output through the emulator.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.parser.advance(&mut self.grid, bytes);
    }

    /// Change dimensions, keeping content anchored at the top left.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.grid.resize(cols.max(1) as usize, rows.max(1) as usize);
    }

    /// Clear everything and resize.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        *self = Screen::new(cols, rows);
    }

    pub fn size(&self) -> (u16, u16) {
        (self.grid.cols as u16, self.grid.rows as u16)
    }

    /// Cursor position as (row, col), both 0-based.
    pub fn cursor(&self) -> (usize, usize) {
        (self.grid.row, self.grid.clamped_col())
    }

    pub fn cursor_visible(&self) -> bool {
        self.grid.cursor_visible
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.lines.get(row)?.get(col)
    }

    /// Attributes applied to the next printed character.
    pub fn pen(&self) -> Pen {
        self.grid.pen
    }

    pub fn in_alternate_screen(&self) -> bool {
        self.grid.alternate.is_some()
    }

    /// Position and pen stored by the last cursor save, if any.
    pub fn saved_cursor(&self) -> Option<(usize, usize, Pen)> {
        self.grid.saved.map(|saved| (saved.row, saved.col, saved.pen))
    }

    /// Plain text of one row with trailing blanks removed.
    pub fn line_text(&self, row: usize) -> String {
        self.grid
            .lines
            .get(row)
            .map(|line| {
                line.iter()
                    .filter(|cell| cell.width > 0)
                    .map(|cell| cell.ch)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .unwrap_or_default()
    }

    /// Plain text of the whole screen, without trailing empty rows.
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = (0..self.grid.rows).map(|r| self.line_text(r)).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    /// Clear-and-redraw sequence reproducing the current screen.
    pub fn snapshot(&self) -> ScreenSnapshot {
        render::snapshot(&self.grid)
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("size", &self.size())
            .field("cursor", &self.cursor())
            .finish()
    }
}
