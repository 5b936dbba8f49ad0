//! Cursor movement handlers.
//!
//! Handles CSI sequences:
//! - A/B/C/D: Cursor up/down/forward/back
//! - E/F: Cursor next/previous line
//! - G/`: Cursor horizontal absolute
//! - H/f: Cursor position
//! - d: Cursor vertical absolute
//! - s/u: Save/restore cursor
//!
//! And ESC sequences:
//! - ESC 7 / ESC 8: DEC save/restore cursor
//! - ESC M: Reverse index

use crate::terminal::screen::{arg, count, Grid, SavedCursor};

impl Grid {
    pub(in crate::terminal) fn move_cursor(&mut self, action: char, args: &[u16]) {
        let n = count(args);
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;

        match action {
            'A' => self.row = self.row.saturating_sub(n),
            'B' => self.row = (self.row + n).min(last_row),
            'C' => self.col = (self.clamped_col() + n).min(last_col),
            'D' => self.col = self.clamped_col().saturating_sub(n),
            'E' => {
                self.row = (self.row + n).min(last_row);
                self.col = 0;
            }
            'F' => {
                self.row = self.row.saturating_sub(n);
                self.col = 0;
            }
            'G' | '`' => self.col = (n - 1).min(last_col),
            'd' => self.row = (n - 1).min(last_row),
            'H' | 'f' => {
                let row = arg(args, 0, 1).max(1) as usize;
                let col = arg(args, 1, 1).max(1) as usize;
                self.row = (row - 1).min(last_row);
                self.col = (col - 1).min(last_col);
            }
            _ => {}
        }
    }

    pub(in crate::terminal) fn save_cursor(&mut self) {
        self.saved = Some(SavedCursor {
            row: self.row,
            col: self.col,
            pen: self.pen,
        });
    }

    pub(in crate::terminal) fn restore_cursor(&mut self) {
        let saved = self.saved.unwrap_or_default();
        self.row = saved.row.min(self.rows - 1);
        self.col = saved.col.min(self.cols);
        self.pen = saved.pen;
    }

    pub(in crate::terminal) fn reverse_index(&mut self) {
        if self.row == 0 {
            self.scroll_down(1);
        } else {
            self.row -= 1;
        }
    }
}
