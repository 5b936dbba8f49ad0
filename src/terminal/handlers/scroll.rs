//! Scroll handlers.
//!
//! Handles CSI sequences:
//! - S: Scroll up
//! - T: Scroll down
//!
//! Scroll regions (DECSTBM) are not tracked; scrolling always covers the
//! whole screen.

use crate::terminal::screen::Grid;

impl Grid {
    pub(in crate::terminal) fn scroll_up(&mut self, n: usize) {
        let n = n.min(self.rows);
        self.lines.drain(..n);
        let blank = self.blank_line();
        self.lines.extend(std::iter::repeat(blank).take(n));
    }

    pub(in crate::terminal) fn scroll_down(&mut self, n: usize) {
        let n = n.min(self.rows);
        self.lines.truncate(self.rows - n);
        let blank = self.blank_line();
        self.lines.splice(0..0, std::iter::repeat(blank).take(n));
    }
}
