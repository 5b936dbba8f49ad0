//! DEC private mode handlers (CSI ? Pm h / CSI ? Pm l).
//!
//! - 25: Cursor visibility
//! - 47, 1047, 1049: Alternate screen buffer (1049 also saves the cursor)

use crate::terminal::screen::{Grid, Stash};

impl Grid {
    pub(in crate::terminal) fn set_private_modes(&mut self, modes: &[u16], enable: bool) {
        for &mode in modes {
            match mode {
                25 => self.cursor_visible = enable,
                47 | 1047 | 1049 => {
                    if enable {
                        if mode == 1049 {
                            self.save_cursor();
                        }
                        self.enter_alternate_screen();
                    } else {
                        self.leave_alternate_screen();
                        if mode == 1049 {
                            self.restore_cursor();
                        }
                    }
                }
                _ => tracing::trace!(mode, enable, "unhandled private mode"),
            }
        }
    }

    fn enter_alternate_screen(&mut self) {
        if self.alternate.is_some() {
            return;
        }
        let blank = vec![self.blank_line(); self.rows];
        let lines = std::mem::replace(&mut self.lines, blank);
        self.alternate = Some(Stash {
            lines,
            row: self.row,
            col: self.col,
        });
    }

    fn leave_alternate_screen(&mut self) {
        if let Some(stash) = self.alternate.take() {
            self.lines = stash.lines;
            self.row = stash.row;
            self.col = stash.col;
        }
    }
}
