//! Erase, insert and delete handlers.
//!
//! Handles CSI sequences:
//! - J: Erase in display (0 below, 1 above, 2/3 all)
//! - K: Erase in line (0 right, 1 left, 2 all)
//! - X: Erase characters
//! - @/P: Insert/delete characters
//! - L/M: Insert/delete lines

use crate::terminal::screen::Grid;
use crate::terminal::types::Cell;

impl Grid {
    pub(in crate::terminal) fn erase_in_display(&mut self, mode: u16) {
        match mode {
            0 => {
                self.erase_in_line(0);
                for row in self.row + 1..self.rows {
                    self.lines[row] = self.blank_line();
                }
            }
            1 => {
                self.erase_in_line(1);
                for row in 0..self.row {
                    self.lines[row] = self.blank_line();
                }
            }
            2 | 3 => {
                for row in 0..self.rows {
                    self.lines[row] = self.blank_line();
                }
            }
            _ => {}
        }
    }

    pub(in crate::terminal) fn erase_in_line(&mut self, mode: u16) {
        let col = self.clamped_col();
        let range = match mode {
            0 => col..self.cols,
            1 => 0..col + 1,
            2 => 0..self.cols,
            _ => return,
        };
        let blank = Cell::blank(self.pen);
        self.lines[self.row][range].fill(blank);
    }

    pub(in crate::terminal) fn erase_chars(&mut self, n: usize) {
        let col = self.clamped_col();
        let end = (col + n).min(self.cols);
        let blank = Cell::blank(self.pen);
        self.lines[self.row][col..end].fill(blank);
    }

    pub(in crate::terminal) fn insert_chars(&mut self, n: usize) {
        let col = self.clamped_col();
        let n = n.min(self.cols - col);
        let blank = Cell::blank(self.pen);
        let line = &mut self.lines[self.row];
        line[col..].rotate_right(n);
        line[col..col + n].fill(blank);
    }

    pub(in crate::terminal) fn delete_chars(&mut self, n: usize) {
        let col = self.clamped_col();
        let n = n.min(self.cols - col);
        let blank = Cell::blank(self.pen);
        let cols = self.cols;
        let line = &mut self.lines[self.row];
        line[col..].rotate_left(n);
        line[cols - n..].fill(blank);
    }

    pub(in crate::terminal) fn insert_lines(&mut self, n: usize) {
        let n = n.min(self.rows - self.row);
        let blank = self.blank_line();
        let row = self.row;
        self.lines[row..].rotate_right(n);
        for line in &mut self.lines[row..row + n] {
            line.clone_from(&blank);
        }
        self.col = 0;
    }

    pub(in crate::terminal) fn delete_lines(&mut self, n: usize) {
        let n = n.min(self.rows - self.row);
        let blank = self.blank_line();
        let (row, rows) = (self.row, self.rows);
        self.lines[row..].rotate_left(n);
        for line in &mut self.lines[rows - n..] {
            line.clone_from(&blank);
        }
        self.col = 0;
    }
}
