//! ANSI redraw of a screen.
//!
//! Converts the screen grid back into a byte sequence that, written to a
//! terminal, clears it and reproduces the same contents, styles and cursor.
//! The redraw also restores state that affects later output: the active
//! pen, the saved cursor and an active alternate screen with the primary
//! screen kept behind it.

use std::fmt::Write as _;

use super::screen::Grid;
use super::types::{Cell, Pen};

/// Clear-and-redraw of the cumulative terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSnapshot {
    pub cols: u16,
    pub rows: u16,
    /// Bytes that clear a terminal and redraw the screen
    pub redraw: Vec<u8>,
}

/// Full reset, then reset attributes, home the cursor and clear the screen.
const CLEAR: &str = "\x1bc\x1b[0m\x1b[H\x1b[2J";

pub(super) fn snapshot(grid: &Grid) -> ScreenSnapshot {
    let mut out = String::from(CLEAR);

    match &grid.alternate {
        Some(stash) => {
            draw_lines(&mut out, &stash.lines);
            place_cursor(&mut out, &stash.lines, grid.cols, stash.row, stash.col);
            // 47 switches screens without touching the saved cursor
            out.push_str("\x1b[0m\x1b[?47h");
            draw_lines(&mut out, &grid.lines);
        }
        None => draw_lines(&mut out, &grid.lines),
    }

    if let Some(saved) = grid.saved {
        place_cursor(&mut out, &grid.lines, grid.cols, saved.row, saved.col);
        out.push_str(&saved.pen.sgr());
        out.push_str("\x1b7\x1b[0m");
    }

    place_cursor(&mut out, &grid.lines, grid.cols, grid.row, grid.col);
    out.push_str(&grid.pen.sgr());
    out.push_str(if grid.cursor_visible {
        "\x1b[?25h"
    } else {
        "\x1b[?25l"
    });

    ScreenSnapshot {
        cols: grid.cols as u16,
        rows: grid.rows as u16,
        redraw: out.into_bytes(),
    }
}

fn draw_lines(out: &mut String, lines: &[Vec<Cell>]) {
    for (row, line) in lines.iter().enumerate() {
        let end = line
            .iter()
            .rposition(|cell| !cell.is_plain_blank())
            .map_or(0, |i| i + 1);
        if end == 0 {
            continue;
        }

        let _ = write!(out, "\x1b[{};1H", row + 1);
        let mut pen = Pen::default();
        for cell in &line[..end] {
            if cell.width == 0 {
                continue;
            }
            if cell.pen != pen {
                out.push_str(&cell.pen.sgr());
                pen = cell.pen;
            }
            out.push(cell.ch);
        }
        if !pen.is_default() {
            out.push_str("\x1b[0m");
        }
    }
}

/// Move the cursor to (row, col). A column past the last one is a pending
/// wrap, reached by printing the last cell of the row again.
fn place_cursor(out: &mut String, lines: &[Vec<Cell>], cols: usize, row: usize, col: usize) {
    if col < cols {
        let _ = write!(out, "\x1b[{};{}H", row + 1, col + 1);
        return;
    }

    let Some(line) = lines.get(row) else {
        let _ = write!(out, "\x1b[{};{}H", row + 1, cols);
        return;
    };
    let mut start = cols - 1;
    if line[start].width == 0 && start > 0 {
        start -= 1;
    }
    let cell = line[start];
    let _ = write!(out, "\x1b[{};{}H{}{}", row + 1, start + 1, cell.pen.sgr(), cell.ch);
    out.push_str("\x1b[0m");
}
