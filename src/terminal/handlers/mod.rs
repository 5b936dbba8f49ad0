//! Terminal escape sequence handlers.
//!
//! Organized by category:
//! - cursor: Cursor movement, positioning and save/restore
//! - editing: Erase, insert and delete operations
//! - modes: DEC private modes (cursor visibility, alternate screen)
//! - scroll: Scrolling the whole screen
//! - style: SGR (Select Graphic Rendition) handling

mod cursor;
mod editing;
mod modes;
mod scroll;
mod style;
