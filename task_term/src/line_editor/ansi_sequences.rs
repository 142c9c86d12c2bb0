// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The small set of control sequences the echo path emits. Everything here is
//! understood by any VT100 compatible surface.

use std::borrow::Cow;

/// Cursor back one column (CUB 1).
pub const CURSOR_LEFT: &str = "\x1b[D";

/// Cursor forward one column (CUF 1).
pub const CURSOR_RIGHT: &str = "\x1b[C";

/// Step back, overwrite with a space, step back again.
pub const BACKSPACE_ERASE: &str = "\x08 \x08";

/// Carriage return, then erase the entire line (EL 2).
pub const ERASE_LINE: &str = "\r\x1b[2K";

pub const BACKSPACE: char = '\x08';

pub fn cursor_left(columns: usize) -> Cow<'static, str> {
    match columns {
        0 => Cow::Borrowed(""),
        1 => Cow::Borrowed(CURSOR_LEFT),
        n => Cow::Owned(format!("\x1b[{n}D")),
    }
}

pub fn cursor_right(columns: usize) -> Cow<'static, str> {
    match columns {
        0 => Cow::Borrowed(""),
        1 => Cow::Borrowed(CURSOR_RIGHT),
        n => Cow::Owned(format!("\x1b[{n}C")),
    }
}
