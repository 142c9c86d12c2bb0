// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use smallvec::smallvec;
use unicode_width::UnicodeWidthStr;

use crate::{BACKSPACE, DisplaySurface, ERASE_LINE, InlineVec, LineBuffer, cursor_left,
            cursor_right};

/// One chunk of output destined for a [`DisplaySurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Echo {
    Write(String),
    Writeln(String),
}

impl Echo {
    pub fn write(text: impl Into<String>) -> Self { Self::Write(text.into()) }

    pub fn writeln(text: impl Into<String>) -> Self { Self::Writeln(text.into()) }

    pub fn apply(&self, surface: &mut (impl DisplaySurface + ?Sized)) -> io::Result<()> {
        match self {
            Echo::Write(text) => surface.write(text),
            Echo::Writeln(text) => surface.writeln(text),
        }
    }
}

pub type EchoSeq = InlineVec<Echo>;

/// Emit `echoes` in order, stopping at the first failure.
pub fn apply_echoes(
    echoes: &[Echo],
    surface: &mut (impl DisplaySurface + ?Sized),
) -> io::Result<()> {
    for echo in echoes {
        echo.apply(surface)?;
    }
    Ok(())
}

fn backspaces(columns: usize) -> String { BACKSPACE.to_string().repeat(columns) }

/// Maps a buffer edit that already happened to the bytes that reproduce it on screen.
/// Edits that changed nothing produce an empty sequence.
///
/// All sequences assume the visible cursor sits where the buffer cursor was before the
/// edit, and leave it where the buffer cursor is after.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoEncoder;

impl EchoEncoder {
    /// `ch` was inserted and `tail` is everything after the new cursor. The tail is
    /// reprinted and the cursor walked back over it.
    pub fn inserted(ch: char, tail: &str) -> EchoSeq {
        let mut text = String::with_capacity(ch.len_utf8() + tail.len() + 4);
        text.push(ch);
        text.push_str(tail);
        text.push_str(&cursor_left(tail.width()));
        smallvec![Echo::Write(text)]
    }

    /// The cluster `removed` was deleted before the cursor and `tail` is everything
    /// after the new cursor. At end of line this is the classic `"\x08 \x08"`.
    pub fn deleted_before(removed: &str, tail: &str) -> EchoSeq {
        let removed_width = removed.width();
        if removed_width == 0 {
            return smallvec![];
        }
        let blank = " ".repeat(removed_width);
        let text = if tail.is_empty() {
            format!("{back}{blank}{back}", back = backspaces(removed_width))
        } else {
            format!(
                "{back}{tail}{blank}{left}",
                back = backspaces(removed_width),
                left = cursor_left(tail.width() + removed_width)
            )
        };
        smallvec![Echo::Write(text)]
    }

    /// The cursor stepped left over the cluster `crossed`.
    pub fn moved_left(crossed: &str) -> EchoSeq {
        match crossed.width() {
            0 => smallvec![],
            width => smallvec![Echo::Write(cursor_left(width).into_owned())],
        }
    }

    /// The cursor stepped right over the cluster `crossed`.
    pub fn moved_right(crossed: &str) -> EchoSeq {
        match crossed.width() {
            0 => smallvec![],
            width => smallvec![Echo::Write(cursor_right(width).into_owned())],
        }
    }

    /// A line was submitted: break to a fresh line and print the prompt.
    pub fn command_executed(prompt: &str) -> EchoSeq {
        smallvec![Echo::Writeln(String::new()), Echo::Write(prompt.to_string())]
    }

    /// Repaint the current row from scratch as prompt plus buffer, then put the cursor
    /// back where the buffer says it is.
    pub fn redraw_line(prompt: &str, buffer: &LineBuffer) -> EchoSeq {
        let text = format!(
            "{ERASE_LINE}{prompt}{line}{left}",
            line = buffer.as_str(),
            left = cursor_left(buffer.tail().width())
        );
        smallvec![Echo::Write(text)]
    }

    pub fn erase_line() -> EchoSeq { smallvec![Echo::Write(ERASE_LINE.to_string())] }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use smallvec::SmallVec;

    use super::*;
    use crate::{MountTarget, SurfaceCall, SurfaceFactory, SurfaceMockFactory};

    fn texts(seq: EchoSeq) -> Vec<Echo> { SmallVec::into_vec(seq) }

    #[test]
    fn test_insert_at_end_is_just_the_char() {
        assert_eq!(texts(EchoEncoder::inserted('a', "")), vec![Echo::write("a")]);
    }

    #[test]
    fn test_insert_mid_line_reprints_tail() {
        assert_eq!(
            texts(EchoEncoder::inserted('x', "yz")),
            vec![Echo::write("xyz\x1b[2D")]
        );
    }

    #[test]
    fn test_delete_at_end_is_backspace_space_backspace() {
        assert_eq!(
            texts(EchoEncoder::deleted_before("a", "")),
            vec![Echo::write("\x08 \x08")]
        );
    }

    #[test]
    fn test_delete_mid_line_shifts_tail() {
        assert_eq!(
            texts(EchoEncoder::deleted_before("a", "b")),
            vec![Echo::write("\x08b \x1b[2D")]
        );
    }

    #[test]
    fn test_wide_char_moves_two_columns() {
        assert_eq!(
            texts(EchoEncoder::moved_left("日")),
            vec![Echo::write("\x1b[2D")]
        );
        assert_eq!(texts(EchoEncoder::moved_right("a")), vec![Echo::write("\x1b[C")]);
    }

    #[test]
    fn test_combining_cluster_counts_as_one_column() {
        assert_eq!(
            texts(EchoEncoder::moved_left("e\u{301}")),
            vec![Echo::write("\x1b[D")]
        );
        assert_eq!(
            texts(EchoEncoder::deleted_before("e\u{301}", "")),
            vec![Echo::write("\x08 \x08")]
        );
    }

    #[test]
    fn test_command_executed() {
        assert_eq!(
            texts(EchoEncoder::command_executed("t1:~$ ")),
            vec![Echo::writeln(""), Echo::write("t1:~$ ")]
        );
    }

    #[test]
    fn test_redraw_line_restores_cursor() {
        let mut buffer = LineBuffer::new();
        "abc".chars().for_each(|ch| {
            buffer.insert(ch);
        });
        buffer.move_left();
        assert_eq!(
            texts(EchoEncoder::redraw_line("$ ", &buffer)),
            vec![Echo::write("\r\x1b[2K$ abc\x1b[D")]
        );
    }

    #[test]
    fn test_apply_echoes_in_order() {
        let mut factory = SurfaceMockFactory::default();
        let target = MountTarget::new("panel");
        let mut surface = factory.create(&target).unwrap();
        surface.open(&target).unwrap();
        apply_echoes(&EchoEncoder::command_executed("> "), &mut surface).unwrap();
        assert_eq!(
            factory.log.calls()[2..].to_vec(),
            vec![SurfaceCall::Writeln(String::new()), SurfaceCall::Write("> ".into())]
        );
    }
}
