// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The in-progress command line and the cursor inside it.
///
/// The cursor is a grapheme cluster index, not a byte or `char` offset, and always
/// satisfies `0 <= cursor <= len()`. Moves and deletes step over whole clusters, so a
/// base letter and its combining marks travel together. The text never contains a line
/// break; those are routed to [`crate::KeyAction::Enter`] before they get here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    line: String,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self { Self::default() }

    pub fn as_str(&self) -> &str { &self.line }

    pub fn cursor(&self) -> usize { self.cursor }

    /// Length in grapheme clusters.
    pub fn len(&self) -> usize { self.line.graphemes(true).count() }

    pub fn is_empty(&self) -> bool { self.line.is_empty() }

    /// Text before the cursor.
    pub fn head(&self) -> &str { &self.line[..self.byte_offset(self.cursor)] }

    /// Text from the cursor to the end of the line.
    pub fn tail(&self) -> &str { &self.line[self.byte_offset(self.cursor)..] }

    /// Display columns between the start of the line and the cursor.
    pub fn cursor_column(&self) -> usize { self.head().width() }

    fn byte_offset(&self, grapheme_index: usize) -> usize {
        self.line
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.line.len(), |(offset, _)| offset)
    }

    /// Index of the first cluster boundary at or after `byte`.
    fn cursor_at_byte(&self, byte: usize) -> usize {
        self.line
            .grapheme_indices(true)
            .take_while(|(start, _)| *start < byte)
            .count()
    }

    /// Splice `ch` in at the cursor and step past the cluster it ends up in. A
    /// combining mark joins the cluster before the cursor.
    ///
    /// Returns `false` and leaves the line alone for control characters and for
    /// anything that would form a cluster with no display width, since such a
    /// cluster could never be stepped over or erased visibly.
    pub fn insert(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let offset = self.byte_offset(self.cursor);
        let insert_end = offset + ch.len_utf8();
        let mut line = self.line.clone();
        line.insert(offset, ch);

        let cluster_width = line
            .grapheme_indices(true)
            .take_while(|(start, _)| *start < insert_end)
            .last()
            .map_or(0, |(_, cluster)| cluster.width());
        if cluster_width == 0 {
            return false;
        }

        self.line = line;
        self.cursor = self.cursor_at_byte(insert_end);
        true
    }

    /// Remove the cluster before the cursor and return it. At the start of the line
    /// nothing changes and `None` is returned.
    pub fn delete_before(&mut self) -> Option<String> {
        let index = self.cursor.checked_sub(1)?;
        let range = self
            .line
            .grapheme_indices(true)
            .nth(index)
            .map(|(start, cluster)| start..start + cluster.len())?;
        let start = range.start;
        let removed = self.line.drain(range).collect();
        self.cursor = self.cursor_at_byte(start);
        Some(removed)
    }

    /// Step left over one cluster and return it, or `None` at the start.
    pub fn move_left(&mut self) -> Option<&str> {
        let index = self.cursor.checked_sub(1)?;
        self.cursor = index;
        self.line.graphemes(true).nth(index)
    }

    /// Step right over one cluster and return it, or `None` at the end.
    pub fn move_right(&mut self) -> Option<&str> {
        let crossed = self.line.graphemes(true).nth(self.cursor)?;
        self.cursor += 1;
        Some(crossed)
    }

    /// Hand back the whole line and reset to empty with the cursor at zero.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.line)
    }

    pub fn clear(&mut self) {
        self.line.clear();
        self.cursor = 0;
    }
}

impl Display for LineBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.line) }
}
