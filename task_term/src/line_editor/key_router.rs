// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{EchoEncoder, EchoSeq, LineBuffer};

/// What a key event means to the line editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum KeyAction {
    Enter,
    Backspace,
    ArrowLeft,
    ArrowRight,
    PrintableChar(char),
    Ignored,
}

/// Result of applying a [`KeyAction`] to a [`LineBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The key means nothing to the editor.
    Ignored,
    /// A recognised key that had no effect, e.g. backspace at column zero.
    Unchanged,
    /// The buffer changed; emit these to keep the display in step.
    Echo(EchoSeq),
    /// Enter was pressed. The buffer has been taken and reset.
    Submitted(String),
}

/// Keys held with any of these are shortcuts, not text. Shift is fine.
const SHORTCUT_MODIFIERS: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SUPER)
    .union(KeyModifiers::META)
    .union(KeyModifiers::HYPER);

#[derive(Debug, Default, Clone, Copy)]
pub struct KeyRouter;

impl KeyRouter {
    pub fn classify(event: &KeyEvent) -> KeyAction {
        if !matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return KeyAction::Ignored;
        }
        if event.modifiers.intersects(SHORTCUT_MODIFIERS) {
            return KeyAction::Ignored;
        }
        match event.code {
            KeyCode::Enter | KeyCode::Char('\r' | '\n') => KeyAction::Enter,
            KeyCode::Backspace | KeyCode::Char('\x7f' | '\x08') => KeyAction::Backspace,
            KeyCode::Left => KeyAction::ArrowLeft,
            KeyCode::Right => KeyAction::ArrowRight,
            KeyCode::Char(ch) if !ch.is_control() => KeyAction::PrintableChar(ch),
            _ => KeyAction::Ignored,
        }
    }

    /// Anything that isn't a key event is [`KeyAction::Ignored`].
    pub fn classify_event(event: &Event) -> KeyAction {
        match event {
            Event::Key(key_event) => Self::classify(key_event),
            _ => KeyAction::Ignored,
        }
    }

    /// Apply `action` to `buffer` and work out what the display needs.
    pub fn dispatch(action: KeyAction, buffer: &mut LineBuffer) -> Dispatch {
        match action {
            KeyAction::Ignored => Dispatch::Ignored,
            KeyAction::Enter => Dispatch::Submitted(buffer.take()),
            KeyAction::PrintableChar(ch) => {
                if buffer.insert(ch) {
                    Dispatch::Echo(EchoEncoder::inserted(ch, buffer.tail()))
                } else {
                    Dispatch::Unchanged
                }
            }
            KeyAction::Backspace => match buffer.delete_before() {
                Some(removed) => {
                    Dispatch::Echo(EchoEncoder::deleted_before(&removed, buffer.tail()))
                }
                None => Dispatch::Unchanged,
            },
            KeyAction::ArrowLeft => match buffer.move_left() {
                Some(crossed) => Dispatch::Echo(EchoEncoder::moved_left(crossed)),
                None => Dispatch::Unchanged,
            },
            KeyAction::ArrowRight => match buffer.move_right() {
                Some(crossed) => Dispatch::Echo(EchoEncoder::moved_right(crossed)),
                None => Dispatch::Unchanged,
            },
        }
    }
}
