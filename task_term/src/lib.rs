// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `task_term` is the line editor behind a task-aware terminal panel. It turns a stream
//! of raw key events into an edited command line, echoes the escape sequences that keep
//! a passive display surface in sync with that line, forwards completed commands, and
//! replays per-task scrollback whenever the active task changes.
//!
//! # Architecture
//!
//! | Module          | Responsibility                                                  |
//! |-----------------|-----------------------------------------------------------------|
//! | [`line_editor`] | [`LineBuffer`], [`EchoEncoder`], [`KeyRouter`]                  |
//! | [`surface`]     | [`DisplaySurface`] contract and the crossterm [`AnsiSurface`]    |
//! | [`session`]     | [`TerminalSession`] state machine, [`TaskStore`], banners        |
//! | [`core`]        | errors, logging setup, test fixtures                            |
//!
//! Control flow, leaf first:
//!
//! ```text
//! key event ─▶ KeyRouter ─▶ LineBuffer ─▶ EchoEncoder ─▶ DisplaySurface
//! TaskStore (active id changed) ─▶ TerminalSession ─▶ clear + replay ─▶ DisplaySurface
//! ```
//!
//! # Example
//!
//! ```
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//! use task_term::{CommandRecorder, InMemoryTaskStore, MountTarget, SurfaceMockFactory,
//!                 TerminalProps, TerminalSession};
//!
//! let factory = SurfaceMockFactory::default();
//! let log = factory.log.clone();
//! let store = InMemoryTaskStore::with_active("t1");
//! let mut session = TerminalSession::new(factory, CommandRecorder::default());
//!
//! session
//!     .update(&TerminalProps::default(), &store, Some(&MountTarget::new("panel")))
//!     .unwrap();
//! session.handle_key_event(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
//!
//! assert_eq!(log.open_count(), 1);
//! assert_eq!(session.line_buffer().as_str(), "a");
//! ```

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules.
pub mod core;
pub mod line_editor;
pub mod session;
pub mod surface;

// Re-export.
pub use core::*;
pub use line_editor::*;
pub use session::*;
pub use surface::*;
