// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The passive display surface the line editor renders into, and a crossterm backed
//! implementation of it that writes to any [`std::io::Write`].

// Attach sources.
pub mod ansi_surface;
pub mod display_surface;

// Re-export.
pub use ansi_surface::*;
pub use display_surface::*;
