// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Single line command editing. [`KeyRouter`] classifies raw key events,
//! [`LineBuffer`] owns the text and cursor, and [`EchoEncoder`] produces the escape
//! sequences that keep a passive display in step with the buffer.

// Attach sources.
pub mod ansi_sequences;
pub mod echo_encoder;
pub mod key_router;
pub mod line_buffer;

// Re-export.
pub use ansi_sequences::*;
pub use echo_encoder::*;
pub use key_router::*;
pub use line_buffer::*;
