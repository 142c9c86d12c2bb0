// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixtures shared by unit tests, integration tests and doctests. They are compiled into
//! the library so that `tests/` and doc examples can reach them.

// Attach sources.
pub mod command_recorder;
pub mod stdout_mock;
pub mod surface_mock;

// Re-export.
pub use command_recorder::*;
pub use stdout_mock::*;
pub use surface_mock::*;
