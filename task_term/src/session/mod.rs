// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod banner;
pub mod command_sink;
pub mod session_controller;
pub mod task_store;
pub mod terminal_props;

// Re-export.
pub use banner::*;
pub use command_sink::*;
pub use session_controller::*;
pub use task_store::*;
pub use terminal_props::*;
