// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Fixed text the terminal prints on its own: the welcome banner, the session
//! transition notice, the replay markers and the prompt.

use crossterm::style::Stylize;

use crate::SessionId;

pub const WELCOME_TITLE: &str = "=== Eigent Terminal ===";
pub const READY_LINE: &str = "Ready for commands...";
pub const DEFAULT_INSTANCE_LABEL: &str = "default";
pub const REPLAY_START_MARKER: &str = "--- Previous Output ---";
pub const REPLAY_END_MARKER: &str = "--- End Previous Output ---";
pub const PROMPT_SUFFIX: &str = ":~$ ";

/// The three lines written on mount when the welcome banner is enabled.
pub fn welcome_lines(instance_label: &str) -> [String; 3] {
    [
        WELCOME_TITLE.cyan().bold().to_string(),
        format!("Instance: {instance_label}"),
        READY_LINE.to_string(),
    ]
}

pub fn transition_line(to: &SessionId) -> String {
    format!("Task switched to: {to}").yellow().to_string()
}

pub fn prompt_for_label(label: &str) -> String { format!("{label}{PROMPT_SUFFIX}") }
