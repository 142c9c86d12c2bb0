// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tokio::sync::mpsc::UnboundedSender;

use crate::SessionId;

/// A completed command line, tagged with the session that was active when Enter was
/// pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedCommand {
    pub session_id: Option<SessionId>,
    pub line: String,
}

/// Where submitted command lines go. Forwarding is fire and forget: the terminal
/// never waits for, or renders, a result. Output comes back through the task store.
pub trait CommandSink {
    fn forward(&mut self, command: SubmittedCommand);
}

impl CommandSink for UnboundedSender<SubmittedCommand> {
    fn forward(&mut self, command: SubmittedCommand) {
        if let Err(err) = self.send(command) {
            tracing::warn!(
                message = "command executor is gone, dropping command",
                line = %err.0.line
            );
        }
    }
}
