// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, PoisonError};

use crate::{CommandSink, StdMutex, SubmittedCommand};

/// [`CommandSink`] that keeps every forwarded command. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    pub commands: Arc<StdMutex<Vec<SubmittedCommand>>>,
}

impl CommandRecorder {
    pub fn new() -> Self { Self::default() }

    pub fn commands(&self) -> Vec<SubmittedCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Just the command lines, without the session they were submitted in.
    pub fn lines(&self) -> Vec<String> {
        self.commands().into_iter().map(|it| it.line).collect()
    }
}

impl CommandSink for CommandRecorder {
    fn forward(&mut self, command: SubmittedCommand) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}
