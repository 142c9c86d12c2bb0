// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! For more information on error types, see:
//!
//! 1. [Article](https://developerlife.com/2024/06/10/rust-miette-error-handling/)
//! 2. [Video](https://youtu.be/TmLF7vI8lKk)

use miette::Diagnostic;
use std::io;

/// Type alias to make it easy to work with [`miette::Result`] and [`miette::Report`] in
/// binaries and setup code. Library operations that can fail in a well known way return
/// [`TerminalResult`] instead.
pub type CommonResult<T> = miette::Result<T>;

/// Result type for the mount, switch, and output paths of
/// [`crate::TerminalSession`].
pub type TerminalResult<T> = Result<T, TerminalError>;

/// Everything that can go wrong while a [`crate::TerminalSession`] drives its
/// [`crate::DisplaySurface`].
///
/// Rejected key combinations are not errors. They are classified as
/// [`crate::KeyAction::Ignored`] by the [`crate::KeyRouter`].
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum TerminalError {
    /// The display surface could not be constructed or opened. The session stays
    /// `Uninitialized` and does not retry on its own.
    #[error("Failed to initialize the display surface")]
    #[diagnostic(
        code(task_term::surface::initialization),
        help("The next mount attempt will try again")
    )]
    InitializationFailure {
        #[source]
        source: io::Error,
    },

    /// No mount target was supplied. Fatal for this mount attempt only.
    #[error("No mount target to attach the display surface to")]
    #[diagnostic(code(task_term::surface::mount_target_missing))]
    MountTargetMissing,

    /// A write to an already open surface failed.
    #[error("Failed to write to the display surface")]
    #[diagnostic(code(task_term::surface::write))]
    Surface {
        #[source]
        source: io::Error,
    },
}

impl TerminalError {
    #[must_use]
    pub fn initialization(source: io::Error) -> Self {
        TerminalError::InitializationFailure { source }
    }
}

impl From<io::Error> for TerminalError {
    fn from(source: io::Error) -> Self { TerminalError::Surface { source } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts_to_surface_error() {
        let err: TerminalError = io::Error::other("boom").into();
        assert!(matches!(err, TerminalError::Surface { .. }));
        assert_eq!(err.to_string(), "Failed to write to the display surface");
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = TerminalError::initialization(io::Error::other("no tty"));
        let code = err.code().map(|it| it.to_string());
        assert_eq!(code.as_deref(), Some("task_term::surface::initialization"));

        let err = TerminalError::MountTargetMissing;
        let code = err.code().map(|it| it.to_string());
        assert_eq!(code.as_deref(), Some("task_term::surface::mount_target_missing"));
    }
}
