// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Display, Formatter},
          io};

/// Identifies the host container a surface gets attached to. For the terminal host this
/// is the tty; for an embedding host it names a panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountTarget {
    pub id: String,
}

impl MountTarget {
    pub fn new(id: impl Into<String>) -> Self { Self { id: id.into() } }
}

impl Display for MountTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.id) }
}

/// Which notification stream a listener is subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ListenerKind {
    Key,
    Resize,
}

/// Opaque subscription returned when a listener is attached. Pass it back to
/// [`DisplaySurface::detach_listener`] to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    pub id: uuid::Uuid,
    pub kind: ListenerKind,
}

impl ListenerHandle {
    pub fn new(kind: ListenerKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            kind,
        }
    }
}

/// A passive character grid that interprets ANSI control sequences. It never edits
/// text on its own; everything the user sees arrives through [`write`] or
/// [`writeln`].
///
/// Writes before [`open`] or after [`dispose`] fail with an [`io::Error`].
///
/// [`write`]: DisplaySurface::write
/// [`writeln`]: DisplaySurface::writeln
/// [`open`]: DisplaySurface::open
/// [`dispose`]: DisplaySurface::dispose
pub trait DisplaySurface {
    /// Attach to the live mount target. Only valid once per surface.
    fn open(&mut self, target: &MountTarget) -> io::Result<()>;

    /// Interpret `text` as characters plus control sequences.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Same as [`DisplaySurface::write`] followed by a line break.
    fn writeln(&mut self, text: &str) -> io::Result<()>;

    /// Erase the visible buffer and home the cursor.
    fn clear(&mut self) -> io::Result<()>;

    /// Recompute rows and columns from the container's current size.
    fn fit(&mut self) -> io::Result<()>;

    /// Release the surface. Calling it more than once is a no-op.
    fn dispose(&mut self);

    /// Register interest in `kind` events and return the subscription handle.
    ///
    /// Nothing is delivered through the handle. The host pumps events itself (see the
    /// `EventStream` loop in the demo binary) and hands them to
    /// [`crate::TerminalSession::handle_event`]; the handle records that the session is
    /// listening, so the session knows whether to act on a resize and what to detach on
    /// unmount.
    fn attach_listener(&mut self, kind: ListenerKind) -> ListenerHandle;

    fn detach_listener(&mut self, handle: ListenerHandle);
}

/// Builds a fresh [`DisplaySurface`] for a mount target. The session owns exactly one
/// surface at a time and asks its factory for a new one on every mount.
pub trait SurfaceFactory {
    type Surface: DisplaySurface;

    fn create(&mut self, target: &MountTarget) -> io::Result<Self::Surface>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_handles_are_unique() {
        let a = ListenerHandle::new(ListenerKind::Key);
        let b = ListenerHandle::new(ListenerKind::Key);
        assert_ne!(a, b);
        assert_eq!(a.kind, b.kind);
    }

    #[test]
    fn test_listener_kind_display() {
        assert_eq!(ListenerKind::Resize.to_string(), "Resize");
    }

    #[test]
    fn test_mount_target_display() {
        assert_eq!(MountTarget::new("panel-1").to_string(), "panel-1");
    }
}
