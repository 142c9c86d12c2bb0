// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use crossterm::{QueueableCommand as _,
                cursor::MoveTo,
                terminal::{Clear, ClearType, EnableLineWrap}};

use crate::{DisplaySurface, ListenerHandle, ListenerKind, MountTarget, SurfaceFactory};

/// Columns and rows of the area a surface renders into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub columns: u16,
    pub rows: u16,
}

/// Reports the current container size as `(columns, rows)`.
pub type MeasureFn = fn() -> io::Result<(u16, u16)>;

/// Interrogate crossterm [`crossterm::terminal::size()`] for the terminal window size.
pub fn lookup_terminal_size() -> io::Result<(u16, u16)> { crossterm::terminal::size() }

/// [`DisplaySurface`] that forwards text verbatim to a [`Write`] and lets the real
/// terminal on the other end interpret the escape sequences. Line breaks are written
/// as `\r\n` since the terminal is expected to be in raw mode.
pub struct AnsiSurface<W: Write> {
    writer: W,
    measure: MeasureFn,
    size: SurfaceSize,
    is_open: bool,
    is_disposed: bool,
    listeners: Vec<ListenerHandle>,
}

impl<W: Write> std::fmt::Debug for AnsiSurface<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnsiSurface")
            .field("size", &self.size)
            .field("is_open", &self.is_open)
            .field("is_disposed", &self.is_disposed)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl<W: Write> AnsiSurface<W> {
    pub fn new(writer: W, measure: MeasureFn) -> Self {
        Self {
            writer,
            measure,
            size: SurfaceSize::default(),
            is_open: false,
            is_disposed: false,
            listeners: vec![],
        }
    }

    pub fn size(&self) -> SurfaceSize { self.size }

    pub fn is_open(&self) -> bool { self.is_open }

    pub fn is_disposed(&self) -> bool { self.is_disposed }

    pub fn has_listener(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|handle| handle.kind == kind)
    }

    fn writer_if_open(&mut self) -> io::Result<&mut W> {
        if self.is_open && !self.is_disposed {
            Ok(&mut self.writer)
        } else {
            Err(io::Error::new(io::ErrorKind::NotConnected, "surface is not open"))
        }
    }
}

impl<W: Write> DisplaySurface for AnsiSurface<W> {
    fn open(&mut self, target: &MountTarget) -> io::Result<()> {
        if self.is_disposed {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "surface is disposed",
            ));
        }
        if self.is_open {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "surface is already open",
            ));
        }
        self.writer.queue(EnableLineWrap)?;
        self.writer.flush()?;
        self.is_open = true;
        tracing::debug!(message = "ansi surface opened", %target);
        Ok(())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        let writer = self.writer_if_open()?;
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }

    fn writeln(&mut self, text: &str) -> io::Result<()> {
        let writer = self.writer_if_open()?;
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\r\n")?;
        writer.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        let writer = self.writer_if_open()?;
        writer.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
        writer.flush()
    }

    fn fit(&mut self) -> io::Result<()> {
        if !self.is_open {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "surface is not open"));
        }
        let (columns, rows) = (self.measure)()?;
        self.size = SurfaceSize { columns, rows };
        tracing::debug!(message = "ansi surface fit", columns, rows);
        Ok(())
    }

    fn dispose(&mut self) {
        if self.is_disposed {
            return;
        }
        let flushed = if self.is_open { self.writer.flush() } else { Ok(()) };
        if let Err(err) = flushed {
            tracing::warn!(message = "flush on dispose failed", error = %err);
        }
        self.listeners.clear();
        self.is_open = false;
        self.is_disposed = true;
    }

    fn attach_listener(&mut self, kind: ListenerKind) -> ListenerHandle {
        let handle = ListenerHandle::new(kind);
        self.listeners.push(handle);
        handle
    }

    fn detach_listener(&mut self, handle: ListenerHandle) {
        self.listeners.retain(|it| *it != handle);
    }
}

/// Builds [`AnsiSurface`]s from a writer constructor.
pub struct AnsiSurfaceFactory<W: Write> {
    make_writer: Box<dyn FnMut() -> io::Result<W>>,
    measure: MeasureFn,
}

impl<W: Write> std::fmt::Debug for AnsiSurfaceFactory<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnsiSurfaceFactory").finish_non_exhaustive()
    }
}

impl<W: Write> AnsiSurfaceFactory<W> {
    pub fn new(
        make_writer: impl FnMut() -> io::Result<W> + 'static,
        measure: MeasureFn,
    ) -> Self {
        Self {
            make_writer: Box::new(make_writer),
            measure,
        }
    }
}

impl AnsiSurfaceFactory<io::Stdout> {
    /// Surfaces that write to the process's stdout and size themselves from the
    /// terminal window.
    pub fn stdout() -> Self { Self::new(|| Ok(io::stdout()), lookup_terminal_size) }
}

impl<W: Write> SurfaceFactory for AnsiSurfaceFactory<W> {
    type Surface = AnsiSurface<W>;

    fn create(&mut self, _target: &MountTarget) -> io::Result<Self::Surface> {
        let writer = (self.make_writer)()?;
        Ok(AnsiSurface::new(writer, self.measure))
    }
}
