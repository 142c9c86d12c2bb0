// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::{Error, ErrorKind, Result},
          sync::{Arc, MutexGuard, PoisonError}};

use crate::{DisplaySurface, ListenerHandle, ListenerKind, MountTarget, StdMutex,
            SurfaceFactory};

/// One observable interaction with a [`SurfaceMock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Create(String),
    Open(String),
    Write(String),
    Writeln(String),
    Clear,
    Fit,
    AttachListener(ListenerKind),
    DetachListener(ListenerKind),
    Dispose,
}

/// Faults to inject into surfaces built by a [`SurfaceMockFactory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceFaults {
    pub fail_create: bool,
    pub fail_open: bool,
    pub fail_write: bool,
}

/// Shared, cloneable call log. Every surface created by the same factory appends here,
/// so a test keeps a clone and inspects it after handing the factory to the session.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    calls: Arc<StdMutex<Vec<SurfaceCall>>>,
    faults: Arc<StdMutex<SurfaceFaults>>,
}

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SurfaceLog {
    pub fn record(&self, call: SurfaceCall) { lock(&self.calls).push(call); }

    pub fn calls(&self) -> Vec<SurfaceCall> { lock(&self.calls).clone() }

    /// Forget everything recorded so far. Handy to isolate the calls made by a single
    /// step of a scenario.
    pub fn clear_calls(&self) { lock(&self.calls).clear(); }

    pub fn faults(&self) -> SurfaceFaults { *lock(&self.faults) }

    pub fn set_faults(&self, faults: SurfaceFaults) { *lock(&self.faults) = faults; }

    pub fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(call)).count()
    }

    pub fn create_count(&self) -> usize {
        self.count(|call| matches!(call, SurfaceCall::Create(_)))
    }

    pub fn open_count(&self) -> usize {
        self.count(|call| matches!(call, SurfaceCall::Open(_)))
    }

    pub fn clear_count(&self) -> usize { self.count(|call| *call == SurfaceCall::Clear) }

    pub fn fit_count(&self) -> usize { self.count(|call| *call == SurfaceCall::Fit) }

    pub fn dispose_count(&self) -> usize {
        self.count(|call| *call == SurfaceCall::Dispose)
    }

    /// Payloads of every [`SurfaceCall::Write`], in order.
    pub fn writes(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Write(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Payloads of every [`SurfaceCall::Writeln`], in order.
    pub fn writelns(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Writeln(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Everything written, with `writeln` rendered as a trailing `\r\n`.
    pub fn output(&self) -> String {
        lock(&self.calls).iter().fold(String::new(), |mut acc, call| {
            match call {
                SurfaceCall::Write(text) => acc.push_str(text),
                SurfaceCall::Writeln(text) => {
                    acc.push_str(text);
                    acc.push_str("\r\n");
                }
                _ => {}
            }
            acc
        })
    }

    pub fn position(&self, expected: &SurfaceCall) -> Option<usize> {
        lock(&self.calls).iter().position(|call| call == expected)
    }
}

/// Records every call into its [`SurfaceLog`]. Mirrors the real surface rules: output
/// before `open` or after `dispose` is rejected.
#[derive(Debug)]
pub struct SurfaceMock {
    pub log: SurfaceLog,
    is_open: bool,
    is_disposed: bool,
}

impl SurfaceMock {
    pub fn new(log: SurfaceLog) -> Self {
        Self {
            log,
            is_open: false,
            is_disposed: false,
        }
    }

    pub fn is_open(&self) -> bool { self.is_open }

    pub fn is_disposed(&self) -> bool { self.is_disposed }

    fn check_writable(&self) -> Result<()> {
        if !self.is_open || self.is_disposed {
            return Err(Error::new(ErrorKind::NotConnected, "surface mock is not open"));
        }
        if self.log.faults().fail_write {
            return Err(Error::new(ErrorKind::BrokenPipe, "surface mock write failure"));
        }
        Ok(())
    }
}

impl DisplaySurface for SurfaceMock {
    fn open(&mut self, target: &MountTarget) -> Result<()> {
        if self.log.faults().fail_open {
            return Err(Error::other("surface mock open failure"));
        }
        if self.is_disposed {
            return Err(Error::new(ErrorKind::NotConnected, "surface mock is disposed"));
        }
        self.is_open = true;
        self.log.record(SurfaceCall::Open(target.id.clone()));
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.check_writable()?;
        self.log.record(SurfaceCall::Write(text.to_string()));
        Ok(())
    }

    fn writeln(&mut self, text: &str) -> Result<()> {
        self.check_writable()?;
        self.log.record(SurfaceCall::Writeln(text.to_string()));
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.check_writable()?;
        self.log.record(SurfaceCall::Clear);
        Ok(())
    }

    fn fit(&mut self) -> Result<()> {
        if !self.is_open {
            return Err(Error::new(ErrorKind::NotConnected, "surface mock is not open"));
        }
        self.log.record(SurfaceCall::Fit);
        Ok(())
    }

    fn dispose(&mut self) {
        if self.is_disposed {
            return;
        }
        self.is_disposed = true;
        self.is_open = false;
        self.log.record(SurfaceCall::Dispose);
    }

    fn attach_listener(&mut self, kind: ListenerKind) -> ListenerHandle {
        self.log.record(SurfaceCall::AttachListener(kind));
        ListenerHandle::new(kind)
    }

    fn detach_listener(&mut self, handle: ListenerHandle) {
        self.log.record(SurfaceCall::DetachListener(handle.kind));
    }
}

/// Hands out [`SurfaceMock`]s that all share [`SurfaceMockFactory::log`].
#[derive(Debug, Clone, Default)]
pub struct SurfaceMockFactory {
    pub log: SurfaceLog,
}

impl SurfaceMockFactory {
    pub fn new() -> Self { Self::default() }

    pub fn with_faults(faults: SurfaceFaults) -> Self {
        let it = Self::default();
        it.log.set_faults(faults);
        it
    }
}

impl SurfaceFactory for SurfaceMockFactory {
    type Surface = SurfaceMock;

    fn create(&mut self, target: &MountTarget) -> Result<Self::Surface> {
        if self.log.faults().fail_create {
            return Err(Error::other("surface mock create failure"));
        }
        self.log.record(SurfaceCall::Create(target.id.clone()));
        Ok(SurfaceMock::new(self.log.clone()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_write_before_open_is_rejected() {
        let mut factory = SurfaceMockFactory::default();
        let mut surface = factory.create(&MountTarget::new("panel")).unwrap();
        assert!(surface.write("early").is_err());
        assert!(factory.log.writes().is_empty());
    }

    #[test]
    fn test_records_calls_in_order() {
        let mut factory = SurfaceMockFactory::default();
        let target = MountTarget::new("panel");
        let mut surface = factory.create(&target).unwrap();
        surface.open(&target).unwrap();
        surface.writeln("hello").unwrap();
        surface.write("> ").unwrap();
        surface.dispose();
        surface.dispose();

        assert_eq!(
            factory.log.calls(),
            vec![
                SurfaceCall::Create("panel".into()),
                SurfaceCall::Open("panel".into()),
                SurfaceCall::Writeln("hello".into()),
                SurfaceCall::Write("> ".into()),
                SurfaceCall::Dispose,
            ]
        );
        assert_eq!(factory.log.output(), "hello\r\n> ");
    }

    #[test]
    fn test_injected_faults() {
        let mut factory = SurfaceMockFactory::with_faults(SurfaceFaults {
            fail_open: true,
            ..Default::default()
        });
        let target = MountTarget::new("panel");
        let mut surface = factory.create(&target).unwrap();
        assert!(surface.open(&target).is_err());
        assert_eq!(factory.log.open_count(), 0);

        factory.log.set_faults(SurfaceFaults {
            fail_create: true,
            ..Default::default()
        });
        assert!(factory.create(&target).is_err());
    }
}
