// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The lifecycle of one terminal instance.
//!
//! ```text
//! Uninitialized ──begin_mount──▶ Initializing ──complete_mount──▶ Ready
//!       ▲                              │                            │  ▲
//!       └────────── unmount ───────────┘                            ▼  │
//!       ▲                                               SwitchingSession
//!       └────────────────────── unmount ────────────────────────────┘
//! ```
//!
//! Mounting happens in two phases because the surface can only be opened once the host
//! has actually attached the mount target. [`TerminalSession::mount`] runs both back to
//! back; a host that defers the second phase calls [`TerminalSession::begin_mount`] and
//! lets the next [`TerminalSession::update`] finish the job.

use std::io;

use crossterm::event::{Event, KeyEvent};

use crate::{CommandSink, Dispatch, DisplaySurface, EchoEncoder, KeyRouter, LineBuffer,
            ListenerHandle, ListenerKind, MountTarget, REPLAY_END_MARKER,
            REPLAY_START_MARKER, SessionId, SubmittedCommand, SurfaceFactory, TaskStore,
            TerminalError, TerminalProps, TerminalResult, apply_echoes, transition_line,
            welcome_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
    SwitchingSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// The surface is open and the initial screen has been drawn.
    Mounted,
    /// First phase done; waiting for [`TerminalSession::complete_mount`].
    Pending,
    /// A surface already exists, nothing was done.
    AlreadyMounted,
    /// The instance was unmounted before the deferred phase ran.
    Cancelled,
}

/// What happened to a key event. Key handling never fails outward; a surface error is
/// logged and reported as [`KeyOutcome::Failed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The session isn't Ready, so the event was dropped.
    NotReady,
    Ignored,
    Unchanged,
    Edited,
    Submitted(String),
    Failed,
}

/// One terminal instance: a surface, a line buffer, and the session it is showing.
///
/// At most one surface exists per instance. Output appears only after the surface is
/// open, and every listener attached on mount is detached on unmount.
pub struct TerminalSession<F: SurfaceFactory, C: CommandSink> {
    factory: F,
    command_sink: C,
    surface: Option<F::Surface>,
    state: LifecycleState,
    /// Set once the surface is open, cleared on unmount. Guards against a second
    /// surface when the host re-renders.
    is_initialized: bool,
    pending_target: Option<MountTarget>,
    key_listener: Option<ListenerHandle>,
    resize_listener: Option<ListenerHandle>,
    props: TerminalProps,
    prompt: String,
    line_buffer: LineBuffer,
    active_session_id: Option<SessionId>,
    /// How many history lines of the active session are already on screen.
    rendered_lines: usize,
}

impl<F: SurfaceFactory, C: CommandSink> std::fmt::Debug for TerminalSession<F, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSession")
            .field("state", &self.state)
            .field("is_initialized", &self.is_initialized)
            .field("active_session_id", &self.active_session_id)
            .field("line_buffer", &self.line_buffer)
            .field("rendered_lines", &self.rendered_lines)
            .finish_non_exhaustive()
    }
}

fn not_open() -> io::Error { io::Error::new(io::ErrorKind::NotConnected, "no surface") }

impl<F: SurfaceFactory, C: CommandSink> TerminalSession<F, C> {
    pub fn new(factory: F, command_sink: C) -> Self {
        Self {
            factory,
            command_sink,
            surface: None,
            state: LifecycleState::Uninitialized,
            is_initialized: false,
            pending_target: None,
            key_listener: None,
            resize_listener: None,
            props: TerminalProps::default(),
            prompt: String::new(),
            line_buffer: LineBuffer::new(),
            active_session_id: None,
            rendered_lines: 0,
        }
    }

    pub fn state(&self) -> LifecycleState { self.state }

    pub fn is_initialized(&self) -> bool { self.is_initialized }

    pub fn line_buffer(&self) -> &LineBuffer { &self.line_buffer }

    pub fn active_session_id(&self) -> Option<&SessionId> {
        self.active_session_id.as_ref()
    }

    pub fn prompt(&self) -> &str { &self.prompt }

    pub fn props(&self) -> &TerminalProps { &self.props }

    pub fn rendered_lines(&self) -> usize { self.rendered_lines }

    pub fn surface(&self) -> Option<&F::Surface> { self.surface.as_ref() }

    pub fn factory(&self) -> &F { &self.factory }

    pub fn command_sink(&self) -> &C { &self.command_sink }

    /// Drive the instance from the host's current inputs. Call it whenever the props,
    /// the store, or the mount target may have changed.
    ///
    /// 1. Not yet mounted: mount. A missing target is logged and skipped, the host
    ///    will call again once the target exists.
    /// 2. Initializing: run the deferred second phase.
    /// 3. Ready: switch sessions if the active id changed, then append any new output
    ///    lines of the active session.
    ///
    /// # Errors
    ///
    /// [`TerminalError::InitializationFailure`] if the surface could not be built or
    /// opened, [`TerminalError::Surface`] if drawing to an open surface failed.
    pub fn update(
        &mut self,
        props: &TerminalProps,
        store: &impl TaskStore,
        target: Option<&MountTarget>,
    ) -> TerminalResult<()> {
        match self.state {
            LifecycleState::Uninitialized => {
                match self.mount(props, store, target) {
                    Ok(outcome) => {
                        tracing::debug!(message = "update mounted surface", ?outcome);
                    }
                    Err(TerminalError::MountTargetMissing) => {
                        tracing::warn!(
                            message = "mount target not available, skipping initialization"
                        );
                    }
                    Err(err) => return Err(err),
                }
                Ok(())
            }
            LifecycleState::Initializing => {
                self.complete_mount(props, store)?;
                Ok(())
            }
            LifecycleState::Ready | LifecycleState::SwitchingSession => {
                self.switch_session_if_changed(store)?;
                self.sync_output(store)?;
                Ok(())
            }
        }
    }

    /// Both mount phases back to back.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_mount`] and [`Self::complete_mount`].
    pub fn mount(
        &mut self,
        props: &TerminalProps,
        store: &impl TaskStore,
        target: Option<&MountTarget>,
    ) -> TerminalResult<MountOutcome> {
        match self.begin_mount(target)? {
            MountOutcome::Pending => self.complete_mount(props, store),
            other => Ok(other),
        }
    }

    /// Phase one: build the surface and subscribe to keys. Keys are not routed until
    /// the session is Ready.
    ///
    /// # Errors
    ///
    /// [`TerminalError::MountTargetMissing`] without a target, in which case nothing
    /// is created. [`TerminalError::InitializationFailure`] if the factory fails.
    pub fn begin_mount(
        &mut self,
        target: Option<&MountTarget>,
    ) -> TerminalResult<MountOutcome> {
        if self.is_initialized || self.surface.is_some() {
            tracing::debug!(
                message = "surface already exists, skipping mount",
                state = %self.state
            );
            return Ok(MountOutcome::AlreadyMounted);
        }

        let Some(target) = target else {
            return Err(TerminalError::MountTargetMissing);
        };

        let mut surface = self.factory.create(target).map_err(|err| {
            tracing::error!(message = "failed to create surface", %target, error = %err);
            TerminalError::initialization(err)
        })?;
        self.key_listener = Some(surface.attach_listener(ListenerKind::Key));
        self.surface = Some(surface);
        self.pending_target = Some(target.clone());
        self.state = LifecycleState::Initializing;

        tracing::debug!(message = "surface created", %target);
        Ok(MountOutcome::Pending)
    }

    /// Phase two: open and size the surface, then draw the welcome banner, the
    /// initial session's history and the prompt.
    ///
    /// # Errors
    ///
    /// [`TerminalError::InitializationFailure`] if `open` fails; the surface is
    /// disposed and the session is back to Uninitialized.
    pub fn complete_mount(
        &mut self,
        props: &TerminalProps,
        store: &impl TaskStore,
    ) -> TerminalResult<MountOutcome> {
        match self.state {
            LifecycleState::Initializing => {}
            LifecycleState::Uninitialized => {
                tracing::debug!(message = "unmounted before initialization completed");
                return Ok(MountOutcome::Cancelled);
            }
            LifecycleState::Ready | LifecycleState::SwitchingSession => {
                return Ok(MountOutcome::AlreadyMounted);
            }
        }

        let (Some(surface), Some(target)) = (self.surface.as_mut(), self.pending_target.take())
        else {
            self.teardown();
            return Err(TerminalError::initialization(not_open()));
        };

        if let Err(err) = surface.open(&target) {
            tracing::error!(message = "failed to open surface", %target, error = %err);
            self.teardown();
            return Err(TerminalError::initialization(err));
        }
        if let Err(err) = surface.fit() {
            tracing::warn!(message = "initial fit failed", error = %err);
        }
        self.resize_listener = Some(surface.attach_listener(ListenerKind::Resize));

        self.is_initialized = true;
        self.props = props.clone();
        self.active_session_id = store.active_session_id().cloned();
        self.prompt = self.props.prompt(self.active_session_id.as_ref());
        self.line_buffer.clear();
        self.rendered_lines = 0;
        self.state = LifecycleState::Ready;

        tracing::info!(
            message = "terminal ready",
            instance = self.props.instance_label(),
            active_session = ?self.active_session_id
        );

        self.render_initial_screen(store)?;
        Ok(MountOutcome::Mounted)
    }

    fn render_initial_screen(&mut self, store: &impl TaskStore) -> io::Result<()> {
        let surface = self.surface.as_mut().ok_or_else(not_open)?;
        if self.props.show_welcome {
            for line in welcome_lines(self.props.instance_label()) {
                surface.writeln(&line)?;
            }
        }
        if let Some(id) = &self.active_session_id {
            self.rendered_lines = replay_history(surface, store.history(id))?;
        }
        surface.write(&self.prompt)
    }

    /// Tear everything down. Safe to call in any state, any number of times.
    pub fn unmount(&mut self) {
        if self.surface.is_none() && self.state == LifecycleState::Uninitialized {
            tracing::debug!(message = "nothing to unmount");
            return;
        }
        tracing::info!(message = "unmounting terminal", state = %self.state);
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            for handle in [self.key_listener.take(), self.resize_listener.take()]
                .into_iter()
                .flatten()
            {
                surface.detach_listener(handle);
            }
            surface.dispose();
        }
        self.key_listener = None;
        self.resize_listener = None;
        self.pending_target = None;
        self.is_initialized = false;
        self.state = LifecycleState::Uninitialized;
        self.line_buffer.clear();
        self.active_session_id = None;
        self.rendered_lines = 0;
    }

    /// Route a key event through the line editor. Dropped unless Ready.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> KeyOutcome {
        if self.state != LifecycleState::Ready || self.key_listener.is_none() {
            tracing::trace!(message = "key event before ready", state = %self.state);
            return KeyOutcome::NotReady;
        }
        let action = KeyRouter::classify(&event);
        let dispatch = KeyRouter::dispatch(action, &mut self.line_buffer);
        match self.route(dispatch) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(message = "failed to echo key", %action, error = %err);
                KeyOutcome::Failed
            }
        }
    }

    fn route(&mut self, dispatch: Dispatch) -> io::Result<KeyOutcome> {
        let surface = self.surface.as_mut().ok_or_else(not_open)?;
        match dispatch {
            Dispatch::Ignored => Ok(KeyOutcome::Ignored),
            Dispatch::Unchanged => Ok(KeyOutcome::Unchanged),
            Dispatch::Echo(echoes) => {
                apply_echoes(&echoes, surface)?;
                Ok(KeyOutcome::Edited)
            }
            Dispatch::Submitted(line) => {
                if line.trim().is_empty() {
                    tracing::trace!(message = "blank line, not forwarded");
                } else {
                    tracing::debug!(
                        message = "command submitted",
                        %line,
                        session = ?self.active_session_id
                    );
                    self.command_sink.forward(SubmittedCommand {
                        session_id: self.active_session_id.clone(),
                        line: line.clone(),
                    });
                }
                apply_echoes(&EchoEncoder::command_executed(&self.prompt), surface)?;
                Ok(KeyOutcome::Submitted(line))
            }
        }
    }

    /// Refit the surface to its container. Returns `false` when there is no resize
    /// subscription yet.
    pub fn handle_resize(&mut self) -> bool {
        if self.state != LifecycleState::Ready || self.resize_listener.is_none() {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match surface.fit() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(message = "fit after resize failed", error = %err);
                false
            }
        }
    }

    /// Convenience for hosts that read a crossterm [`Event`] stream.
    pub fn handle_event(&mut self, event: &Event) -> KeyOutcome {
        match event {
            Event::Key(key_event) => self.handle_key_event(*key_event),
            Event::Resize(..) => {
                self.handle_resize();
                KeyOutcome::Ignored
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Show the store's active session if it differs from the one on screen. Returns
    /// whether a switch happened.
    ///
    /// The new id is recorded even if drawing fails, so a broken surface does not
    /// cause the same switch to be retried on every update.
    ///
    /// # Errors
    ///
    /// [`TerminalError::Surface`] if clearing or replaying failed.
    pub fn switch_session_if_changed(
        &mut self,
        store: &impl TaskStore,
    ) -> TerminalResult<bool> {
        if self.state != LifecycleState::Ready {
            return Ok(false);
        }
        let next = store.active_session_id();
        if next == self.active_session_id.as_ref() {
            return Ok(false);
        }
        let Some(next) = next.cloned() else {
            tracing::debug!(
                message = "active session cleared, keeping screen",
                previous = ?self.active_session_id
            );
            self.active_session_id = None;
            self.rendered_lines = 0;
            return Ok(false);
        };

        tracing::info!(
            message = "session switched",
            from = ?self.active_session_id,
            to = %next
        );
        self.state = LifecycleState::SwitchingSession;
        let result = self.render_switch(store, &next);
        self.active_session_id = Some(next);
        self.state = LifecycleState::Ready;
        result?;
        Ok(true)
    }

    fn render_switch(&mut self, store: &impl TaskStore, next: &SessionId) -> io::Result<()> {
        self.line_buffer.clear();
        self.rendered_lines = 0;
        self.prompt = self.props.prompt(Some(next));

        let surface = self.surface.as_mut().ok_or_else(not_open)?;
        surface.clear()?;
        if self.props.show_welcome {
            surface.writeln(&transition_line(next))?;
        }
        self.rendered_lines = replay_history(surface, store.history(next))?;
        surface.write(&self.prompt)
    }

    /// Append output lines that arrived in the active session since the last call,
    /// above the prompt, then repaint the prompt and the partially typed line. Returns
    /// how many lines were written.
    ///
    /// # Errors
    ///
    /// [`TerminalError::Surface`] if a write failed.
    pub fn sync_output(&mut self, store: &impl TaskStore) -> TerminalResult<usize> {
        if self.state != LifecycleState::Ready {
            return Ok(0);
        }
        let Some(id) = self.active_session_id.as_ref() else {
            return Ok(0);
        };
        let history = store.history(id);

        if history.len() < self.rendered_lines {
            tracing::debug!(
                message = "history shrank, resetting rendered count",
                session = %id,
                rendered = self.rendered_lines,
                available = history.len()
            );
            self.rendered_lines = history.len();
            return Ok(0);
        }
        if history.len() == self.rendered_lines {
            tracing::debug!(message = "skip output sync, history unchanged", session = %id);
            return Ok(0);
        }

        let new_lines = &history[self.rendered_lines..];
        let surface = self.surface.as_mut().ok_or_else(not_open)?;
        apply_echoes(&EchoEncoder::erase_line(), surface)?;
        for line in new_lines {
            surface.writeln(line)?;
        }
        apply_echoes(
            &EchoEncoder::redraw_line(&self.prompt, &self.line_buffer),
            surface,
        )?;
        self.rendered_lines = history.len();

        tracing::debug!(message = "output synced", session = %id, lines = new_lines.len());
        Ok(new_lines.len())
    }
}

impl<F: SurfaceFactory, C: CommandSink> Drop for TerminalSession<F, C> {
    fn drop(&mut self) { self.unmount(); }
}

/// Write `history` between the replay markers. Nothing is written for an empty
/// history. Returns the number of history lines written.
fn replay_history(
    surface: &mut (impl DisplaySurface + ?Sized),
    history: &[String],
) -> io::Result<usize> {
    if history.is_empty() {
        return Ok(0);
    }
    surface.writeln(REPLAY_START_MARKER)?;
    for line in history {
        surface.writeln(line)?;
    }
    surface.writeln(REPLAY_END_MARKER)?;
    Ok(history.len())
}
