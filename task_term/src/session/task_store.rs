// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{collections::HashMap,
          fmt::{Display, Formatter}};

use serde::{Deserialize, Serialize};

/// Opaque identifier of a task session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self { Self(id) }
}

/// A task session and the output lines it has produced, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    #[serde(default)]
    pub history: Vec<String>,
}

impl Session {
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            history: vec![],
        }
    }

    pub fn with_history(mut self, history: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.history = history.into_iter().map(Into::into).collect();
        self
    }
}

/// Read side of the shared task store. The terminal only ever reads from it; the host
/// owns mutation.
pub trait TaskStore {
    fn active_session_id(&self) -> Option<&SessionId>;

    fn session(&self, id: &SessionId) -> Option<&Session>;

    /// History of `id`, or an empty slice when the session is unknown.
    fn history(&self, id: &SessionId) -> &[String] {
        self.session(id)
            .map(|session| session.history.as_slice())
            .unwrap_or_default()
    }
}

/// Plain [`TaskStore`] backed by a [`HashMap`]. Used by the bundled binary and by
/// tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InMemoryTaskStore {
    active_session_id: Option<SessionId>,
    sessions: HashMap<SessionId, Session>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self { Self::default() }

    /// A store with a single, empty, active session.
    pub fn with_active(id: impl Into<SessionId>) -> Self {
        let mut it = Self::default();
        it.set_active(id);
        it
    }

    /// Insert or replace a session. Does not change which one is active.
    pub fn insert_session(&mut self, session: Session) -> &mut Self {
        self.sessions.insert(session.id.clone(), session);
        self
    }

    /// Make `id` the active session, creating it empty if it doesn't exist yet.
    pub fn set_active(&mut self, id: impl Into<SessionId>) -> &mut Self {
        let id = id.into();
        self.sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id.clone()));
        self.active_session_id = Some(id);
        self
    }

    pub fn clear_active(&mut self) -> &mut Self {
        self.active_session_id = None;
        self
    }

    /// Append an output line to `id`, creating the session if needed.
    pub fn push_output(&mut self, id: &SessionId, line: impl Into<String>) -> &mut Self {
        self.sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id.clone()))
            .history
            .push(line.into());
        self
    }

    pub fn session_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    /// Session ids in sorted order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.sessions.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl TaskStore for InMemoryTaskStore {
    fn active_session_id(&self) -> Option<&SessionId> { self.active_session_id.as_ref() }

    fn session(&self, id: &SessionId) -> Option<&Session> { self.sessions.get(id) }
}
