// src/services/session_manager.rs
use std::{collections::HashMap, fmt::Debug, sync::Arc};

use tokio::sync::RwLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnRole {
    Human,
    Assistant,
}

impl TurnRole {
    /// Prefix used when the transcript is rendered into a prompt.
    pub fn label(self) -> &'static str {
        match self {
            TurnRole::Human => "Human",
            TurnRole::Assistant => "AI",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn human(text: impl Into<String>) -> Self {
        Self { role: TurnRole::Human, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: TurnRole::Assistant, text: text.into() }
    }
}

/// Snapshot of one session's turns, in the order they were appended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    pub turns: Vec<Turn>,
}

impl Transcript {
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// One `Role: text` line per turn. Empty transcript renders as "".
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.role.label(), t.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Session not found: {0}")]
pub struct SessionNotFound(pub String);

/// Process-lifetime map from session id to transcript. Sessions are never evicted.
#[derive(Clone, Default)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, Transcript>>>,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    // Return the session's transcript, registering an empty one on first use.
    pub async fn get_or_create(&self, session_id: &str) -> Transcript {
        {
            let guard = self.inner.read().await;
            if let Some(transcript) = guard.get(session_id) {
                return transcript.clone();
            }
        }
        // Re-checked under the write lock so racing callers share one entry.
        let mut guard = self.inner.write().await;
        let transcript = guard.entry(session_id.to_string()).or_insert_with(|| {
            tracing::debug!(session_id, "registered new session");
            Transcript::default()
        });
        transcript.clone()
    }

    pub async fn append(&self, session_id: &str, turn: Turn) -> Result<(), SessionNotFound> {
        let mut guard = self.inner.write().await;
        let transcript = guard
            .get_mut(session_id)
            .ok_or_else(|| SessionNotFound(session_id.to_string()))?;
        transcript.turns.push(turn);
        Ok(())
    }

    /// Append a human turn and its assistant reply under one lock acquisition.
    /// Returns the transcript length afterwards.
    pub async fn append_exchange(
        &self,
        session_id: &str,
        human: impl Into<String>,
        assistant: impl Into<String>,
    ) -> Result<usize, SessionNotFound> {
        let mut guard = self.inner.write().await;
        let turns = &mut guard
            .get_mut(session_id)
            .ok_or_else(|| SessionNotFound(session_id.to_string()))?
            .turns;
        turns.push(Turn::human(human));
        turns.push(Turn::assistant(assistant));
        Ok(turns.len())
    }

    pub async fn render_history(&self, session_id: &str) -> String {
        let guard = self.inner.read().await;
        guard.get(session_id).map(Transcript::render).unwrap_or_default()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.inner.read().await.contains_key(session_id)
    }

    /// Number of turns stored for a session; `None` if it was never created.
    pub async fn turn_count(&self, session_id: &str) -> Option<usize> {
        let guard = self.inner.read().await;
        guard.get(session_id).map(Transcript::len)
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
