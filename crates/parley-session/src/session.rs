//! The per-job conversation session and its lifecycle.

use crate::error::SessionError;
use crate::profile::AgentProfile;
use crate::providers::{RoomInputOptions, SessionConfig, TurnDetector, VadModel};
use crate::room::RoomHandle;
use std::sync::Arc;
use tracing::{debug, info};

/// Session lifecycle states.
///
/// `Created → Configuring → Starting → Active → (Ended | Failed)`; any state
/// may move to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Configuring,
    Starting,
    Active,
    Ended,
    Failed,
}

impl SessionState {
    fn can_transition(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Created, SessionState::Configuring)
                | (SessionState::Configuring, SessionState::Starting)
                | (SessionState::Starting, SessionState::Active)
                | (SessionState::Active, SessionState::Ended)
        ) || next == SessionState::Failed
    }
}

/// A conversation session bound to capability providers and, once started, a
/// room.
///
/// Owns its [`AgentProfile`] exclusively; the profile is never mutated after
/// construction.
pub struct AgentSession {
    config: SessionConfig,
    profile: AgentProfile,
    state: SessionState,
    room: Option<Arc<dyn RoomHandle>>,
}

impl AgentSession {
    /// Assembles a session from providers and a resolved profile.
    ///
    /// The session comes out in `Configuring`: providers are attached, the
    /// room is not.
    pub fn new(config: SessionConfig, profile: AgentProfile) -> Self {
        // Providers are attached by construction, so the session passes
        // straight through Created into Configuring.
        debug!(
            from = ?SessionState::Created,
            to = ?SessionState::Configuring,
            "session transition"
        );
        Self {
            config,
            profile,
            state: SessionState::Configuring,
            room: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }

    fn transition(&mut self, next: SessionState) -> Result<(), SessionError> {
        if !self.state.can_transition(next) {
            return Err(SessionError::InvalidState {
                from: self.state,
                to: next,
            });
        }
        debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
        Ok(())
    }

    /// Starts the session against a room.
    ///
    /// An attach failure moves the session to `Failed` and propagates the
    /// error unmodified.
    pub async fn start(
        &mut self,
        room: Arc<dyn RoomHandle>,
        options: &RoomInputOptions,
    ) -> Result<(), SessionError> {
        self.transition(SessionState::Starting)?;

        if let Err(e) = room.attach(options).await {
            self.state = SessionState::Failed;
            return Err(e);
        }

        info!(
            room = room.name(),
            stt = %self.config.stt,
            llm = %self.config.llm,
            tts = %self.config.tts,
            vad = self.config.vad.descriptor(),
            turn_detection = self.config.turn_detection.descriptor(),
            "session active"
        );

        self.room = Some(room);
        self.transition(SessionState::Active)?;
        Ok(())
    }

    /// Requests an initial generated reply so the agent greets proactively.
    ///
    /// Only valid while `Active`; a generation failure moves the session to
    /// `Failed` and propagates the error unmodified.
    pub async fn generate_reply(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Active {
            return Err(SessionError::InvalidState {
                from: self.state,
                to: SessionState::Active,
            });
        }

        let room = self
            .room
            .as_ref()
            .ok_or_else(|| SessionError::Reply("session has no room".to_string()))?;

        if let Err(e) = room.request_reply(self.profile.instructions()).await {
            self.state = SessionState::Failed;
            return Err(e);
        }

        Ok(())
    }

    /// Ends the session, detaching the agent from its room.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        self.transition(SessionState::Ended)?;

        if let Some(room) = self.room.take() {
            room.detach().await?;
        }

        Ok(())
    }
}
