//! Per-job session bootstrap.

use crate::error::SessionError;
use crate::job::JobContext;
use crate::profile::resolve_profile;
use crate::providers::{RoomInputOptions, SessionConfig};
use crate::session::AgentSession;
use async_trait::async_trait;

/// The entrypoint the worker invokes once per dispatched job.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, ctx: JobContext) -> Result<(), SessionError>;
}

/// Resolves the agent profile for a job, assembles a session from the fixed
/// provider set, starts it against the job's room, and triggers the initial
/// greeting reply.
///
/// Instruction resolution never fails; everything after it propagates errors
/// unmodified so infrastructure failures surface through the worker's
/// job-failure path instead of being swallowed.
pub struct Bootstrapper {
    session_config: SessionConfig,
}

impl Bootstrapper {
    pub fn new(session_config: SessionConfig) -> Self {
        Self { session_config }
    }
}

#[async_trait]
impl JobHandler for Bootstrapper {
    async fn handle(&self, ctx: JobContext) -> Result<(), SessionError> {
        let profile = resolve_profile(ctx.descriptor.metadata.as_deref());

        let mut session = AgentSession::new(self.session_config.clone(), profile);

        let options = RoomInputOptions {
            noise_cancellation: Some(self.session_config.noise_cancellation.clone()),
        };
        session.start(ctx.room.clone(), &options).await?;

        // Greet proactively instead of waiting for the user to speak first.
        session.generate_reply().await?;

        // The transport owns the conversation from here; the session stays
        // Active until the room closes.
        Ok(())
    }
}
