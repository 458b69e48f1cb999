//! Session core for the Parley voice agent.
//!
//! Covers everything between a dispatched job and an active conversation:
//! resolving effective agent instructions from job metadata, assembling a
//! session from capability providers (hosted STT/LLM/TTS, local VAD, turn
//! detection, noise cancellation), starting it against a LiveKit room, and
//! triggering the initial greeting.
//!
//! Speech recognition, language modeling, and synthesis are hosted services
//! selected by provider id; the media pipeline is the platform's. This crate
//! owns the control flow, not the inference.

pub mod bootstrap;
pub mod dispatch;
pub mod error;
pub mod job;
pub mod plugins;
pub mod profile;
pub mod providers;
pub mod room;
pub mod session;
pub mod worker;

pub use bootstrap::{Bootstrapper, JobHandler};
pub use dispatch::{DispatchPoller, RoomDirectory, RoomInfo};
pub use error::SessionError;
pub use job::{JobContext, JobDescriptor};
pub use plugins::{BackgroundVoiceCancellation, MultilingualTurnDetector, SileroVad};
pub use profile::{resolve_profile, AgentProfile, ConfigPayload, DEFAULT_INSTRUCTIONS};
pub use providers::{
    NoiseCancellation, RoomInputOptions, SessionConfig, TurnDetector, VadModel,
};
pub use room::{LiveKitRoom, LiveKitRoomService, RoomHandle, RoomServiceConfig};
pub use session::{AgentSession, SessionState};
pub use worker::{JobDispatcher, Worker, WorkerOptions};
