//! Capability provider interfaces.
//!
//! STT, LLM, and TTS are hosted services selected by opaque provider ids; the
//! media platform routes audio and text to them. VAD, turn detection, and
//! noise cancellation are local model handles passed through to the media
//! pipeline. None of the inference happens in this crate, so the interfaces
//! carry identity, not compute.

use std::fmt;
use std::sync::Arc;

/// Voice-activity detection model handle.
pub trait VadModel: fmt::Debug + Send + Sync {
    /// Identifier advertised to the media pipeline.
    fn descriptor(&self) -> &str;
}

/// Turn-detection model handle.
pub trait TurnDetector: fmt::Debug + Send + Sync {
    fn descriptor(&self) -> &str;
}

/// Noise-cancellation capability handle.
pub trait NoiseCancellation: fmt::Debug + Send + Sync {
    fn descriptor(&self) -> &str;
}

/// Capability providers a session is assembled from.
///
/// Fixed per worker process; every job gets the same provider set.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Hosted STT model id, e.g. `assemblyai/universal-streaming:en`.
    pub stt: String,
    /// Hosted LLM id, e.g. `openai/gpt-4.1-mini`.
    pub llm: String,
    /// Hosted TTS model id (with voice), e.g. `cartesia/sonic-2:<voice>`.
    pub tts: String,
    pub vad: Arc<dyn VadModel>,
    pub turn_detection: Arc<dyn TurnDetector>,
    pub noise_cancellation: Arc<dyn NoiseCancellation>,
}

/// Room-level input options applied when a session attaches.
#[derive(Debug, Clone, Default)]
pub struct RoomInputOptions {
    pub noise_cancellation: Option<Arc<dyn NoiseCancellation>>,
}
