//! Builtin capability handles.
//!
//! These are the identity-bearing plugin objects wired into a
//! [`SessionConfig`](crate::SessionConfig). The models themselves run inside
//! the media pipeline; the handles here only name what the pipeline should
//! load.

use crate::providers::{NoiseCancellation, TurnDetector, VadModel};

/// Silero voice-activity detection.
#[derive(Debug, Clone)]
pub struct SileroVad {
    descriptor: String,
}

impl SileroVad {
    /// Loads the bundled Silero VAD model handle.
    pub fn load() -> Self {
        Self {
            descriptor: "silero/vad".to_string(),
        }
    }
}

impl VadModel for SileroVad {
    fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

/// Multilingual end-of-turn detection model.
#[derive(Debug, Clone)]
pub struct MultilingualTurnDetector {
    descriptor: String,
}

impl MultilingualTurnDetector {
    pub fn new() -> Self {
        Self {
            descriptor: "turn-detector/multilingual".to_string(),
        }
    }
}

impl Default for MultilingualTurnDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnDetector for MultilingualTurnDetector {
    fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

/// Background voice cancellation (BVC).
#[derive(Debug, Clone)]
pub struct BackgroundVoiceCancellation {
    descriptor: String,
}

impl BackgroundVoiceCancellation {
    pub fn new() -> Self {
        Self {
            descriptor: "noise-cancellation/bvc".to_string(),
        }
    }
}

impl Default for BackgroundVoiceCancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseCancellation for BackgroundVoiceCancellation {
    fn descriptor(&self) -> &str {
        &self.descriptor
    }
}
