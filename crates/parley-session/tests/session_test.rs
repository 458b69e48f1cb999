//! Session lifecycle and bootstrap behavior against a scripted room.

use async_trait::async_trait;
use parley_session::{
    AgentProfile, AgentSession, BackgroundVoiceCancellation, Bootstrapper, JobContext,
    JobDescriptor, JobHandler, MultilingualTurnDetector, NoiseCancellation, RoomHandle,
    RoomInputOptions, SessionConfig, SessionError, SessionState, SileroVad, DEFAULT_INSTRUCTIONS,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted room that records every call and can fail on demand.
#[derive(Default)]
struct ScriptedRoom {
    fail_attach: bool,
    fail_reply: bool,
    attaches: AtomicUsize,
    replies: Mutex<Vec<String>>,
    detaches: AtomicUsize,
    noise_cancellation_seen: Mutex<Option<String>>,
}

#[async_trait]
impl RoomHandle for ScriptedRoom {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn attach(&self, options: &RoomInputOptions) -> Result<(), SessionError> {
        if self.fail_attach {
            return Err(SessionError::RoomService("attach refused".to_string()));
        }
        self.attaches.fetch_add(1, Ordering::SeqCst);
        *self.noise_cancellation_seen.lock().unwrap() = options
            .noise_cancellation
            .as_deref()
            .map(|nc| nc.descriptor().to_string());
        Ok(())
    }

    async fn request_reply(&self, instructions: &str) -> Result<(), SessionError> {
        if self.fail_reply {
            return Err(SessionError::Reply("pipeline unavailable".to_string()));
        }
        self.replies.lock().unwrap().push(instructions.to_string());
        Ok(())
    }

    async fn detach(&self) -> Result<(), SessionError> {
        self.detaches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn session_config() -> SessionConfig {
    SessionConfig {
        stt: "assemblyai/universal-streaming:en".to_string(),
        llm: "openai/gpt-4.1-mini".to_string(),
        tts: "cartesia/sonic-2:9626c31c-bec5-4cca-baa8-f8ba9e84c8bc".to_string(),
        vad: Arc::new(SileroVad::load()),
        turn_detection: Arc::new(MultilingualTurnDetector::new()),
        noise_cancellation: Arc::new(BackgroundVoiceCancellation::new()),
    }
}

fn job(metadata: Option<&str>, room: Arc<ScriptedRoom>) -> JobContext {
    JobContext {
        descriptor: JobDescriptor {
            id: "job-1".to_string(),
            room_name: "scripted".to_string(),
            metadata: metadata.map(str::to_string),
        },
        room,
    }
}

#[tokio::test]
async fn successful_start_reaches_active() {
    let room = Arc::new(ScriptedRoom::default());
    let mut session = AgentSession::new(session_config(), AgentProfile::default());
    assert_eq!(session.state(), SessionState::Configuring);

    session
        .start(room.clone(), &RoomInputOptions::default())
        .await
        .expect("start succeeds");
    assert_eq!(session.state(), SessionState::Active);
    assert_eq!(room.attaches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn attach_failure_moves_session_to_failed() {
    let room = Arc::new(ScriptedRoom {
        fail_attach: true,
        ..Default::default()
    });
    let mut session = AgentSession::new(session_config(), AgentProfile::default());

    let err = session
        .start(room, &RoomInputOptions::default())
        .await
        .expect_err("attach must fail");
    assert!(matches!(err, SessionError::RoomService(_)));
    assert_eq!(session.state(), SessionState::Failed);
}

#[tokio::test]
async fn reply_refused_before_active() {
    let mut session = AgentSession::new(session_config(), AgentProfile::default());

    let err = session
        .generate_reply()
        .await
        .expect_err("reply must be refused while configuring");
    assert!(matches!(err, SessionError::InvalidState { .. }));
}

#[tokio::test]
async fn reply_failure_moves_session_to_failed() {
    let room = Arc::new(ScriptedRoom {
        fail_reply: true,
        ..Default::default()
    });
    let mut session = AgentSession::new(session_config(), AgentProfile::default());

    session
        .start(room, &RoomInputOptions::default())
        .await
        .expect("start succeeds");
    let err = session
        .generate_reply()
        .await
        .expect_err("reply must fail");
    assert!(matches!(err, SessionError::Reply(_)));
    assert_eq!(session.state(), SessionState::Failed);
}

#[tokio::test]
async fn close_detaches_and_ends() {
    let room = Arc::new(ScriptedRoom::default());
    let mut session = AgentSession::new(session_config(), AgentProfile::default());

    session
        .start(room.clone(), &RoomInputOptions::default())
        .await
        .expect("start succeeds");
    session.close().await.expect("close succeeds");

    assert_eq!(session.state(), SessionState::Ended);
    assert_eq!(room.detaches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn double_start_is_an_invalid_transition() {
    let room = Arc::new(ScriptedRoom::default());
    let mut session = AgentSession::new(session_config(), AgentProfile::default());

    session
        .start(room.clone(), &RoomInputOptions::default())
        .await
        .expect("first start succeeds");
    let err = session
        .start(room, &RoomInputOptions::default())
        .await
        .expect_err("second start must be rejected");
    assert!(matches!(err, SessionError::InvalidState { .. }));
}

#[tokio::test]
async fn bootstrap_greets_with_custom_instructions() {
    let room = Arc::new(ScriptedRoom::default());
    let handler = Bootstrapper::new(session_config());

    handler
        .handle(job(
            Some(r#"{"prompt_instructions": "Be terse."}"#),
            room.clone(),
        ))
        .await
        .expect("job succeeds");

    let replies = room.replies.lock().unwrap();
    assert_eq!(replies.as_slice(), ["Be terse."]);
}

#[tokio::test]
async fn bootstrap_falls_back_to_default_on_bad_metadata() {
    let room = Arc::new(ScriptedRoom::default());
    let handler = Bootstrapper::new(session_config());

    handler
        .handle(job(Some("not json"), room.clone()))
        .await
        .expect("malformed metadata must not fail the job");

    let replies = room.replies.lock().unwrap();
    assert_eq!(replies.as_slice(), [DEFAULT_INSTRUCTIONS]);
}

#[tokio::test]
async fn bootstrap_enables_noise_cancellation() {
    let room = Arc::new(ScriptedRoom::default());
    let handler = Bootstrapper::new(session_config());

    handler
        .handle(job(None, room.clone()))
        .await
        .expect("job succeeds");

    assert_eq!(
        room.noise_cancellation_seen.lock().unwrap().as_deref(),
        Some("noise-cancellation/bvc")
    );
}

#[tokio::test]
async fn bootstrap_propagates_room_failures() {
    let room = Arc::new(ScriptedRoom {
        fail_attach: true,
        ..Default::default()
    });
    let handler = Bootstrapper::new(session_config());

    let err = handler
        .handle(job(None, room))
        .await
        .expect_err("infrastructure failure must surface");
    assert!(matches!(err, SessionError::RoomService(_)));
}
