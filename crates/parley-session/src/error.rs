use crate::session::SessionState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("LiveKit API error: {0}")]
    LiveKit(#[from] livekit_api::access_token::AccessTokenError),

    #[error("Room service error: {0}")]
    RoomService(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Reply generation error: {0}")]
    Reply(String),

    #[error("Invalid session transition: {from:?} -> {to:?}")]
    InvalidState {
        from: SessionState,
        to: SessionState,
    },
}
