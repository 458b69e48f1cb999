//! Room-polling job dispatch.
//!
//! The LiveKit room service exposes room listings but not the agent-dispatch
//! protocol, so assignment is done by polling: every interval, list the
//! active rooms and queue a job for each occupied room that does not have an
//! agent yet. Room metadata rides along as job metadata. A room that
//! disappears is forgotten, so a room re-created under the same name is
//! dispatched again.

use crate::error::SessionError;
use crate::job::{JobContext, JobDescriptor};
use crate::room::RoomHandle;
use crate::worker::JobDispatcher;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

/// A room as reported by the hosting platform's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub name: String,
    /// Room-level metadata, absent when the platform reports it empty.
    pub metadata: Option<String>,
    pub participants: u32,
}

/// Directory of rooms on the hosting platform.
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    async fn active_rooms(&self) -> Result<Vec<RoomInfo>, SessionError>;

    /// Opens a handle to the named room for an agent session.
    async fn open_room(self: Arc<Self>, name: &str) -> Result<Arc<dyn RoomHandle>, SessionError>;
}

pub struct DispatchPoller<D: RoomDirectory> {
    directory: Arc<D>,
    jobs: JobDispatcher,
    interval: Duration,
    dispatched: HashSet<String>,
}

impl<D: RoomDirectory> DispatchPoller<D> {
    pub fn new(directory: Arc<D>, jobs: JobDispatcher, interval: Duration) -> Self {
        Self {
            directory,
            jobs,
            interval,
            dispatched: HashSet::new(),
        }
    }

    /// Polls until the worker's job queue closes.
    ///
    /// The first poll runs immediately so a room that is already occupied at
    /// startup is served without waiting out a full interval.
    pub async fn run(mut self) {
        info!(interval_secs = self.interval.as_secs(), "starting room dispatch poller");

        loop {
            match self.directory.active_rooms().await {
                Ok(rooms) => {
                    if !self.poll_once(&rooms).await {
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "room listing failed, retrying next interval");
                }
            }

            sleep(self.interval).await;
        }
    }

    /// Dispatches jobs for one directory snapshot. Returns `false` when the
    /// worker is gone and polling should stop.
    async fn poll_once(&mut self, rooms: &[RoomInfo]) -> bool {
        // Forget rooms that no longer exist so a re-created room is
        // dispatched again.
        let current: HashSet<&str> = rooms.iter().map(|r| r.name.as_str()).collect();
        self.dispatched.retain(|name| current.contains(name.as_str()));

        for room in rooms {
            if room.participants == 0 || self.dispatched.contains(&room.name) {
                continue;
            }

            let handle = match Arc::clone(&self.directory).open_room(&room.name).await {
                Ok(handle) => handle,
                Err(e) => {
                    warn!(room = %room.name, error = %e, "could not open room, skipping");
                    continue;
                }
            };

            let descriptor = JobDescriptor {
                id: Uuid::new_v4().to_string(),
                room_name: room.name.clone(),
                metadata: room.metadata.clone(),
            };

            info!(job_id = %descriptor.id, room = %room.name, "dispatching job");

            if self
                .jobs
                .send(JobContext {
                    descriptor,
                    room: handle,
                })
                .await
                .is_err()
            {
                info!("job queue closed, stopping dispatch poller");
                return false;
            }

            self.dispatched.insert(room.name.clone());
        }

        true
    }
}
