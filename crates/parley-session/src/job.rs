//! Job assignment types handed to the agent by the hosting dispatch.

use crate::room::RoomHandle;
use std::fmt;
use std::sync::Arc;

/// One conversation request dispatched to this worker.
///
/// `metadata`, when present, is expected to be a JSON object; it is consumed
/// only by the instruction resolver and is otherwise opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    pub id: String,
    pub room_name: String,
    pub metadata: Option<String>,
}

/// A dispatched job together with the room it should be served in.
#[derive(Clone)]
pub struct JobContext {
    pub descriptor: JobDescriptor,
    pub room: Arc<dyn RoomHandle>,
}

impl fmt::Debug for JobContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobContext")
            .field("descriptor", &self.descriptor)
            .field("room", &self.room.name())
            .finish()
    }
}
