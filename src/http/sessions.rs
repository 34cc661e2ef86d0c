//! Open SSE sessions keyed by the id handed to the client in the `endpoint` event.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

const SESSION_BUFFER: usize = 32;

pub type SessionSender = mpsc::Sender<Value>;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, SessionSender>>,
}

impl SessionRegistry {
    /// Registers a new session. The entry lives as long as the returned guard.
    pub fn open(self: &Arc<Self>) -> (Uuid, mpsc::Receiver<Value>, SessionGuard) {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::channel(SESSION_BUFFER);
        self.lock().insert(id, sender);

        let guard = SessionGuard {
            id,
            registry: Arc::clone(self),
        };
        (id, receiver, guard)
    }

    pub fn sender(&self, id: &Uuid) -> Option<SessionSender> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn remove(&self, id: &Uuid) {
        self.lock().remove(id);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionSender>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
pub struct SessionGuard {
    id: Uuid,
    registry: Arc<SessionRegistry>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
        debug!(session_id = %self.id, "sse session closed");
    }
}
