use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::SessionStore;
use crate::domain::{SessionId, SessionState};

pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Mutex<SessionState>>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn open(&self, id: &SessionId) -> Arc<Mutex<SessionState>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(id.clone())
            .or_insert_with(|| {
                debug!("Created session {}", id);
                Arc::new(Mutex::new(SessionState::new()))
            })
            .clone()
    }

    async fn get(&self, id: &SessionId) -> Option<Arc<Mutex<SessionState>>> {
        self.sessions.lock().await.get(id).cloned()
    }

    async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
