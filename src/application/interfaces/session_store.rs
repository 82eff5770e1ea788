use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{SessionId, SessionState};

/// Session-scoped state, alive from the first interaction until the session
/// ends.
///
/// Each session sits behind its own mutex; an action holds the lock for its
/// whole duration so two in-flight actions never interleave on one history.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the session's state, creating it on first use.
    async fn open(&self, id: &SessionId) -> Arc<Mutex<SessionState>>;

    /// Return the session's state if it has been opened, without creating it.
    async fn get(&self, id: &SessionId) -> Option<Arc<Mutex<SessionState>>>;

    async fn len(&self) -> usize;
}
