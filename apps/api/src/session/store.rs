use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::accounting::{reduce, Action, Effect};
use crate::session::models::SessionState;

pub type SessionHandle = Arc<Mutex<SessionState>>;

/// In-memory registry of live sessions. State is discarded when a session
/// is deleted or the process exits.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(SessionState::default())));
        info!(session_id = %id, "session created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!(session_id = %id, "session ended"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Looks up a session and takes exclusive access to it. A session that is
    /// already locked has a request in flight; the caller is refused, not queued.
    pub async fn acquire(&self, id: Uuid) -> Result<OwnedMutexGuard<SessionState>, AppError> {
        self.get(id)
            .await?
            .try_lock_owned()
            .map_err(|_| AppError::SessionBusy(id))
    }

    /// Looks up a session for reading. Waits for an in-flight turn to finish,
    /// so the caller always sees the state between turns.
    pub async fn read(&self, id: Uuid) -> Result<OwnedMutexGuard<SessionState>, AppError> {
        Ok(self.get(id).await?.lock_owned().await)
    }
}

/// Runs one action through the reducer against a locked session.
pub fn dispatch(state: &mut SessionState, action: Action) -> Vec<Effect> {
    let current = std::mem::take(state);
    let (next, effects) = reduce(current, action);
    *state = next;
    effects
}
