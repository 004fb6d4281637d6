//! Storage seam for sessions.
//!
//! The game core only needs lookups and inserts; each stored session is a
//! handle to its own lock so operations on different sessions never contend.

use super::session::Session;
use crate::error::StoreError;
use crate::types::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared, individually locked session
pub type SessionHandle = Arc<Mutex<Session>>;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session. Fails with `DuplicateCode` if the join code is
    /// taken and `DuplicateSession` if the id is.
    async fn insert(&self, session: Session) -> StoreResult<SessionHandle>;

    /// Drop a session together with its code and player entries
    async fn remove(&self, session_id: &str) -> StoreResult<()>;

    async fn get(&self, session_id: &str) -> StoreResult<Option<SessionHandle>>;

    /// Look up by normalized join code
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<SessionHandle>>;

    /// Remember which session a player belongs to. A player never moves to
    /// another session (`PlayerConflict`).
    async fn index_player(&self, player_id: &str, session_id: &str) -> StoreResult<()>;

    async fn find_by_player(&self, player_id: &str) -> StoreResult<Option<SessionHandle>>;

    async fn session_count(&self) -> StoreResult<usize>;
}

/// In-process store, lives as long as the server does
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    codes: RwLock<HashMap<JoinCode, SessionId>>,
    players: RwLock<HashMap<PlayerId, SessionId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(&self, session: Session) -> StoreResult<SessionHandle> {
        // Hold the code index for the whole insert so two creates can't race
        let mut codes = self.codes.write().await;
        if codes.contains_key(&session.code) {
            return Err(StoreError::DuplicateCode(session.code));
        }
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(StoreError::DuplicateSession(session.id));
        }

        let id = session.id.clone();
        codes.insert(session.code.clone(), id.clone());
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(id, handle.clone());
        Ok(handle)
    }

    async fn remove(&self, session_id: &str) -> StoreResult<()> {
        let mut codes = self.codes.write().await;
        let mut sessions = self.sessions.write().await;
        if sessions.remove(session_id).is_some() {
            codes.retain(|_, id| id.as_str() != session_id);
            self.players
                .write()
                .await
                .retain(|_, id| id.as_str() != session_id);
        }
        Ok(())
    }

    async fn get(&self, session_id: &str) -> StoreResult<Option<SessionHandle>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> StoreResult<Option<SessionHandle>> {
        let session_id = match self.codes.read().await.get(code) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        self.get(&session_id).await
    }

    async fn index_player(&self, player_id: &str, session_id: &str) -> StoreResult<()> {
        let mut players = self.players.write().await;
        match players.get(player_id) {
            Some(existing) if existing.as_str() != session_id => {
                Err(StoreError::PlayerConflict(player_id.to_string()))
            }
            Some(_) => Ok(()),
            None => {
                players.insert(player_id.to_string(), session_id.to_string());
                Ok(())
            }
        }
    }

    async fn find_by_player(&self, player_id: &str) -> StoreResult<Option<SessionHandle>> {
        let session_id = match self.players.read().await.get(player_id) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        self.get(&session_id).await
    }

    async fn session_count(&self) -> StoreResult<usize> {
        Ok(self.sessions.read().await.len())
    }
}
