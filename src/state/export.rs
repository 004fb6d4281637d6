//! Session export/import for backup and restoration during live games.
//!
//! A snapshot carries the full session, roles and secret word included, so
//! exporting needs the session's host token.

use super::{normalize_code, AppState, Session};
use crate::error::{GameError, GameResult};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Schema version for export format compatibility
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Schema version for forward compatibility
    pub schema_version: u32,
    /// Export timestamp (ISO8601)
    pub exported_at: String,
    pub session: Session,
}

impl SessionSnapshot {
    pub fn new(session: Session) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: chrono::Utc::now().to_rfc3339(),
            session,
        }
    }

    /// Validate the snapshot before import
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version > EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Export schema version {} is newer than supported version {}. \
                 Please update the server.",
                self.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }

        let session = &self.session;
        if normalize_code(&session.code).is_empty() {
            return Err("Session has no join code".to_string());
        }
        if session.round() == 0 {
            return Err("Rounds start at 1".to_string());
        }
        match session.phase() {
            SessionPhase::Waiting | SessionPhase::Playing if session.winner().is_some() => {
                return Err("Only a finished session can have a winner".to_string());
            }
            SessionPhase::Playing if session.stage().is_none() => {
                return Err("Session in play has no turn order".to_string());
            }
            SessionPhase::Finished if session.winner().is_none() => {
                return Err("Finished session has no winner".to_string());
            }
            _ => {}
        }

        let impostors = session.players().iter().filter(|p| p.is_impostor).count();
        match session.phase() {
            SessionPhase::Waiting if impostors != 0 => {
                return Err("Waiting session already has an impostor".to_string());
            }
            SessionPhase::Playing | SessionPhase::Finished if impostors != 1 => {
                return Err(format!(
                    "Started session must have exactly one impostor, found {}",
                    impostors
                ));
            }
            _ => {}
        }

        for player in session.players() {
            if player.session_id != session.id {
                return Err(format!(
                    "Player '{}' belongs to session '{}'",
                    player.id, player.session_id
                ));
            }
        }

        for clue in session.clues().list_for_session() {
            if session.player(&clue.player_id).is_none() {
                return Err(format!(
                    "Clue in round {} references unknown player '{}'",
                    clue.round, clue.player_id
                ));
            }
        }

        Ok(())
    }
}

impl AppState {
    pub async fn export_session(
        &self,
        session_id: &str,
        host_token: &str,
    ) -> GameResult<SessionSnapshot> {
        let handle = self.session(session_id).await?;
        let session = handle.lock().await;
        session.authorize_host(host_token)?;
        Ok(SessionSnapshot::new(session.clone()))
    }

    /// Restore a snapshot as a new live session. Session id, join code and
    /// player ids must all be unused on this server.
    pub async fn import_session(&self, snapshot: SessionSnapshot) -> GameResult<SessionView> {
        snapshot.validate().map_err(GameError::Validation)?;

        let mut session = snapshot.session;
        session.code = normalize_code(&session.code);
        let player_ids: Vec<PlayerId> = session.players().iter().map(|p| p.id.clone()).collect();
        let session_id = session.id.clone();

        let handle = self.store.insert(session).await?;
        for player_id in &player_ids {
            if let Err(e) = self.store.index_player(player_id, &session_id).await {
                if let Err(cleanup) = self.store.remove(&session_id).await {
                    tracing::error!("Failed to roll back import of {}: {}", session_id, cleanup);
                }
                return Err(e.into());
            }
        }

        let view = handle.lock().await.view();
        tracing::info!(
            "Imported session {} with {} players",
            view.code,
            player_ids.len()
        );
        Ok(view)
    }
}
