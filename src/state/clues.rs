use crate::types::*;
use serde::{Deserialize, Serialize};

/// Append-only record of the clues given in one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueLog {
    session_id: SessionId,
    entries: Vec<Clue>,
}

impl ClueLog {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            entries: Vec::new(),
        }
    }

    /// Record a clue. Order is assigned per round, starting at 0.
    pub fn append(&mut self, player_id: &str, round: u32, text: &str) -> &Clue {
        let order = self.entries.iter().filter(|c| c.round == round).count() as u32;
        self.entries.push(Clue {
            session_id: self.session_id.clone(),
            player_id: player_id.to_string(),
            round,
            text: text.trim().to_string(),
            order,
            created_at: chrono::Utc::now().to_rfc3339(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All clues of the session ordered by round, then submission order
    pub fn list_for_session(&self) -> Vec<&Clue> {
        let mut clues: Vec<_> = self.entries.iter().collect();
        clues.sort_by_key(|c| (c.round, c.order));
        clues
    }
}
