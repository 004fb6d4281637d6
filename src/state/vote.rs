use crate::error::{GameError, GameResult};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of resolving a vote
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub eliminated: PlayerId,
    pub votes: u32,
    pub tie: bool,
}

/// Vote counts live on the players; the tally remembers who voted for whom
/// when the voter identifies themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteTally {
    /// voter id -> target id
    ballots: HashMap<PlayerId, PlayerId>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one vote against `target`. An identified voter who votes again
    /// moves their ballot instead of adding a second one.
    pub fn cast(
        &mut self,
        players: &mut [Player],
        target: &str,
        voter: Option<&str>,
    ) -> GameResult<()> {
        if !players.iter().any(|p| p.id == target && p.alive) {
            return Err(GameError::not_found(format!(
                "No living player {} in this session",
                target
            )));
        }

        if let Some(voter) = voter {
            let voter_player = players
                .iter()
                .find(|p| p.id == voter)
                .ok_or_else(|| GameError::not_found(format!("Voter {} not found", voter)))?;
            if !voter_player.alive {
                return Err(GameError::state("Eliminated players cannot vote"));
            }

            if let Some(previous) = self.ballots.insert(voter.to_string(), target.to_string()) {
                if let Some(p) = players.iter_mut().find(|p| p.id == previous) {
                    p.vote_count = p.vote_count.saturating_sub(1);
                }
            }
        }

        if let Some(p) = players.iter_mut().find(|p| p.id == target) {
            p.vote_count += 1;
        }
        Ok(())
    }

    /// Living player with the most votes; ties go to the earliest joiner
    pub fn resolve(players: &[Player]) -> Option<Resolution> {
        let mut alive: Vec<_> = players.iter().filter(|p| p.alive).collect();
        alive.sort_by_key(|p| p.join_order);

        let top = alive.iter().map(|p| p.vote_count).max()?;
        let mut leaders = alive.iter().filter(|p| p.vote_count == top);
        let first = leaders.next()?;

        Some(Resolution {
            eliminated: first.id.clone(),
            votes: top,
            tie: leaders.next().is_some(),
        })
    }

    pub fn total_votes(players: &[Player]) -> u32 {
        players.iter().filter(|p| p.alive).map(|p| p.vote_count).sum()
    }

    /// Clear every count and remembered ballot
    pub fn reset(&mut self, players: &mut [Player]) {
        self.ballots.clear();
        for p in players.iter_mut() {
            p.vote_count = 0;
        }
    }
}
