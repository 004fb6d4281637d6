use crate::error::{GameError, GameResult};
use crate::types::*;
use rand::Rng;

/// Picks the impostor when a session starts
pub struct RoleAssigner;

impl RoleAssigner {
    /// Select one player uniformly at random from the full roster
    pub fn assign<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> GameResult<PlayerId> {
        if players.is_empty() {
            return Err(GameError::validation("Cannot assign roles to an empty roster"));
        }
        let index = rng.random_range(0..players.len());
        Ok(players[index].id.clone())
    }
}
