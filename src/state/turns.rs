use crate::error::{GameError, GameResult};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Clue-giving order for one round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnScheduler {
    order: Vec<TurnInfo>,
    cursor: usize,
}

impl TurnScheduler {
    /// Build the order from the living players, in join order
    pub fn new(players: &[Player]) -> Self {
        let mut alive: Vec<_> = players.iter().filter(|p| p.alive).collect();
        alive.sort_by_key(|p| p.join_order);

        Self {
            order: alive
                .into_iter()
                .map(|p| TurnInfo {
                    player_id: p.id.clone(),
                    name: p.name.clone(),
                })
                .collect(),
            cursor: 0,
        }
    }

    /// The player expected to give the next clue
    pub fn current_turn(&self) -> GameResult<&TurnInfo> {
        self.order
            .get(self.cursor)
            .ok_or_else(|| GameError::state("All clues for this round are in, voting is open"))
    }

    /// Reject anyone but the current player
    pub fn check_turn(&self, player_id: &str) -> GameResult<()> {
        let expected = self.current_turn()?;
        if expected.player_id != player_id {
            return Err(GameError::state(format!(
                "It is {}'s turn to give a clue",
                expected.name
            )));
        }
        Ok(())
    }

    pub fn advance(&mut self) {
        if self.cursor < self.order.len() {
            self.cursor += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.order.len()
    }
}
