use super::clues::ClueLog;
use super::outcome::{Verdict, WinEvaluator};
use super::roles::RoleAssigner;
use super::turns::TurnScheduler;
use super::vote::VoteTally;
use crate::error::{GameError, GameResult};
use crate::types::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Normalize a word for comparison (trim whitespace, lowercase)
fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// One game from lobby to result. Every mutation goes through these methods
/// while the caller holds the session lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub code: JoinCode,
    pub category: String,
    pub created_at: String,
    secret_word: String,
    /// Proof of being the creator, needed for host-only operations
    host_token: String,
    phase: SessionPhase,
    round: u32,
    winner: Option<Winner>,
    /// Roster in join order
    players: Vec<Player>,
    turns: Option<TurnScheduler>,
    tally: VoteTally,
    clues: ClueLog,
    rules: SessionRules,
    version: u64,
}

impl Session {
    pub fn new(
        id: SessionId,
        code: JoinCode,
        category: String,
        secret_word: String,
        rules: SessionRules,
    ) -> Self {
        Self {
            clues: ClueLog::new(id.clone()),
            id,
            code,
            category,
            created_at: chrono::Utc::now().to_rfc3339(),
            secret_word,
            host_token: ulid::Ulid::new().to_string(),
            phase: SessionPhase::Waiting,
            round: 1,
            winner: None,
            players: Vec::new(),
            turns: None,
            tally: VoteTally::new(),
            rules,
            version: 1,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn host_token(&self) -> &str {
        &self.host_token
    }

    /// Reject callers that do not hold the host token
    pub fn authorize_host(&self, token: &str) -> GameResult<()> {
        if token.is_empty() || token != self.host_token {
            return Err(GameError::forbidden(
                "Only the host of this session may do that",
            ));
        }
        Ok(())
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn impostor(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_impostor)
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn clues(&self) -> &ClueLog {
        &self.clues
    }

    /// Sub-phase of the current round, only while PLAYING
    pub fn stage(&self) -> Option<RoundStage> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        self.turns.as_ref().map(|t| {
            if t.is_complete() {
                RoundStage::Voting
            } else {
                RoundStage::Clues
            }
        })
    }

    fn ensure_playing(&self) -> GameResult<()> {
        match self.phase {
            SessionPhase::Playing => Ok(()),
            SessionPhase::Waiting => Err(GameError::state("The game has not started yet")),
            SessionPhase::Finished => Err(GameError::state("The game is already over")),
        }
    }

    fn finish(&mut self, winner: Winner) {
        self.phase = SessionPhase::Finished;
        self.winner = Some(winner);
        self.turns = None;
        tracing::info!("Session {} finished, winner: {:?}", self.code, winner);
    }

    /// Add a player to the lobby
    pub fn join(&mut self, name: &str) -> GameResult<Player> {
        let player = self.admit(name)?;
        self.seat(player.clone());
        Ok(player)
    }

    /// Check a join request and build the player without seating them
    pub fn admit(&self, name: &str) -> GameResult<Player> {
        if self.phase != SessionPhase::Waiting {
            return Err(GameError::state("The game has already started"));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::validation("Player name cannot be empty"));
        }
        if name.chars().count() > self.rules.max_name_chars {
            return Err(GameError::validation(format!(
                "Player name is longer than {} characters",
                self.rules.max_name_chars
            )));
        }

        let player = Player {
            id: ulid::Ulid::new().to_string(),
            session_id: self.id.clone(),
            name: name.to_string(),
            is_impostor: false,
            alive: true,
            vote_count: 0,
            join_order: self.players.len() as u32,
        };
        Ok(player)
    }

    /// Put an admitted player on the roster
    pub fn seat(&mut self, player: Player) {
        self.players.push(player);
        self.version += 1;
    }

    /// Assign the impostor and open round 1. Returns the impostor's id.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<PlayerId> {
        if self.phase != SessionPhase::Waiting {
            return Err(GameError::state("The game has already started"));
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::validation(format!(
                "At least {} players are needed to start, {} joined",
                MIN_PLAYERS,
                self.players.len()
            )));
        }

        let impostor_id = RoleAssigner::assign(&self.players, rng)?;
        for player in &mut self.players {
            player.is_impostor = player.id == impostor_id;
        }

        self.phase = SessionPhase::Playing;
        self.round = 1;
        self.tally.reset(&mut self.players);
        self.turns = Some(TurnScheduler::new(&self.players));
        self.version += 1;

        tracing::info!(
            "Session {} started with {} players",
            self.code,
            self.players.len()
        );
        Ok(impostor_id)
    }

    /// Player expected to give the next clue
    pub fn current_turn(&self) -> GameResult<&TurnInfo> {
        self.ensure_playing()?;
        self.turns
            .as_ref()
            .ok_or_else(|| GameError::state("No round in progress"))?
            .current_turn()
    }

    /// Record a clue from the player whose turn it is
    pub fn submit_clue(
        &mut self,
        player_id: &str,
        text: &str,
        round: Option<u32>,
    ) -> GameResult<Clue> {
        self.ensure_playing()?;
        if self.player(player_id).is_none() {
            return Err(GameError::not_found(format!("Player {} not found", player_id)));
        }
        if let Some(r) = round {
            if r != self.round {
                return Err(GameError::state(format!(
                    "Clue is for round {} but the current round is {}",
                    r, self.round
                )));
            }
        }

        let turns = self
            .turns
            .as_mut()
            .ok_or_else(|| GameError::state("No round in progress"))?;
        turns.check_turn(player_id)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(GameError::validation("Clue cannot be empty"));
        }
        if text.chars().count() > self.rules.max_clue_chars {
            return Err(GameError::validation(format!(
                "Clue is longer than {} characters",
                self.rules.max_clue_chars
            )));
        }

        turns.advance();
        let voting_open = turns.is_complete();
        let clue = self.clues.append(player_id, self.round, text).clone();
        self.version += 1;

        if voting_open {
            tracing::info!("Session {} round {}: voting open", self.code, self.round);
        }
        Ok(clue)
    }

    /// Vote against a living player once the clue phase is over
    pub fn cast_vote(&mut self, target: &str, voter: Option<&str>) -> GameResult<()> {
        self.ensure_playing()?;
        if self.stage() != Some(RoundStage::Voting) {
            return Err(GameError::state(
                "Voting opens once every living player has given a clue",
            ));
        }

        self.tally.cast(&mut self.players, target, voter)?;
        self.version += 1;
        Ok(())
    }

    /// Eliminate the most-voted player and decide whether the game goes on
    pub fn resolve_elimination(&mut self) -> GameResult<EliminationOutcome> {
        self.ensure_playing()?;
        if self.stage() != Some(RoundStage::Voting) {
            return Err(GameError::state("There is no vote to resolve yet"));
        }
        if VoteTally::total_votes(&self.players) == 0 {
            return Err(GameError::state("No votes have been cast this round"));
        }

        let resolution = VoteTally::resolve(&self.players)
            .ok_or_else(|| GameError::state("No living players to eliminate"))?;

        let eliminated = self
            .players
            .iter_mut()
            .find(|p| p.id == resolution.eliminated)
            .ok_or_else(|| GameError::not_found("Eliminated player vanished from roster"))?;
        eliminated.alive = false;
        let was_impostor = eliminated.is_impostor;
        let eliminated_info = PlayerInfo::from(&*eliminated);
        tracing::info!(
            "Session {}: {} eliminated with {} votes{}",
            self.code,
            eliminated_info.name,
            resolution.votes,
            if resolution.tie { " (tie)" } else { "" }
        );

        self.tally.reset(&mut self.players);

        let impostor_alive = self.players.iter().any(|p| p.is_impostor && p.alive);
        match WinEvaluator::evaluate(was_impostor, impostor_alive, self.alive_count()) {
            Verdict::Finished(winner) => self.finish(winner),
            Verdict::Continue => {
                self.round += 1;
                self.turns = Some(TurnScheduler::new(&self.players));
                tracing::info!("Session {} moves to round {}", self.code, self.round);
            }
        }
        self.version += 1;

        Ok(EliminationOutcome {
            eliminated: eliminated_info,
            was_impostor,
            tie: resolution.tie,
            phase: self.phase,
            winner: self.winner,
            round: self.round,
        })
    }

    /// The impostor's attempt to name the secret word
    pub fn guess_word(&mut self, player_id: &str, guess: &str) -> GameResult<GuessOutcome> {
        self.ensure_playing()?;
        let player = self
            .player(player_id)
            .ok_or_else(|| GameError::not_found(format!("Player {} not found", player_id)))?;
        if !player.is_impostor {
            return Err(GameError::state("Only the impostor can guess the word"));
        }
        if guess.trim().is_empty() {
            return Err(GameError::validation("Guess cannot be empty"));
        }

        let correct = normalize(guess) == normalize(&self.secret_word);
        if correct {
            self.finish(Winner::Impostor);
            self.version += 1;
        }

        Ok(GuessOutcome {
            correct,
            phase: self.phase,
            winner: self.winner,
        })
    }

    /// Role information for one player, available once roles exist
    pub fn player_card(&self, player_id: &str) -> GameResult<PlayerCard> {
        let player = self
            .player(player_id)
            .ok_or_else(|| GameError::not_found(format!("Player {} not found", player_id)))?;
        if self.phase == SessionPhase::Waiting {
            return Err(GameError::state("Roles are assigned when the game starts"));
        }

        Ok(PlayerCard {
            player_id: player.id.clone(),
            is_impostor: player.is_impostor,
            word: if player.is_impostor {
                None
            } else {
                Some(self.secret_word.to_uppercase())
            },
        })
    }

    /// Public snapshot for polling clients; carries neither roles nor the word
    pub fn view(&self) -> SessionView {
        let clues = self
            .clues
            .list_for_session()
            .into_iter()
            .map(|c| ClueInfo {
                round: c.round,
                order: c.order,
                player_id: c.player_id.clone(),
                player_name: self
                    .player(&c.player_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                text: c.text.clone(),
            })
            .collect();

        SessionView {
            id: self.id.clone(),
            code: self.code.clone(),
            category: self.category.clone(),
            phase: self.phase,
            stage: self.stage(),
            round: self.round,
            winner: self.winner,
            current_turn: self.current_turn().ok().cloned(),
            players: self.players.iter().map(PlayerInfo::from).collect(),
            clues,
            version: self.version,
        }
    }
}
