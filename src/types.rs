use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type SessionId = String;
pub type PlayerId = String;
pub type JoinCode = String;

/// Minimum roster size before a session may start
pub const MIN_PLAYERS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionPhase {
    Waiting,
    Playing,
    Finished,
}

/// Sub-phase of a round while the session is PLAYING
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStage {
    Clues,
    Voting,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Players,
    Impostor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub session_id: SessionId,
    pub name: String,
    pub is_impostor: bool,
    pub alive: bool,
    pub vote_count: u32,
    /// Position in the roster, defines turn order
    pub join_order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Clue {
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub round: u32,
    pub text: String,
    /// 0-based submission order within the round
    pub order: u32,
    pub created_at: String,
}

/// Public roster entry (never carries the role)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub alive: bool,
    pub vote_count: u32,
}

impl From<&Player> for PlayerInfo {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            alive: p.alive,
            vote_count: p.vote_count,
        }
    }
}

/// Clue as shown to every client, with the author's name resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClueInfo {
    pub round: u32,
    pub order: u32,
    pub player_id: PlayerId,
    pub player_name: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnInfo {
    pub player_id: PlayerId,
    pub name: String,
}

/// Snapshot a polling client renders from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionView {
    pub id: SessionId,
    pub code: JoinCode,
    pub category: String,
    pub phase: SessionPhase,
    pub stage: Option<RoundStage>,
    pub round: u32,
    pub winner: Option<Winner>,
    pub current_turn: Option<TurnInfo>,
    pub players: Vec<PlayerInfo>,
    pub clues: Vec<ClueInfo>,
    pub version: u64,
}

/// What a single player is allowed to know about their role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerCard {
    pub player_id: PlayerId,
    pub is_impostor: bool,
    /// Upper-cased secret word, absent for the impostor
    pub word: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EliminationOutcome {
    pub eliminated: PlayerInfo,
    pub was_impostor: bool,
    /// True when several players shared the top vote count
    pub tie: bool,
    pub phase: SessionPhase,
    pub winner: Option<Winner>,
    pub round: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuessOutcome {
    pub correct: bool,
    pub phase: SessionPhase,
    pub winner: Option<Winner>,
}

/// Input limits applied inside a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SessionRules {
    pub max_name_chars: usize,
    pub max_clue_chars: usize,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            max_name_chars: 50,
            max_clue_chars: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    /// Category used when a requested one is unknown (None = reject)
    pub default_category: Option<String>,
    pub code_length: usize,
    pub rules: SessionRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_category: Some(crate::words::DEFAULT_CATEGORY.to_string()),
            code_length: 6,
            rules: SessionRules::default(),
        }
    }
}

/// Returned to whoever creates a session (the host device)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedSession {
    pub session_id: SessionId,
    pub code: JoinCode,
    pub category: String,
    pub secret_word: String,
    /// Only handed to the creator; unlocks export
    pub host_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinedSession {
    pub player_id: PlayerId,
    pub session_id: SessionId,
    pub name: String,
}
