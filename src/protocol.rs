//! Request and response bodies of the HTTP API

use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Missing category means the default one
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinSessionRequest {
    pub code: JoinCode,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitClueRequest {
    pub player_id: PlayerId,
    pub text: String,
    /// Round the client believes is current; rejected if stale
    #[serde(default)]
    pub round: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastVoteRequest {
    /// Player being voted against
    pub player_id: PlayerId,
    #[serde(default)]
    pub voter_id: Option<PlayerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessWordRequest {
    pub player_id: PlayerId,
    pub guess: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClueAccepted {
    pub round: u32,
    pub order: u32,
}

impl From<Clue> for ClueAccepted {
    fn from(clue: Clue) -> Self {
        Self {
            round: clue.round,
            order: clue.order,
        }
    }
}
