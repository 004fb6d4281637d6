//! Server configuration loaded from environment variables

use crate::types::{GameConfig, SessionRules};
use std::net::SocketAddr;
use std::str::FromStr;

const CODE_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=12;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub game: GameConfig,
    /// Fixed RNG seed for reproducible games (testing/demos)
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            game: GameConfig::default(),
            seed: None,
        }
    }
}

/// Read and parse an env var, warning and returning None on garbage
fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables
    ///
    /// - IMPOSTOR_BIND: listen address (default 0.0.0.0:3000)
    /// - IMPOSTOR_DEFAULT_CATEGORY: fallback category, empty disables it
    /// - IMPOSTOR_CODE_LENGTH: join code length (4-12, default 6)
    /// - IMPOSTOR_MAX_NAME_CHARS / IMPOSTOR_MAX_CLUE_CHARS: input limits
    /// - IMPOSTOR_SEED: fixed RNG seed
    pub fn from_env() -> Self {
        let defaults = GameConfig::default();
        let default_rules = SessionRules::default();

        let bind_addr = parse_env("IMPOSTOR_BIND").unwrap_or(Self::default().bind_addr);

        let default_category = match std::env::var("IMPOSTOR_DEFAULT_CATEGORY") {
            Ok(v) if v.trim().is_empty() => {
                tracing::warn!("Default category disabled, unknown categories will be rejected");
                None
            }
            Ok(v) => Some(v.trim().to_lowercase()),
            Err(_) => defaults.default_category,
        };

        let code_length = match parse_env::<usize>("IMPOSTOR_CODE_LENGTH") {
            Some(len) if CODE_LENGTH_RANGE.contains(&len) => len,
            Some(len) => {
                let clamped = len.clamp(*CODE_LENGTH_RANGE.start(), *CODE_LENGTH_RANGE.end());
                tracing::warn!("IMPOSTOR_CODE_LENGTH {} out of range, using {}", len, clamped);
                clamped
            }
            None => defaults.code_length,
        };

        let rules = SessionRules {
            max_name_chars: parse_env("IMPOSTOR_MAX_NAME_CHARS")
                .filter(|n| *n > 0)
                .unwrap_or(default_rules.max_name_chars),
            max_clue_chars: parse_env("IMPOSTOR_MAX_CLUE_CHARS")
                .filter(|n| *n > 0)
                .unwrap_or(default_rules.max_clue_chars),
        };

        let seed = parse_env("IMPOSTOR_SEED");
        if seed.is_some() {
            tracing::warn!("IMPOSTOR_SEED is set, games are deterministic");
        }

        Self {
            bind_addr,
            game: GameConfig {
                default_category,
                code_length,
                rules,
            },
            seed,
        }
    }
}
