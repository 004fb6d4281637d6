mod clues;
pub mod export;
mod outcome;
mod roles;
mod session;
pub mod store;
mod turns;
mod vote;

pub use clues::ClueLog;
pub use outcome::{Verdict, WinEvaluator};
pub use roles::RoleAssigner;
pub use session::Session;
pub use store::{MemoryStore, SessionHandle, SessionStore};
pub use turns::TurnScheduler;
pub use vote::{Resolution, VoteTally};

use crate::error::{GameError, GameResult, StoreError};
use crate::types::*;
use crate::words::WordCatalog;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Safe character set for join codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// How often session creation retries after a join code collision
const MAX_CODE_ATTEMPTS: usize = 8;

/// Generate a random join code of the given length
pub fn generate_join_code<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Join codes are matched case-insensitively
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Shared application state: the session registry
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub catalog: Arc<WordCatalog>,
    pub config: GameConfig,
    /// Source of all randomness (roles, words, join codes)
    rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default(), None)
    }

    /// In-memory registry; a seed makes every random choice reproducible
    pub fn with_config(config: GameConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let catalog = WordCatalog::builtin(config.default_category.clone());
        Self::with_parts(Arc::new(MemoryStore::new()), catalog, config, rng)
    }

    pub fn with_parts(
        store: Arc<dyn SessionStore>,
        catalog: WordCatalog,
        config: GameConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            catalog: Arc::new(catalog),
            config,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn list_categories(&self) -> Vec<String> {
        self.catalog.categories()
    }

    /// Create a session in WAITING with a freshly drawn secret word
    pub async fn create_session(&self, category: &str) -> GameResult<CreatedSession> {
        let (category, secret_word) = {
            let mut rng = self.rng.lock().await;
            self.catalog.pick(category, &mut *rng).ok_or_else(|| {
                GameError::validation(format!(
                    "Unknown category '{}' and no default category configured",
                    category
                ))
            })?
        };
        let session_id = ulid::Ulid::new().to_string();

        let mut last_err = StoreError::Unavailable("no join code attempted".to_string());
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = {
                let mut rng = self.rng.lock().await;
                generate_join_code(&mut *rng, self.config.code_length)
            };
            let session = Session::new(
                session_id.clone(),
                code.clone(),
                category.clone(),
                secret_word.clone(),
                self.config.rules,
            );
            let host_token = session.host_token().to_string();

            match self.store.insert(session).await {
                Ok(_) => {
                    tracing::info!("Created session {} ({}) in {}", code, session_id, category);
                    return Ok(CreatedSession {
                        session_id,
                        code,
                        category,
                        secret_word,
                        host_token,
                    });
                }
                Err(StoreError::DuplicateCode(code)) => {
                    tracing::warn!("Join code {} already taken (attempt {})", code, attempt);
                    last_err = StoreError::DuplicateCode(code);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_err.into())
    }

    pub async fn session(&self, session_id: &str) -> GameResult<SessionHandle> {
        self.store
            .get(session_id)
            .await?
            .ok_or_else(|| GameError::not_found(format!("Session {} not found", session_id)))
    }

    /// Resolve a join code to its session
    pub async fn find_session(&self, code: &str) -> GameResult<SessionHandle> {
        let code = normalize_code(code);
        self.store
            .find_by_code(&code)
            .await?
            .ok_or_else(|| GameError::not_found(format!("No game with code {}", code)))
    }

    /// Accept either a join code or a session id
    pub async fn lookup(&self, key: &str) -> GameResult<SessionHandle> {
        if let Some(handle) = self.store.find_by_code(&normalize_code(key)).await? {
            return Ok(handle);
        }
        self.session(key.trim()).await
    }

    pub async fn session_for_player(&self, player_id: &str) -> GameResult<SessionHandle> {
        self.store
            .find_by_player(player_id)
            .await?
            .ok_or_else(|| GameError::not_found(format!("Player {} not found", player_id)))
    }

    pub async fn join_session(&self, code: &str, name: &str) -> GameResult<JoinedSession> {
        let handle = self.find_session(code).await?;
        let mut session = handle.lock().await;
        let player = session.admit(name)?;
        // Seat only once the player can be found again
        self.store
            .index_player(&player.id, &player.session_id)
            .await?;
        session.seat(player.clone());
        drop(session);

        tracing::info!("{} joined session {}", player.name, player.session_id);
        Ok(JoinedSession {
            player_id: player.id,
            session_id: player.session_id,
            name: player.name,
        })
    }

    pub async fn start_session(&self, session_id: &str) -> GameResult<()> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        let mut rng = self.rng.lock().await;
        session.start(&mut *rng)?;
        Ok(())
    }

    pub async fn session_view(&self, key: &str) -> GameResult<SessionView> {
        let handle = self.lookup(key).await?;
        let view = handle.lock().await.view();
        Ok(view)
    }

    pub async fn submit_clue(
        &self,
        player_id: &str,
        text: &str,
        round: Option<u32>,
    ) -> GameResult<Clue> {
        let handle = self.session_for_player(player_id).await?;
        let clue = handle.lock().await.submit_clue(player_id, text, round)?;
        Ok(clue)
    }

    pub async fn cast_vote(&self, target: &str, voter: Option<&str>) -> GameResult<()> {
        let handle = self.session_for_player(target).await?;
        let mut session = handle.lock().await;
        session.cast_vote(target, voter)
    }

    pub async fn resolve_elimination(&self, session_id: &str) -> GameResult<EliminationOutcome> {
        let handle = self.session(session_id).await?;
        let outcome = handle.lock().await.resolve_elimination()?;
        Ok(outcome)
    }

    pub async fn guess_word(
        &self,
        session_id: &str,
        player_id: &str,
        guess: &str,
    ) -> GameResult<GuessOutcome> {
        let handle = self.session(session_id).await?;
        let outcome = handle.lock().await.guess_word(player_id, guess)?;
        Ok(outcome)
    }

    pub async fn player_card(&self, player_id: &str) -> GameResult<PlayerCard> {
        let handle = self.session_for_player(player_id).await?;
        let card = handle.lock().await.player_card(player_id)?;
        Ok(card)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
