//! HTTP API endpoints.
//!
//! Thin wrappers: every handler resolves its inputs, calls one registry
//! operation and maps `GameError` to a status code plus `{code, msg}` body.
//! Clients poll `GET /api/sessions/{id}` for updates. Host-only routes
//! expect the token from session creation in the `x-host-token` header.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::error::{GameError, GameResult, StoreError};
use crate::protocol::*;
use crate::state::export::SessionSnapshot;
use crate::state::AppState;
use crate::types::*;

/// Header carrying the token returned by session creation
pub const HOST_TOKEN_HEADER: &str = "x-host-token";

fn host_token(headers: &HeaderMap) -> &str {
    headers
        .get(HOST_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Log rejected operations at the edge, pass the error through
fn rejected(action: &str, e: GameError) -> GameError {
    match &e {
        GameError::Connectivity(StoreError::Unavailable(_)) => {
            tracing::error!("{} failed: {}", action, e)
        }
        _ => tracing::warn!("{} rejected ({}): {}", action, e.code(), e),
    }
    e
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> GameResult<Json<CreatedSession>> {
    tracing::debug!("Create session, category={:?}", req.category);
    let created = state
        .create_session(&req.category)
        .await
        .map_err(|e| rejected("create session", e))?;
    Ok(Json(created))
}

/// POST /api/sessions/join
pub async fn join_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JoinSessionRequest>,
) -> GameResult<Json<JoinedSession>> {
    let joined = state
        .join_session(&req.code, &req.name)
        .await
        .map_err(|e| rejected("join", e))?;
    Ok(Json(joined))
}

/// POST /api/sessions/{id}/start
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> GameResult<Json<OkResponse>> {
    state
        .start_session(&session_id)
        .await
        .map_err(|e| rejected("start", e))?;
    Ok(Json(OkResponse::ok()))
}

/// GET /api/sessions/{id}
///
/// `id` may also be the join code.
pub async fn get_session_view(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> GameResult<Json<SessionView>> {
    let view = state.session_view(&key).await?;
    Ok(Json(view))
}

/// POST /api/clues
pub async fn submit_clue(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitClueRequest>,
) -> GameResult<Json<ClueAccepted>> {
    let clue = state
        .submit_clue(&req.player_id, &req.text, req.round)
        .await
        .map_err(|e| rejected("clue", e))?;
    Ok(Json(clue.into()))
}

/// POST /api/votes
pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CastVoteRequest>,
) -> GameResult<Json<OkResponse>> {
    state
        .cast_vote(&req.player_id, req.voter_id.as_deref())
        .await
        .map_err(|e| rejected("vote", e))?;
    Ok(Json(OkResponse::ok()))
}

/// POST /api/sessions/{id}/eliminate
pub async fn resolve_elimination(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> GameResult<Json<EliminationOutcome>> {
    let outcome = state
        .resolve_elimination(&session_id)
        .await
        .map_err(|e| rejected("elimination", e))?;
    Ok(Json(outcome))
}

/// POST /api/sessions/{id}/guess
pub async fn guess_word(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<GuessWordRequest>,
) -> GameResult<Json<GuessOutcome>> {
    let outcome = state
        .guess_word(&session_id, &req.player_id, &req.guess)
        .await
        .map_err(|e| rejected("guess", e))?;
    Ok(Json(outcome))
}

/// GET /api/players/{id}/card
pub async fn player_card(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> GameResult<Json<PlayerCard>> {
    let card = state.player_card(&player_id).await?;
    Ok(Json(card))
}

/// GET /api/categories
pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.list_categories(),
    })
}

/// GET /api/sessions/{id}/export (host only)
pub async fn export_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    headers: HeaderMap,
) -> GameResult<Json<SessionSnapshot>> {
    let snapshot = state
        .export_session(&session_id, host_token(&headers))
        .await
        .map_err(|e| rejected("export", e))?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/import
pub async fn import_session(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<SessionSnapshot>,
) -> GameResult<Json<SessionView>> {
    let view = state
        .import_session(snapshot)
        .await
        .map_err(|e| rejected("import", e))?;
    Ok(Json(view))
}

/// All API routes, without middleware layers
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/join", post(join_session))
        .route("/api/sessions/import", post(import_session))
        .route("/api/sessions/{id}", get(get_session_view))
        .route("/api/sessions/{id}/start", post(start_session))
        .route("/api/sessions/{id}/eliminate", post(resolve_elimination))
        .route("/api/sessions/{id}/guess", post(guess_word))
        .route("/api/sessions/{id}/export", get(export_session))
        .route("/api/clues", post(submit_clue))
        .route("/api/votes", post(cast_vote))
        .route("/api/players/{id}/card", get(player_card))
        .with_state(state)
}
