use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use impostor::api::{router, HOST_TOKEN_HEADER};
use impostor::state::AppState;
use impostor::types::GameConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(seed: u64) -> Router {
    router(Arc::new(AppState::with_config(GameConfig::default(), Some(seed))))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    call_with_token(app, method, uri, body, None).await
}

async fn call_with_token(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    host_token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = host_token {
        builder = builder.header(HOST_TOKEN_HEADER, token);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, None).await
}

struct Table {
    session_id: String,
    code: String,
    secret_word: String,
    host_token: String,
    players: Vec<String>,
}

/// Create a session and seat the given players
async fn open_table(app: &Router, names: &[&str]) -> Table {
    let (status, created) = post(app, "/api/sessions", json!({ "category": "comida" })).await;
    assert_eq!(status, StatusCode::OK);
    let code = created["code"].as_str().unwrap().to_string();

    let mut players = Vec::new();
    for name in names {
        let (status, joined) = post(
            app,
            "/api/sessions/join",
            json!({ "code": code.to_lowercase(), "name": name }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "join failed: {}", joined);
        assert_eq!(joined["name"], *name);
        players.push(joined["player_id"].as_str().unwrap().to_string());
    }

    Table {
        session_id: created["session_id"].as_str().unwrap().to_string(),
        code,
        secret_word: created["secret_word"].as_str().unwrap().to_string(),
        host_token: created["host_token"].as_str().unwrap().to_string(),
        players,
    }
}

async fn start(app: &Router, table: &Table) {
    let uri = format!("/api/sessions/{}/start", table.session_id);
    let (status, body) = post(app, &uri, json!({})).await;
    assert_eq!(status, StatusCode::OK, "start failed: {}", body);
    assert_eq!(body["ok"], true);
}

async fn view(app: &Router, table: &Table) -> Value {
    let (status, view) = get(app, &format!("/api/sessions/{}", table.code)).await;
    assert_eq!(status, StatusCode::OK);
    view
}

/// Ask every player for their card, return the impostor's id
async fn find_impostor(app: &Router, table: &Table) -> String {
    let mut impostors = Vec::new();
    for id in &table.players {
        let (status, card) = get(app, &format!("/api/players/{}/card", id)).await;
        assert_eq!(status, StatusCode::OK);
        if card["is_impostor"] == true {
            assert!(card["word"].is_null());
            impostors.push(id.clone());
        } else {
            assert_eq!(card["word"], table.secret_word.to_uppercase());
        }
    }
    assert_eq!(impostors.len(), 1, "exactly one impostor per game");
    impostors.remove(0)
}

/// Everyone alive gives a clue in turn order
async fn play_clue_round(app: &Router, table: &Table) {
    loop {
        let current = view(app, table).await;
        if current["stage"] == "VOTING" {
            return;
        }
        let turn = current["current_turn"]["player_id"].as_str().unwrap().to_string();
        let round = current["round"].clone();
        let (status, accepted) = post(
            app,
            "/api/clues",
            json!({ "player_id": turn, "text": "  algo rico ", "round": round }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "clue failed: {}", accepted);
        assert_eq!(accepted["round"], round);
    }
}

async fn vote(app: &Router, target: &str) {
    let (status, body) = post(app, "/api/votes", json!({ "player_id": target })).await;
    assert_eq!(status, StatusCode::OK, "vote failed: {}", body);
}

async fn eliminate(app: &Router, table: &Table) -> (StatusCode, Value) {
    let uri = format!("/api/sessions/{}/eliminate", table.session_id);
    post(app, &uri, json!({})).await
}

#[tokio::test]
async fn test_full_game_players_catch_impostor() {
    let app = app(7);
    let table = open_table(&app, &["Ana", "Beto", "Caro", "Dani"]).await;

    let lobby = view(&app, &table).await;
    assert_eq!(lobby["phase"], "WAITING");
    assert_eq!(lobby["players"].as_array().unwrap().len(), 4);

    start(&app, &table).await;
    let playing = view(&app, &table).await;
    assert_eq!(playing["phase"], "PLAYING");
    assert_eq!(playing["stage"], "CLUES");
    assert_eq!(playing["round"], 1);
    // first turn goes to the first player who joined
    assert_eq!(playing["current_turn"]["player_id"], table.players[0]);

    let impostor = find_impostor(&app, &table).await;

    play_clue_round(&app, &table).await;
    let voting = view(&app, &table).await;
    let clues = voting["clues"].as_array().unwrap();
    assert_eq!(clues.len(), 4);
    assert_eq!(clues[0]["player_name"], "Ana");
    assert_eq!(clues[0]["text"], "algo rico");

    for _ in 0..3 {
        vote(&app, &impostor).await;
    }
    let (status, outcome) = eliminate(&app, &table).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["eliminated"]["id"], impostor);
    assert_eq!(outcome["was_impostor"], true);
    assert_eq!(outcome["winner"], "players");

    let finished = view(&app, &table).await;
    assert_eq!(finished["phase"], "FINISHED");
    assert_eq!(finished["winner"], "players");
    assert!(finished["current_turn"].is_null());

    // no further play once finished
    let (status, body) = post(
        &app,
        "/api/clues",
        json!({ "player_id": table.players[0], "text": "tarde" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_wrong_elimination_continues_with_four_players() {
    let app = app(21);
    let table = open_table(&app, &["Ana", "Beto", "Caro", "Dani"]).await;
    start(&app, &table).await;
    let impostor = find_impostor(&app, &table).await;
    let innocent = table.players.iter().find(|id| **id != impostor).unwrap().clone();

    play_clue_round(&app, &table).await;
    vote(&app, &innocent).await;
    let (status, outcome) = eliminate(&app, &table).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["was_impostor"], false);
    assert!(outcome["winner"].is_null());
    assert_eq!(outcome["round"], 2);

    let next = view(&app, &table).await;
    assert_eq!(next["phase"], "PLAYING");
    assert_eq!(next["stage"], "CLUES");
    assert_eq!(next["round"], 2);
    assert_ne!(next["current_turn"]["player_id"], innocent);

    // the eliminated player cannot give clues any more
    let (status, body) = post(
        &app,
        "/api/clues",
        json!({ "player_id": innocent, "text": "hola", "round": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_impostor_wins_when_two_remain() {
    let app = app(3);
    let table = open_table(&app, &["Ana", "Beto", "Caro"]).await;
    start(&app, &table).await;
    let impostor = find_impostor(&app, &table).await;
    let innocent = table.players.iter().find(|id| **id != impostor).unwrap().clone();

    play_clue_round(&app, &table).await;
    vote(&app, &innocent).await;
    vote(&app, &innocent).await;
    let (status, outcome) = eliminate(&app, &table).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["winner"], "impostor");
    assert_eq!(view(&app, &table).await["phase"], "FINISHED");
}

#[tokio::test]
async fn test_impostor_guesses_word() {
    let app = app(11);
    let table = open_table(&app, &["Ana", "Beto", "Caro"]).await;
    start(&app, &table).await;
    let impostor = find_impostor(&app, &table).await;
    let innocent = table.players.iter().find(|id| **id != impostor).unwrap().clone();
    let uri = format!("/api/sessions/{}/guess", table.session_id);

    let (status, body) = post(&app, &uri, json!({ "player_id": innocent, "guess": "x" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    let (status, outcome) = post(
        &app,
        &uri,
        json!({ "player_id": impostor, "guess": "definitely not it" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["correct"], false);
    assert_eq!(outcome["phase"], "PLAYING");

    let guess = format!("  {} ", table.secret_word.to_uppercase());
    let (status, outcome) = post(&app, &uri, json!({ "player_id": impostor, "guess": guess })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["correct"], true);
    assert_eq!(outcome["winner"], "impostor");
    assert_eq!(view(&app, &table).await["winner"], "impostor");
}

#[tokio::test]
async fn test_error_codes_map_to_status() {
    let app = app(5);

    let (status, body) = post(
        &app,
        "/api/sessions/join",
        json!({ "code": "ZZZZZZ", "name": "Ana" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["msg"].as_str().unwrap().contains("ZZZZZZ"));

    let table = open_table(&app, &["Ana", "Beto"]).await;
    let uri = format!("/api/sessions/{}/start", table.session_id);
    let (status, body) = post(&app, &uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");

    let (status, body) = post(
        &app,
        "/api/sessions/join",
        json!({ "code": table.code, "name": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");

    let (status, body) = post(
        &app,
        "/api/sessions/join",
        json!({ "code": table.code, "name": "Caro" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    start(&app, &table).await;

    // second start is rejected and keeps the game going
    let (status, body) = post(&app, &uri, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    // out of turn
    let (status, body) = post(
        &app,
        "/api/clues",
        json!({ "player_id": table.players[1], "text": "fuera de turno" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["msg"].as_str().unwrap().contains("Ana"));

    // nothing to resolve during clues
    let (status, body) = eliminate(&app, &table).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    let (status, body) = get(&app, "/api/players/nobody/card").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_view_is_read_only_and_hides_roles() {
    let app = app(9);
    let table = open_table(&app, &["Ana", "Beto", "Caro"]).await;
    start(&app, &table).await;

    let by_code = view(&app, &table).await;
    let again = view(&app, &table).await;
    assert_eq!(by_code, again);

    let (status, by_id) = get(&app, &format!("/api/sessions/{}", table.session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_code, by_id);

    let raw = by_code.to_string();
    assert!(!raw.contains("is_impostor"));
    assert!(!raw.contains(&table.secret_word));
}

#[tokio::test]
async fn test_list_categories() {
    let app = app(1);
    let (status, body) = get(&app, "/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    let categories: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(categories.contains(&"comida"));
    assert!(categories.contains(&"lugares"));
}

#[tokio::test]
async fn test_unknown_category_falls_back_to_default() {
    let app = app(2);
    let (status, created) = post(&app, "/api/sessions", json!({ "category": "planetas" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["category"], "comida");

    let (status, created) = post(&app, "/api/sessions", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["category"], "comida");
}

#[tokio::test]
async fn test_export_and_import_over_http() {
    let source = app(13);
    let table = open_table(&source, &["Ana", "Beto", "Caro"]).await;
    start(&source, &table).await;

    let (status, snapshot) = call_with_token(
        &source,
        Method::GET,
        &format!("/api/sessions/{}/export", table.session_id),
        None,
        Some(&table.host_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["schema_version"], 1);

    let target = app(14);
    let (status, restored) = post(&target, "/api/sessions/import", snapshot.clone()).await;
    assert_eq!(status, StatusCode::OK, "{}", restored);
    assert_eq!(restored, view(&source, &table).await);

    let (status, body) = post(&target, "/api/sessions/import", snapshot).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONNECTIVITY");
}

#[tokio::test]
async fn test_players_cannot_export_the_word() {
    let app = app(17);
    let table = open_table(&app, &["Ana", "Beto", "Caro"]).await;
    start(&app, &table).await;

    // everything a player learns from the public view
    let public = view(&app, &table).await;
    let uri = format!("/api/sessions/{}/export", public["id"].as_str().unwrap());

    let (status, body) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert!(!body.to_string().contains(&table.secret_word));

    let player_id = public["players"][0]["id"].as_str().unwrap();
    let (status, _) = call_with_token(&app, Method::GET, &uri, None, Some(player_id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, snapshot) =
        call_with_token(&app, Method::GET, &uri, None, Some(&table.host_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["session"]["secret_word"], table.secret_word);
}

#[tokio::test]
async fn test_import_cannot_overwrite_running_game() {
    let app = app(19);
    let table = open_table(&app, &["Ana", "Beto", "Caro"]).await;
    let (_, mut snapshot) = call_with_token(
        &app,
        Method::GET,
        &format!("/api/sessions/{}/export", table.session_id),
        None,
        Some(&table.host_token),
    )
    .await;
    snapshot["session"]["code"] = json!("ZZZZZZ");
    start(&app, &table).await;

    let (status, body) = post(&app, "/api/sessions/import", snapshot).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONNECTIVITY");

    assert_eq!(view(&app, &table).await["phase"], "PLAYING");
    let (status, _) = get(&app, "/api/sessions/ZZZZZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
