// HTTP surface tests through Rocket's local blocking client

use pathfinder_snake::bot::Bot;
use pathfinder_snake::config::Config;
use pathfinder_snake::handler::{build_rocket, SERVER_HEADER};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use serde_json::{json, Value};

fn client() -> Client {
    Client::tracked(build_rocket(Bot::new(Config::default_hardcoded()))).expect("valid rocket instance")
}

fn game_state() -> Value {
    let me = json!({
        "id": "me",
        "name": "me",
        "health": 90,
        "body": [{ "x": 5, "y": 5 }, { "x": 5, "y": 4 }],
        "head": { "x": 5, "y": 5 },
        "length": 2
    });
    json!({
        "game": { "id": "http-game", "ruleset": { "name": "standard" }, "timeout": 500 },
        "turn": 7,
        "board": {
            "width": 11,
            "height": 11,
            "food": [{ "x": 6, "y": 5 }],
            "hazards": [],
            "snakes": [
                me.clone(),
                {
                    "id": "o",
                    "name": "o",
                    "health": 90,
                    "body": [{ "x": 5, "y": 6 }, { "x": 5, "y": 7 }]
                }
            ]
        },
        "you": me
    })
}

#[test]
fn test_index_returns_info_and_server_header() {
    let client = client();
    let response = client.get("/").dispatch();

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.headers().get_one("Server"), Some(SERVER_HEADER));

    let body: Value = response.into_json().expect("json body");
    assert_eq!(body["apiversion"], "1");
    assert_eq!(body["color"], "#3E338F");
}

#[test]
fn test_start_and_end_acknowledge() {
    let client = client();
    let payload = game_state().to_string();

    let start = client
        .post("/start")
        .header(ContentType::JSON)
        .body(payload.clone())
        .dispatch();
    assert_eq!(start.status(), Status::Ok);

    let end = client.post("/end").header(ContentType::JSON).body(payload).dispatch();
    assert_eq!(end.status(), Status::Ok);
}

#[test]
fn test_move_returns_safe_direction() {
    let client = client();
    let response = client
        .post("/move")
        .header(ContentType::JSON)
        .body(game_state().to_string())
        .dispatch();

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json body");
    let chosen = body["move"].as_str().expect("move string");
    assert!(["left", "right"].contains(&chosen), "unexpected move {}", chosen);
}

#[test]
fn test_move_with_unusable_body_returns_fallback() {
    let client = client();
    let response = client
        .post("/move")
        .header(ContentType::JSON)
        .body(json!({ "board": "nope", "you": 3 }).to_string())
        .dispatch();

    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json body");
    assert_eq!(body, json!({ "move": "down" }));
}
