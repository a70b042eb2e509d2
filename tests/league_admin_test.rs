use serde_json::{json, Value};

mod common;
use common::auction_helpers::{create_league, create_player, create_team, CRORE, LAKH};
use common::utils::{make_authenticated_request, spawn_app, TestApp};

async fn admin_request(app: &TestApp, method: reqwest::Method, path: &str, body: Option<Value>) -> reqwest::Response {
    make_authenticated_request(
        &app.client,
        method,
        &format!("{}{}", app.address, path),
        &app.admin_token,
        body,
    ).await
}

#[tokio::test]
async fn league_lifecycle() {
    let test_app = spawn_app().await;

    let response = test_app
        .admin_post("/admin/leagues", Some(json!({ "name": "WPL 2026", "display_name": "Women's Premier League" })))
        .await;
    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    let league_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["default_purse"], 500_000_000);
    assert_eq!(body["data"]["min_squad_size"], 16);
    assert_eq!(body["data"]["max_squad_size"], 20);
    assert!(body["data"].get("is_deleted").is_none());

    let duplicate = test_app
        .admin_post("/admin/leagues", Some(json!({ "name": "wpl 2026" })))
        .await;
    assert_eq!(400, duplicate.status().as_u16());
    let body: Value = duplicate.json().await.unwrap();
    assert_eq!(body["error"], "A league with this name already exists");

    let response = admin_request(
        &test_app,
        reqwest::Method::PATCH,
        &format!("/admin/leagues/{}", league_id),
        Some(json!({ "max_squad_size": 18 })),
    ).await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["max_squad_size"], 18);

    let response = admin_request(
        &test_app,
        reqwest::Method::DELETE,
        &format!("/admin/leagues/{}", league_id),
        None,
    ).await;
    assert_eq!(200, response.status().as_u16());

    let response = test_app.get(&format!("/leagues/{}", league_id)).await;
    assert_eq!(404, response.status().as_u16());
    let leagues: Value = test_app.get("/leagues").await.json().await.unwrap();
    assert!(leagues["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn teams_start_with_the_league_purse_and_can_be_renamed() {
    let test_app = spawn_app().await;
    let league_id = create_league(&test_app, "IPL 2026").await;

    let response = test_app
        .admin_post(&format!("/admin/leagues/{}/teams", league_id), Some(json!({ "name": "Chennai" })))
        .await;
    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    let team_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["budget"], 500_000_000);
    assert_eq!(body["data"]["initial_budget"], 500_000_000);
    assert_eq!(body["data"]["spent"], 0);

    let duplicate = test_app
        .admin_post(&format!("/admin/leagues/{}/teams", league_id), Some(json!({ "name": "CHENNAI" })))
        .await;
    assert_eq!(400, duplicate.status().as_u16());

    let response = admin_request(
        &test_app,
        reqwest::Method::PATCH,
        &format!("/admin/teams/{}", team_id),
        Some(json!({ "name": "Chennai Super Kings" })),
    ).await;
    assert_eq!(200, response.status().as_u16());

    let teams: Value = test_app.get(&format!("/leagues/{}/teams", league_id)).await.json().await.unwrap();
    assert_eq!(teams["data"][0]["name"], "Chennai Super Kings");

    let missing_league = test_app
        .admin_post(&format!("/admin/leagues/{}/teams", uuid::Uuid::new_v4()), Some(json!({ "name": "Kochi" })))
        .await;
    assert_eq!(404, missing_league.status().as_u16());
}

#[tokio::test]
async fn players_get_defaults_and_lock_their_price_while_bidding() {
    let test_app = spawn_app().await;
    let league_id = create_league(&test_app, "IPL 2026").await;
    create_team(&test_app, &league_id, "Chennai", 10 * CRORE).await;

    let response = test_app
        .admin_post(
            &format!("/admin/leagues/{}/players", league_id),
            Some(json!({ "name": "MS Dhoni", "position": "WK" })),
        )
        .await;
    assert_eq!(201, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    let player_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["position"], "keeper");
    assert_eq!(body["data"]["country"], "Indian");
    assert_eq!(body["data"]["base_price"], 50 * LAKH);
    assert_eq!(body["data"]["current_price"], 50 * LAKH);
    assert_eq!(body["data"]["status"], "available");

    let response = admin_request(
        &test_app,
        reqwest::Method::PATCH,
        &format!("/admin/players/{}", player_id),
        Some(json!({ "base_price": 2 * CRORE })),
    ).await;
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["current_price"], 2 * CRORE);

    test_app.admin_post(&format!("/admin/auction/start/{}", player_id), None).await;
    let response = admin_request(
        &test_app,
        reqwest::Method::PATCH,
        &format!("/admin/players/{}", player_id),
        Some(json!({ "base_price": CRORE })),
    ).await;
    assert_eq!(400, response.status().as_u16());

    let negative = test_app
        .admin_post(
            &format!("/admin/leagues/{}/players", league_id),
            Some(json!({ "name": "Nobody", "base_price": -1 })),
        )
        .await;
    assert_eq!(400, negative.status().as_u16());
}

#[tokio::test]
async fn deleting_the_player_under_the_hammer_clears_the_seat() {
    let test_app = spawn_app().await;
    let league_id = create_league(&test_app, "IPL 2026").await;
    let player_id = create_player(&test_app, &league_id, "Rinku Singh", 50 * LAKH).await;
    test_app.admin_post(&format!("/admin/auction/start/{}", player_id), None).await;

    let response = admin_request(
        &test_app,
        reqwest::Method::DELETE,
        &format!("/admin/players/{}", player_id),
        None,
    ).await;
    assert_eq!(200, response.status().as_u16());

    let state: Value = test_app.get("/auction/state").await.json().await.unwrap();
    assert_eq!(state["data"]["is_active"], false);
    assert!(state["data"]["current_player_id"].is_null());

    let players: Value = test_app.get(&format!("/leagues/{}/players", league_id)).await.json().await.unwrap();
    assert!(players["data"].as_array().unwrap().is_empty());
}
