#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use cricket_auction_backend::db::{AuctionStore, MemoryAuctionStore};
use cricket_auction_backend::models::league::{CreateLeagueRequest, League};
use cricket_auction_backend::models::player::{CreatePlayerRequest, Player};
use cricket_auction_backend::models::team::{CreateTeamRequest, TeamSummary};
use cricket_auction_backend::models::Money;
use cricket_auction_backend::services::{
    AuctionLocks, AuctionService, LeagueService, PlayerService, TeamService,
};

use crate::common::utils::{init_test_tracing, TestApp};

pub const LAKH: i64 = 100_000;
pub const CRORE: i64 = 10_000_000;

/// The services wired over one in-memory store, without HTTP in between.
pub struct AuctionFloor {
    pub store: Arc<dyn AuctionStore>,
    pub auction: Arc<AuctionService>,
    pub leagues: LeagueService,
    pub teams: TeamService,
    pub players: PlayerService,
}

pub fn auction_floor() -> AuctionFloor {
    init_test_tracing();

    let store: Arc<dyn AuctionStore> = Arc::new(MemoryAuctionStore::new());
    let locks = AuctionLocks::for_store(store.as_ref(), Duration::from_secs(5));
    let auction = Arc::new(AuctionService::new(store.clone(), locks, 300));

    AuctionFloor {
        leagues: LeagueService::new(store.clone()),
        teams: TeamService::new(store.clone(), auction.clone()),
        players: PlayerService::new(store.clone(), auction.clone()),
        auction,
        store,
    }
}

impl AuctionFloor {
    pub async fn league(&self, name: &str) -> League {
        self.leagues
            .create_league(CreateLeagueRequest {
                name: name.to_string(),
                display_name: None,
                default_purse: None,
                min_squad_size: None,
                max_squad_size: None,
            })
            .await
            .expect("Failed to create league")
    }

    pub async fn team(&self, league_id: Uuid, name: &str, budget: i64) -> TeamSummary {
        self.teams
            .create_team(
                league_id,
                CreateTeamRequest {
                    name: name.to_string(),
                    budget: Some(Money::new(budget)),
                },
            )
            .await
            .expect("Failed to create team")
    }

    pub async fn player(&self, league_id: Uuid, name: &str, base_price: i64) -> Player {
        self.players
            .create_player(
                league_id,
                CreatePlayerRequest {
                    name: name.to_string(),
                    position: Some("batter".to_string()),
                    country: None,
                    original_team: None,
                    base_price: Some(Money::new(base_price)),
                },
            )
            .await
            .expect("Failed to create player")
    }

    pub async fn budget(&self, team_id: Uuid) -> Money {
        self.teams.get_team(team_id).await.expect("Team vanished").budget
    }

    pub async fn reload(&self, player_id: Uuid) -> Player {
        self.players.get_player(player_id).await.expect("Player vanished")
    }
}

/// Create a league over HTTP and return its id
pub async fn create_league(app: &TestApp, name: &str) -> String {
    let response = app
        .admin_post("/admin/leagues", Some(json!({ "name": name })))
        .await;
    assert_eq!(201, response.status().as_u16(), "Failed to create league");
    let body: Value = response.json().await.expect("Failed to parse league response");
    body["data"]["id"].as_str().expect("League ID not found").to_string()
}

pub async fn create_team(app: &TestApp, league_id: &str, name: &str, budget: i64) -> String {
    let response = app
        .admin_post(
            &format!("/admin/leagues/{}/teams", league_id),
            Some(json!({ "name": name, "budget": budget })),
        )
        .await;
    assert_eq!(201, response.status().as_u16(), "Failed to create team");
    let body: Value = response.json().await.expect("Failed to parse team response");
    body["data"]["id"].as_str().expect("Team ID not found").to_string()
}

pub async fn create_player(app: &TestApp, league_id: &str, name: &str, base_price: i64) -> String {
    let response = app
        .admin_post(
            &format!("/admin/leagues/{}/players", league_id),
            Some(json!({ "name": name, "position": "bowler", "base_price": base_price })),
        )
        .await;
    assert_eq!(201, response.status().as_u16(), "Failed to create player");
    let body: Value = response.json().await.expect("Failed to parse player response");
    body["data"]["id"].as_str().expect("Player ID not found").to_string()
}
