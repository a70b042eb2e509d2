// src/models/player.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use crate::models::money::Money;

pub const DEFAULT_BASE_PRICE: Money = Money::new(5_000_000);
pub const DEFAULT_COUNTRY: &str = "Indian";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Batter,
    Bowler,
    Allrounder,
    Keeper,
}

impl Position {
    /// Parse the loose spellings that show up in squad sheets.
    /// Anything unrecognised is treated as an all-rounder.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "batter" | "batsman" => Position::Batter,
            "bowler" => Position::Bowler,
            "keeper" | "wicketkeeper" | "wk" => Position::Keeper,
            _ => Position::Allrounder,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Batter => "batter",
            Position::Bowler => "bowler",
            Position::Allrounder => "allrounder",
            Position::Keeper => "keeper",
        }
    }
}

/// Where a player sits in the auction lifecycle
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Available,
    Bidding,
    Sold,
    Unsold,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Available => "available",
            PlayerStatus::Bidding => "bidding",
            PlayerStatus::Sold => "sold",
            PlayerStatus::Unsold => "unsold",
        }
    }
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlayerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(PlayerStatus::Available),
            "bidding" => Ok(PlayerStatus::Bidding),
            "sold" => Ok(PlayerStatus::Sold),
            "unsold" => Ok(PlayerStatus::Unsold),
            other => Err(format!("Unknown player status: {}", other)),
        }
    }
}

/// An auction lot
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub position: Position,
    pub country: String,
    pub original_team: Option<String>,
    pub base_price: Money,
    pub current_price: Money,
    pub status: PlayerStatus,
    pub team_id: Option<Uuid>,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Query-side filter for listing players of a league
#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    /// Empty means any status
    pub statuses: Vec<PlayerStatus>,
    pub position: Option<Position>,
    pub team_id: Option<Uuid>,
}

impl PlayerFilter {
    pub fn matches(&self, player: &Player) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&player.status))
            && self.position.map_or(true, |p| p == player.position)
            && self.team_id.map_or(true, |t| player.team_id == Some(t))
    }
}

// Request DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePlayerRequest {
    pub name: String,
    pub position: Option<String>,
    pub country: Option<String>,
    pub original_team: Option<String>,
    pub base_price: Option<Money>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub country: Option<String>,
    pub original_team: Option<String>,
    pub base_price: Option<Money>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PlayerListQuery {
    pub status: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RandomPlayerQuery {
    pub position: Option<String>,
    #[serde(default)]
    pub include_unsold: bool,
}
