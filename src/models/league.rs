// src/models/league.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::money::Money;

pub const DEFAULT_PURSE: Money = Money::new(500_000_000);
pub const DEFAULT_MAX_SQUAD_SIZE: i32 = 20;
pub const DEFAULT_MIN_SQUAD_SIZE: i32 = 16;

/// One auction season (e.g. "WPL 2026"). Teams and players hang off it.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct League {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub default_purse: Money,
    pub min_squad_size: i32,
    pub max_squad_size: i32,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

// Request/Response DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateLeagueRequest {
    pub name: String,
    pub display_name: Option<String>,
    pub default_purse: Option<Money>,
    pub min_squad_size: Option<i32>,
    pub max_squad_size: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateLeagueRequest {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub default_purse: Option<Money>,
    pub min_squad_size: Option<i32>,
    pub max_squad_size: Option<i32>,
}
