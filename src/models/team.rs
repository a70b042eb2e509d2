// src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::money::Money;
use crate::models::player::Player;

/// A bidder in one league. `budget` is owned by the auction core.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub budget: Money,
    pub initial_budget: Money,
    #[serde(skip_serializing, default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Amount paid for players won so far
    pub fn spent(&self) -> Money {
        self.initial_budget
            .checked_sub(self.budget)
            .unwrap_or(Money::ZERO)
    }
}

/// Team with its spending breakdown
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TeamSummary {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub budget: Money,
    pub initial_budget: Money,
    pub spent: Money,
}

impl From<&Team> for TeamSummary {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            league_id: team.league_id,
            name: team.name.clone(),
            budget: team.budget,
            initial_budget: team.initial_budget,
            spent: team.spent(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TeamSquad {
    pub team: TeamSummary,
    pub players: Vec<Player>,
}

/// Request to register a new team in a league
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    /// Defaults to the league's default purse
    pub budget: Option<Money>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateTeamRequest {
    pub name: String,
}
