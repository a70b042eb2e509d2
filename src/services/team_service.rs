use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::store::AuctionStore;
use crate::models::player::PlayerFilter;
use crate::models::team::{CreateTeamRequest, Team, TeamSquad, TeamSummary, UpdateTeamRequest};
use crate::services::auction_service::AuctionService;
use crate::services::error::ServiceError;
use crate::services::locks::LockName;

/// Team administration. Purses are deliberately read-only here: only the
/// auction core debits or refunds them.
pub struct TeamService {
    store: Arc<dyn AuctionStore>,
    auction: Arc<AuctionService>,
}

fn clean_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation("Team name is required"));
    }
    Ok(name.to_string())
}

impl TeamService {
    pub fn new(store: Arc<dyn AuctionStore>, auction: Arc<AuctionService>) -> Self {
        Self { store, auction }
    }

    pub async fn create_team(&self, league_id: Uuid, request: CreateTeamRequest) -> Result<TeamSummary, ServiceError> {
        let name = clean_name(&request.name)?;

        let mut tx = self.store.begin().await?;
        let league = tx
            .league(league_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("League not found"))?;

        let budget = request.budget.unwrap_or(league.default_purse);
        if budget.is_negative() {
            return Err(ServiceError::validation("Budget cannot be negative"));
        }
        if tx.team_name_taken(league_id, &name, None).await? {
            return Err(ServiceError::validation("A team with this name already exists in this league"));
        }

        let team = Team {
            id: Uuid::new_v4(),
            league_id,
            name,
            budget,
            initial_budget: budget,
            is_deleted: false,
            created_at: Utc::now(),
        };
        tx.insert_team(&team).await?;
        tx.commit().await?;

        tracing::info!("Created team {} ({}) in league {} with purse {}", team.name, team.id, league.name, budget);
        Ok(TeamSummary::from(&team))
    }

    pub async fn rename_team(&self, team_id: Uuid, request: UpdateTeamRequest) -> Result<TeamSummary, ServiceError> {
        let name = clean_name(&request.name)?;

        let mut tx = self.store.begin().await?;
        let mut team = tx
            .team_for_update(team_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Team not found"))?;
        if tx.team_name_taken(team.league_id, &name, Some(team.id)).await? {
            return Err(ServiceError::validation("A team with this name already exists in this league"));
        }
        team.name = name;
        tx.update_team(&team).await?;
        tx.commit().await?;

        Ok(TeamSummary::from(&team))
    }

    /// Soft delete. Players it bought keep their `team_id`; releasing one later
    /// skips the refund. Its live bids on the lot under the hammer are
    /// retracted, so the hammer never lands on a deleted team.
    pub async fn delete_team(&self, team_id: Uuid) -> Result<(), ServiceError> {
        let _guard = self.auction.locks().acquire(LockName::Auction).await?;
        let mut tx = self.store.begin().await?;

        let lot = match tx.seat_for_update().await?.and_then(|seat| seat.active_player()) {
            Some(player_id) => tx.player_for_update(player_id).await?,
            None => None,
        };
        let mut team = tx
            .team_for_update(team_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Team not found"))?;

        if let Some(mut player) = lot {
            let retracted = tx.retract_team_bids(player.id, team.id).await?;
            if retracted > 0 {
                player.current_price = match tx.highest_live_bid(player.id).await? {
                    Some(bid) => bid.amount,
                    None => player.base_price,
                };
                tx.update_player(&player).await?;
                tracing::info!(
                    "Retracted {} bid(s) by {} on {} ({}), price back to {}",
                    retracted, team.name, player.name, player.id, player.current_price
                );
            }
        }

        team.is_deleted = true;
        tx.update_team(&team).await?;
        tx.commit().await?;

        tracing::info!("Deleted team {} ({})", team.name, team.id);
        Ok(())
    }

    pub async fn get_team(&self, team_id: Uuid) -> Result<TeamSummary, ServiceError> {
        self.store
            .team(team_id)
            .await?
            .map(|team| TeamSummary::from(&team))
            .ok_or_else(|| ServiceError::not_found("Team not found"))
    }

    pub async fn list_teams(&self, league_id: Uuid) -> Result<Vec<TeamSummary>, ServiceError> {
        if self.store.league(league_id).await?.is_none() {
            return Err(ServiceError::not_found("League not found"));
        }
        let teams = self.store.list_teams(league_id).await?;
        Ok(teams.iter().map(TeamSummary::from).collect())
    }

    pub async fn team_squad(&self, team_id: Uuid) -> Result<TeamSquad, ServiceError> {
        let team = self
            .store
            .team(team_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Team not found"))?;
        let filter = PlayerFilter {
            team_id: Some(team.id),
            ..Default::default()
        };
        let players = self.store.list_players(team.league_id, &filter).await?;

        Ok(TeamSquad {
            team: TeamSummary::from(&team),
            players,
        })
    }
}
