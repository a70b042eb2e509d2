use chrono::Utc;
use rand::seq::SliceRandom;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::store::AuctionStore;
use crate::models::auction::ReleaseOutcome;
use crate::models::money::Money;
use crate::models::player::{
    CreatePlayerRequest, Player, PlayerFilter, PlayerListQuery, PlayerStatus, Position,
    UpdatePlayerRequest, DEFAULT_BASE_PRICE, DEFAULT_COUNTRY,
};
use crate::services::auction_service::AuctionService;
use crate::services::error::ServiceError;
use crate::services::locks::LockName;

pub struct PlayerService {
    store: Arc<dyn AuctionStore>,
    auction: Arc<AuctionService>,
}

fn validate_base_price(price: Money) -> Result<(), ServiceError> {
    if price.is_negative() {
        return Err(ServiceError::validation("Base price cannot be negative"));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl PlayerService {
    pub fn new(store: Arc<dyn AuctionStore>, auction: Arc<AuctionService>) -> Self {
        Self { store, auction }
    }

    pub async fn create_player(&self, league_id: Uuid, request: CreatePlayerRequest) -> Result<Player, ServiceError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::validation("Player name is required"));
        }
        let base_price = request.base_price.unwrap_or(DEFAULT_BASE_PRICE);
        validate_base_price(base_price)?;

        let mut tx = self.store.begin().await?;
        if tx.league(league_id).await?.is_none() {
            return Err(ServiceError::not_found("League not found"));
        }

        let player = Player {
            id: Uuid::new_v4(),
            league_id,
            name,
            position: request
                .position
                .as_deref()
                .map(Position::parse_lenient)
                .unwrap_or(Position::Allrounder),
            country: non_blank(request.country).unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            original_team: non_blank(request.original_team),
            base_price,
            current_price: base_price,
            status: PlayerStatus::Available,
            team_id: None,
            is_deleted: false,
            created_at: Utc::now(),
        };
        tx.insert_player(&player).await?;
        tx.commit().await?;

        tracing::info!("Added player {} ({}) at base price {}", player.name, player.id, base_price);
        Ok(player)
    }

    /// Edit a player's details. Prices are only editable outside the auction
    /// so a live bidding session never sees its floor move.
    pub async fn update_player(&self, player_id: Uuid, request: UpdatePlayerRequest) -> Result<Player, ServiceError> {
        let mut tx = self.store.begin().await?;
        let mut player = tx
            .player_for_update(player_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Player not found"))?;

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::validation("Player name is required"));
            }
            player.name = name;
        }
        if let Some(position) = request.position {
            player.position = Position::parse_lenient(&position);
        }
        if let Some(country) = non_blank(request.country) {
            player.country = country;
        }
        if request.original_team.is_some() {
            player.original_team = non_blank(request.original_team);
        }
        if let Some(base_price) = request.base_price {
            validate_base_price(base_price)?;
            if player.status == PlayerStatus::Bidding {
                return Err(ServiceError::validation(
                    "Base price cannot change while the player is up for auction",
                ));
            }
            player.base_price = base_price;
            if player.status == PlayerStatus::Available {
                player.current_price = base_price;
            }
        }

        tx.update_player(&player).await?;
        tx.commit().await?;
        Ok(player)
    }

    /// Soft delete. Runs in the auction section because a player holding the
    /// seat takes the seat down with it.
    pub async fn delete_player(&self, player_id: Uuid) -> Result<(), ServiceError> {
        let _guard = self.auction.locks().acquire(LockName::Auction).await?;
        let mut tx = self.store.begin().await?;

        let seat = tx.seat_for_update().await?;
        let mut player = tx
            .player_for_update(player_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Player not found"))?;

        if let Some(mut seat) = seat.filter(|s| s.active_player() == Some(player_id)) {
            seat.close();
            tx.save_seat(&seat).await?;
            tracing::info!("Closed the auction seat held by deleted player {}", player_id);
        }

        player.is_deleted = true;
        tx.update_player(&player).await?;
        tx.commit().await?;

        tracing::info!("Deleted player {} ({})", player.name, player.id);
        Ok(())
    }

    pub async fn get_player(&self, player_id: Uuid) -> Result<Player, ServiceError> {
        self.store
            .player(player_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Player not found"))
    }

    pub async fn list_players(&self, league_id: Uuid, query: &PlayerListQuery) -> Result<Vec<Player>, ServiceError> {
        if self.store.league(league_id).await?.is_none() {
            return Err(ServiceError::not_found("League not found"));
        }

        // `status` is a comma separated set, e.g. "available,unsold"
        let statuses = match query.status.as_deref() {
            Some(raw) => raw
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<PlayerStatus>().map_err(ServiceError::Validation))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let filter = PlayerFilter {
            statuses,
            position: query.position.as_deref().map(Position::parse_lenient),
            team_id: None,
        };
        Ok(self.store.list_players(league_id, &filter).await?)
    }

    /// Players that can go under the hammer next
    pub async fn available_players(
        &self,
        league_id: Uuid,
        position: Option<Position>,
        include_unsold: bool,
    ) -> Result<Vec<Player>, ServiceError> {
        let mut statuses = vec![PlayerStatus::Available];
        if include_unsold {
            statuses.push(PlayerStatus::Unsold);
        }
        let filter = PlayerFilter {
            statuses,
            position,
            team_id: None,
        };
        Ok(self.store.list_players(league_id, &filter).await?)
    }

    /// Uniformly random pick among the available players, for drawing the next lot
    pub async fn random_available_player(
        &self,
        league_id: Uuid,
        position: Option<Position>,
        include_unsold: bool,
    ) -> Result<Player, ServiceError> {
        if self.store.league(league_id).await?.is_none() {
            return Err(ServiceError::not_found("League not found"));
        }
        let pool = self.available_players(league_id, position, include_unsold).await?;
        pool.choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| ServiceError::not_found("No available players"))
    }

    pub async fn release_player(&self, player_id: Uuid) -> Result<ReleaseOutcome, ServiceError> {
        self.auction.release_player(player_id).await
    }
}
