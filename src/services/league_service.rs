use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::store::AuctionStore;
use crate::models::league::{
    CreateLeagueRequest, League, UpdateLeagueRequest, DEFAULT_MAX_SQUAD_SIZE,
    DEFAULT_MIN_SQUAD_SIZE, DEFAULT_PURSE,
};
use crate::services::error::ServiceError;

const MAX_NAME_LEN: usize = 50;
const MAX_DISPLAY_NAME_LEN: usize = 100;

fn validate_name(name: &str) -> Result<(), ServiceError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN {
        return Err(ServiceError::validation(format!(
            "League name must be between 1 and {} characters",
            MAX_NAME_LEN
        )));
    }
    let allowed = |c: char| c.is_alphanumeric() || c.is_whitespace() || c == '_' || c == '-';
    if !name.chars().all(allowed) {
        return Err(ServiceError::validation(
            "League name may only contain letters, numbers, spaces, underscores and hyphens",
        ));
    }
    Ok(())
}

/// Checks that hold for every stored league, new or edited
fn validate_league(league: &League) -> Result<(), ServiceError> {
    validate_name(&league.name)?;
    if league.display_name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(ServiceError::validation(format!(
            "Display name must be at most {} characters",
            MAX_DISPLAY_NAME_LEN
        )));
    }
    if !league.default_purse.is_positive() {
        return Err(ServiceError::validation("Default purse must be positive"));
    }
    if league.min_squad_size <= 0 || league.max_squad_size <= 0 {
        return Err(ServiceError::validation("Squad sizes must be positive"));
    }
    if league.min_squad_size > league.max_squad_size {
        return Err(ServiceError::validation(
            "Minimum squad size cannot exceed maximum squad size",
        ));
    }
    Ok(())
}

pub struct LeagueService {
    store: Arc<dyn AuctionStore>,
}

impl LeagueService {
    pub fn new(store: Arc<dyn AuctionStore>) -> Self {
        Self { store }
    }

    pub async fn create_league(&self, request: CreateLeagueRequest) -> Result<League, ServiceError> {
        let name = request.name.trim().to_string();
        let display_name = request
            .display_name
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| name.clone());

        let league = League {
            id: Uuid::new_v4(),
            name,
            display_name,
            default_purse: request.default_purse.unwrap_or(DEFAULT_PURSE),
            min_squad_size: request.min_squad_size.unwrap_or(DEFAULT_MIN_SQUAD_SIZE),
            max_squad_size: request.max_squad_size.unwrap_or(DEFAULT_MAX_SQUAD_SIZE),
            is_deleted: false,
            created_at: Utc::now(),
        };
        validate_league(&league)?;

        let mut tx = self.store.begin().await?;
        if tx.league_name_taken(&league.name, None).await? {
            return Err(ServiceError::validation("A league with this name already exists"));
        }
        tx.insert_league(&league).await?;
        tx.commit().await?;

        tracing::info!("Created league {} ({})", league.name, league.id);
        Ok(league)
    }

    pub async fn update_league(&self, league_id: Uuid, request: UpdateLeagueRequest) -> Result<League, ServiceError> {
        let mut tx = self.store.begin().await?;
        let mut league = tx
            .league(league_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("League not found"))?;

        if let Some(name) = request.name {
            league.name = name.trim().to_string();
        }
        if let Some(display_name) = request.display_name {
            league.display_name = display_name.trim().to_string();
        }
        if let Some(purse) = request.default_purse {
            league.default_purse = purse;
        }
        if let Some(min) = request.min_squad_size {
            league.min_squad_size = min;
        }
        if let Some(max) = request.max_squad_size {
            league.max_squad_size = max;
        }
        validate_league(&league)?;

        if tx.league_name_taken(&league.name, Some(league.id)).await? {
            return Err(ServiceError::validation("A league with this name already exists"));
        }
        tx.update_league(&league).await?;
        tx.commit().await?;

        tracing::info!("Updated league {} ({})", league.name, league.id);
        Ok(league)
    }

    /// Soft delete. Teams and players stay in place but become unreachable
    /// through the league listings.
    pub async fn delete_league(&self, league_id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.store.begin().await?;
        let mut league = tx
            .league(league_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("League not found"))?;
        league.is_deleted = true;
        tx.update_league(&league).await?;
        tx.commit().await?;

        tracing::info!("Deleted league {} ({})", league.name, league.id);
        Ok(())
    }

    pub async fn get_league(&self, league_id: Uuid) -> Result<League, ServiceError> {
        self.store
            .league(league_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("League not found"))
    }

    pub async fn list_leagues(&self) -> Result<Vec<League>, ServiceError> {
        Ok(self.store.list_leagues().await?)
    }
}
