use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::models::common::ApiResponse;
use crate::models::league::{CreateLeagueRequest, UpdateLeagueRequest};
use crate::services::LeagueService;

// GET /leagues
pub async fn get_leagues(leagues: web::Data<LeagueService>) -> Result<HttpResponse> {
    let leagues = leagues.list_leagues().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(leagues)))
}

// GET /leagues/{id}
pub async fn get_league(
    leagues: web::Data<LeagueService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let league = leagues.get_league(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(league)))
}

// POST /admin/leagues
#[tracing::instrument(
    name = "Create league",
    skip(leagues, request),
    fields(name = %request.name)
)]
pub async fn create_league(
    leagues: web::Data<LeagueService>,
    request: web::Json<CreateLeagueRequest>,
) -> Result<HttpResponse> {
    let league = leagues.create_league(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("League created", league)))
}

// PATCH /admin/leagues/{id}
#[tracing::instrument(
    name = "Update league",
    skip(leagues, request),
    fields(league_id = %path.as_ref())
)]
pub async fn update_league(
    leagues: web::Data<LeagueService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateLeagueRequest>,
) -> Result<HttpResponse> {
    let league = leagues
        .update_league(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("League updated", league)))
}

// DELETE /admin/leagues/{id}
#[tracing::instrument(
    name = "Delete league",
    skip(leagues),
    fields(league_id = %path.as_ref())
)]
pub async fn delete_league(
    leagues: web::Data<LeagueService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    leagues.delete_league(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_message("League deleted")))
}
