use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::models::common::ApiResponse;
use crate::models::player::{
    CreatePlayerRequest, PlayerListQuery, Position, RandomPlayerQuery, UpdatePlayerRequest,
};
use crate::services::PlayerService;

// GET /players/{id}
pub async fn get_player(
    players: web::Data<PlayerService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let player = players.get_player(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(player)))
}

// GET /leagues/{id}/players?status=&position=
pub async fn get_league_players(
    players: web::Data<PlayerService>,
    path: web::Path<Uuid>,
    query: web::Query<PlayerListQuery>,
) -> Result<HttpResponse> {
    let players = players.list_players(path.into_inner(), &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(players)))
}

// GET /admin/leagues/{id}/players/random?position=&include_unsold=
#[tracing::instrument(
    name = "Draw random player",
    skip(players, query),
    fields(league_id = %path.as_ref())
)]
pub async fn get_random_player(
    players: web::Data<PlayerService>,
    path: web::Path<Uuid>,
    query: web::Query<RandomPlayerQuery>,
) -> Result<HttpResponse> {
    let position = query.position.as_deref().map(Position::parse_lenient);
    let player = players
        .random_available_player(path.into_inner(), position, query.include_unsold)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(player)))
}

// POST /admin/leagues/{id}/players
#[tracing::instrument(
    name = "Create player",
    skip(players, request),
    fields(league_id = %path.as_ref(), name = %request.name)
)]
pub async fn create_player(
    players: web::Data<PlayerService>,
    path: web::Path<Uuid>,
    request: web::Json<CreatePlayerRequest>,
) -> Result<HttpResponse> {
    let player = players
        .create_player(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Player created", player)))
}

// PATCH /admin/players/{id}
#[tracing::instrument(
    name = "Update player",
    skip(players, request),
    fields(player_id = %path.as_ref())
)]
pub async fn update_player(
    players: web::Data<PlayerService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdatePlayerRequest>,
) -> Result<HttpResponse> {
    let player = players
        .update_player(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player updated", player)))
}

// DELETE /admin/players/{id}
#[tracing::instrument(
    name = "Delete player",
    skip(players),
    fields(player_id = %path.as_ref())
)]
pub async fn delete_player(
    players: web::Data<PlayerService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    players.delete_player(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_message("Player deleted")))
}

// POST /admin/players/{id}/release
#[tracing::instrument(
    name = "Release player",
    skip(players),
    fields(player_id = %path.as_ref())
)]
pub async fn release_player(
    players: web::Data<PlayerService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let outcome = players.release_player(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(outcome.message.clone(), outcome)))
}
