use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::models::common::ApiResponse;
use crate::models::team::{CreateTeamRequest, UpdateTeamRequest};
use crate::services::TeamService;

// GET /leagues/{id}/teams
pub async fn get_league_teams(
    teams: web::Data<TeamService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let teams = teams.list_teams(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(teams)))
}

// GET /teams/{id}
pub async fn get_team(
    teams: web::Data<TeamService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let team = teams.get_team(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(team)))
}

// GET /teams/{id}/squad
pub async fn get_team_squad(
    teams: web::Data<TeamService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let squad = teams.team_squad(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(squad)))
}

// POST /admin/leagues/{id}/teams
#[tracing::instrument(
    name = "Create team",
    skip(teams, request),
    fields(league_id = %path.as_ref(), name = %request.name)
)]
pub async fn create_team(
    teams: web::Data<TeamService>,
    path: web::Path<Uuid>,
    request: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse> {
    let team = teams
        .create_team(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Team created", team)))
}

// PATCH /admin/teams/{id}
#[tracing::instrument(
    name = "Rename team",
    skip(teams, request),
    fields(team_id = %path.as_ref())
)]
pub async fn update_team(
    teams: web::Data<TeamService>,
    path: web::Path<Uuid>,
    request: web::Json<UpdateTeamRequest>,
) -> Result<HttpResponse> {
    let team = teams
        .rename_team(path.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Team updated", team)))
}

// DELETE /admin/teams/{id}
#[tracing::instrument(
    name = "Delete team",
    skip(teams),
    fields(team_id = %path.as_ref())
)]
pub async fn delete_team(
    teams: web::Data<TeamService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    teams.delete_team(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_message("Team deleted")))
}
