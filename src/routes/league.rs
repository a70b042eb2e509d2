use actix_web::web;

use crate::handlers::{league_handler, player_handler, team_handler};

pub fn init_league_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/leagues")
            .route(web::get().to(league_handler::get_leagues))
    )
    .service(
        web::resource("/leagues/{id}")
            .route(web::get().to(league_handler::get_league))
    )
    .service(
        web::resource("/leagues/{id}/teams")
            .route(web::get().to(team_handler::get_league_teams))
    )
    .service(
        web::resource("/leagues/{id}/players")
            .route(web::get().to(player_handler::get_league_players))
    )
    .service(
        web::resource("/teams/{id}")
            .route(web::get().to(team_handler::get_team))
    )
    .service(
        web::resource("/teams/{id}/squad")
            .route(web::get().to(team_handler::get_team_squad))
    )
    .service(
        web::resource("/players/{id}")
            .route(web::get().to(player_handler::get_player))
    );
}
