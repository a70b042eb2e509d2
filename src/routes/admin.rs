use actix_web::web;

use crate::handlers::{auction_handler, league_handler, player_handler, team_handler};
use crate::middleware::admin::AdminMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            // Auction floor
            .service(
                web::resource("/bid")
                    .route(web::post().to(auction_handler::place_bid))
            )
            .service(
                web::resource("/auction/start/{player_id}")
                    .route(web::post().to(auction_handler::start_auction))
            )
            .service(
                web::resource("/auction/end")
                    .route(web::post().to(auction_handler::end_auction))
            )
            .service(
                web::resource("/auction/unsold")
                    .route(web::post().to(auction_handler::mark_unsold))
            )
            .service(
                web::resource("/auction/reset-price")
                    .route(web::post().to(auction_handler::reset_price))
            )

            // League management routes
            .service(
                web::resource("/leagues")
                    .route(web::post().to(league_handler::create_league))
            )
            .service(
                web::resource("/leagues/{id}")
                    .route(web::patch().to(league_handler::update_league))
                    .route(web::delete().to(league_handler::delete_league))
            )

            // Team management routes
            .service(
                web::resource("/leagues/{id}/teams")
                    .route(web::post().to(team_handler::create_team))
            )
            .service(
                web::resource("/teams/{id}")
                    .route(web::patch().to(team_handler::update_team))
                    .route(web::delete().to(team_handler::delete_team))
            )

            // Player management routes
            .service(
                web::resource("/leagues/{id}/players")
                    .route(web::post().to(player_handler::create_player))
            )
            .service(
                web::resource("/leagues/{id}/players/random")
                    .route(web::get().to(player_handler::get_random_player))
            )
            .service(
                web::resource("/players/{id}")
                    .route(web::patch().to(player_handler::update_player))
                    .route(web::delete().to(player_handler::delete_player))
            )
            .service(
                web::resource("/players/{id}/release")
                    .route(web::post().to(player_handler::release_player))
            )
    );
}
