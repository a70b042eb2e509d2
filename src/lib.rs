use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use std::net::TcpListener;
use std::sync::Arc;
use actix_cors::Cors;

pub mod config;
mod routes;
mod handlers;
pub mod models;
mod middleware;
pub mod db;
pub mod services;
pub mod telemetry;

use crate::config::jwt::JwtSettings;
use crate::config::settings::AuctionSettings;
use crate::db::store::AuctionStore;
use crate::routes::init_routes;
use crate::services::{AuctionLocks, AuctionService, LeagueService, PlayerService, TeamService};

pub fn run(
    listener: TcpListener,
    store: Arc<dyn AuctionStore>,
    jwt_settings: JwtSettings,
    auction_settings: AuctionSettings,
) -> Result<Server, std::io::Error> {
    let locks = AuctionLocks::for_store(store.as_ref(), auction_settings.lock_timeout());
    let auction = Arc::new(AuctionService::new(
        store.clone(),
        locks,
        auction_settings.countdown_seconds,
    ));

    // Wrap using web::Data, which boils down to an Arc smart pointer
    let auction_data = web::Data::from(auction.clone());
    let league_data = web::Data::new(LeagueService::new(store.clone()));
    let team_data = web::Data::new(TeamService::new(store.clone(), auction.clone()));
    let player_data = web::Data::new(PlayerService::new(store, auction));
    let jwt_settings = web::Data::new(jwt_settings);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:3001")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Get a pointer copy and attach it to the application state
            .app_data(auction_data.clone())
            .app_data(league_data.clone())
            .app_data(team_data.clone())
            .app_data(player_data.clone())
            .app_data(jwt_settings.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
