use actix_web::web;

pub mod admin;
pub mod auction;
pub mod backend_health;
pub mod league;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Read-only views, open to anyone
    auction::init_auction_routes(cfg);
    league::init_league_routes(cfg);

    // Everything that changes state sits behind the admin middleware
    admin::init_admin_routes(cfg);
}
