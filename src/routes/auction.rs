use actix_web::web;

use crate::handlers::auction_handler;

pub fn init_auction_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/auction/state")
            .route(web::get().to(auction_handler::get_auction_state))
    )
    .service(
        web::resource("/players/{id}/bids")
            .route(web::get().to(auction_handler::get_bid_history))
    );
}
