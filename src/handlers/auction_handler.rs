use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::models::auction::ResetPriceRequest;
use crate::models::bid::PlaceBidRequest;
use crate::models::common::ApiResponse;
use crate::services::AuctionService;

// POST /admin/auction/start/{player_id}
#[tracing::instrument(
    name = "Start auction",
    skip(auction),
    fields(player_id = %path.as_ref())
)]
pub async fn start_auction(
    auction: web::Data<AuctionService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let outcome = auction.start_auction(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Auction started", outcome)))
}

// POST /admin/bid
#[tracing::instrument(
    name = "Place bid",
    skip(auction, request),
    fields(
        player_id = %request.player_id,
        team_id = %request.team_id,
        amount = %request.amount
    )
)]
pub async fn place_bid(
    auction: web::Data<AuctionService>,
    request: web::Json<PlaceBidRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    let outcome = auction
        .place_bid(request.player_id, request.team_id, request.amount)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Bid placed", outcome)))
}

// POST /admin/auction/end
#[tracing::instrument(name = "End auction", skip(auction))]
pub async fn end_auction(auction: web::Data<AuctionService>) -> Result<HttpResponse> {
    let outcome = auction.end_auction().await?;
    let message = match &outcome.sold_to {
        Some(team) => format!("Sold to {}", team),
        None => "No bids, player marked unsold".to_string(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, outcome)))
}

// POST /admin/auction/unsold
#[tracing::instrument(name = "Mark player unsold", skip(auction))]
pub async fn mark_unsold(auction: web::Data<AuctionService>) -> Result<HttpResponse> {
    let outcome = auction.mark_unsold().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player marked unsold", outcome)))
}

// POST /admin/auction/reset-price
#[tracing::instrument(
    name = "Reset auction price",
    skip(auction, request),
    fields(price = %request.price)
)]
pub async fn reset_price(
    auction: web::Data<AuctionService>,
    request: web::Json<ResetPriceRequest>,
) -> Result<HttpResponse> {
    let outcome = auction.reset_price(request.price).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Price reset", outcome)))
}

// GET /auction/state
pub async fn get_auction_state(auction: web::Data<AuctionService>) -> Result<HttpResponse> {
    let state = auction.auction_state().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(state)))
}

// GET /players/{id}/bids
pub async fn get_bid_history(
    auction: web::Data<AuctionService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let bids = auction.bid_history(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::data(bids)))
}
