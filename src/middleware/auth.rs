// src/middleware/auth.rs
use actix_web::{
    dev::ServiceRequest, error::InternalError, http::header, web, Error, HttpResponse,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::jwt::JwtSettings;
use crate::models::common::ApiResponse;

/// Role carried in the token. Tokens are minted by an external issuer that
/// shares the HMAC secret; anything it sends besides `admin` is treated as
/// a read-only caller.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // Subject (operator name or id)
    pub role: Role,
    pub exp: usize,   // Expiration time (as UTC timestamp)
}

/// JSON error body with the given status, in the same shape handlers use
fn auth_error(response: HttpResponse, message: &'static str) -> Error {
    InternalError::from_response(message, response).into()
}

pub fn unauthorized(message: &'static str) -> Error {
    auth_error(HttpResponse::Unauthorized().json(ApiResponse::error(message)), message)
}

pub fn forbidden(message: &'static str) -> Error {
    auth_error(HttpResponse::Forbidden().json(ApiResponse::error(message)), message)
}

/// Extracts and validates the bearer token, returning the decoded claims.
pub fn validate_jwt_from_request(req: &ServiceRequest) -> Result<Claims, Error> {
    let jwt_settings = req.app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| unauthorized("JWT settings not found"))?;

    let auth_header = req.headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("No authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Invalid authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid authorization header format"))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    ).map_err(|e| {
        tracing::warn!("Failed to decode token: {:?}", e);
        unauthorized("Invalid token")
    })?;

    Ok(token_data.claims)
}
