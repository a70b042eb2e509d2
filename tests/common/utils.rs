#![allow(dead_code)]

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::net::TcpListener;
use std::sync::Arc;

use cricket_auction_backend::config::settings::{get_config, AuctionSettings};
use cricket_auction_backend::db::{AuctionStore, MemoryAuctionStore};
use cricket_auction_backend::run;
use cricket_auction_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

pub struct TestApp {
    pub address: String,
    pub admin_token: String,
    pub viewer_token: String,
    pub client: Client,
}

/// Spin up the HTTP server on a random port, backed by a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let configuration = get_config().expect("Failed to read configuration.");
    let secret = configuration.jwt.secret.expose_secret().to_string();
    let jwt_settings = cricket_auction_backend::config::settings::get_jwt_settings(&configuration);

    let store: Arc<dyn AuctionStore> = Arc::new(MemoryAuctionStore::new());
    let auction_settings = AuctionSettings {
        countdown_seconds: 300,
        lock_timeout_ms: 5_000,
    };

    let server = run(listener, store, jwt_settings, auction_settings)
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        admin_token: mint_token(&secret, "auctioneer", "admin"),
        viewer_token: mint_token(&secret, "spectator", "viewer"),
        client: Client::new(),
    }
}

#[derive(serde::Serialize)]
struct TestClaims<'a> {
    sub: &'a str,
    role: &'a str,
    exp: usize,
}

/// Tokens come from an external issuer in production; tests sign their own
/// with the configured secret.
pub fn mint_token(secret: &str, sub: &str, role: &str) -> String {
    let claims = TestClaims {
        sub,
        role,
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("Failed to sign test token")
}

pub async fn make_authenticated_request(
    client: &Client,
    method: reqwest::Method,
    url: &str,
    token: &str,
    body: Option<Value>,
) -> Response {
    let mut request = client
        .request(method, url)
        .header("Authorization", format!("Bearer {}", token));

    if let Some(json_body) = body {
        request = request.json(&json_body);
    }

    request.send().await.expect("Failed to execute request")
}

impl TestApp {
    pub async fn admin_post(&self, path: &str, body: Option<Value>) -> Response {
        make_authenticated_request(
            &self.client,
            reqwest::Method::POST,
            &format!("{}{}", self.address, path),
            &self.admin_token,
            body,
        ).await
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(&format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
