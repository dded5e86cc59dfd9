#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use clubsync::api::ApiClient;
use clubsync::auth::{self, Credentials};
use clubsync::demo::{self, DemoState, TokenKeys, DEMO_EMAIL, DEMO_PASSWORD};
use clubsync::session::TokenStore;

pub const TEST_SECRET: &str = "clubsync-test-secret";

/// Serve `app` on a free local port for the rest of the test
pub async fn spawn(app: Router) -> Result<String> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://127.0.0.1:{}", port))
}

/// Seeded demo backend
pub async fn spawn_demo() -> Result<String> {
    let state = DemoState::seeded(TokenKeys::new(TEST_SECRET, 1));
    spawn(demo::app(state, false)).await
}

/// Client with an empty in-memory session
pub fn client(base_url: &str) -> Result<ApiClient> {
    Ok(ApiClient::new(base_url, TokenStore::in_memory())?)
}

/// Client logged in as the demo member
pub async fn logged_in(base_url: &str) -> Result<ApiClient> {
    let client = client(base_url)?;
    auth::login(&client, &Credentials::new(DEMO_EMAIL, DEMO_PASSWORD)).await?;
    Ok(client)
}

/// A port nothing listens on
pub fn dead_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}", port))
}
