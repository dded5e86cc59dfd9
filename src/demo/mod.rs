//! In-memory club API for local runs and tests.
//!
//! Serves the same REST contract the dashboard talks to (`/token/`, the six
//! resource collections, poll votes) from seeded sample data. Everything but
//! `/token/` requires a bearer access token it issued itself.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod seed;
pub mod state;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use auth::{DemoClaims, TokenKeys, TokenPair};
pub use error::DemoError;
pub use seed::{DEMO_EMAIL, DEMO_PASSWORD};
pub use state::{DemoState, DemoUser};

pub fn app(state: DemoState, enable_cors: bool) -> Router {
    let router = Router::new()
        .merge(resource_routes(state.clone()))
        .merge(public_routes())
        .layer(TraceLayer::new_for_http());

    let router = if enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}

fn public_routes() -> Router<DemoState> {
    Router::new().route("/token/", post(handlers::token))
}

fn resource_routes(state: DemoState) -> Router<DemoState> {
    Router::new()
        .route("/:kind/", get(handlers::list))
        .route("/:kind/create/", post(handlers::create))
        .route("/:kind/:id/", get(handlers::detail))
        .route("/:kind/:id/update/", patch(handlers::update))
        .route("/:kind/:id/delete/", delete(handlers::remove))
        .route("/:kind/:id/vote/", post(handlers::vote))
        .route_layer(middleware::from_fn_with_state(state, auth::require_bearer))
}

/// Serve on an already bound listener until ctrl-c
pub async fn serve(listener: TcpListener, state: DemoState, enable_cors: bool) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "demo backend listening");

    axum::serve(listener, app(state, enable_cors))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("demo backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
