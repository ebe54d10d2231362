use std::sync::Arc;
use swap_router::{
    api::{create_router, AppState},
    config::Settings,
    sync::PoolFeed,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swap_router=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting swap router...");

    // Load settings
    let settings = Settings::load().unwrap_or_else(|error| {
        tracing::warn!(%error, "failed to load settings, using defaults");
        Settings::default()
    });
    tracing::info!(
        "Configuration loaded: chain_id={}, top_k={}, slippage={}",
        settings.chain.chain_id,
        settings.routing.top_k,
        settings.routing.default_slippage
    );

    // Create application state
    let state = AppState::new(settings.clone());

    // Seed liquidity and keep it fresh
    let feed = Arc::new(PoolFeed::new(state.graph.clone()));
    if let Err(error) = feed.seed() {
        tracing::error!(%error, "failed to seed pools");
    }
    feed.start_periodic_refresh();

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "failed to bind {}", addr);
            return;
        }
    };

    tracing::info!("Swap router is running on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Routing API: http://{}/v1/routes", addr);

    if let Err(error) = axum::serve(listener, app).await {
        tracing::error!(%error, "server terminated");
    }
}
