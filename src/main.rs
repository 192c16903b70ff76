//! Product API server
//! Mission: Serve the product catalogue behind bearer-token authentication

use anyhow::{Context, Result};
use product_api::{
    auth::{SqliteUserStore, TokenService},
    build_router,
    products::SqliteProductStore,
    AppState, Config,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();
    init_tracing();

    info!("🚀 Product API starting");

    if config.uses_dev_secret() {
        warn!("⚠️  JWT_SECRET not set, using the development key. CHANGE IT IN PRODUCTION!");
    }

    let users = SqliteUserStore::new(&config.database_path)
        .with_context(|| format!("Failed to open user store at {}", config.database_path))?;
    let products = SqliteProductStore::new(&config.database_path)
        .with_context(|| format!("Failed to open product store at {}", config.database_path))?;
    info!("💾 Database ready at: {}", config.database_path);

    let tokens = Arc::new(
        TokenService::new(&config.jwt_secret, config.jwt_expires_in)
            .context("Failed to initialize token service")?,
    );
    info!(
        "🔐 Authentication initialized (token ttl {}s, bcrypt cost {})",
        tokens.ttl_seconds(),
        config.bcrypt_cost
    );

    let app = build_router(AppState {
        users: Arc::new(users),
        products: Arc::new(products),
        tokens,
        bcrypt_cost: config.bcrypt_cost,
    });

    // Start server
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("🎯 API server listening on {}", config.bind);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

/// Initialize tracing with an env-configurable filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
