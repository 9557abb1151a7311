//! Entry point: load config, wire dependencies, and run the server.

use authd::auth::{ArgonScheme, BasicPolicy, TokenIssuer};
use authd::config::Config;
use authd::db;
use authd::{create_app, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = db::create_pool(&config.database_url).await?;
    let issuer = TokenIssuer::new(
        config.jwt_secret.clone(),
        config.access_ttl_secs,
        config.refresh_ttl_secs,
    );
    let scheme = Arc::new(ArgonScheme::new()?);
    let policy = Arc::new(BasicPolicy::default());

    let state = AppState {
        db: db_pool,
        issuer,
        scheme,
        policy,
    };
    let app = create_app(state);

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
