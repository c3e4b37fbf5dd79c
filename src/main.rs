use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dreamuni::api::{create_router, AppState};
use dreamuni::config::Config;
use dreamuni::db::SupabaseClient;
use dreamuni::llm::ModelProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dreamuni=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let db = SupabaseClient::new(&config.database).context("failed to initialize Supabase")?;

    // Selected once; requests only ever read the resulting handle.
    let model = ModelProvider::select(config.llm.as_ref())
        .await
        .context("model selection failed")?;
    if !model.is_available() {
        warn!("No usable model. Chat requests will receive a fixed unavailable message.");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid listen address")?;

    let state = AppState::new(config, db, model);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Dream University API listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
