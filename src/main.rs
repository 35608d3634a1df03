use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use lunacycle_backend::export::Snapshot;
use lunacycle_backend::{app, AppConfig, AppState, Clock, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let state = match &config.seed_file {
        Some(path) => {
            let snapshot = Snapshot::load(path)?;
            tracing::info!(
                "🌱 Seeding {} entries and {} cycles from {}",
                snapshot.entries.len(),
                snapshot.cycles.len(),
                path.display()
            );
            AppState::from_snapshot(snapshot, &config, clock)?
        }
        None => AppState::new(&config, clock),
    };
    if config.simulate_latency {
        tracing::info!("🐢 Simulated latency enabled");
    }

    let app = app(state);

    tracing::info!("🧠 Server running at {}", config.bind_addr);

    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
