//! Triage daemon - patient triage and appointment booking service.
//!
//! Classifies incoming symptoms, ranks specialization queues by urgency,
//! and allocates appointment slots and ambulance units under concurrent
//! requests.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use triage_common::SystemClock;
use triaged::config::Config;
use triaged::store::Store;
use triaged::{seed, server};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("triaged v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&Config::resolve_path())?;

    let store = Arc::new(Store::new());
    if config.seed_demo_data {
        seed::seed_demo(&store).await;
    }

    let state = server::AppState::new(store, Arc::new(SystemClock));
    server::run(state, &config.listen_addr).await
}
