use std::sync::Arc;

use anyhow::Context;
use fit_onboarding::config::OnboardingConfig;
use fit_onboarding::onboarding::{OnboardingManager, OnboardingRouteState, onboarding_routes};
use fit_onboarding::store::{LibSqlProfileStore, ProfileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = OnboardingConfig::from_env()?;

    // ── Profile store ───────────────────────────────────────────────────
    let store: Arc<dyn ProfileStore> = Arc::new(
        LibSqlProfileStore::new_local(&config.db_path)
            .await
            .with_context(|| format!("failed to open database at {}", config.db_path.display()))?,
    );

    // ── HTTP ────────────────────────────────────────────────────────────
    let manager = Arc::new(OnboardingManager::new(store));
    let app = onboarding_routes(OnboardingRouteState { manager });

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, db = %config.db_path.display(), "Onboarding server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
