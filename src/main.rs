use axum_extra::extract::cookie::Key;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use temple_desk::{TempleStorage, VisitRecorder};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &temple_desk::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        insecure_cookie = cfg.insecure_cookie,
    );

    let storage = TempleStorage::connect(&cfg.database_url, cfg.db_max_connections).await?;
    storage.init_schema().await?;
    let seeded = storage.seed_items().await?;
    if seeded > 0 {
        info!(count = seeded, "seeded default item catalog");
    }
    if !storage.has_admin_account().await? {
        warn!("no admin account yet; POST /api/setup to activate the application");
    }

    let cookie_key = match cfg.cookie_secret.as_deref() {
        Some(secret) => Key::try_from(secret.as_bytes())?,
        None => {
            warn!("TEMPLE_COOKIE_SECRET not set; sessions will not survive a restart");
            Key::generate()
        }
    };

    let recorder = VisitRecorder::from_os_rng(storage.clone());
    let state =
        temple_desk::router::TempleState::new(storage, recorder, cookie_key, cfg.insecure_cookie);
    let app = temple_desk::router::temple_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
