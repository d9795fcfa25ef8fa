//! Application assembly: storage, session layer, router, listener.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use sqlx::SqlitePool;
use time::Duration;
use tower_sessions::{cookie::Key, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::info;

use crate::database;
use crate::settings::Settings;
use crate::web;

/// Shared application context, constructed once at startup and injected
/// into every handler through axum state.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub settings: Arc<Settings>,
}

/// Run the server until shutdown.
pub async fn serve(settings: Settings) -> Result<()> {
    let pool = database::connect(&settings.database).await?;

    let session_store = SqliteStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("failed to migrate session store")?;

    let key = Key::try_from(settings.session.secret.as_bytes())
        .context("session.secret must be at least 64 bytes")?;
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name("daybook.sid")
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(settings.session.ttl)))
        .with_signed(key);

    let bind_address = settings.server.bind_address();
    let state = AppState {
        pool,
        settings: Arc::new(settings),
    };
    let app = web::routes().layer(session_layer).with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!(%bind_address, "listening");
    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}
