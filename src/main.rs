use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use daybook::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new().context("failed to load configuration")?;

    let default_filter = if settings.server.debug {
        "daybook=debug"
    } else {
        "daybook=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!(
        database = settings.database.path.as_str(),
        bind_address = %settings.server.bind_address(),
        debug = settings.server.debug,
        "starting daybook"
    );

    daybook::application::serve(settings).await
}
