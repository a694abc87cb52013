use vibecoin::api::router::create_router;
use vibecoin::config::{AppConfig, LogFormat};
use vibecoin::gamification::leveling::LEVEL_TABLE;
use vibecoin::gamification::COLLECTION_SETS;
use vibecoin::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    // Build the static tables before taking traffic.
    tracing::info!(
        levels = LEVEL_TABLE.len(),
        sets = COLLECTION_SETS.len(),
        "Static tables loaded"
    );

    let addr = config.bind_addr();
    let state = AppState::new(config);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(|| fmt::layer()))
        .init();
}
