use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use schedule_server::config::AppConfig;
use schedule_server::store::{AssetDir, RouteStore};
use schedule_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Load the document; missing or corrupt files fall back to seed or defaults
    let (store, _) = RouteStore::load(config.store());

    let assets = AssetDir::create(&config.static_dir).expect("Failed to create static directory");

    let state = AppState::new(store, assets);
    let app = create_router(state);

    let addr = config.addr();
    info!("Schedule server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}
