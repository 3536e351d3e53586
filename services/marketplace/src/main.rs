use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use roofline_core::config::Config;
use roofline_core::tracing::init_tracing;
use roofline_storage::s3::S3Storage;

use roofline_marketplace::config::MarketplaceConfig;
use roofline_marketplace::infra::geocode::GoogleGeocoder;
use roofline_marketplace::router::build_router;
use roofline_marketplace::state::{AppState, Settings};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = MarketplaceConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.google_maps_api_key.is_none() {
        info!("GOOGLE_MAPS_API_KEY not set; captured locations will not be geocoded");
    }

    let state = AppState {
        db,
        jwt_secret: Arc::from(config.jwt_secret.as_str()),
        storage: S3Storage::new(config.s3_settings()),
        geocoder: GoogleGeocoder::new(config.google_maps_api_key.clone())
            .expect("failed to build geocoder"),
        settings: Settings::from(&config),
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.marketplace_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("marketplace service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
