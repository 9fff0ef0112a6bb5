use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hydroviewer_api::config::{load_layered, ApiConfig};
use hydroviewer_api::router::create_router;
use hydroviewer_api::state::AppState;
use hydroviewer_pipeline::{GeoServerClient, LivingAtlasClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hydroviewer_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let layered = load_layered().context("Failed to load hydroviewer configuration")?;
    let ctx = layered.to_context().context("Invalid hydroviewer configuration")?;

    tracing::info!(
        port = config.port,
        workspace = %ctx.workspace.display(),
        shapefile_dir = %ctx.shapefile_dir.display(),
        planar_crs = %ctx.planar_crs,
        "Starting Hydroviewer API server"
    );

    let map_target = layered.map_server_target();
    if map_target.is_none() {
        tracing::info!("No GeoServer configured; publish requests must pass a url");
    }

    let state = Arc::new(AppState::new(
        ctx.clone(),
        Arc::new(LivingAtlasClient::new(ctx.atlas_url.clone())),
        Arc::new(GeoServerClient::new()),
        map_target,
    ));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>().context("Invalid CORS origin")?)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state, config.upload_limit)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await?;
    Ok(())
}
