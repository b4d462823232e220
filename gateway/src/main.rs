use anyhow::Result;
use axum::{extract::State, routing::get, Json, Router};
use dust_feed::{Aggregator, FeedConfig, OpenMeteoClient, Poller, SnapshotStore};
use dust_sites::SiteRegistry;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod dust_routes;

use dust_routes::DustState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "dust_gateway=debug,dust_feed=info,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = FeedConfig::from_env()?;
    let registry = Arc::new(SiteRegistry::dust_belt());
    tracing::info!("   Loaded {} monitored cities", registry.len());

    let client = OpenMeteoClient::new(&config)?;
    let aggregator = Aggregator::new(Arc::new(client), registry.clone(), &config);
    let scope = aggregator.scope();
    let poller = Arc::new(Poller::new(
        aggregator,
        SnapshotStore::new(),
        config.poll_interval(),
    ));
    tracing::info!(
        "   Polling every {:?}, {} tiering, {}h series",
        poller.interval(),
        scope,
        config.horizon
    );
    let poll_handle = poller.clone().spawn();

    let state = DustState::new(poller, registry);
    let app = router(state);

    let port = std::env::var("DUST_GATEWAY_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "18610".to_string());
    let addr = format!("0.0.0.0:{}", port);

    tracing::info!("Dust Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    poll_handle.abort();
    tracing::info!("Dust Gateway stopped");
    Ok(())
}

fn router(state: DustState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state.clone())
        .nest("/api/v1/dust", dust_routes::dust_router(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn health(State(state): State<DustState>) -> Json<serde_json::Value> {
    let latest = state.poller.store().latest().await;
    Json(serde_json::json!({
        "status": if latest.is_some() { "healthy" } else { "warming_up" },
        "service": "dust-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "sites": state.registry.len(),
        "cycle": latest.as_ref().map(|s| s.cycle),
        "updated_at": latest.as_ref().map(|s| s.updated_at),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use dust_feed::SnapshotStore;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state() -> DustState {
        let registry = Arc::new(SiteRegistry::dust_belt());
        // Nothing listens on port 9; every fetch fails fast
        let config = FeedConfig {
            forecast_url: "http://127.0.0.1:9/v1/forecast".to_string(),
            air_quality_url: "http://127.0.0.1:9/v1/air-quality".to_string(),
            timeout_sec: 1,
            ..FeedConfig::default()
        };
        let client = OpenMeteoClient::new(&config).unwrap();
        let aggregator = Aggregator::new(Arc::new(client), registry.clone(), &config);
        let poller = Poller::new(aggregator, SnapshotStore::new(), Duration::from_secs(60));
        DustState::new(Arc::new(poller), registry)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_before_first_cycle() {
        let (status, body) = get(router(state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "warming_up");
        assert_eq!(body["service"], "dust-gateway");
        assert_eq!(body["sites"], 36);
        assert!(body["cycle"].is_null());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_publishes_empty_cycle() {
        let state = state();
        let (status, _) = get(router(state.clone()), "/api/v1/dust").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        state.poller.refresh_now().await;

        let (status, body) = get(router(state.clone()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["cycle"], 1);

        let (status, body) = get(router(state), "/api/v1/dust").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attempted"], 36);
        assert_eq!(body["succeeded"], 0);
        assert_eq!(body["locations"], serde_json::json!([]));
        assert_eq!(body["series"], serde_json::json!({}));
    }
}
