use anyhow::Context;
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use weather_core::{Config, ForecastSource, provider};

use crate::handler;

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub source: Arc<dyn ForecastSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::index))
        .route("/health", get(handler::health))
        .route("/weather", get(handler::weather))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let source = Arc::from(provider::source_from_config(&config.upstream)?);
    let app = router(AppState { source });

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        %addr,
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        "Starting weather service"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    info!("Weather service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use weather_core::{NwsClient, UpstreamConfig};
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_for(server: &MockServer) -> Router {
        let config = UpstreamConfig {
            base_url: server.uri(),
            ..Default::default()
        };
        let source = Arc::new(NwsClient::new(&config).unwrap());
        router(AppState { source })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn mount_points(server: &MockServer, forecast_url: String) {
        Mock::given(method("GET"))
            .and(path("/points/40.7128,-74.0060"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "forecast": forecast_url }
            })))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn new_york_end_to_end() {
        let server = MockServer::start().await;
        mount_points(&server, format!("{}/f", server.uri())).await;

        Mock::given(method("GET"))
            .and(path("/f"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": {
                    "periods": [
                        { "shortForecast": "Sunny", "temperature": 85, "temperatureUnit": "F" }
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (status, json) = get_json(app_for(&server), "/weather?lat=40.7128&lon=-74.0060").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({
                "forecast": "Sunny",
                "temperature": "hot",
                "coordinates": "40.7128, -74.0060",
            })
        );
    }

    #[tokio::test]
    async fn points_404_becomes_400() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/points/40.7128,-74.0060"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let (status, json) = get_json(app_for(&server), "/weather?lat=40.7128&lon=-74.0060").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("not found in NWS grid system"), "{message}");
    }

    #[tokio::test]
    async fn empty_periods_becomes_generic_500() {
        let server = MockServer::start().await;
        mount_points(&server, format!("{}/f", server.uri())).await;

        Mock::given(method("GET"))
            .and(path("/f"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "properties": { "periods": [] } })),
            )
            .mount(&server)
            .await;

        let (status, json) = get_json(app_for(&server), "/weather?lat=40.7128&lon=-74.0060").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({ "error": "Failed to retrieve weather data" }));
    }

    #[tokio::test]
    async fn upstream_error_body_is_not_leaked() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/points/40.7128,-74.0060"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal stack trace"))
            .mount(&server)
            .await;

        let (status, json) = get_json(app_for(&server), "/weather?lat=40.7128&lon=-74.0060").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json, serde_json::json!({ "error": "Failed to retrieve weather data" }));
    }

    #[tokio::test]
    async fn out_of_coverage_makes_no_upstream_call() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (status, json) = get_json(app_for(&server), "/weather?lat=-33.8688&lon=151.2093").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"],
            "coordinates (-33.8688, 151.2093) are outside NWS coverage area (US and territories only)"
        );
    }
}
