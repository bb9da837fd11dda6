use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi, transform::TransformOpenApi};
use axum::{middleware, routing::get, Extension};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod app_metrics;
pub mod cards;
pub mod config;
pub mod game;
pub mod models;
pub mod state;
pub mod telemetry;
pub mod worker;
pub mod ws;

mod doc_routes;
mod routes;

pub fn create_application(handle: worker::GameHandle) -> axum::Router {
    let mut api = OpenApi::default();
    ApiRouter::new()
        .nest_api_service("/api/v1", routes::api_routes(handle.clone()))
        .route_layer(middleware::from_fn(layer::track_router_metrics))
        .route("/ws", get(ws::ws_handler).with_state(handle))
        .route("/health", get(|| async { "ok" }))
        .nest_api_service("/docs", doc_routes::docs_routes())
        .nest_api_service("/metrics", metric_routes())
        .finish_api_with(&mut api, api_docs)
        .layer(Extension(Arc::new(api)))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_docs(api: TransformOpenApi) -> TransformOpenApi {
    api.title("99: The Card Game Server")
        .summary("Rooms and turns for the 99 card game")
        .description(include_str!("../README.md"))
}

fn metric_routes() -> axum::Router {
    static ONCE: std::sync::Once = std::sync::Once::new();
    ONCE.call_once(|| {
        autometrics::prometheus_exporter::init();
    });

    axum::Router::new().route(
        "/",
        get(|| async { autometrics::prometheus_exporter::encode_http_response() }),
    )
}

pub mod layer {
    use std::time::Instant;

    use axum::{
        extract::{self, MatchedPath},
        middleware::Next,
        response::IntoResponse,
    };

    use crate::app_metrics::{metrics_labels, Metrics};

    pub async fn track_router_metrics(req: extract::Request, next: Next) -> impl IntoResponse {
        let start = Instant::now();
        let path = if let Some(matched_path) = req.extensions().get::<MatchedPath>() {
            matched_path.as_str().to_owned()
        } else {
            req.uri().path().to_owned()
        };
        let method = req.method().clone();

        let response = next.run(req).await;

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let labels =
            metrics_labels::http_requests(method.as_str(), &path, response.status().as_u16());

        Metrics::c_http_requests_total_incr(labels.clone());
        Metrics::h_http_requests_duration_ms(labels, latency_ms);

        response
    }
}
