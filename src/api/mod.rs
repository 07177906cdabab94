//! API — Axum web server exposing the scanner over HTTP and WebSocket.
//!
//! Read-only queries over the current ranked state plus the out-of-band
//! trade simulation command and the `/ws` opportunity stream.
//! CORS enabled for local development.

pub mod routes;
pub mod ws;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::distributor::Distributor;
use crate::engine::history::HistoryTracker;
use crate::engine::ranker::OpportunityRanker;
use crate::engine::simulator::TradeSimulator;
use crate::providers::QuoteProvider;

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub ranker: Arc<OpportunityRanker>,
    pub history: Arc<HistoryTracker>,
    pub distributor: Arc<Distributor>,
    pub simulator: Arc<TradeSimulator>,
    pub provider: Arc<dyn QuoteProvider>,
    pub pairs: Vec<String>,
    pub venues: Vec<String>,
}

pub type AppState = Arc<ApiState>;

/// Start the API server.
///
/// This spawns a background task — it doesn't block.
pub fn spawn_server(state: AppState, port: u16) {
    let app = build_router(state);

    tokio::spawn(async move {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        info!(port, "API server starting on http://localhost:{port}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind API port");

        axum::serve(listener, app).await.expect("API server error");
    });
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/quotes", get(routes::get_quotes))
        .route("/api/arbitrage/opportunities", get(routes::get_opportunities))
        .route("/api/simulate/trade", post(routes::simulate_trade))
        .route("/api/price-history", get(routes::get_price_history))
        .route("/health", get(routes::health))
        .route("/ws", get(ws::ws_handler))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use crate::providers::simulated::SimulatedProvider;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let market = MarketConfig::default();
        let ranker = Arc::new(OpportunityRanker::new(10));
        Arc::new(ApiState {
            ranker: ranker.clone(),
            history: Arc::new(HistoryTracker::new(50)),
            distributor: Arc::new(Distributor::new()),
            simulator: Arc::new(TradeSimulator::new(ranker, 1000.0)),
            provider: Arc::new(SimulatedProvider::new(&market.pairs)),
            pairs: market.pairs.iter().map(|p| p.symbol.clone()).collect(),
            venues: market.venues,
        })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_quotes_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/quotes?pair=SOL/USDC")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["pair"], "SOL/USDC");
        assert_eq!(json["quotes"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_quotes_unknown_pair_is_empty_but_valid() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/quotes?pair=FOO/BAR")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["quotes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_opportunities_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/arbitrage/opportunities")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["totalCount"], 0);
    }

    #[tokio::test]
    async fn test_simulate_unknown_opportunity_is_404() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/simulate/trade")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"opportunityId":"ghost","amount":1000}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_price_history_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/price-history?pair=SOL/USDC")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["history"].as_array().unwrap().is_empty());
    }
}
