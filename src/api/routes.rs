//! API route handlers.
//!
//! All endpoints return JSON. Queries are read-only snapshots over the
//! current state; upstream fetch failures surface as empty-but-valid
//! results, never as 5xx responses.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AppState;
use crate::errors::SimulationError;
use crate::types::{Opportunity, Quote, SimulationResult};

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotesResponse {
    pub pair: String,
    pub timestamp: i64,
    pub quotes: Vec<Quote>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunitiesResponse {
    pub opportunities: Vec<Opportunity>,
    pub total_count: usize,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryResponse {
    pub pair: String,
    pub history: Vec<f64>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub opportunities_count: usize,
    pub pairs_tracking: usize,
    pub observers_connected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub pair: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunitiesQuery {
    /// Minimum net profit percentage to include.
    pub min_net_profit: Option<f64>,
    /// Restrict to one pair ("All" passes everything).
    pub pair: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub opportunity_id: String,
    pub amount: f64,
}

/// Simulation failures map to HTTP statuses: expired → 404, bad input → 400.
impl IntoResponse for SimulationError {
    fn into_response(self) -> Response {
        let status = match self {
            SimulationError::OpportunityExpired(_) => StatusCode::NOT_FOUND,
            SimulationError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/quotes?pair=
///
/// Fresh per-venue quotes for one pair, independent of the detection
/// cycle. A venue that fails to quote is simply absent from the response.
pub async fn get_quotes(
    State(state): State<AppState>,
    Query(query): Query<PairQuery>,
) -> Json<QuotesResponse> {
    let pair = query
        .pair
        .or_else(|| state.pairs.first().cloned())
        .unwrap_or_default();

    let mut quotes = Vec::with_capacity(state.venues.len());
    for venue in &state.venues {
        match state.provider.fetch_quote(venue, &pair).await {
            Ok(quote) => quotes.push(quote),
            Err(e) => debug!(venue, pair, error = %e, "Venue quote unavailable"),
        }
    }

    Json(QuotesResponse {
        pair,
        timestamp: Utc::now().timestamp_millis(),
        quotes,
    })
}

/// GET /api/arbitrage/opportunities?minNetProfit=&pair=
///
/// Pure filter over the currently held ranked set; no side effects.
pub async fn get_opportunities(
    State(state): State<AppState>,
    Query(query): Query<OpportunitiesQuery>,
) -> Json<OpportunitiesResponse> {
    let min_net_profit = query.min_net_profit.unwrap_or(0.0);
    let snapshot = state.ranker.current();

    let opportunities: Vec<Opportunity> = snapshot
        .opportunities
        .iter()
        .filter(|o| o.net_profit_pct >= min_net_profit)
        .filter(|o| match query.pair.as_deref() {
            None | Some("All") => true,
            Some(pair) => o.pair == pair,
        })
        .cloned()
        .collect();

    let total_count = opportunities.len();
    Json(OpportunitiesResponse {
        opportunities,
        total_count,
        timestamp: Utc::now().timestamp_millis(),
    })
}

/// POST /api/simulate/trade
pub async fn simulate_trade(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<SimulationResult>, SimulationError> {
    let result = state
        .simulator
        .simulate(&request.opportunity_id, request.amount)
        .await?;
    Ok(Json(result))
}

/// GET /api/price-history?pair=
pub async fn get_price_history(
    State(state): State<AppState>,
    Query(query): Query<PairQuery>,
) -> Json<PriceHistoryResponse> {
    let pair = query
        .pair
        .or_else(|| state.pairs.first().cloned())
        .unwrap_or_default();
    let history = state.history.window(&pair).await;

    Json(PriceHistoryResponse {
        pair,
        history,
        timestamp: Utc::now().timestamp_millis(),
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().timestamp_millis(),
        opportunities_count: state.ranker.current().len(),
        pairs_tracking: state.pairs.len(),
        observers_connected: state.distributor.observer_count().await,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use crate::distributor::Distributor;
    use crate::engine::history::HistoryTracker;
    use crate::engine::ranker::OpportunityRanker;
    use crate::engine::simulator::TradeSimulator;
    use crate::providers::simulated::SimulatedProvider;
    use crate::types::RankedSet;
    use std::sync::Arc;

    fn state_with_opportunities(opps: Vec<Opportunity>) -> AppState {
        let market = MarketConfig::default();
        let ranker = Arc::new(OpportunityRanker::new(10));
        ranker.replace(opps);
        Arc::new(super::super::ApiState {
            ranker: ranker.clone(),
            history: Arc::new(HistoryTracker::new(50)),
            distributor: Arc::new(Distributor::new()),
            simulator: Arc::new(TradeSimulator::new(ranker, 1000.0)),
            provider: Arc::new(SimulatedProvider::new(&market.pairs)),
            pairs: market.pairs.iter().map(|p| p.symbol.clone()).collect(),
            venues: market.venues,
        })
    }

    fn sample_for_pair(id: &str, pair: &str, net: f64) -> Opportunity {
        Opportunity {
            pair: pair.to_string(),
            ..Opportunity::sample(id, net)
        }
    }

    #[tokio::test]
    async fn test_opportunities_min_profit_filter() {
        let state = state_with_opportunities(vec![
            Opportunity::sample("big", 2.0),
            Opportunity::sample("small", 0.1),
        ]);
        let Json(resp) = get_opportunities(
            State(state),
            Query(OpportunitiesQuery {
                min_net_profit: Some(1.0),
                pair: None,
            }),
        )
        .await;
        assert_eq!(resp.total_count, 1);
        assert_eq!(resp.opportunities[0].id, "big");
    }

    #[tokio::test]
    async fn test_opportunities_pair_filter() {
        let state = state_with_opportunities(vec![
            sample_for_pair("sol", "SOL/USDC", 1.0),
            sample_for_pair("ray", "RAY/USDC", 2.0),
        ]);
        let Json(resp) = get_opportunities(
            State(state.clone()),
            Query(OpportunitiesQuery {
                min_net_profit: None,
                pair: Some("RAY/USDC".to_string()),
            }),
        )
        .await;
        assert_eq!(resp.total_count, 1);
        assert_eq!(resp.opportunities[0].id, "ray");

        // "All" passes everything
        let Json(all) = get_opportunities(
            State(state),
            Query(OpportunitiesQuery {
                min_net_profit: None,
                pair: Some("All".to_string()),
            }),
        )
        .await;
        assert_eq!(all.total_count, 2);
    }

    #[tokio::test]
    async fn test_simulate_round_trip() {
        let state = state_with_opportunities(vec![Opportunity::sample("opp-1", 1.5)]);
        let Json(result) = simulate_trade(
            State(state),
            Json(SimulateRequest {
                opportunity_id: "opp-1".to_string(),
                amount: 500.0,
            }),
        )
        .await
        .unwrap();
        assert_eq!(result.opportunity_id, "opp-1");
        assert_eq!(result.requested_amount, 500.0);
    }

    #[tokio::test]
    async fn test_simulate_invalid_amount_rejected() {
        let state = state_with_opportunities(vec![Opportunity::sample("opp-1", 1.5)]);
        let err = simulate_trade(
            State(state),
            Json(SimulateRequest {
                opportunity_id: "opp-1".to_string(),
                amount: -1.0,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_query_does_not_mutate_state() {
        let state = state_with_opportunities(vec![Opportunity::sample("a", 1.0)]);
        let before: Arc<RankedSet> = state.ranker.current();

        let _ = get_opportunities(
            State(state.clone()),
            Query(OpportunitiesQuery {
                min_net_profit: Some(0.5),
                pair: None,
            }),
        )
        .await;

        assert!(Arc::ptr_eq(&before, &state.ranker.current()));
    }

    #[tokio::test]
    async fn test_health_reflects_state() {
        let state = state_with_opportunities(vec![Opportunity::sample("a", 1.0)]);
        let Json(resp) = health(State(state)).await;
        assert_eq!(resp.status, "healthy");
        assert_eq!(resp.opportunities_count, 1);
        assert_eq!(resp.pairs_tracking, 5);
    }

    #[test]
    fn test_opportunities_query_parses_camel_case() {
        let q: OpportunitiesQuery =
            serde_json::from_str(r#"{"minNetProfit":0.5,"pair":"SOL/USDC"}"#).unwrap();
        assert_eq!(q.min_net_profit, Some(0.5));
        assert_eq!(q.pair.as_deref(), Some("SOL/USDC"));
    }
}
