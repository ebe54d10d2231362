use super::dto::{
    ErrorResponse, GraphStatsDto, HealthResponse, PoolKeyRequest, PoolUpsertRequest,
    RouteRequest, RouteResponse,
};
use super::state::AppState;
use crate::graph::TokenId;
use crate::routing::FindRoutesOptions;
use crate::utils::RouterError;
use alloy_primitives::U256;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.graph.stats();

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chain_id: state.settings.chain.chain_id,
        graph_stats: GraphStatsDto {
            token_count: stats.token_count,
            pool_count: stats.pool_count,
            last_update: stats.last_update,
        },
    };

    Json(response)
}

/// Find routes for a swap request.
pub async fn find_routes(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let amount_in = request
        .amount_in
        .trim()
        .parse::<U256>()
        .map_err(|_| ApiError::BadRequest(format!("invalid amount_in {:?}", request.amount_in)))?;

    let token_in = TokenId::new(request.chain_id, &request.token_in);
    let token_out = TokenId::new(request.chain_id, &request.token_out);
    let options = FindRoutesOptions {
        k: request.k,
        slippage: Some(request.slippage),
        allowed_exchanges: request.exchanges,
        ..Default::default()
    };

    // The routing core is CPU-bound; keep it off the async workers.
    let router = state.router.clone();
    let set = tokio::task::spawn_blocking(move || {
        router.find_routes(&token_in, &token_out, amount_in, options)
    })
    .await
    .map_err(|e| ApiError::InternalError(e.to_string()))?
    .map_err(ApiError::from)?;

    Ok(Json(RouteResponse::from_set(&set)))
}

/// Upsert a pool from the data feed.
pub async fn upsert_pool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PoolUpsertRequest>,
) -> Result<StatusCode, ApiError> {
    let pool = request.into_pool().map_err(ApiError::from)?;
    state.graph.upsert_pool(pool).map_err(ApiError::from)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a pool by its identity key.
pub async fn remove_pool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PoolKeyRequest>,
) -> Result<StatusCode, ApiError> {
    let pool_id = request.into_pool_id().map_err(ApiError::from)?;
    state.graph.remove_pool(&pool_id);
    Ok(StatusCode::NO_CONTENT)
}

/// API Error type
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    InternalError(String),
}

impl From<RouterError> for ApiError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::UnknownToken { .. } => ApiError::NotFound(err.to_string()),
            RouterError::InvalidAmount(_) | RouterError::InvalidPool(_) => {
                ApiError::BadRequest(err.to_string())
            }
            RouterError::Cancelled => ApiError::Unavailable(err.to_string()),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let error_response = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        };

        (status, Json(error_response)).into_response()
    }
}
