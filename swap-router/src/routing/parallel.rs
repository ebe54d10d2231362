use crate::graph::TokenId;
use crate::routing::{FindRoutesOptions, RouteSet, Router};
use crate::utils::Result;
use alloy_primitives::U256;
use rayon::prelude::*;

/// One entry of a batch routing request.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: U256,
}

/// Evaluate independent routing requests in parallel.
///
/// Each request runs the full pipeline under its own graph read lock;
/// useful for bulk quoting where callers do not share a cancellation
/// scope. Results come back in request order.
pub fn batch_find_routes(router: &Router, requests: &[BatchRequest]) -> Vec<Result<RouteSet>> {
    requests
        .par_iter()
        .map(|request| {
            router.find_routes(
                &request.token_in,
                &request.token_out,
                request.amount_in,
                FindRoutesOptions::default(),
            )
        })
        .collect()
}
