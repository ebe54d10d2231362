use crate::graph::TokenId;
use crate::routing::SwapRoute;
use alloy_primitives::U256;
use std::collections::HashSet;

/// Post-ranking adjustment hook, typically backed by a predictive model.
///
/// The contract is a pure reordering plus a per-route tweak of
/// `expected_amount_out`: steps and input amounts must survive untouched
/// and no new routes may appear. Implementations must be thread-safe; if
/// a hook performs I/O it manages its own suspension.
pub trait RouteAdjuster: Send + Sync {
    fn adjust(&self, routes: Vec<SwapRoute>) -> anyhow::Result<Vec<SwapRoute>>;
}

/// Default hook: returns the routes unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityAdjuster;

impl RouteAdjuster for IdentityAdjuster {
    fn adjust(&self, routes: Vec<SwapRoute>) -> anyhow::Result<Vec<SwapRoute>> {
        Ok(routes)
    }
}

type RouteFingerprint = (
    U256,
    Vec<(String, TokenId, TokenId, Option<u32>, U256, U256)>,
);

/// The parts of a route an adjuster must not touch.
fn fingerprint(route: &SwapRoute) -> RouteFingerprint {
    (
        route.amount_in,
        route
            .steps
            .iter()
            .map(|step| {
                (
                    step.exchange.clone(),
                    step.token_in.id(),
                    step.token_out.id(),
                    step.fee_pips,
                    step.amount_in,
                    step.amount_out_min,
                )
            })
            .collect(),
    )
}

/// Verify the hook respected its contract.
pub(crate) fn respects_contract(original: &[SwapRoute], adjusted: &[SwapRoute]) -> bool {
    if adjusted.len() > original.len() {
        return false;
    }

    let known: HashSet<RouteFingerprint> = original.iter().map(fingerprint).collect();
    adjusted.iter().all(|route| known.contains(&fingerprint(route)))
}
