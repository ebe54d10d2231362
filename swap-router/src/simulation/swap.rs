use crate::graph::pool_graph::GraphInner;
use crate::routing::cost::CostModel;
use crate::routing::pathfinder::CandidatePath;
use crate::routing::{SwapRoute, SwapStep};
use crate::utils::math;
use crate::utils::types::u256_ext;
use crate::utils::{Result, RouterError};
use alloy_primitives::U256;
use tokio_util::sync::CancellationToken;

/// Walks candidate paths hop by hop, threading the actual output of each
/// hop into the next through the constant-product formula.
///
/// All amount arithmetic is integer (truncating toward zero); a pool with
/// no usable reserves falls back to valuing the input at the edge's spot
/// price. Per-hop impact is recomputed here from the routed amounts, so
/// the aggregate metrics reflect the real trade rather than the search's
/// single-pass estimate.
pub struct RouteSimulator<'a> {
    cost: &'a CostModel,
}

impl<'a> RouteSimulator<'a> {
    pub(crate) fn new(cost: &'a CostModel) -> Self {
        Self { cost }
    }

    /// Simulate one path. A hop that produces zero output aborts the
    /// route with [`RouterError::DeadHop`]; the caller drops that route
    /// and keeps going. The cancellation token is checked between hops.
    pub(crate) fn simulate_path(
        &self,
        inner: &GraphInner,
        path: &CandidatePath,
        amount_in: U256,
        slippage: f64,
        cancel: Option<&CancellationToken>,
    ) -> Result<SwapRoute> {
        if path.edges.is_empty() {
            return Err(RouterError::InternalError("cannot simulate an empty path".into()));
        }

        let mut current = amount_in;
        let mut steps = Vec::with_capacity(path.edges.len());
        let mut pools = Vec::with_capacity(path.edges.len());
        let mut price_impact = 0.0;

        for (hop, &edge_index) in path.edges.iter().enumerate() {
            if cancel.is_some_and(|token| token.is_cancelled()) {
                return Err(RouterError::Cancelled);
            }

            let edge = &inner.graph[edge_index];
            let pool = inner.pools.get(&edge.pool_id).ok_or_else(|| {
                RouterError::InternalError(format!("pool {} missing from table", edge.pool_id))
            })?;

            let (reserve_in, reserve_out) = edge.reserves(pool);
            let effective = math::effective_in(current, pool.fee_pips);
            price_impact += math::price_impact(
                u256_ext::to_f64(effective),
                u256_ext::to_f64(reserve_in),
                u256_ext::to_f64(reserve_out),
            );

            let output = if !reserve_in.is_zero() && !reserve_out.is_zero() {
                math::constant_product_out(reserve_in, reserve_out, current, pool.fee_pips)
            } else {
                math::spot_output(current, edge.price(pool))
            };

            if output.is_zero() {
                tracing::debug!(hop, pool = %edge.pool_id, "hop produced zero output");
                return Err(RouterError::DeadHop { hop });
            }

            steps.push(SwapStep {
                exchange: pool.exchange.clone(),
                token_in: edge.token_in(pool).clone(),
                token_out: edge.token_out(pool).clone(),
                fee_pips: Some(pool.fee_pips),
                amount_in: current,
                amount_out_min: math::apply_slippage(output, slippage),
            });
            pools.push(pool);
            current = output;
        }

        let gas_estimate = self
            .cost
            .gas_cost(steps.len(), pools.iter().map(|p| p.exchange.as_str()));
        let risk_score = self.cost.risk_score(&pools);

        Ok(SwapRoute {
            steps,
            amount_in,
            expected_amount_out: current,
            price_impact,
            gas_estimate,
            risk_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{LiquidityGraph, Pool, Token};
    use crate::routing::pathfinder::{k_shortest_paths, prepare_weights, SearchLimits};

    fn token(n: u8, symbol: &str, decimals: u8) -> Token {
        Token::new(1, format!("0x{:040x}", n), symbol, decimals)
    }

    fn setup() -> (LiquidityGraph, Token, Token, Token) {
        let graph = LiquidityGraph::new();
        let weth = token(1, "WETH", 18);
        let usdc = token(2, "USDC", 6);
        let dai = token(3, "DAI", 18);

        graph
            .upsert_pool(Pool {
                exchange: "uniswap".to_string(),
                token_a: weth.clone(),
                token_b: usdc.clone(),
                fee_pips: 3000,
                reserve_a: U256::from(1_000_000_000_000_000_000_000u128),
                reserve_b: U256::from(2_000_000_000_000u64),
                price: 2e-9,
                liquidity: 4e6,
            })
            .unwrap();
        graph
            .upsert_pool(Pool {
                exchange: "uniswap".to_string(),
                token_a: usdc.clone(),
                token_b: dai.clone(),
                fee_pips: 500,
                reserve_a: U256::from(5_000_000_000_000u64),
                reserve_b: U256::from(5_000_000u128 * 10u128.pow(18)),
                price: 1e12,
                liquidity: 5e6,
            })
            .unwrap();

        (graph, weth, usdc, dai)
    }

    fn paths_between(
        graph: &LiquidityGraph,
        from: &Token,
        to: &Token,
        amount: U256,
    ) -> Vec<CandidatePath> {
        let inner = graph.read();
        let src = *inner.token_index.get(&from.id()).unwrap();
        let dst = *inner.token_index.get(&to.id()).unwrap();
        let weights = prepare_weights(&inner, amount, &CostModel::default(), None);
        k_shortest_paths(&inner, src, dst, 5, &weights, &SearchLimits::default())
            .unwrap()
            .paths
    }

    #[test]
    fn test_two_hop_simulation_threads_amounts() {
        let (graph, weth, _, dai) = setup();
        let amount = U256::from(1_000_000_000_000_000_000u128);

        let paths = paths_between(&graph, &weth, &dai, amount);
        assert_eq!(paths.len(), 1);

        let cost = CostModel::default();
        let inner = graph.read();
        let route = RouteSimulator::new(&cost)
            .simulate_path(&inner, &paths[0], amount, 0.005, None)
            .unwrap();

        assert_eq!(route.hop_count(), 2);
        assert_eq!(route.steps[0].token_in, weth);
        assert_eq!(route.steps[1].token_out, dai);
        // Step 2 consumes step 1's full output, which sits just above the
        // buffered minimum.
        assert!(route.steps[1].amount_in >= route.steps[0].amount_out_min);
        assert!(route.steps[1].amount_in.abs_diff(route.steps[0].amount_out_min)
            <= route.steps[1].amount_in / U256::from(100u64));

        // ~1992 DAI expected for 1 WETH at a 2000 price, two fee tiers deep.
        let lower = U256::from(1_988u128 * 10u128.pow(18));
        let upper = U256::from(1_995u128 * 10u128.pow(18));
        assert!(route.expected_amount_out > lower);
        assert!(route.expected_amount_out < upper);
        assert_eq!(route.risk_score, 2);
        assert_eq!(route.gas_estimate, 170_000);
        assert!(route.price_impact >= 0.0 && route.price_impact <= 2.0);
    }

    #[test]
    fn test_min_out_applies_slippage_buffer() {
        let (graph, weth, usdc, _) = setup();
        let amount = U256::from(1_000_000_000_000_000_000u128);

        let paths = paths_between(&graph, &weth, &usdc, amount);
        let cost = CostModel::default();
        let inner = graph.read();
        let route = RouteSimulator::new(&cost)
            .simulate_path(&inner, &paths[0], amount, 0.01, None)
            .unwrap();

        let expected_min =
            route.expected_amount_out * U256::from(99u64) / U256::from(100u64);
        // Truncation may shave a unit.
        let diff = expected_min.abs_diff(route.steps[0].amount_out_min);
        assert!(diff <= U256::from(1u64));
    }

    #[test]
    fn test_zero_output_hop_kills_route() {
        let graph = LiquidityGraph::new();
        let a = token(1, "AAA", 18);
        let b = token(2, "BBB", 18);
        graph
            .upsert_pool(Pool {
                exchange: "uniswap".to_string(),
                token_a: a.clone(),
                token_b: b.clone(),
                fee_pips: 3000,
                reserve_a: U256::from(1_000_000_000u64),
                reserve_b: U256::from(1_000_000_000u64),
                price: 1.0,
                liquidity: 10.0,
            })
            .unwrap();

        // A 1-wei input is wiped out by the fee floor.
        let amount = U256::from(1u64);
        let paths = paths_between(&graph, &a, &b, amount);
        assert_eq!(paths.len(), 1);

        let cost = CostModel::default();
        let inner = graph.read();
        let result =
            RouteSimulator::new(&cost).simulate_path(&inner, &paths[0], amount, 0.005, None);
        assert!(matches!(result, Err(RouterError::DeadHop { hop: 0 })));
    }

    #[test]
    fn test_cancellation_between_hops() {
        let (graph, weth, _, dai) = setup();
        let amount = U256::from(1_000_000_000_000_000_000u128);
        let paths = paths_between(&graph, &weth, &dai, amount);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let cost = CostModel::default();
        let inner = graph.read();
        let result = RouteSimulator::new(&cost).simulate_path(
            &inner,
            &paths[0],
            amount,
            0.005,
            Some(&cancel),
        );
        assert!(matches!(result, Err(RouterError::Cancelled)));
    }
}
