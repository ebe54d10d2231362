use crate::graph::{LiquidityGraph, Pool, Token};
use crate::utils::Result;
use alloy_primitives::U256;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the pool feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// How often to refresh pool data (seconds)
    pub refresh_interval_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 12,
        }
    }
}

/// Development pool feed.
///
/// Pool discovery and reserve tracking belong to an external indexer; the
/// binary and benchmarks use this feed to populate the graph with
/// mainnet-shaped pools through the same `upsert_pool` path a real
/// indexer would use, and to exercise the periodic refresh loop.
pub struct PoolFeed {
    graph: Arc<LiquidityGraph>,
    config: FeedConfig,
}

impl PoolFeed {
    pub fn new(graph: Arc<LiquidityGraph>) -> Self {
        Self {
            graph,
            config: FeedConfig::default(),
        }
    }

    pub fn with_config(graph: Arc<LiquidityGraph>, config: FeedConfig) -> Self {
        Self { graph, config }
    }

    /// Push the seed pool set into the graph.
    pub fn seed(&self) -> Result<()> {
        for pool in seed_pools() {
            self.graph.upsert_pool(pool)?;
        }

        let stats = self.graph.stats();
        tracing::info!(
            tokens = stats.token_count,
            pools = stats.pool_count,
            "pool feed seeded"
        );
        Ok(())
    }

    /// Start a background refresh loop.
    pub fn start_periodic_refresh(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let interval = Duration::from_secs(self.config.refresh_interval_secs);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(error) = self.seed() {
                    tracing::warn!(%error, "periodic pool refresh failed");
                }
            }
        })
    }
}

fn mainnet_tokens() -> (Token, Token, Token, Token) {
    (
        Token::new(1, "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "WETH", 18),
        Token::new(1, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC", 6),
        Token::new(1, "0x6B175474E89094C44Da98b954EedeAC495271d0F", "DAI", 18),
        Token::new(1, "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", "WBTC", 8),
    )
}

/// Mainnet-shaped pools: realistic reserve magnitudes across the four
/// exchanges the gas table knows about.
fn seed_pools() -> Vec<Pool> {
    let (weth, usdc, dai, wbtc) = mainnet_tokens();

    vec![
        Pool {
            exchange: "uniswap".to_string(),
            token_a: weth.clone(),
            token_b: usdc.clone(),
            fee_pips: 3000,
            reserve_a: U256::from(1_000u128 * 10u128.pow(18)),
            reserve_b: U256::from(2_000_000u128 * 10u128.pow(6)),
            price: 2e-9,
            liquidity: 4e6,
        },
        Pool {
            exchange: "sushiswap".to_string(),
            token_a: weth.clone(),
            token_b: usdc.clone(),
            fee_pips: 3000,
            reserve_a: U256::from(400u128 * 10u128.pow(18)),
            reserve_b: U256::from(800_000u128 * 10u128.pow(6)),
            price: 2e-9,
            liquidity: 1.6e6,
        },
        Pool {
            exchange: "curve".to_string(),
            token_a: usdc.clone(),
            token_b: dai.clone(),
            fee_pips: 500,
            reserve_a: U256::from(5_000_000u128 * 10u128.pow(6)),
            reserve_b: U256::from(5_000_000u128 * 10u128.pow(18)),
            price: 1e12,
            liquidity: 1e7,
        },
        Pool {
            exchange: "uniswap".to_string(),
            token_a: weth.clone(),
            token_b: dai.clone(),
            fee_pips: 3000,
            reserve_a: U256::from(300u128 * 10u128.pow(18)),
            reserve_b: U256::from(600_000u128 * 10u128.pow(18)),
            price: 2000.0,
            liquidity: 1.2e6,
        },
        Pool {
            exchange: "uniswap".to_string(),
            token_a: wbtc.clone(),
            token_b: weth.clone(),
            fee_pips: 3000,
            reserve_a: U256::from(100u128 * 10u128.pow(8)),
            reserve_b: U256::from(1_500u128 * 10u128.pow(18)),
            price: 1.5e11,
            liquidity: 6e6,
        },
        Pool {
            exchange: "balancer".to_string(),
            token_a: wbtc,
            token_b: usdc,
            fee_pips: 1000,
            reserve_a: U256::from(50u128 * 10u128.pow(8)),
            reserve_b: U256::from(1_500_000u128 * 10u128.pow(6)),
            price: 300.0,
            liquidity: 3e6,
        },
    ]
}
