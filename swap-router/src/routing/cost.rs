use crate::graph::Pool;
use crate::utils::math;
use crate::utils::types::{u256_ext, DEFAULT_SLIPPAGE, GAS_PER_EXTRA_HOP, GAS_SWAP_BASE};
use crate::utils::{Result, RouterError};
use alloy_primitives::U256;
use std::collections::HashMap;

/// Exchanges whose hops do not add reputation risk.
const REPUTABLE_EXCHANGES: [&str; 4] = ["uniswap", "sushiswap", "curve", "balancer"];

/// Per-exchange gas adjustments relative to the base swap cost.
/// Unknown tags cost nothing extra here; risk scoring penalizes them.
pub fn default_gas_table() -> HashMap<String, i64> {
    HashMap::from([
        ("uniswap".to_string(), 0),
        ("sushiswap".to_string(), 5_000),
        ("curve".to_string(), -10_000),
        ("balancer".to_string(), 15_000),
    ])
}

/// Coefficients of the multi-objective edge weight. Must be non-negative
/// and sum to 1.
#[derive(Debug, Clone, Copy)]
pub struct WeightCoefficients {
    pub price_impact: f64,
    pub gas: f64,
    pub slippage: f64,
}

impl Default for WeightCoefficients {
    fn default() -> Self {
        Self {
            price_impact: 0.6,
            gas: 0.3,
            slippage: 0.1,
        }
    }
}

impl WeightCoefficients {
    pub fn validate(&self) -> Result<()> {
        let components = [self.price_impact, self.gas, self.slippage];
        if components.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(RouterError::ConfigError(
                "weight coefficients must be non-negative".into(),
            ));
        }
        let sum: f64 = components.iter().sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(RouterError::ConfigError(format!(
                "weight coefficients sum to {sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}

/// Cost model shared by search and simulation: price-impact estimation,
/// gas accounting, and risk scoring.
#[derive(Debug, Clone)]
pub struct CostModel {
    pub weights: WeightCoefficients,
    pub gas_table: HashMap<String, i64>,
    pub default_slippage: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            weights: WeightCoefficients::default(),
            gas_table: default_gas_table(),
            default_slippage: DEFAULT_SLIPPAGE,
        }
    }
}

impl CostModel {
    /// Gas for a path: base cost, a surcharge per hop beyond the first,
    /// and per-exchange adjustments (matched case-insensitively).
    pub fn gas_cost<'a>(
        &self,
        hops: usize,
        exchanges: impl IntoIterator<Item = &'a str>,
    ) -> u64 {
        let mut total =
            GAS_SWAP_BASE as i64 + hops.saturating_sub(1) as i64 * GAS_PER_EXTRA_HOP as i64;

        for exchange in exchanges {
            total += self
                .gas_table
                .get(&exchange.to_ascii_lowercase())
                .copied()
                .unwrap_or(0);
        }

        total.max(0) as u64
    }

    /// Composite 1-5 risk score for a path of pools: hop count, worst
    /// USD liquidity along the path, and hops on off-list exchanges.
    pub fn risk_score(&self, pools: &[&Pool]) -> u8 {
        let hop_risk: u8 = match pools.len() {
            0 | 1 => 1,
            2 => 2,
            3 => 3,
            _ => 4,
        };

        let min_liquidity = pools
            .iter()
            .map(|p| p.liquidity)
            .fold(f64::INFINITY, f64::min);
        let liquidity_risk: u8 = if min_liquidity < 1e5 {
            2
        } else if min_liquidity < 1e6 {
            1
        } else {
            0
        };

        let off_list = pools
            .iter()
            .filter(|p| {
                !REPUTABLE_EXCHANGES.contains(&p.exchange.to_ascii_lowercase().as_str())
            })
            .count()
            .min(2) as u8;

        (hop_risk + liquidity_risk + off_list).min(5)
    }

    /// Search-time price impact estimate for one edge, computed from the
    /// raw request amount. The fee tier is deliberately left out here;
    /// simulation reapplies it with the true per-hop amounts.
    pub fn search_impact(&self, amount_in: U256, reserve_in: U256, reserve_out: U256) -> f64 {
        math::price_impact(
            u256_ext::to_f64(amount_in),
            u256_ext::to_f64(reserve_in),
            u256_ext::to_f64(reserve_out),
        )
    }

    /// Multi-objective edge weight; gas is normalized to the million-unit
    /// scale so all three terms are comparable.
    pub fn edge_weight(&self, price_impact: f64, gas: u64, slippage: f64) -> f64 {
        self.weights.price_impact * price_impact
            + self.weights.gas * (gas as f64 / 1e6)
            + self.weights.slippage * slippage
    }
}
