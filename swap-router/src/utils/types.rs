/// Fee tiers are expressed in millionths of the input (pips).
/// A `fee_pips` of 3000 is a 0.3% fee.
pub const FEE_DENOMINATOR: u64 = 1_000_000;

/// Default number of candidate routes returned by a search.
pub const DEFAULT_TOP_K: usize = 5;

/// Default per-hop slippage buffer applied to minimum outputs.
pub const DEFAULT_SLIPPAGE: f64 = 0.005;

/// Base gas cost of executing a swap transaction.
pub const GAS_SWAP_BASE: u64 = 100_000;

/// Incremental gas cost of each hop beyond the first.
pub const GAS_PER_EXTRA_HOP: u64 = 70_000;

/// Upper bound on path length explored by the search.
pub const MAX_SEARCH_HOPS: usize = 6;

/// Helper functions for U256
pub mod u256_ext {
    use alloy_primitives::U256;

    pub fn to_f64(value: U256) -> f64 {
        let mut result = 0.0;
        let mut multiplier = 1.0;

        for word in value.as_limbs().iter() {
            result += (*word as f64) * multiplier;
            multiplier *= 2.0_f64.powi(64);
        }

        result
    }

    pub fn from_f64(value: f64) -> U256 {
        if value <= 0.0 || !value.is_finite() {
            return U256::ZERO;
        }
        U256::from((value as u128).min(u128::MAX))
    }
}
