use super::{Pool, PoolId, Token};
use alloy_primitives::U256;

/// Direction of travel across a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    AtoB,
    BtoA,
}

/// A directed graph edge: a key into the pool table plus the travel
/// direction.
///
/// Reserve and price views are derived from the referenced pool on
/// demand, so the two directed edges of one pool are mirror images by
/// construction and can never drift apart across updates.
#[derive(Debug, Clone)]
pub struct PoolEdge {
    pub pool_id: PoolId,
    pub direction: SwapDirection,
}

impl PoolEdge {
    pub fn new(pool_id: PoolId, direction: SwapDirection) -> Self {
        Self { pool_id, direction }
    }

    /// `(reserve_in, reserve_out)` oriented along this edge.
    pub fn reserves(&self, pool: &Pool) -> (U256, U256) {
        match self.direction {
            SwapDirection::AtoB => (pool.reserve_a, pool.reserve_b),
            SwapDirection::BtoA => (pool.reserve_b, pool.reserve_a),
        }
    }

    /// Spot price of the input token in output-token units.
    pub fn price(&self, pool: &Pool) -> f64 {
        match self.direction {
            SwapDirection::AtoB => pool.price,
            SwapDirection::BtoA => {
                if pool.price > 0.0 {
                    1.0 / pool.price
                } else {
                    0.0
                }
            }
        }
    }

    pub fn token_in<'a>(&self, pool: &'a Pool) -> &'a Token {
        match self.direction {
            SwapDirection::AtoB => &pool.token_a,
            SwapDirection::BtoA => &pool.token_b,
        }
    }

    pub fn token_out<'a>(&self, pool: &'a Pool) -> &'a Token {
        match self.direction {
            SwapDirection::AtoB => &pool.token_b,
            SwapDirection::BtoA => &pool.token_a,
        }
    }
}
