use super::{Token, TokenId};
use crate::utils::types::FEE_DENOMINATOR;
use crate::utils::{Result, RouterError};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_DECIMALS: u8 = 36;

/// Identity of a pool: exchange tag, ordered token pair, and fee tier.
/// Upserts replace by this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolId {
    exchange: String,
    token_a: TokenId,
    token_b: TokenId,
    fee_pips: u32,
}

impl PoolId {
    pub fn new(exchange: &str, token_a: TokenId, token_b: TokenId, fee_pips: u32) -> Self {
        Self {
            exchange: exchange.trim().to_ascii_lowercase(),
            token_a,
            token_b,
            fee_pips,
        }
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn token_a(&self) -> &TokenId {
        &self.token_a
    }

    pub fn token_b(&self) -> &TokenId {
        &self.token_b
    }

    pub fn fee_pips(&self) -> u32 {
        self.fee_pips
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.exchange, self.token_a, self.token_b, self.fee_pips
        )
    }
}

/// A liquidity pool snapshot as delivered by the data feed.
///
/// Reserves are kept in native token precision; `price` quotes `token_a`
/// in units of `token_b` (`reserve_b / reserve_a` for constant-product
/// pools); `liquidity` is USD TVL and feeds risk scoring only. The fee
/// tier is stored in millionths (`3000` = 0.3%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub exchange: String,
    pub token_a: Token,
    pub token_b: Token,
    pub fee_pips: u32,
    pub reserve_a: U256,
    pub reserve_b: U256,
    pub price: f64,
    pub liquidity: f64,
}

impl Pool {
    pub fn id(&self) -> PoolId {
        PoolId::new(
            &self.exchange,
            self.token_a.id(),
            self.token_b.id(),
            self.fee_pips,
        )
    }

    pub fn fee_fraction(&self) -> f64 {
        f64::from(self.fee_pips) / FEE_DENOMINATOR as f64
    }

    /// Reject malformed pools before they reach the graph.
    pub fn validate(&self) -> Result<()> {
        if self.token_a.id() == self.token_b.id() {
            return Err(RouterError::InvalidPool(format!(
                "token_a and token_b are the same token ({})",
                self.token_a.id()
            )));
        }
        if self.token_a.chain_id != self.token_b.chain_id {
            return Err(RouterError::InvalidPool(format!(
                "tokens on different chains ({} vs {})",
                self.token_a.chain_id, self.token_b.chain_id
            )));
        }
        if u64::from(self.fee_pips) >= FEE_DENOMINATOR {
            return Err(RouterError::InvalidPool(format!(
                "fee tier {} out of [0, 1)",
                self.fee_pips
            )));
        }
        if self.token_a.decimals > MAX_DECIMALS || self.token_b.decimals > MAX_DECIMALS {
            return Err(RouterError::InvalidPool("token decimals exceed 36".into()));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(RouterError::InvalidPool(format!(
                "price {} must be positive and finite",
                self.price
            )));
        }
        if !self.liquidity.is_finite() || self.liquidity < 0.0 {
            return Err(RouterError::InvalidPool(format!(
                "liquidity {} must be non-negative and finite",
                self.liquidity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weth() -> Token {
        Token::new(1, "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", "WETH", 18)
    }

    fn usdc() -> Token {
        Token::new(1, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "USDC", 6)
    }

    fn pool() -> Pool {
        Pool {
            exchange: "uniswap".to_string(),
            token_a: weth(),
            token_b: usdc(),
            fee_pips: 3000,
            reserve_a: U256::from(1_000_000_000_000_000_000_000u128),
            reserve_b: U256::from(2_000_000_000_000u64),
            price: 2e-9,
            liquidity: 4_000_000.0,
        }
    }

    #[test]
    fn test_valid_pool_passes() {
        assert!(pool().validate().is_ok());
    }

    #[test]
    fn test_pool_id_normalizes_exchange_case() {
        let mut p = pool();
        p.exchange = "UniSwap".to_string();
        assert_eq!(p.id(), pool().id());
    }

    #[test]
    fn test_equal_tokens_rejected() {
        let mut p = pool();
        p.token_b = weth();
        assert!(matches!(p.validate(), Err(RouterError::InvalidPool(_))));
    }

    #[test]
    fn test_fee_out_of_range_rejected() {
        let mut p = pool();
        p.fee_pips = 1_000_000;
        assert!(matches!(p.validate(), Err(RouterError::InvalidPool(_))));
    }

    #[test]
    fn test_cross_chain_pool_rejected() {
        let mut p = pool();
        p.token_b = Token::new(10, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "USDC", 6);
        assert!(matches!(p.validate(), Err(RouterError::InvalidPool(_))));
    }

    #[test]
    fn test_bad_price_rejected() {
        let mut p = pool();
        p.price = 0.0;
        assert!(p.validate().is_err());
        p.price = f64::NAN;
        assert!(p.validate().is_err());
    }
}
