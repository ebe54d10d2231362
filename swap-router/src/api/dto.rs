use crate::graph::{Pool, PoolId, Token, TokenId};
use crate::routing::{RouteSet, SwapRoute, SwapStep};
use crate::utils::types::{DEFAULT_SLIPPAGE, FEE_DENOMINATOR};
use crate::utils::RouterError;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

fn default_slippage() -> f64 {
    DEFAULT_SLIPPAGE
}

/// Routing request as it crosses the JSON boundary. Amounts travel as
/// decimal strings to avoid precision loss.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub chain_id: u64,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    #[serde(default = "default_slippage")]
    pub slippage: f64,
    #[serde(default)]
    pub exchanges: Option<Vec<String>>,
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub routes: Vec<RouteDto>,
    pub partial: bool,
}

impl RouteResponse {
    pub fn from_set(set: &RouteSet) -> Self {
        Self {
            routes: set.routes.iter().map(RouteDto::from).collect(),
            partial: set.partial,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RouteDto {
    pub steps: Vec<StepDto>,
    pub amount_in: String,
    pub expected_amount_out: String,
    pub price_impact: f64,
    pub gas_estimate: u64,
    pub risk_score: u8,
}

impl From<&SwapRoute> for RouteDto {
    fn from(route: &SwapRoute) -> Self {
        Self {
            steps: route.steps.iter().map(StepDto::from).collect(),
            amount_in: route.amount_in.to_string(),
            expected_amount_out: route.expected_amount_out.to_string(),
            price_impact: route.price_impact,
            gas_estimate: route.gas_estimate,
            risk_score: route.risk_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StepDto {
    pub exchange_id: String,
    pub token_in: String,
    pub token_out: String,
    pub fee_tier: Option<f64>,
    pub amount_in: String,
    pub amount_out_min: String,
}

impl From<&SwapStep> for StepDto {
    fn from(step: &SwapStep) -> Self {
        Self {
            exchange_id: step.exchange.clone(),
            token_in: step.token_in.address.clone(),
            token_out: step.token_out.address.clone(),
            fee_tier: step
                .fee_pips
                .map(|pips| f64::from(pips) / FEE_DENOMINATOR as f64),
            amount_in: step.amount_in.to_string(),
            amount_out_min: step.amount_out_min.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenDto {
    pub chain_id: u64,
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenDto {
    fn into_token(self) -> Token {
        Token::new(self.chain_id, self.address, self.symbol, self.decimals)
    }
}

/// Pool upsert request; the fee tier arrives as a fraction and is stored
/// in pips.
#[derive(Debug, Deserialize)]
pub struct PoolUpsertRequest {
    pub exchange: String,
    pub token_a: TokenDto,
    pub token_b: TokenDto,
    pub fee_tier: f64,
    pub reserve_a: String,
    pub reserve_b: String,
    pub price: f64,
    #[serde(default)]
    pub liquidity: f64,
}

fn parse_reserve(field: &str, value: &str) -> Result<U256, RouterError> {
    value.trim().parse::<U256>().map_err(|_| {
        RouterError::InvalidPool(format!("{field} {value:?} is not a decimal integer"))
    })
}

fn fee_tier_to_pips(fee_tier: f64) -> Result<u32, RouterError> {
    if !(0.0..1.0).contains(&fee_tier) {
        return Err(RouterError::InvalidPool(format!(
            "fee tier {fee_tier} out of [0, 1)"
        )));
    }
    Ok((fee_tier * FEE_DENOMINATOR as f64).round() as u32)
}

impl PoolUpsertRequest {
    pub fn into_pool(self) -> Result<Pool, RouterError> {
        Ok(Pool {
            fee_pips: fee_tier_to_pips(self.fee_tier)?,
            reserve_a: parse_reserve("reserve_a", &self.reserve_a)?,
            reserve_b: parse_reserve("reserve_b", &self.reserve_b)?,
            exchange: self.exchange,
            token_a: self.token_a.into_token(),
            token_b: self.token_b.into_token(),
            price: self.price,
            liquidity: self.liquidity,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenRefDto {
    pub chain_id: u64,
    pub address: String,
}

/// Pool removal request: the identity key only.
#[derive(Debug, Deserialize)]
pub struct PoolKeyRequest {
    pub exchange: String,
    pub token_a: TokenRefDto,
    pub token_b: TokenRefDto,
    pub fee_tier: f64,
}

impl PoolKeyRequest {
    pub fn into_pool_id(self) -> Result<PoolId, RouterError> {
        Ok(PoolId::new(
            &self.exchange,
            TokenId::new(self.token_a.chain_id, &self.token_a.address),
            TokenId::new(self.token_b.chain_id, &self.token_b.address),
            fee_tier_to_pips(self.fee_tier)?,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub chain_id: u64,
    pub graph_stats: GraphStatsDto,
}

#[derive(Debug, Serialize)]
pub struct GraphStatsDto {
    pub token_count: usize,
    pub pool_count: usize,
    pub last_update: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step() -> SwapStep {
        SwapStep {
            exchange: "uniswap".to_string(),
            token_in: Token::new(1, "0xAAAA", "AAA", 18),
            token_out: Token::new(1, "0xBBBB", "BBB", 6),
            fee_pips: Some(3000),
            amount_in: U256::from(10u64).pow(U256::from(18u64)),
            amount_out_min: U256::from(1_992_000_000u64),
        }
    }

    #[test]
    fn test_step_dto_uses_decimal_strings_and_fractional_fee() {
        let dto = StepDto::from(&step());
        assert_eq!(dto.amount_in, "1000000000000000000");
        assert_eq!(dto.amount_out_min, "1992000000");
        assert_eq!(dto.fee_tier, Some(0.003));
    }

    #[test]
    fn test_pool_upsert_parses_decimal_reserves() {
        let request = PoolUpsertRequest {
            exchange: "uniswap".to_string(),
            token_a: TokenDto {
                chain_id: 1,
                address: "0xaaaa".to_string(),
                symbol: "AAA".to_string(),
                decimals: 18,
            },
            token_b: TokenDto {
                chain_id: 1,
                address: "0xbbbb".to_string(),
                symbol: "BBB".to_string(),
                decimals: 6,
            },
            fee_tier: 0.003,
            reserve_a: "1000000000000000000000".to_string(),
            reserve_b: "2000000000000".to_string(),
            price: 2000.0,
            liquidity: 4e6,
        };

        let pool = request.into_pool().unwrap();
        assert_eq!(pool.fee_pips, 3000);
        assert_eq!(
            pool.reserve_a,
            U256::from(1_000_000_000_000_000_000_000u128)
        );
        assert!(pool.validate().is_ok());
    }

    #[test]
    fn test_pool_upsert_rejects_bad_inputs() {
        let base = || PoolUpsertRequest {
            exchange: "uniswap".to_string(),
            token_a: TokenDto {
                chain_id: 1,
                address: "0xaaaa".to_string(),
                symbol: "AAA".to_string(),
                decimals: 18,
            },
            token_b: TokenDto {
                chain_id: 1,
                address: "0xbbbb".to_string(),
                symbol: "BBB".to_string(),
                decimals: 6,
            },
            fee_tier: 0.003,
            reserve_a: "100".to_string(),
            reserve_b: "100".to_string(),
            price: 1.0,
            liquidity: 0.0,
        };

        let mut bad_fee = base();
        bad_fee.fee_tier = 1.0;
        assert!(bad_fee.into_pool().is_err());

        let mut bad_reserve = base();
        bad_reserve.reserve_a = "-5".to_string();
        assert!(bad_reserve.into_pool().is_err());

        let mut not_a_number = base();
        not_a_number.reserve_b = "1e18".to_string();
        assert!(not_a_number.into_pool().is_err());
    }
}
