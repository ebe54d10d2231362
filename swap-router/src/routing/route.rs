use crate::graph::Token;
use alloy_primitives::U256;

/// One hop of a route: a swap of `amount_in` of `token_in` through a pool
/// on `exchange`, with the minimum acceptable output after the slippage
/// buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapStep {
    pub exchange: String,
    pub token_in: Token,
    pub token_out: Token,
    pub fee_pips: Option<u32>,
    pub amount_in: U256,
    pub amount_out_min: U256,
}

/// A complete candidate route. Routes are plain values produced by a
/// single routing call; they hold token copies, not references into the
/// live graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapRoute {
    pub steps: Vec<SwapStep>,
    pub amount_in: U256,
    pub expected_amount_out: U256,
    pub price_impact: f64,
    pub gas_estimate: u64,
    pub risk_score: u8,
}

impl SwapRoute {
    pub fn hop_count(&self) -> usize {
        self.steps.len()
    }

    pub fn route_string(&self) -> String {
        if self.steps.is_empty() {
            return String::new();
        }

        let mut parts = vec![self.steps[0].token_in.symbol.clone()];
        for step in &self.steps {
            parts.push(step.token_out.symbol.clone());
        }

        parts.join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_string() {
        let weth = Token::new(1, "0xaaaa", "WETH", 18);
        let usdc = Token::new(1, "0xbbbb", "USDC", 6);
        let dai = Token::new(1, "0xcccc", "DAI", 18);

        let route = SwapRoute {
            steps: vec![
                SwapStep {
                    exchange: "uniswap".to_string(),
                    token_in: weth.clone(),
                    token_out: usdc.clone(),
                    fee_pips: Some(3000),
                    amount_in: U256::from(1u64),
                    amount_out_min: U256::from(1u64),
                },
                SwapStep {
                    exchange: "curve".to_string(),
                    token_in: usdc,
                    token_out: dai,
                    fee_pips: Some(500),
                    amount_in: U256::from(1u64),
                    amount_out_min: U256::from(1u64),
                },
            ],
            amount_in: U256::from(1u64),
            expected_amount_out: U256::from(1u64),
            price_impact: 0.01,
            gas_estimate: 170_000,
            risk_score: 2,
        };

        assert_eq!(route.hop_count(), 2);
        assert_eq!(route.route_string(), "WETH -> USDC -> DAI");
    }
}
