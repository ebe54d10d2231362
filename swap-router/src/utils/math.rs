use crate::utils::types::{u256_ext, FEE_DENOMINATOR};
use alloy_primitives::{U256, U512};

fn widen(value: U256) -> U512 {
    let mut limbs = [0u64; 8];
    limbs[..4].copy_from_slice(value.as_limbs());
    U512::from_limbs(limbs)
}

/// Truncate a U512 known to fit back into a U256.
fn narrow(value: U512) -> U256 {
    let limbs = value.as_limbs();
    U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]])
}

/// Input amount remaining after the pool fee is withheld, rounded down.
pub fn effective_in(amount_in: U256, fee_pips: u32) -> U256 {
    let keep = U512::from(FEE_DENOMINATOR - u64::from(fee_pips));
    narrow(widen(amount_in) * keep / U512::from(FEE_DENOMINATOR))
}

/// Constant-product output for a swap against `(reserve_in, reserve_out)`.
///
/// `new_reserve_out = reserve_in * reserve_out / (reserve_in + effective_in)`
/// with the division truncating toward zero; the output is the reserve
/// difference. Intermediates are computed in 512 bits so full-range U256
/// reserves cannot overflow.
pub fn constant_product_out(
    reserve_in: U256,
    reserve_out: U256,
    amount_in: U256,
    fee_pips: u32,
) -> U256 {
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_in.is_zero() {
        return U256::ZERO;
    }

    let effective = effective_in(amount_in, fee_pips);
    let k = widen(reserve_in) * widen(reserve_out);
    let new_reserve_in = widen(reserve_in) + widen(effective);
    let new_reserve_out = narrow(k / new_reserve_in);

    reserve_out.saturating_sub(new_reserve_out)
}

/// Fractional deterioration of the marginal price caused by pushing
/// `amount_in` through a constant-product pool, clamped to `[0, 1]`.
///
/// Degenerate inputs (empty reserves, non-positive amount) are treated as
/// full impact, which marks the edge unusable for search.
pub fn price_impact(amount_in: f64, reserve_in: f64, reserve_out: f64) -> f64 {
    if amount_in <= 0.0 || reserve_in <= 0.0 || reserve_out <= 0.0 {
        return 1.0;
    }

    let k = reserve_in * reserve_out;
    let new_reserve_in = reserve_in + amount_in;
    let new_reserve_out = k / new_reserve_in;

    let price_before = reserve_out / reserve_in;
    let price_after = new_reserve_out / new_reserve_in;

    (1.0 - price_after / price_before).clamp(0.0, 1.0)
}

/// Degenerate fallback when a pool carries no usable reserves: value the
/// input at the quoted spot price, rounded down.
pub fn spot_output(amount_in: U256, price: f64) -> U256 {
    u256_ext::from_f64(u256_ext::to_f64(amount_in) * price)
}

/// Apply a slippage buffer to an amount, rounding down.
pub fn apply_slippage(amount: U256, slippage: f64) -> U256 {
    let pips = ((slippage * FEE_DENOMINATOR as f64).round() as u64).min(FEE_DENOMINATOR);
    narrow(widen(amount) * U512::from(FEE_DENOMINATOR - pips) / U512::from(FEE_DENOMINATOR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(n: u128) -> U256 {
        U256::from(n)
    }

    #[test]
    fn test_effective_in_applies_fee() {
        // 0.3% fee on 1e18 leaves 0.997e18
        let eff = effective_in(u(1_000_000_000_000_000_000), 3000);
        assert_eq!(eff, u(997_000_000_000_000_000));
    }

    #[test]
    fn test_constant_product_out_realistic_pool() {
        // 1000 WETH (1e21 wei) vs 2M USDC (2e12 units), 0.3% fee, 1 WETH in.
        let reserve_in = u(1_000_000_000_000_000_000_000);
        let reserve_out = u(2_000_000_000_000);
        let amount_in = u(1_000_000_000_000_000_000);

        let out = constant_product_out(reserve_in, reserve_out, amount_in, 3000);

        // Spot value would be 2000 USDC; fee + impact pull it just below.
        assert!(out > u(1_990_000_000));
        assert!(out < u(2_000_000_000));
    }

    #[test]
    fn test_constant_product_out_empty_reserves() {
        assert_eq!(
            constant_product_out(U256::ZERO, u(1_000_000), u(1_000), 3000),
            U256::ZERO
        );
        assert_eq!(
            constant_product_out(u(1_000_000), U256::ZERO, u(1_000), 3000),
            U256::ZERO
        );
    }

    #[test]
    fn test_per_unit_output_non_increasing() {
        let reserve_in = u(1_000_000_000_000);
        let reserve_out = u(1_000_000_000_000);
        let amount = u(1_000_000_000);

        let out_once = constant_product_out(reserve_in, reserve_out, amount, 3000);
        let out_double =
            constant_product_out(reserve_in, reserve_out, amount + amount, 3000);

        // Doubling the input never doubles the output.
        assert!(out_double <= out_once + out_once);
    }

    #[test]
    fn test_price_impact_bounds() {
        let impact = price_impact(1e18, 1e21, 2e12);
        assert!(impact > 0.0 && impact < 1.0);

        // Draining trades approach full impact but stay clamped.
        let heavy = price_impact(1e24, 1e18, 1e18);
        assert!(heavy > 0.99 && heavy <= 1.0);
    }

    #[test]
    fn test_price_impact_degenerate_is_full() {
        assert_eq!(price_impact(1e18, 0.0, 2e12), 1.0);
        assert_eq!(price_impact(0.0, 1e21, 2e12), 1.0);
    }

    #[test]
    fn test_apply_slippage() {
        // 0.5% on 1000 leaves 995.
        assert_eq!(apply_slippage(u(1000), 0.005), u(995));
        assert_eq!(apply_slippage(u(1000), 0.0), u(1000));
        assert_eq!(apply_slippage(u(1000), 1.0), U256::ZERO);
    }

    #[test]
    fn test_spot_output_floor() {
        assert_eq!(spot_output(u(1000), 1.5), u(1500));
        assert_eq!(spot_output(u(1000), 0.0), U256::ZERO);
    }
}
