//! Constant-product (x*y=k) pool math with truncating integer arithmetic
//!
//! All inputs are `u64` amounts; products are formed in `u128` and quotients
//! narrowed back with a checked conversion. Every division rounds down, which
//! always favors the pool. No fee term is applied anywhere.

use crate::error::{PoolError, PoolResult};
use types::Amount;

/// Constant-product math functions
pub struct ConstantProduct;

impl ConstantProduct {
    /// Realized output for selling `amount_in` into the pool
    ///
    /// `amount_out = reserve_out * amount_in / (reserve_in + amount_in)`
    ///
    /// # Arguments
    /// * `amount_in` - Input asset amount
    /// * `reserve_in` - Reserve of the input asset
    /// * `reserve_out` - Reserve of the output asset
    pub fn amount_out(amount_in: Amount, reserve_in: Amount, reserve_out: Amount) -> PoolResult<Amount> {
        let denominator = reserve_in as u128 + amount_in as u128;
        if denominator == 0 {
            return Err(PoolError::EmptyReserves);
        }

        let numerator = reserve_out as u128 * amount_in as u128;
        narrow(numerator / denominator)
    }

    /// Spot-price conversion of `amount_in` at the current reserve ratio
    ///
    /// `amount_out = reserve_out * amount_in / reserve_in`, without the
    /// constant-product denominator adjustment. This is the marginal price,
    /// not what a swap of that size would actually pay out.
    pub fn pair_ratio(amount_in: Amount, reserve_in: Amount, reserve_out: Amount) -> PoolResult<Amount> {
        if reserve_in == 0 {
            return Err(PoolError::EmptyReserves);
        }

        let numerator = reserve_out as u128 * amount_in as u128;
        narrow(numerator / reserve_in as u128)
    }

    /// Smallest input that keeps the product non-decreasing for `amount_out`
    ///
    /// `amount_in = ceil(reserve_in * amount_out / (reserve_out - amount_out))`
    pub fn amount_in(amount_out: Amount, reserve_in: Amount, reserve_out: Amount) -> PoolResult<Amount> {
        if amount_out == 0 {
            return Err(PoolError::InvalidAmount);
        }
        if amount_out >= reserve_out {
            return Err(PoolError::InsufficientLiquidity {
                requested: amount_out,
                available: reserve_out,
            });
        }

        let numerator = reserve_in as u128 * amount_out as u128;
        let denominator = (reserve_out - amount_out) as u128;
        narrow(numerator.div_ceil(denominator))
    }

    /// Reserve product `k`
    #[inline]
    pub fn product(reserve_a: Amount, reserve_b: Amount) -> u128 {
        reserve_a as u128 * reserve_b as u128
    }

    /// Shares for the first deposit into an empty pool: `floor(sqrt(a * b))`
    pub fn bootstrap_shares(amount_a: Amount, amount_b: Amount) -> PoolResult<Amount> {
        narrow(Self::integer_sqrt(Self::product(amount_a, amount_b)))
    }

    /// Shares for a deposit into a funded pool
    ///
    /// The lesser of the two per-asset ratios, so an imbalanced deposit is
    /// priced at its worse side and cannot dilute existing holders.
    pub fn proportional_shares(
        amount_a: Amount,
        amount_b: Amount,
        reserve_a: Amount,
        reserve_b: Amount,
        total_supply: Amount,
    ) -> PoolResult<Amount> {
        if reserve_a == 0 || reserve_b == 0 {
            return Err(PoolError::EmptyReserves);
        }

        let by_a = amount_a as u128 * total_supply as u128 / reserve_a as u128;
        let by_b = amount_b as u128 * total_supply as u128 / reserve_b as u128;
        narrow(by_a.min(by_b))
    }

    /// Asset owed for burning `shares` out of `total_supply`
    ///
    /// `amount = shares * balance / total_supply`
    pub fn withdrawal_amount(shares: Amount, balance: Amount, total_supply: Amount) -> PoolResult<Amount> {
        if total_supply == 0 {
            return Err(PoolError::ZeroAmount);
        }

        narrow(shares as u128 * balance as u128 / total_supply as u128)
    }

    /// Floor square root using Newton's method on integers
    pub fn integer_sqrt(value: u128) -> u128 {
        if value < 2 {
            return value;
        }

        let mut x = value;
        let mut next = value / 2 + 1;
        while next < x {
            x = next;
            next = (value / next + next) / 2;
        }
        x
    }
}

fn narrow(value: u128) -> PoolResult<Amount> {
    Amount::try_from(value).map_err(|_| PoolError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_out_truncates() {
        // 4000 * 100 / 1100 = 363.63...
        assert_eq!(ConstantProduct::amount_out(100, 1000, 4000).unwrap(), 363);
        assert_eq!(ConstantProduct::amount_out(0, 1000, 4000).unwrap(), 0);
        assert_eq!(ConstantProduct::amount_out(0, 0, 0), Err(PoolError::EmptyReserves));
    }

    #[test]
    fn test_pair_ratio_is_spot_price() {
        assert_eq!(ConstantProduct::pair_ratio(100, 1000, 4000).unwrap(), 400);
        assert!(
            ConstantProduct::pair_ratio(100, 1000, 4000).unwrap()
                > ConstantProduct::amount_out(100, 1000, 4000).unwrap()
        );
        assert_eq!(ConstantProduct::pair_ratio(1, 0, 4000), Err(PoolError::EmptyReserves));
    }

    #[test]
    fn test_amount_in_rounds_up() {
        // 1000 * 363 / 3637 = 99.80...
        assert_eq!(ConstantProduct::amount_in(363, 1000, 4000).unwrap(), 100);
        assert_eq!(
            ConstantProduct::amount_in(4000, 1000, 4000),
            Err(PoolError::InsufficientLiquidity {
                requested: 4000,
                available: 4000
            })
        );
        assert_eq!(ConstantProduct::amount_in(0, 1000, 4000), Err(PoolError::InvalidAmount));
    }

    #[test]
    fn test_amount_in_satisfies_invariant() {
        let (reserve_in, reserve_out) = (1_000_003u64, 777_777u64);
        for amount_out in [1u64, 17, 5_000, 500_000, 777_776] {
            let amount_in = ConstantProduct::amount_in(amount_out, reserve_in, reserve_out).unwrap();
            let after = ConstantProduct::product(reserve_in + amount_in, reserve_out - amount_out);
            assert!(after >= ConstantProduct::product(reserve_in, reserve_out));
        }
    }

    #[test]
    fn test_bootstrap_shares_geometric_mean() {
        assert_eq!(ConstantProduct::bootstrap_shares(1000, 4000).unwrap(), 2000);
        assert_eq!(ConstantProduct::bootstrap_shares(1000, 2000).unwrap(), 1414);
        assert_eq!(ConstantProduct::bootstrap_shares(u64::MAX, u64::MAX).unwrap(), u64::MAX);
    }

    #[test]
    fn test_proportional_shares_takes_minimum() {
        // by_a = 100 * 2000 / 1000 = 200, by_b = 800 * 2000 / 4000 = 400
        assert_eq!(
            ConstantProduct::proportional_shares(100, 800, 1000, 4000, 2000).unwrap(),
            200
        );
        // by_a = 500 * 2000 / 1000 = 1000, by_b = 400 * 2000 / 4000 = 200
        assert_eq!(
            ConstantProduct::proportional_shares(500, 400, 1000, 4000, 2000).unwrap(),
            200
        );
        assert_eq!(
            ConstantProduct::proportional_shares(1, 1, 0, 4000, 2000),
            Err(PoolError::EmptyReserves)
        );
    }

    #[test]
    fn test_withdrawal_amount() {
        assert_eq!(ConstantProduct::withdrawal_amount(2000, 1000, 2000).unwrap(), 1000);
        assert_eq!(ConstantProduct::withdrawal_amount(1, 1000, 2000).unwrap(), 0);
        assert_eq!(ConstantProduct::withdrawal_amount(1, 1000, 0), Err(PoolError::ZeroAmount));
    }

    #[test]
    fn test_sqrt_accuracy() {
        assert_eq!(ConstantProduct::integer_sqrt(0), 0);
        assert_eq!(ConstantProduct::integer_sqrt(1), 1);
        assert_eq!(ConstantProduct::integer_sqrt(15), 3);
        assert_eq!(ConstantProduct::integer_sqrt(16), 4);
        assert_eq!(ConstantProduct::integer_sqrt(4_000_000), 2000);

        let big = u64::MAX as u128 * u64::MAX as u128;
        assert_eq!(ConstantProduct::integer_sqrt(big), u64::MAX as u128);
    }
}
