//! Property tests for pricing and share accounting
//!
//! These hold for any reserves, regardless of specific market conditions.

mod common;

use amm::{ConstantProduct, PoolError};
use common::*;
use proptest::prelude::*;

fn reserve() -> impl Strategy<Value = u64> {
    1_000u64..1_000_000_000
}

proptest! {
    #[test]
    fn amount_out_is_monotone_and_bounded(
        reserve_in in reserve(),
        reserve_out in reserve(),
        x in 0u64..1_000_000_000_000,
        dx in 1u64..1_000_000,
    ) {
        let smaller = ConstantProduct::amount_out(x, reserve_in, reserve_out).unwrap();
        let larger = ConstantProduct::amount_out(x + dx, reserve_in, reserve_out).unwrap();

        prop_assert!(smaller <= larger);
        prop_assert!(larger < reserve_out);
    }

    #[test]
    fn quoted_swaps_never_shrink_product(
        reserve_a in reserve(),
        reserve_b in reserve(),
        amount_in in 1u64..1_000_000_000,
        a_to_b in any::<bool>(),
    ) {
        let pool = seeded_pool(reserve_a, reserve_b, 4_000_000_000);
        let asset_in = if a_to_b { TOKEN_A } else { TOKEN_B };
        let before = pool.info().reserves.product();

        match pool.swap_exact_input(BOB, asset_in, amount_in, 0, BOB) {
            Ok(receipt) => {
                prop_assert!(receipt.reserves_after.product() >= before);
                prop_assert_eq!(receipt.reserves_before.product(), before);
            }
            // Dust input that quotes to nothing
            Err(PoolError::InvalidAmount) => {
                prop_assert_eq!(pool.info().reserves.product(), before);
            }
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn any_swap_result_keeps_invariant(
        reserve_a in reserve(),
        reserve_b in reserve(),
        amount_in in 0u64..1_000_000,
        amount_out in 1u64..1_000_000,
    ) {
        let pool = seeded_pool(reserve_a, reserve_b, 4_000_000_000);
        let before = pool.info().reserves;

        let result = pool.transaction(|tx| {
            tx.deposit_asset(BOB, TOKEN_A, amount_in)?;
            tx.swap(amount_out, BOB, TOKEN_A)
        });

        match result {
            Ok(receipt) => prop_assert!(receipt.reserves_after.product() >= before.product()),
            Err(_) => prop_assert_eq!(pool.info().reserves, before),
        }
        let (a, b) = pool.get_reserves();
        prop_assert_eq!(a, pool.asset_balance(TOKEN_A, VAULT));
        prop_assert_eq!(b, pool.asset_balance(TOKEN_B, VAULT));
    }

    #[test]
    fn deposit_withdraw_round_trip_never_gains(
        reserve_a in reserve(),
        reserve_b in reserve(),
        deposit_a in 1u64..1_000_000_000,
        deposit_b in 1u64..1_000_000_000,
    ) {
        let pool = seeded_pool(reserve_a, reserve_b, 4_000_000_000);

        let minted = match pool.provide_liquidity(BOB, deposit_a, deposit_b, BOB) {
            Ok(receipt) => receipt,
            Err(e) => {
                prop_assert_eq!(e, PoolError::ZeroShares);
                return Ok(());
            }
        };
        prop_assert!(minted.shares > 0);

        match pool.withdraw_liquidity(BOB, minted.shares, BOB) {
            Ok(burned) => {
                prop_assert!(burned.amount_a <= deposit_a);
                prop_assert!(burned.amount_b <= deposit_b);
            }
            Err(e) => prop_assert_eq!(e, PoolError::ZeroAmount),
        }
    }

    #[test]
    fn proportional_shares_pick_lesser_ratio(
        amount_a in 1u64..1_000_000_000,
        amount_b in 1u64..1_000_000_000,
        reserve_a in reserve(),
        reserve_b in reserve(),
        supply in 1u64..1_000_000_000,
    ) {
        let shares = ConstantProduct::proportional_shares(amount_a, amount_b, reserve_a, reserve_b, supply).unwrap();
        let by_a = amount_a as u128 * supply as u128 / reserve_a as u128;
        let by_b = amount_b as u128 * supply as u128 / reserve_b as u128;

        prop_assert_eq!(shares as u128, by_a.min(by_b));
    }

    #[test]
    fn bootstrap_shares_are_floor_sqrt(a in 1u64..u64::MAX, b in 1u64..u64::MAX) {
        let shares = ConstantProduct::bootstrap_shares(a, b).unwrap() as u128;
        let product = a as u128 * b as u128;

        prop_assert!(shares * shares <= product);
        prop_assert!((shares + 1).checked_mul(shares + 1).map_or(true, |sq| sq > product));
    }
}
