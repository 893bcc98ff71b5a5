//! Shared fixtures for pool integration tests

#![allow(dead_code)]

use amm::{AccountId, Amount, AssetId, InMemoryAssetLedger, InMemoryShareLedger, Pool, PoolHandle};

pub type TestHandle = PoolHandle<InMemoryAssetLedger, InMemoryShareLedger>;

pub const OWNER: AccountId = AccountId::new([0x0e; 20]);
pub const VAULT: AccountId = AccountId::new([0xff; 20]);
pub const ALICE: AccountId = AccountId::new([0xa1; 20]);
pub const BOB: AccountId = AccountId::new([0xb0; 20]);
pub const CAROL: AccountId = AccountId::new([0xc0; 20]);

pub const TOKEN_A: AssetId = AssetId::new([0x0a; 20]);
pub const TOKEN_B: AssetId = AssetId::new([0x0b; 20]);

/// Initialized, empty pool; every user holds `funding` of both assets
pub fn empty_pool(funding: Amount) -> TestHandle {
    let mut assets = InMemoryAssetLedger::new();
    for user in [ALICE, BOB, CAROL] {
        assets.credit(TOKEN_A, user, funding).unwrap();
        assets.credit(TOKEN_B, user, funding).unwrap();
    }

    let handle = PoolHandle::new(Pool::new(OWNER, VAULT, assets, InMemoryShareLedger::new()));
    handle.init_pool(OWNER, TOKEN_A, TOKEN_B).unwrap();
    handle
}

/// Pool bootstrapped by ALICE with `(reserve_a, reserve_b)`
pub fn seeded_pool(reserve_a: Amount, reserve_b: Amount, funding: Amount) -> TestHandle {
    let handle = empty_pool(funding);
    handle.provide_liquidity(ALICE, reserve_a, reserve_b, ALICE).unwrap();
    handle
}
