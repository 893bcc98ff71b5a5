//! Pricing & Invariant Engine
//!
//! A [`Pool`] owns the reserve record, the two asset identities and both
//! collaborator ledgers. Its mutating operations follow the
//! "transfer first, then call" protocol: the caller moves input assets (or
//! shares) into the pool's custody account, and the engine reconciles actual
//! custody balances against the cached reserves.
//!
//! Operations here detect failures but do not undo partial effects. Wrap the
//! pool in a [`crate::PoolHandle`] to get serialized, all-or-nothing execution.

use crate::cp_math::ConstantProduct;
use crate::error::{PoolError, PoolResult};
use crate::ledger::{AssetLedger, Checkpoint, ShareLedger};
use crate::reserves::{ReserveLedger, Reserves};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use types::{AccountId, Amount, AssetId};

/// Which pool asset a swap takes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    /// Asset A in, asset B out
    AToB,
    /// Asset B in, asset A out
    BToA,
}

impl SwapDirection {
    /// `(reserve_in, reserve_out)` for this direction
    pub fn orient(self, reserves: Reserves) -> (Amount, Amount) {
        match self {
            SwapDirection::AToB => (reserves.reserve_a, reserves.reserve_b),
            SwapDirection::BToA => (reserves.reserve_b, reserves.reserve_a),
        }
    }
}

/// Settled swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    pub amount_out: Amount,
    pub recipient: AccountId,
    pub reserves_before: Reserves,
    pub reserves_after: Reserves,
}

/// Settled liquidity deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub shares: Amount,
    pub amount_a: Amount,
    pub amount_b: Amount,
    pub recipient: AccountId,
    pub reserves: Reserves,
}

/// Settled liquidity withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnReceipt {
    pub shares: Amount,
    pub amount_a: Amount,
    pub amount_b: Amount,
    pub recipient: AccountId,
    pub reserves: Reserves,
}

/// Read-only view of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub initialized: bool,
    pub asset_a: AssetId,
    pub asset_b: AssetId,
    pub reserves: Reserves,
    pub total_shares: Amount,
}

/// Pool-owned state, restored as one unit on rollback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PoolState {
    asset_a: AssetId,
    asset_b: AssetId,
    initialized: bool,
    reserves: ReserveLedger,
}

/// Two-asset constant-product pool
pub struct Pool<A, S> {
    owner: AccountId,
    account: AccountId,
    state: PoolState,
    assets: A,
    shares: S,
}

impl<A: AssetLedger, S: ShareLedger> Pool<A, S> {
    /// Create an uninitialized pool
    ///
    /// # Arguments
    /// * `owner` - Only identity allowed to call [`Pool::init_pool`]
    /// * `account` - Custody account whose balances are the pool's holdings
    /// * `assets` - Asset ledger collaborator
    /// * `shares` - Share ledger collaborator
    pub fn new(owner: AccountId, account: AccountId, assets: A, shares: S) -> Self {
        Self {
            owner,
            account,
            state: PoolState::default(),
            assets,
            shares,
        }
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    pub fn shares(&self) -> &S {
        &self.shares
    }

    pub(crate) fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    pub(crate) fn shares_mut(&mut self) -> &mut S {
        &mut self.shares
    }

    /// `(asset_a, asset_b)` once initialized
    pub fn asset_pair(&self) -> PoolResult<(AssetId, AssetId)> {
        self.ensure_initialized()?;
        Ok((self.state.asset_a, self.state.asset_b))
    }

    /// One-time assignment of the two asset identities
    pub fn init_pool(&mut self, caller: AccountId, asset_a: AssetId, asset_b: AssetId) -> PoolResult<()> {
        if caller != self.owner {
            return Err(PoolError::Unauthorized(caller));
        }
        if self.state.initialized {
            return Err(PoolError::AlreadyInitialized);
        }
        if asset_a.is_null() || asset_b.is_null() {
            return Err(PoolError::InvalidAssetIdentity("asset id cannot be null".to_string()));
        }
        if asset_a == asset_b {
            return Err(PoolError::InvalidAssetIdentity(format!(
                "pool assets must differ, got {} twice",
                asset_a
            )));
        }

        self.state.asset_a = asset_a;
        self.state.asset_b = asset_b;
        self.state.initialized = true;
        info!("Pool initialized: asset_a={} asset_b={}", asset_a, asset_b);
        Ok(())
    }

    /// Cached `(reserve_a, reserve_b)`
    pub fn get_reserves(&self) -> (Amount, Amount) {
        self.state.reserves.get_reserves().into()
    }

    pub fn reserves(&self) -> Reserves {
        self.state.reserves.get_reserves()
    }

    pub fn info(&self) -> PoolInfo {
        PoolInfo {
            initialized: self.state.initialized,
            asset_a: self.state.asset_a,
            asset_b: self.state.asset_b,
            reserves: self.reserves(),
            total_shares: self.shares.total_supply(),
        }
    }

    /// Realized output for selling `amount_in` of `asset_in`
    pub fn get_amount_out(&self, asset_in: AssetId, amount_in: Amount) -> PoolResult<Amount> {
        let (reserve_in, reserve_out) = self.direction(asset_in)?.orient(self.reserves());
        ConstantProduct::amount_out(amount_in, reserve_in, reserve_out)
    }

    /// Spot-price conversion of `amount_in` of `asset_in`
    pub fn get_pair_ratio(&self, asset_in: AssetId, amount_in: Amount) -> PoolResult<Amount> {
        let (reserve_in, reserve_out) = self.direction(asset_in)?.orient(self.reserves());
        ConstantProduct::pair_ratio(amount_in, reserve_in, reserve_out)
    }

    /// Input of `asset_in` needed to fund a swap paying out `amount_out`
    pub fn get_amount_in(&self, asset_in: AssetId, amount_out: Amount) -> PoolResult<Amount> {
        let (reserve_in, reserve_out) = self.direction(asset_in)?.orient(self.reserves());
        ConstantProduct::amount_in(amount_out, reserve_in, reserve_out)
    }

    /// Pay out `amount_out` against input the caller already sent to the pool
    ///
    /// The invariant is checked only after the payout and the reserve update,
    /// and always against the reserves captured before this call.
    pub fn swap(&mut self, amount_out: Amount, recipient: AccountId, asset_in: AssetId) -> PoolResult<SwapReceipt> {
        if amount_out == 0 {
            return Err(PoolError::InvalidAmount);
        }

        let direction = self.direction(asset_in)?;
        let before = self.reserves();
        let (_, reserve_out) = direction.orient(before);
        if amount_out >= reserve_out {
            return Err(PoolError::InsufficientLiquidity {
                requested: amount_out,
                available: reserve_out,
            });
        }

        let asset_out = match direction {
            SwapDirection::AToB => self.state.asset_b,
            SwapDirection::BToA => self.state.asset_a,
        };

        self.assets
            .transfer(asset_out, self.account, recipient, amount_out)?;

        let (balance_a, balance_b) = self.custody_balances();
        self.state.reserves.set_reserves(balance_a, balance_b);
        let after = self.reserves();

        if after.product() < before.product() {
            warn!(
                "Swap rejected: product {} -> {} (asset_in={} amount_out={})",
                before.product(),
                after.product(),
                asset_in,
                amount_out
            );
            return Err(PoolError::InvariantViolation {
                before: before.product(),
                after: after.product(),
            });
        }

        info!(
            "Swap settled: {} in, {} {} out to {}, reserves ({}, {})",
            asset_in, amount_out, asset_out, recipient, after.reserve_a, after.reserve_b
        );
        Ok(SwapReceipt {
            asset_in,
            asset_out,
            amount_out,
            recipient,
            reserves_before: before,
            reserves_after: after,
        })
    }

    /// Mint shares for assets the caller already sent to the pool
    pub fn add_liquidity(&mut self, recipient: AccountId) -> PoolResult<MintReceipt> {
        self.ensure_initialized()?;

        let reserves = self.reserves();
        let (balance_a, balance_b) = self.custody_balances();
        let amount_a = balance_a.saturating_sub(reserves.reserve_a);
        let amount_b = balance_b.saturating_sub(reserves.reserve_b);
        if amount_a == 0 || amount_b == 0 {
            return Err(PoolError::ZeroAmount);
        }

        let total_supply = self.shares.total_supply();
        let shares = if total_supply == 0 {
            ConstantProduct::bootstrap_shares(amount_a, amount_b)?
        } else {
            ConstantProduct::proportional_shares(
                amount_a,
                amount_b,
                reserves.reserve_a,
                reserves.reserve_b,
                total_supply,
            )?
        };
        debug!(
            "Deposit of ({}, {}) against supply {} prices at {} shares",
            amount_a, amount_b, total_supply, shares
        );
        if shares == 0 {
            return Err(PoolError::ZeroShares);
        }

        self.shares.mint(recipient, shares)?;
        let (balance_a, balance_b) = self.custody_balances();
        self.state.reserves.set_reserves(balance_a, balance_b);

        info!(
            "Liquidity added: {} shares to {}, reserves ({}, {})",
            shares, recipient, balance_a, balance_b
        );
        Ok(MintReceipt {
            shares,
            amount_a,
            amount_b,
            recipient,
            reserves: self.reserves(),
        })
    }

    /// Burn the shares held in pool custody and pay out the owed assets
    ///
    /// Reserves are written before the outbound transfers.
    pub fn remove_liquidity(&mut self, recipient: AccountId) -> PoolResult<BurnReceipt> {
        let (asset_a, asset_b) = self.asset_pair()?;

        let shares = self.shares.balance_of(self.account);
        let total_supply = self.shares.total_supply();
        let (balance_a, balance_b) = self.custody_balances();

        let amount_a = ConstantProduct::withdrawal_amount(shares, balance_a, total_supply)?;
        let amount_b = ConstantProduct::withdrawal_amount(shares, balance_b, total_supply)?;
        if amount_a == 0 || amount_b == 0 {
            return Err(PoolError::ZeroAmount);
        }

        self.shares.burn(self.account, shares)?;

        let reserve_a = balance_a.checked_sub(amount_a).ok_or(PoolError::Overflow)?;
        let reserve_b = balance_b.checked_sub(amount_b).ok_or(PoolError::Overflow)?;
        self.state.reserves.set_reserves(reserve_a, reserve_b);

        self.assets.transfer(asset_a, self.account, recipient, amount_a)?;
        self.assets.transfer(asset_b, self.account, recipient, amount_b)?;

        info!(
            "Liquidity removed: {} shares for ({}, {}) to {}",
            shares, amount_a, amount_b, recipient
        );
        Ok(BurnReceipt {
            shares,
            amount_a,
            amount_b,
            recipient,
            reserves: self.reserves(),
        })
    }

    /// Resynchronize reserves to the actual custody balances
    pub fn sync(&mut self) -> PoolResult<Reserves> {
        self.ensure_initialized()?;

        let (balance_a, balance_b) = self.custody_balances();
        self.state.reserves.set_reserves(balance_a, balance_b);
        debug!("Reserves synced to ({}, {})", balance_a, balance_b);
        Ok(self.reserves())
    }

    fn ensure_initialized(&self) -> PoolResult<()> {
        if !self.state.initialized {
            return Err(PoolError::NotInitialized);
        }
        Ok(())
    }

    fn direction(&self, asset_in: AssetId) -> PoolResult<SwapDirection> {
        self.ensure_initialized()?;

        if asset_in == self.state.asset_a {
            Ok(SwapDirection::AToB)
        } else if asset_in == self.state.asset_b {
            Ok(SwapDirection::BToA)
        } else {
            Err(PoolError::UnsupportedAsset(asset_in))
        }
    }

    /// Actual custody balances, in asset A / asset B order
    fn custody_balances(&self) -> (Amount, Amount) {
        (
            self.assets.balance_of(self.state.asset_a, self.account),
            self.assets.balance_of(self.state.asset_b, self.account),
        )
    }
}

impl<A: AssetLedger, S: ShareLedger> Checkpoint for Pool<A, S> {
    type Snapshot = (PoolSnapshot, A::Snapshot, S::Snapshot);

    fn checkpoint(&self) -> Self::Snapshot {
        (
            PoolSnapshot(self.state),
            self.assets.checkpoint(),
            self.shares.checkpoint(),
        )
    }

    fn rollback(&mut self, snapshot: Self::Snapshot) {
        let (state, assets, shares) = snapshot;
        self.state = state.0;
        self.assets.rollback(assets);
        self.shares.rollback(shares);
    }
}

/// Opaque copy of pool-owned state
#[derive(Debug, Clone, Copy)]
pub struct PoolSnapshot(PoolState);
