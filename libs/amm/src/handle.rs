//! Serialized, all-or-nothing access to a shared [`Pool`]
//!
//! A [`PoolHandle`] is the single serialization point for one pool. Quotes take
//! the read lock and see a consistent reserve snapshot; every mutation runs
//! inside [`PoolHandle::transaction`] under the write lock, which checkpoints
//! the pool and both ledgers first and restores them if the operation fails.
//!
//! The "transfer first, then call" protocol becomes an explicit scoped
//! transaction: the caller's deposit into pool custody and the engine call are
//! issued on the same [`PoolTransaction`], so they commit or roll back together.
//!
//! ```rust
//! use amm::{InMemoryAssetLedger, InMemoryShareLedger, Pool, PoolHandle};
//! use types::{AccountId, AssetId};
//!
//! let (owner, vault, alice) = (
//!     AccountId::new([1; 20]),
//!     AccountId::new([2; 20]),
//!     AccountId::new([3; 20]),
//! );
//! let (usdc, weth) = (AssetId::new([0xa; 20]), AssetId::new([0xb; 20]));
//!
//! let assets = InMemoryAssetLedger::new()
//!     .with_balance(usdc, alice, 10_000).unwrap()
//!     .with_balance(weth, alice, 10_000).unwrap();
//! let pool = PoolHandle::new(Pool::new(owner, vault, assets, InMemoryShareLedger::new()));
//!
//! pool.init_pool(owner, usdc, weth).unwrap();
//! let minted = pool.provide_liquidity(alice, 1000, 4000, alice).unwrap();
//! assert_eq!(minted.shares, 2000);
//!
//! let swap = pool
//!     .transaction(|tx| {
//!         tx.deposit_asset(alice, usdc, 110)?;
//!         tx.swap(363, alice, usdc)
//!     })
//!     .unwrap();
//! assert_eq!(swap.reserves_after.reserve_a, 1110);
//! ```

use crate::error::{PoolError, PoolResult};
use crate::ledger::{AssetLedger, Checkpoint, ShareLedger};
use crate::pool::{BurnReceipt, MintReceipt, Pool, PoolInfo, SwapReceipt};
use crate::reserves::Reserves;
use anyhow::Context;
use parking_lot::RwLock;
use pool_config::PoolConfig;
use std::sync::Arc;
use tracing::{debug, info, warn};
use types::{AccountId, Amount, AssetId};

/// Shared handle to one pool; clones refer to the same pool
pub struct PoolHandle<A, S> {
    inner: Arc<RwLock<Pool<A, S>>>,
}

impl<A, S> Clone for PoolHandle<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: AssetLedger, S: ShareLedger> PoolHandle<A, S> {
    pub fn new(pool: Pool<A, S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(pool)),
        }
    }

    /// Build a pool from configuration, initializing it as the owner when an
    /// asset pair is configured
    pub fn from_config(config: &PoolConfig, assets: A, shares: S) -> anyhow::Result<Self> {
        let handle = Self::new(Pool::new(config.owner, config.account, assets, shares));

        if let Some((asset_a, asset_b)) = config.asset_pair()? {
            handle
                .init_pool(config.owner, asset_a, asset_b)
                .context("Failed to initialize pool from configuration")?;
        } else {
            info!("No asset pair configured, pool left uninitialized");
        }

        Ok(handle)
    }

    /// Run `f` against a read-locked pool
    pub fn read<T>(&self, f: impl FnOnce(&Pool<A, S>) -> T) -> T {
        f(&*self.inner.read())
    }

    /// Run `f` as one atomic, serialized step
    ///
    /// If `f` returns `Err`, reserves, asset balances and share balances are all
    /// restored to what they were when the transaction began.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut PoolTransaction<'_, A, S>) -> PoolResult<T>,
    ) -> PoolResult<T> {
        let mut pool = self.inner.write();
        let checkpoint = pool.checkpoint();

        let result = {
            let mut tx = PoolTransaction { pool: &mut *pool };
            f(&mut tx)
        };

        if let Err(e) = &result {
            warn!("Pool transaction rolled back: {}", e);
            pool.rollback(checkpoint);
        }
        result
    }

    pub fn init_pool(&self, caller: AccountId, asset_a: AssetId, asset_b: AssetId) -> PoolResult<()> {
        self.transaction(|tx| tx.pool.init_pool(caller, asset_a, asset_b))
    }

    pub fn get_reserves(&self) -> (Amount, Amount) {
        self.inner.read().get_reserves()
    }

    pub fn info(&self) -> PoolInfo {
        self.inner.read().info()
    }

    pub fn get_amount_out(&self, asset_in: AssetId, amount_in: Amount) -> PoolResult<Amount> {
        self.inner.read().get_amount_out(asset_in, amount_in)
    }

    pub fn get_pair_ratio(&self, asset_in: AssetId, amount_in: Amount) -> PoolResult<Amount> {
        self.inner.read().get_pair_ratio(asset_in, amount_in)
    }

    pub fn get_amount_in(&self, asset_in: AssetId, amount_out: Amount) -> PoolResult<Amount> {
        self.inner.read().get_amount_in(asset_in, amount_out)
    }

    pub fn asset_balance(&self, asset: AssetId, holder: AccountId) -> Amount {
        self.inner.read().assets().balance_of(asset, holder)
    }

    pub fn share_balance(&self, holder: AccountId) -> Amount {
        self.inner.read().shares().balance_of(holder)
    }

    pub fn total_supply(&self) -> Amount {
        self.inner.read().shares().total_supply()
    }

    /// Swap against input already sitting in pool custody
    pub fn swap(&self, amount_out: Amount, recipient: AccountId, asset_in: AssetId) -> PoolResult<SwapReceipt> {
        self.transaction(|tx| tx.swap(amount_out, recipient, asset_in))
    }

    /// Mint shares for assets already sitting in pool custody
    pub fn add_liquidity(&self, recipient: AccountId) -> PoolResult<MintReceipt> {
        self.transaction(|tx| tx.add_liquidity(recipient))
    }

    /// Burn shares already sitting in pool custody
    pub fn remove_liquidity(&self, recipient: AccountId) -> PoolResult<BurnReceipt> {
        self.transaction(|tx| tx.remove_liquidity(recipient))
    }

    pub fn sync(&self) -> PoolResult<Reserves> {
        self.transaction(|tx| tx.sync())
    }

    /// Deposit `amount_in` from `payer` and swap it for the quoted output
    ///
    /// Fails `SlippageExceeded` when the quote is below `min_amount_out`.
    pub fn swap_exact_input(
        &self,
        payer: AccountId,
        asset_in: AssetId,
        amount_in: Amount,
        min_amount_out: Amount,
        recipient: AccountId,
    ) -> PoolResult<SwapReceipt> {
        self.transaction(|tx| {
            let quoted = tx.get_amount_out(asset_in, amount_in)?;
            if quoted < min_amount_out {
                return Err(PoolError::SlippageExceeded {
                    quoted,
                    minimum: min_amount_out,
                });
            }

            tx.deposit_asset(payer, asset_in, amount_in)?;
            tx.swap(quoted, recipient, asset_in)
        })
    }

    /// Deposit both assets from `provider` and mint shares to `recipient`
    pub fn provide_liquidity(
        &self,
        provider: AccountId,
        amount_a: Amount,
        amount_b: Amount,
        recipient: AccountId,
    ) -> PoolResult<MintReceipt> {
        self.transaction(|tx| {
            let (asset_a, asset_b) = tx.asset_pair()?;
            tx.deposit_asset(provider, asset_a, amount_a)?;
            tx.deposit_asset(provider, asset_b, amount_b)?;
            tx.add_liquidity(recipient)
        })
    }

    /// Hand `shares` from `provider` to the pool and pay the assets to `recipient`
    pub fn withdraw_liquidity(
        &self,
        provider: AccountId,
        shares: Amount,
        recipient: AccountId,
    ) -> PoolResult<BurnReceipt> {
        self.transaction(|tx| {
            tx.deposit_shares(provider, shares)?;
            tx.remove_liquidity(recipient)
        })
    }
}

/// Exclusive access to a pool for the duration of one transaction
pub struct PoolTransaction<'a, A, S> {
    pool: &'a mut Pool<A, S>,
}

impl<A: AssetLedger, S: ShareLedger> PoolTransaction<'_, A, S> {
    pub fn pool(&self) -> &Pool<A, S> {
        &*self.pool
    }

    pub fn asset_pair(&self) -> PoolResult<(AssetId, AssetId)> {
        self.pool.asset_pair()
    }

    pub fn get_reserves(&self) -> (Amount, Amount) {
        self.pool.get_reserves()
    }

    pub fn get_amount_out(&self, asset_in: AssetId, amount_in: Amount) -> PoolResult<Amount> {
        self.pool.get_amount_out(asset_in, amount_in)
    }

    pub fn get_pair_ratio(&self, asset_in: AssetId, amount_in: Amount) -> PoolResult<Amount> {
        self.pool.get_pair_ratio(asset_in, amount_in)
    }

    pub fn get_amount_in(&self, asset_in: AssetId, amount_out: Amount) -> PoolResult<Amount> {
        self.pool.get_amount_in(asset_in, amount_out)
    }

    /// Move one of the pool's assets from `from` into pool custody
    pub fn deposit_asset(&mut self, from: AccountId, asset: AssetId, amount: Amount) -> PoolResult<()> {
        self.fund_custody(from, asset, amount)
    }

    /// Gift assets to pool custody without settling anything
    ///
    /// Reserves stay as they are until a later [`PoolTransaction::sync`],
    /// swap or liquidity operation reconciles them.
    pub fn donate(&mut self, from: AccountId, asset: AssetId, amount: Amount) -> PoolResult<()> {
        self.fund_custody(from, asset, amount)?;
        debug!("Donation of {} {} from {} left in custody", amount, asset, from);
        Ok(())
    }

    /// Move shares from `from` into pool custody ahead of a withdrawal
    pub fn deposit_shares(&mut self, from: AccountId, amount: Amount) -> PoolResult<()> {
        let custody = self.custody_payer(from)?;
        self.pool.shares_mut().transfer(from, custody, amount)?;
        Ok(())
    }

    /// Custody only ever pays out through the engine
    fn fund_custody(&mut self, from: AccountId, asset: AssetId, amount: Amount) -> PoolResult<()> {
        let (asset_a, asset_b) = self.pool.asset_pair()?;
        if asset != asset_a && asset != asset_b {
            return Err(PoolError::UnsupportedAsset(asset));
        }

        let custody = self.custody_payer(from)?;
        self.pool.assets_mut().transfer(asset, from, custody, amount)?;
        Ok(())
    }

    /// Custody account, rejecting `from` when it is custody itself
    fn custody_payer(&self, from: AccountId) -> PoolResult<AccountId> {
        let custody = self.pool.account();
        if from == custody {
            return Err(PoolError::Unauthorized(from));
        }
        Ok(custody)
    }

    pub fn swap(&mut self, amount_out: Amount, recipient: AccountId, asset_in: AssetId) -> PoolResult<SwapReceipt> {
        self.pool.swap(amount_out, recipient, asset_in)
    }

    pub fn add_liquidity(&mut self, recipient: AccountId) -> PoolResult<MintReceipt> {
        self.pool.add_liquidity(recipient)
    }

    pub fn remove_liquidity(&mut self, recipient: AccountId) -> PoolResult<BurnReceipt> {
        self.pool.remove_liquidity(recipient)
    }

    pub fn sync(&mut self) -> PoolResult<Reserves> {
        self.pool.sync()
    }
}
