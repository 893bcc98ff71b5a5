//! # AMM Library - Two-Asset Constant-Product Pool Engine
//!
//! ## Purpose
//!
//! Holds reserves of two fungible assets, prices swaps between them from the
//! current reserves under the constant-product rule, and accounts for
//! proportional pool shares on liquidity deposits and withdrawals. All math is
//! truncating integer arithmetic that rounds in the pool's favor; there is no
//! fee and no minimum-liquidity lock.
//!
//! ## Integration Points
//!
//! - **Asset Ledger**: balances and transfers of the two pool assets ([`AssetLedger`])
//! - **Share Ledger**: mint/burn/supply of pool shares ([`ShareLedger`])
//! - **Configuration**: pool identities and logging via `pool-config`
//! - **Callers**: quote through the read lock, settle through [`PoolHandle::transaction`]
//!
//! ## Architecture Role
//!
//! ```text
//! caller ──quote──▶ PoolHandle (read lock) ──▶ Pool ──▶ ReserveLedger
//!    │                                          │
//!    └──transaction──▶ PoolHandle (write lock) ─┤──▶ AssetLedger
//!                        checkpoint/rollback    └──▶ ShareLedger
//! ```
//!
//! - [`reserves`]: the cached reserve pair, written only as a pair
//! - [`cp_math`]: pure quote and share formulas
//! - [`pool`]: swap, add/remove liquidity, reconciling custody balances against reserves
//! - [`handle`]: serialization point and all-or-nothing execution

pub mod cp_math;
pub mod error;
pub mod handle;
pub mod ledger;
pub mod pool;
pub mod reserves;

pub use cp_math::ConstantProduct;
pub use error::{LedgerError, PoolError, PoolResult};
pub use handle::{PoolHandle, PoolTransaction};
pub use ledger::{AssetLedger, Checkpoint, InMemoryAssetLedger, InMemoryShareLedger, ShareLedger};
pub use pool::{BurnReceipt, MintReceipt, Pool, PoolInfo, PoolSnapshot, SwapDirection, SwapReceipt};
pub use reserves::{ReserveLedger, Reserves};

pub use types::{AccountId, Amount, AssetId};
