//! Error taxonomy for pool operations and collaborator ledgers

use thiserror::Error;
use types::{AccountId, Amount, AssetId};

/// Failures reported by an asset or share ledger
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance for {holder}: requested {requested}, available {available}")]
    InsufficientBalance {
        holder: AccountId,
        requested: Amount,
        available: Amount,
    },

    #[error("Ledger balance or supply overflow")]
    Overflow,
}

/// Pool operation errors
///
/// Every variant is raised before the operation settles. Under a
/// [`crate::PoolHandle`] the pool, asset ledger and share ledger are restored to
/// their pre-call state whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool is already initialized")]
    AlreadyInitialized,

    #[error("Pool is not initialized")]
    NotInitialized,

    #[error("Caller {0} may not initialize the pool")]
    Unauthorized(AccountId),

    #[error("Invalid asset identity: {0}")]
    InvalidAssetIdentity(String),

    #[error("Asset {0} is not traded by this pool")]
    UnsupportedAsset(AssetId),

    /// Requested amount must be positive
    #[error("Amount must be positive")]
    InvalidAmount,

    /// Derived deposit or withdrawal amount is zero
    #[error("Computed deposit/withdrawal amount is zero")]
    ZeroAmount,

    #[error("Computed share amount is zero")]
    ZeroShares,

    /// Requested output is not smaller than the output reserve
    #[error("Insufficient liquidity: requested {requested}, reserve {available}")]
    InsufficientLiquidity { requested: Amount, available: Amount },

    /// A reserve the formula divides by is zero
    #[error("Pool reserves are empty")]
    EmptyReserves,

    /// Post-swap reserve product fell below the pre-swap product
    #[error("Constant product violated: before {before}, after {after}")]
    InvariantViolation { before: u128, after: u128 },

    #[error("Quoted output {quoted} is below the minimum {minimum}")]
    SlippageExceeded { quoted: Amount, minimum: Amount },

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

pub type PoolResult<T> = Result<T, PoolError>;
