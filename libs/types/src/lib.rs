//! # Pool Types Library
//!
//! Shared identity and amount types for the constant-product pool crates.
//!
//! ## Design Philosophy
//!
//! - **Type Safety**: `AssetId` and `AccountId` are distinct wrappers over the
//!   same 20-byte address layout, so an asset can never be passed where a
//!   holder is expected
//! - **Integer Amounts**: balances, reserves and shares are plain `u64`
//!   quantities; every division in the engine truncates
//! - **Clear Boundaries**: identities parse from and print as `0x`-prefixed hex,
//!   which is also their serde representation
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{AccountId, AssetId};
//!
//! let usdc: AssetId = "0x2791bca1f2de4661ed88a30c99a7a9449aa84174".parse().unwrap();
//! let vault = AccountId::from_hex("0x00000000000000000000000000000000000000aa").unwrap();
//!
//! assert!(!usdc.is_null());
//! assert_eq!(vault.to_string(), "0x00000000000000000000000000000000000000aa");
//! ```

pub mod common;

pub use common::errors::ValidationError;
pub use common::identifiers::{AccountId, AssetId, ADDRESS_LEN};

/// Quantity of an asset or of pool shares
pub type Amount = u64;
