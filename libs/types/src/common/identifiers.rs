//! # Typed Address Identities
//!
//! Zero-cost wrappers around 20-byte addresses. Assets and account holders share
//! the same layout but are distinct types, so the compiler rejects a holder passed
//! where an asset is expected:
//!
//! ```rust
//! use types::{AccountId, AssetId};
//!
//! fn balance(asset: AssetId, holder: AccountId) -> u64 {
//!     let _ = (asset, holder);
//!     0
//! }
//!
//! let asset = AssetId::new([1u8; 20]);
//! let holder = AccountId::new([2u8; 20]);
//! balance(asset, holder); // ✅ Correct
//! // balance(holder, asset); // ❌ Compile error!
//! ```
//!
//! The all-zero address is the null identity. It is representable, because an
//! uninitialized pool has to hold *something* in its asset slots, but validation
//! helpers reject it wherever a real identity is required.

use crate::common::errors::ValidationError;

/// Byte length of every address identity
pub const ADDRESS_LEN: usize = 20;

/// Macro for generating typed 20-byte address wrappers
///
/// Generated types print and serialize as `0x`-prefixed lowercase hex and parse
/// from hex with or without the prefix.
#[macro_export]
macro_rules! define_address {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub [u8; $crate::ADDRESS_LEN]);

        impl $name {
            /// Create a new identity from raw bytes
            #[inline(always)]
            pub const fn new(inner: [u8; $crate::ADDRESS_LEN]) -> Self {
                Self(inner)
            }

            /// Create the null/zero identity
            #[inline(always)]
            pub const fn null() -> Self {
                Self([0u8; $crate::ADDRESS_LEN])
            }

            /// Check if this is the null/zero identity
            #[inline]
            pub fn is_null(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Create an identity, rejecting the null address
            #[inline]
            pub fn new_validated(
                inner: [u8; $crate::ADDRESS_LEN],
            ) -> Result<Self, $crate::ValidationError> {
                let id = Self(inner);
                if id.is_null() {
                    return Err($crate::ValidationError::NullId);
                }
                Ok(id)
            }

            /// Extract the inner bytes
            #[inline(always)]
            pub const fn inner(&self) -> &[u8; $crate::ADDRESS_LEN] {
                &self.0
            }

            #[inline(always)]
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            /// Parse from hex, accepting an optional `0x` prefix
            pub fn from_hex(input: &str) -> Result<Self, $crate::ValidationError> {
                $crate::common::identifiers::parse_address(input).map(Self)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; $crate::ADDRESS_LEN]> for $name {
            #[inline(always)]
            fn from(inner: [u8; $crate::ADDRESS_LEN]) -> Self {
                Self(inner)
            }
        }

        impl From<$name> for [u8; $crate::ADDRESS_LEN] {
            #[inline(always)]
            fn from(wrapper: $name) -> [u8; $crate::ADDRESS_LEN] {
                wrapper.0
            }
        }

        impl AsRef<[u8; $crate::ADDRESS_LEN]> for $name {
            #[inline(always)]
            fn as_ref(&self) -> &[u8; $crate::ADDRESS_LEN] {
                &self.0
            }
        }

        // Serialized as the hex string so config files stay readable
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

#[doc(hidden)]
pub fn parse_address(input: &str) -> Result<[u8; ADDRESS_LEN], ValidationError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = hex::decode(digits).map_err(|_| ValidationError::InvalidHex {
        input: input.to_string(),
    })?;

    <[u8; ADDRESS_LEN]>::try_from(bytes.as_slice()).map_err(|_| ValidationError::InvalidLength {
        expected: ADDRESS_LEN,
        actual: bytes.len(),
    })
}

define_address! {
    /// Identity of a fungible asset held in a pool
    AssetId
}

define_address! {
    /// Identity of a balance holder: a user, a recipient, or the pool's own custody account
    AccountId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let raw = "0x2791bca1f2de4661ed88a30c99a7a9449aa84174";
        let asset = AssetId::from_hex(raw).unwrap();
        assert_eq!(asset.to_string(), raw);

        let without_prefix: AssetId = "2791BCA1F2DE4661ED88A30C99A7A9449AA84174".parse().unwrap();
        assert_eq!(asset, without_prefix);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            AccountId::from_hex("0xzz"),
            Err(ValidationError::InvalidHex { .. })
        ));
        assert_eq!(
            AccountId::from_hex("0x0102"),
            Err(ValidationError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: 2
            })
        );
    }

    #[test]
    fn test_null_identity() {
        assert!(AssetId::null().is_null());
        assert!(AssetId::default().is_null());
        assert_eq!(
            AssetId::new_validated([0u8; ADDRESS_LEN]),
            Err(ValidationError::NullId)
        );

        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[19] = 1;
        assert!(!AccountId::new_validated(bytes).unwrap().is_null());
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let holder = AccountId::new([0xab; ADDRESS_LEN]);
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(ADDRESS_LEN)));

        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, holder);
    }
}
