//! Collaborator ledger interfaces consumed by the pool engine
//!
//! The engine never owns balances itself. It reads and moves assets through an
//! [`AssetLedger`] and mints or burns pool shares through a [`ShareLedger`].
//! Both must support [`Checkpoint`] so a failed operation can be unwound as a
//! unit together with the reserve record.

use crate::error::LedgerError;
use std::collections::HashMap;
use types::{AccountId, Amount, AssetId};

/// Capture and restore a collaborator's full state
pub trait Checkpoint {
    type Snapshot;

    fn checkpoint(&self) -> Self::Snapshot;

    fn rollback(&mut self, snapshot: Self::Snapshot);
}

/// Ledger of fungible asset balances
pub trait AssetLedger: Checkpoint {
    /// Current balance of `holder` in `asset`
    fn balance_of(&self, asset: AssetId, holder: AccountId) -> Amount;

    /// Move `amount` of `asset` from `from` to `to`
    fn transfer(
        &mut self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// Ledger of pool shares
pub trait ShareLedger: Checkpoint {
    fn mint(&mut self, to: AccountId, amount: Amount) -> Result<(), LedgerError>;

    fn burn(&mut self, from: AccountId, amount: Amount) -> Result<(), LedgerError>;

    fn total_supply(&self) -> Amount;

    fn balance_of(&self, holder: AccountId) -> Amount;

    /// Move shares between holders, used to hand shares to the pool before a withdrawal
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<(), LedgerError>;
}

/// Debit `amount` from `from` and credit `to` in one map, checking both sides first
fn move_balance<K: Copy + Eq + std::hash::Hash>(
    balances: &mut HashMap<K, Amount>,
    from: K,
    to: K,
    amount: Amount,
    holder: AccountId,
) -> Result<(), LedgerError> {
    let available = balances.get(&from).copied().unwrap_or(0);
    if available < amount {
        return Err(LedgerError::InsufficientBalance {
            holder,
            requested: amount,
            available,
        });
    }
    if from == to || amount == 0 {
        return Ok(());
    }

    let credited = balances
        .get(&to)
        .copied()
        .unwrap_or(0)
        .checked_add(amount)
        .ok_or(LedgerError::Overflow)?;

    balances.insert(from, available - amount);
    balances.insert(to, credited);
    Ok(())
}

/// In-process asset ledger
///
/// Checkpoints clone the whole balance map, so each transaction costs
/// O(accounts). Ledgers with many holders should checkpoint an undo log of
/// touched entries instead.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetLedger {
    balances: HashMap<(AssetId, AccountId), Amount>,
}

impl InMemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` of `asset` out of thin air for `holder`
    pub fn credit(&mut self, asset: AssetId, holder: AccountId, amount: Amount) -> Result<(), LedgerError> {
        let entry = self.balances.entry((asset, holder)).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Builder form of [`InMemoryAssetLedger::credit`] for test setup
    pub fn with_balance(mut self, asset: AssetId, holder: AccountId, amount: Amount) -> Result<Self, LedgerError> {
        self.credit(asset, holder, amount)?;
        Ok(self)
    }
}

impl Checkpoint for InMemoryAssetLedger {
    type Snapshot = HashMap<(AssetId, AccountId), Amount>;

    fn checkpoint(&self) -> Self::Snapshot {
        self.balances.clone()
    }

    fn rollback(&mut self, snapshot: Self::Snapshot) {
        self.balances = snapshot;
    }
}

impl AssetLedger for InMemoryAssetLedger {
    fn balance_of(&self, asset: AssetId, holder: AccountId) -> Amount {
        self.balances.get(&(asset, holder)).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        move_balance(&mut self.balances, (asset, from), (asset, to), amount, from)
    }
}

/// In-process share ledger
///
/// Checkpoints clone every holder balance, like [`InMemoryAssetLedger`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryShareLedger {
    balances: HashMap<AccountId, Amount>,
    total_supply: Amount,
}

impl InMemoryShareLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Checkpoint for InMemoryShareLedger {
    type Snapshot = InMemoryShareLedger;

    fn checkpoint(&self) -> Self::Snapshot {
        self.clone()
    }

    fn rollback(&mut self, snapshot: Self::Snapshot) {
        *self = snapshot;
    }
}

impl ShareLedger for InMemoryShareLedger {
    fn mint(&mut self, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self.balance_of(to).checked_add(amount).ok_or(LedgerError::Overflow)?;

        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    fn burn(&mut self, from: AccountId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                holder: from,
                requested: amount,
                available,
            });
        }

        self.balances.insert(from, available - amount);
        // Supply always covers any single balance
        self.total_supply -= amount;
        Ok(())
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balance_of(&self, holder: AccountId) -> Amount {
        self.balances.get(&holder).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> Result<(), LedgerError> {
        move_balance(&mut self.balances, from, to, amount, from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDC: AssetId = AssetId::new([1u8; 20]);
    const ALICE: AccountId = AccountId::new([0xa1; 20]);
    const BOB: AccountId = AccountId::new([0xb0; 20]);

    #[test]
    fn test_asset_transfer() {
        let mut ledger = InMemoryAssetLedger::new().with_balance(USDC, ALICE, 100).unwrap();

        ledger.transfer(USDC, ALICE, BOB, 40).unwrap();
        assert_eq!(ledger.balance_of(USDC, ALICE), 60);
        assert_eq!(ledger.balance_of(USDC, BOB), 40);

        let err = ledger.transfer(USDC, ALICE, BOB, 61).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                holder: ALICE,
                requested: 61,
                available: 60
            }
        );
        assert_eq!(ledger.balance_of(USDC, ALICE), 60);
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut ledger = InMemoryAssetLedger::new().with_balance(USDC, ALICE, 10).unwrap();
        ledger.transfer(USDC, ALICE, ALICE, 10).unwrap();
        assert_eq!(ledger.balance_of(USDC, ALICE), 10);
    }

    #[test]
    fn test_credit_overflow() {
        let mut ledger = InMemoryAssetLedger::new().with_balance(USDC, ALICE, u64::MAX).unwrap();
        assert_eq!(ledger.credit(USDC, ALICE, 1), Err(LedgerError::Overflow));
    }

    #[test]
    fn test_share_mint_burn_supply() {
        let mut shares = InMemoryShareLedger::new();
        shares.mint(ALICE, 2000).unwrap();
        shares.transfer(ALICE, BOB, 500).unwrap();
        assert_eq!(shares.total_supply(), 2000);

        shares.burn(BOB, 500).unwrap();
        assert_eq!(shares.total_supply(), 1500);
        assert_eq!(shares.balance_of(BOB), 0);
        assert!(shares.burn(BOB, 1).is_err());
    }

    #[test]
    fn test_checkpoint_rollback() {
        let mut ledger = InMemoryAssetLedger::new().with_balance(USDC, ALICE, 100).unwrap();
        let mut shares = InMemoryShareLedger::new();
        let asset_snapshot = ledger.checkpoint();
        let share_snapshot = shares.checkpoint();

        ledger.transfer(USDC, ALICE, BOB, 100).unwrap();
        shares.mint(BOB, 7).unwrap();

        ledger.rollback(asset_snapshot);
        shares.rollback(share_snapshot);
        assert_eq!(ledger.balance_of(USDC, ALICE), 100);
        assert_eq!(ledger.balance_of(USDC, BOB), 0);
        assert_eq!(shares.total_supply(), 0);
    }
}
