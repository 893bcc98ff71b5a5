//! Reserve Ledger: the engine's cached view of the pool's two holdings

use crate::cp_math::ConstantProduct;
use serde::{Deserialize, Serialize};
use types::Amount;

/// Reserve pair, in asset A / asset B order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve_a: Amount,
    pub reserve_b: Amount,
}

impl Reserves {
    pub fn new(reserve_a: Amount, reserve_b: Amount) -> Self {
        Self { reserve_a, reserve_b }
    }

    /// Constant-product `k` of this pair
    pub fn product(&self) -> u128 {
        ConstantProduct::product(self.reserve_a, self.reserve_b)
    }
}

impl From<Reserves> for (Amount, Amount) {
    fn from(reserves: Reserves) -> Self {
        (reserves.reserve_a, reserves.reserve_b)
    }
}

/// Authoritative reserve record
///
/// Both sides are written together through [`ReserveLedger::set_reserves`];
/// there is no way to update one side alone. No economic validation happens
/// here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReserveLedger {
    reserves: Reserves,
}

impl ReserveLedger {
    pub fn get_reserves(&self) -> Reserves {
        self.reserves
    }

    pub(crate) fn set_reserves(&mut self, reserve_a: Amount, reserve_b: Amount) {
        self.reserves = Reserves::new(reserve_a, reserve_b);
    }
}
