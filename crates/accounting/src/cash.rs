//! Cash count ("arqueo de caja") and reconciliation against the book balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tally_core::{DomainError, DomainResult, ValueObject};

use crate::arith;
use crate::statements::BALANCE_TOLERANCE;

/// Bills and coins that can be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    Bill1000,
    Bill500,
    Bill200,
    Bill100,
    Bill50,
    Bill20,
    Coin20,
    Coin10,
    Coin5,
    Coin2,
    Coin1,
    /// 50-cent coin.
    #[serde(alias = "coin050")]
    Coin50,
}

impl Denomination {
    pub const ALL: [Denomination; 12] = [
        Denomination::Bill1000,
        Denomination::Bill500,
        Denomination::Bill200,
        Denomination::Bill100,
        Denomination::Bill50,
        Denomination::Bill20,
        Denomination::Coin20,
        Denomination::Coin10,
        Denomination::Coin5,
        Denomination::Coin2,
        Denomination::Coin1,
        Denomination::Coin50,
    ];

    pub fn face_value(self) -> Decimal {
        match self {
            Denomination::Bill1000 => Decimal::from(1000),
            Denomination::Bill500 => Decimal::from(500),
            Denomination::Bill200 => Decimal::from(200),
            Denomination::Bill100 => Decimal::from(100),
            Denomination::Bill50 => Decimal::from(50),
            Denomination::Bill20 | Denomination::Coin20 => Decimal::from(20),
            Denomination::Coin10 => Decimal::from(10),
            Denomination::Coin5 => Decimal::from(5),
            Denomination::Coin2 => Decimal::from(2),
            Denomination::Coin1 => Decimal::ONE,
            Denomination::Coin50 => Decimal::new(50, 2),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Denomination::Bill1000 => "bill1000",
            Denomination::Bill500 => "bill500",
            Denomination::Bill200 => "bill200",
            Denomination::Bill100 => "bill100",
            Denomination::Bill50 => "bill50",
            Denomination::Bill20 => "bill20",
            Denomination::Coin20 => "coin20",
            Denomination::Coin10 => "coin10",
            Denomination::Coin5 => "coin5",
            Denomination::Coin2 => "coin2",
            Denomination::Coin1 => "coin1",
            Denomination::Coin50 => "coin50",
        }
    }
}

/// Pieces counted per denomination. Missing denominations count as zero.
pub type CashCount = BTreeMap<Denomination, i64>;

/// Total face value of a count. Negative counts are rejected, not clamped.
pub fn sum_denominations(counts: &CashCount) -> DomainResult<Decimal> {
    let mut total = Decimal::ZERO;
    for (denomination, count) in counts {
        if *count < 0 {
            return Err(DomainError::invalid_count(denomination.as_str(), *count));
        }
        let subtotal = arith::mul(Decimal::from(*count), denomination.face_value())?;
        total = arith::add(total, subtotal)?;
    }
    Ok(total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashStatus {
    Balanced,
    Surplus,
    Shortage,
}

/// Counted cash versus the book balance of the cash account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashReconciliation {
    pub counted_total: Decimal,
    pub book_balance: Decimal,
    /// `counted_total - book_balance`.
    pub difference: Decimal,
    pub status: CashStatus,
}

impl ValueObject for CashReconciliation {}

impl CashReconciliation {
    pub fn new(counted_total: Decimal, book_balance: Decimal) -> DomainResult<Self> {
        let difference = arith::sub(counted_total, book_balance)?;
        let status = if difference.abs() < BALANCE_TOLERANCE {
            CashStatus::Balanced
        } else if difference > Decimal::ZERO {
            CashStatus::Surplus
        } else {
            CashStatus::Shortage
        };
        Ok(Self {
            counted_total,
            book_balance,
            difference,
            status,
        })
    }
}
