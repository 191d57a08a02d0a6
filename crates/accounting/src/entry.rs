use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tally_core::{AdjustmentId, Amount, DomainError, Entity, TransactionId};

/// Side of a double-entry line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Debit,
    Credit,
}

/// A recorded operation against a single account (immutable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub account: String,
    pub entry_type: EntryType,
    pub amount: Amount,
    #[serde(default)]
    pub description: String,
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Period-end adjustment kinds. Each expands into one debit and one credit leg
/// through [`crate::AdjustmentRules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdjustmentKind {
    DepreciationEdificio,
    DepreciationMobiliario,
    DepreciationComputo,
    DepreciationReparto,
    DepreciationTransporte,
    DepreciationInstalacion,
    RentExpense,
    StationeryExpense,
}

impl AdjustmentKind {
    pub const ALL: [AdjustmentKind; 8] = [
        AdjustmentKind::DepreciationEdificio,
        AdjustmentKind::DepreciationMobiliario,
        AdjustmentKind::DepreciationComputo,
        AdjustmentKind::DepreciationReparto,
        AdjustmentKind::DepreciationTransporte,
        AdjustmentKind::DepreciationInstalacion,
        AdjustmentKind::RentExpense,
        AdjustmentKind::StationeryExpense,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdjustmentKind::DepreciationEdificio => "depreciation-edificio",
            AdjustmentKind::DepreciationMobiliario => "depreciation-mobiliario",
            AdjustmentKind::DepreciationComputo => "depreciation-computo",
            AdjustmentKind::DepreciationReparto => "depreciation-reparto",
            AdjustmentKind::DepreciationTransporte => "depreciation-transporte",
            AdjustmentKind::DepreciationInstalacion => "depreciation-instalacion",
            AdjustmentKind::RentExpense => "rent-expense",
            AdjustmentKind::StationeryExpense => "stationery-expense",
        }
    }
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdjustmentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown adjustment kind: {s}")))
    }
}

/// A recorded period-end adjustment (immutable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub id: AdjustmentId,
    pub date: NaiveDate,
    pub kind: AdjustmentKind,
    pub amount: Amount,
    #[serde(default)]
    pub description: String,
}

impl Entity for Adjustment {
    type Id = AdjustmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn adjustment_kind_string_forms_agree_with_serde() {
        for kind in AdjustmentKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<AdjustmentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_adjustment_kind_is_rejected() {
        let err = "depreciation-yacht".parse::<AdjustmentKind>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn transaction_deserializes_without_description() {
        let id = TransactionId::new();
        let json = format!(
            r#"{{"id":"{id}","date":"2024-03-01","account":"Caja","entry_type":"debit","amount":"1000"}}"#
        );
        let tx: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx.id, id);
        assert_eq!(tx.entry_type, EntryType::Debit);
        assert_eq!(tx.amount.value(), dec!(1000));
        assert!(tx.description.is_empty());
    }

    #[test]
    fn transaction_with_negative_amount_does_not_deserialize() {
        let id = TransactionId::new();
        let json = format!(
            r#"{{"id":"{id}","date":"2024-03-01","account":"Caja","entry_type":"credit","amount":"-3"}}"#
        );
        assert!(serde_json::from_str::<Transaction>(&json).is_err());
    }
}
