use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tally_core::{AdjustmentId, Amount, DomainError, DomainResult, Entity, TransactionId};

use crate::entry::{Adjustment, AdjustmentKind, EntryType, Transaction};

/// Input for recording a transaction (the id is assigned by the book).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub account: String,
    pub entry_type: EntryType,
    pub amount: Amount,
    #[serde(default)]
    pub description: String,
}

/// Input for recording an adjustment (the id is assigned by the book).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdjustment {
    pub date: NaiveDate,
    pub kind: AdjustmentKind,
    pub amount: Amount,
    #[serde(default)]
    pub description: String,
}

/// In-memory record store feeding the engine.
///
/// Keeps insertion order, which is the order the engine folds and the
/// tie-break order of the journal. Records are never edited in place; they
/// are recorded and deleted by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    adjustments: Vec<Adjustment>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.adjustments.is_empty()
    }

    pub fn record_transaction(&mut self, new: NewTransaction) -> TransactionId {
        let id = TransactionId::new();
        tracing::debug!(%id, account = %new.account, "recording transaction");
        self.transactions.push(Transaction {
            id,
            date: new.date,
            account: new.account,
            entry_type: new.entry_type,
            amount: new.amount,
            description: new.description,
        });
        id
    }

    pub fn record_adjustment(&mut self, new: NewAdjustment) -> AdjustmentId {
        let id = AdjustmentId::new();
        tracing::debug!(%id, kind = %new.kind, "recording adjustment");
        self.adjustments.push(Adjustment {
            id,
            date: new.date,
            kind: new.kind,
            amount: new.amount,
            description: new.description,
        });
        id
    }

    pub fn delete_transaction(&mut self, id: TransactionId) -> DomainResult<Transaction> {
        remove_by_id(&mut self.transactions, id)
    }

    pub fn delete_adjustment(&mut self, id: AdjustmentId) -> DomainResult<Adjustment> {
        remove_by_id(&mut self.adjustments, id)
    }
}

fn remove_by_id<T: Entity>(records: &mut Vec<T>, id: T::Id) -> DomainResult<T> {
    let index = records
        .iter()
        .position(|record| *record.id() == id)
        .ok_or_else(DomainError::not_found)?;
    tracing::debug!(?id, "deleting record");
    Ok(records.remove(index))
}
