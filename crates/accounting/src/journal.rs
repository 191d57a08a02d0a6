use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tally_core::{AdjustmentId, Amount, DomainResult, TransactionId, ValueObject};

use crate::arith;
use crate::chart::{AccountKind, ChartOfAccounts};
use crate::entry::{Adjustment, EntryType, Transaction};
use crate::rules::AdjustmentRules;

/// Description used for adjustment legs whose adjustment has none.
pub const ADJUSTMENT_PLACEHOLDER: &str = "Accounting adjustment";

/// Record a journal line was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum EntrySource {
    Transaction(TransactionId),
    Adjustment(AdjustmentId),
}

/// One line of the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub account: String,
    pub entry_type: EntryType,
    pub amount: Amount,
    pub description: String,
    pub source: EntrySource,
}

impl ValueObject for JournalEntry {}

impl JournalEntry {
    fn from_transaction(tx: &Transaction) -> Self {
        Self {
            date: tx.date,
            account: tx.account.clone(),
            entry_type: tx.entry_type,
            amount: tx.amount,
            description: tx.description.clone(),
            source: EntrySource::Transaction(tx.id),
        }
    }

    fn adjustment_leg(adj: &Adjustment, account: &str, side: EntryType) -> Self {
        let description = if adj.description.trim().is_empty() {
            ADJUSTMENT_PLACEHOLDER.to_string()
        } else {
            adj.description.clone()
        };
        Self {
            date: adj.date,
            account: account.to_string(),
            entry_type: side,
            amount: adj.amount,
            description,
            source: EntrySource::Adjustment(adj.id),
        }
    }

    /// Debit column value (zero for credits).
    pub fn debit(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount.value(),
            EntryType::Credit => Decimal::ZERO,
        }
    }

    /// Credit column value (zero for debits).
    pub fn credit(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => Decimal::ZERO,
            EntryType::Credit => self.amount.value(),
        }
    }
}

/// Flatten transactions and adjustment legs into a date-ordered journal.
///
/// Transaction lines come before adjustment lines and the sort is stable, so
/// lines sharing a date keep that relative order.
pub fn build(
    chart: &ChartOfAccounts,
    rules: &AdjustmentRules,
    transactions: &[Transaction],
    adjustments: &[Adjustment],
) -> DomainResult<Vec<JournalEntry>> {
    let mut entries = Vec::with_capacity(transactions.len() + 2 * adjustments.len());

    for tx in transactions {
        chart.kind_of(&tx.account)?;
        entries.push(JournalEntry::from_transaction(tx));
    }

    for adj in adjustments {
        let rule = rules.rule_for(adj.kind)?;
        for (account, side) in rule.legs() {
            chart.kind_of(account)?;
            entries.push(JournalEntry::adjustment_leg(adj, account, side));
        }
    }

    entries.sort_by_key(|entry| entry.date);
    Ok(entries)
}

/// A journal line as seen from its account, with the balance after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    #[serde(flatten)]
    pub entry: JournalEntry,
    pub running_balance: Decimal,
}

/// Ledger page for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedger {
    pub kind: AccountKind,
    pub lines: Vec<LedgerLine>,
}

impl AccountLedger {
    /// Balance after the last line (zero for an empty page).
    pub fn closing_balance(&self) -> Decimal {
        self.lines
            .last()
            .map(|line| line.running_balance)
            .unwrap_or(Decimal::ZERO)
    }
}

/// General ledger: account name -> page.
pub type LedgerView = BTreeMap<String, AccountLedger>;

/// Group a journal by account, keeping journal order, and fold the running
/// balance with the same sign rule as the balances.
pub fn group_by_account(
    chart: &ChartOfAccounts,
    journal: Vec<JournalEntry>,
) -> DomainResult<LedgerView> {
    let mut ledger = LedgerView::new();

    for entry in journal {
        let kind = chart.kind_of(&entry.account)?;
        let page = ledger
            .entry(entry.account.clone())
            .or_insert_with(|| AccountLedger {
                kind,
                lines: Vec::new(),
            });
        let delta = kind.signed(entry.entry_type, entry.amount.value());
        let running_balance = arith::add(page.closing_balance(), delta)?;
        page.lines.push(LedgerLine {
            entry,
            running_balance,
        });
    }

    Ok(ledger)
}
