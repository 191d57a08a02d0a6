use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tally_core::{DomainResult, ValueObject};

use crate::arith;
use crate::chart::ChartOfAccounts;
use crate::entry::{Adjustment, EntryType, Transaction};
use crate::rules::AdjustmentRules;

/// Signed balance per account, keyed by account name.
///
/// Values follow the bookkeeping convention of [`crate::AccountKind::signed`]:
/// debit-normal kinds are debit-minus-credit, every other kind is
/// credit-minus-debit. Accounts with no activity are absent, not zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances(BTreeMap<String, Decimal>);

impl Balances {
    pub fn get(&self, account: &str) -> Option<Decimal> {
        self.0.get(account).copied()
    }

    /// Balance of an account, zero when it never moved.
    pub fn get_or_zero(&self, account: &str) -> Decimal {
        self.get(account).unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn post(&mut self, account: &str, delta: Decimal) -> DomainResult<()> {
        let balance = self.0.entry(account.to_string()).or_insert(Decimal::ZERO);
        *balance = arith::add(*balance, delta)?;
        Ok(())
    }
}

impl ValueObject for Balances {}

impl FromIterator<(String, Decimal)> for Balances {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Fold transactions, then expanded adjustment legs, into per-account balances.
///
/// The first unknown account, or a balance leaving the `Decimal` range, aborts
/// the whole derivation.
pub fn compute(
    chart: &ChartOfAccounts,
    rules: &AdjustmentRules,
    transactions: &[Transaction],
    adjustments: &[Adjustment],
) -> DomainResult<Balances> {
    let mut balances = Balances::default();

    for tx in transactions {
        post_entry(chart, &mut balances, &tx.account, tx.entry_type, tx.amount.value())?;
    }

    for adj in adjustments {
        let rule = rules.rule_for(adj.kind)?;
        for (account, side) in rule.legs() {
            post_entry(chart, &mut balances, account, side, adj.amount.value())?;
        }
    }

    Ok(balances)
}

fn post_entry(
    chart: &ChartOfAccounts,
    balances: &mut Balances,
    account: &str,
    side: EntryType,
    amount: Decimal,
) -> DomainResult<()> {
    let kind = chart.kind_of(account)?;
    balances.post(account, kind.signed(side, amount))
}
