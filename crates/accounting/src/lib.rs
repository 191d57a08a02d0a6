//! Accounting module (ledger derivation engine).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns. Every
//! output is recomputed from the recorded transactions and adjustments on
//! each call.

mod arith;
pub mod balance;
pub mod book;
pub mod cash;
pub mod chart;
pub mod engine;
pub mod entry;
pub mod journal;
pub mod rules;
pub mod statements;
pub mod statistics;
pub mod tax;

pub use balance::Balances;
pub use book::{Book, NewAdjustment, NewTransaction};
pub use cash::{CashCount, CashReconciliation, CashStatus, Denomination};
pub use chart::{AccountKind, ChartBuilder, ChartOfAccounts};
pub use engine::LedgerEngine;
pub use entry::{Adjustment, AdjustmentKind, EntryType, Transaction};
pub use journal::{AccountLedger, EntrySource, JournalEntry, LedgerLine, LedgerView};
pub use rules::{AdjustmentRule, AdjustmentRules};
pub use statements::{BalanceSheet, CategorizedBalances, IncomeStatement, Totals};
pub use statistics::{AmountAnalysis, AmountSeries, Descriptive, Regression, TTest, Tail};
pub use tax::{LossTreatment, ProfitFigures, TaxPolicy};
