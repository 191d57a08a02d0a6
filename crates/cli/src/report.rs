use serde::Serialize;

use tally_accounting::{
    AmountAnalysis, Balances, BalanceSheet, Book, CashCount, CashReconciliation,
    CategorizedBalances, IncomeStatement, JournalEntry, LedgerEngine, LedgerView, ProfitFigures,
    Totals,
};
use tally_core::DomainResult;

/// Everything the engine derives from one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub balances: Balances,
    pub journal: Vec<JournalEntry>,
    pub ledger: LedgerView,
    pub categorized: CategorizedBalances,
    pub totals: Totals,
    pub profit: ProfitFigures,
    pub balance_sheet: BalanceSheet,
    pub income_statement: IncomeStatement,
    pub statistics: AmountAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash: Option<CashReconciliation>,
}

pub fn build_report(
    engine: &LedgerEngine,
    book: &Book,
    cash_count: Option<&CashCount>,
) -> DomainResult<Report> {
    let (transactions, adjustments) = (book.transactions(), book.adjustments());

    let balances = engine.compute_balances(transactions, adjustments)?;
    let cash = cash_count
        .map(|counts| engine.reconcile_cash(&balances, counts))
        .transpose()?;

    Ok(Report {
        journal: engine.build_journal(transactions, adjustments)?,
        ledger: engine.build_ledger(transactions, adjustments)?,
        categorized: engine.categorize(&balances)?,
        totals: engine.compute_totals(&balances)?,
        profit: engine.compute_profit_figures(&balances)?,
        balance_sheet: engine.balance_sheet(&balances)?,
        income_statement: engine.income_statement(&balances)?,
        statistics: engine.analyze_amounts(transactions)?,
        cash,
        balances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tally_accounting::{CashStatus, Denomination, EntryType, NewTransaction};
    use tally_core::{Amount, DomainError};

    fn book_with(entries: &[(&str, EntryType, rust_decimal::Decimal)]) -> Book {
        let mut book = Book::new();
        for (account, entry_type, value) in entries {
            book.record_transaction(NewTransaction {
                date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
                account: account.to_string(),
                entry_type: *entry_type,
                amount: Amount::new(*value).unwrap(),
                description: String::new(),
            });
        }
        book
    }

    #[test]
    fn report_collects_every_output() {
        let book = book_with(&[
            ("Caja", EntryType::Debit, dec!(5000)),
            ("Ventas", EntryType::Credit, dec!(5000)),
        ]);
        let counts = CashCount::from([(Denomination::Bill1000, 5)]);
        let report = build_report(&LedgerEngine::standard(), &book, Some(&counts)).unwrap();

        assert_eq!(report.journal.len(), 2);
        assert_eq!(report.ledger.len(), 2);
        assert_eq!(report.totals.total_assets, dec!(5000));
        assert_eq!(report.profit.net_profit, dec!(3000));
        assert!(report.balance_sheet.is_balanced);
        assert_eq!(report.cash.map(|c| c.status), Some(CashStatus::Balanced));
        assert_eq!(report.statistics.income.mean, dec!(5000));
        assert_eq!(report.statistics.expenses.count, 0);
    }

    #[test]
    fn report_without_cash_count_omits_the_section() {
        let report = build_report(&LedgerEngine::standard(), &Book::new(), None).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("cash").is_none());
        assert!(json.get("balance_sheet").is_some());
    }

    #[test]
    fn out_of_range_book_fails_the_report() {
        let book = book_with(&[
            ("Caja", EntryType::Debit, rust_decimal::Decimal::MAX),
            ("Caja", EntryType::Debit, dec!(1)),
        ]);
        let err = build_report(&LedgerEngine::standard(), &book, None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(_)));
    }

    #[test]
    fn unknown_account_fails_the_report() {
        let book = book_with(&[("Caja Chica", EntryType::Debit, dec!(1))]);
        let err = build_report(&LedgerEngine::standard(), &book, None).unwrap_err();
        assert_eq!(err, DomainError::UnknownAccount("Caja Chica".to_string()));
    }
}
