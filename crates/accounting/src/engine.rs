use rust_decimal::Decimal;

use tally_core::DomainResult;

use crate::balance::{self, Balances};
use crate::cash::{self, CashCount, CashReconciliation};
use crate::chart::ChartOfAccounts;
use crate::entry::{Adjustment, Transaction};
use crate::journal::{self, JournalEntry, LedgerView};
use crate::rules::AdjustmentRules;
use crate::statements::{self, BalanceSheet, CategorizedBalances, IncomeStatement, Totals};
use crate::statistics::{self, AmountAnalysis};
use crate::tax::{ProfitFigures, TaxPolicy};

/// Stateless ledger derivation engine.
///
/// Holds only immutable configuration (chart, adjustment rules, tax policy);
/// every method recomputes its output from the inputs it is given. An error
/// fails the whole call; no method returns partial results.
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    chart: ChartOfAccounts,
    rules: AdjustmentRules,
    tax: TaxPolicy,
}

impl LedgerEngine {
    /// Wire an engine, checking that every adjustment leg is a chart account.
    pub fn new(
        chart: ChartOfAccounts,
        rules: AdjustmentRules,
        tax: TaxPolicy,
    ) -> DomainResult<Self> {
        rules.validate_against(&chart)?;
        Ok(Self { chart, rules, tax })
    }

    /// Standard chart, standard adjustment table, default tax policy.
    pub fn standard() -> Self {
        Self {
            chart: ChartOfAccounts::standard(),
            rules: AdjustmentRules::standard(),
            tax: TaxPolicy::default(),
        }
    }

    /// Same chart and rules with a different tax policy.
    pub fn with_tax_policy(mut self, tax: TaxPolicy) -> Self {
        self.tax = tax;
        self
    }

    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    pub fn rules(&self) -> &AdjustmentRules {
        &self.rules
    }

    pub fn tax_policy(&self) -> &TaxPolicy {
        &self.tax
    }

    pub fn compute_balances(
        &self,
        transactions: &[Transaction],
        adjustments: &[Adjustment],
    ) -> DomainResult<Balances> {
        let balances = balance::compute(&self.chart, &self.rules, transactions, adjustments)?;
        tracing::debug!(
            transactions = transactions.len(),
            adjustments = adjustments.len(),
            accounts = balances.len(),
            "computed balances"
        );
        Ok(balances)
    }

    pub fn build_journal(
        &self,
        transactions: &[Transaction],
        adjustments: &[Adjustment],
    ) -> DomainResult<Vec<JournalEntry>> {
        journal::build(&self.chart, &self.rules, transactions, adjustments)
    }

    pub fn build_ledger(
        &self,
        transactions: &[Transaction],
        adjustments: &[Adjustment],
    ) -> DomainResult<LedgerView> {
        let entries = self.build_journal(transactions, adjustments)?;
        journal::group_by_account(&self.chart, entries)
    }

    pub fn categorize(&self, balances: &Balances) -> DomainResult<CategorizedBalances> {
        statements::categorize(&self.chart, balances)
    }

    pub fn compute_totals(&self, balances: &Balances) -> DomainResult<Totals> {
        let groups = self.categorize(balances)?;
        statements::totals(&self.chart, &groups)
    }

    pub fn compute_profit_figures(&self, balances: &Balances) -> DomainResult<ProfitFigures> {
        let totals = self.compute_totals(balances)?;
        self.tax
            .profit_figures(totals.total_revenues, totals.total_expenses)
    }

    pub fn balance_sheet(&self, balances: &Balances) -> DomainResult<BalanceSheet> {
        let groups = self.categorize(balances)?;
        let totals = statements::totals(&self.chart, &groups)?;
        let profit = self
            .tax
            .profit_figures(totals.total_revenues, totals.total_expenses)?;
        let sheet = statements::balance_sheet(groups, &totals, &profit)?;
        if !sheet.is_balanced {
            tracing::warn!(
                gap = %sheet.equation_gap,
                total_assets = %sheet.total_assets,
                total_liabilities_and_equity = %sheet.total_liabilities_and_equity,
                "accounting equation does not balance"
            );
        }
        Ok(sheet)
    }

    pub fn income_statement(&self, balances: &Balances) -> DomainResult<IncomeStatement> {
        let groups = self.categorize(balances)?;
        let totals = statements::totals(&self.chart, &groups)?;
        statements::income_statement(&self.chart, &groups, &totals, &self.tax)
    }

    pub fn sum_denominations(&self, counts: &CashCount) -> DomainResult<Decimal> {
        cash::sum_denominations(counts)
    }

    /// Compare a physical count with the book balance of the chart's cash account.
    pub fn reconcile_cash(
        &self,
        balances: &Balances,
        counts: &CashCount,
    ) -> DomainResult<CashReconciliation> {
        let counted = cash::sum_denominations(counts)?;
        let book = balances.get_or_zero(self.chart.cash_account());
        CashReconciliation::new(counted, book)
    }

    /// Statistical overview of transaction amounts, split into income (credits
    /// to revenue accounts) and expenses (debits to expense accounts).
    pub fn analyze_amounts(&self, transactions: &[Transaction]) -> DomainResult<AmountAnalysis> {
        let series = statistics::amount_series(&self.chart, transactions)?;
        let analysis = statistics::analyze(series)?;
        tracing::debug!(
            transactions = analysis.transactions,
            income = analysis.income.count,
            expenses = analysis.expenses.count,
            "analyzed transaction amounts"
        );
        Ok(analysis)
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::AccountKind;
    use crate::entry::AdjustmentKind;
    use crate::rules::AdjustmentRule;
    use tally_core::DomainError;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engine_is_shareable_across_threads() {
        assert_send_sync::<LedgerEngine>();
    }

    #[test]
    fn new_rejects_rules_pointing_outside_the_chart() {
        let chart = ChartOfAccounts::builder()
            .account("Cash", AccountKind::Asset)
            .account("COGS", AccountKind::Expense)
            .cash_account("Cash")
            .cost_of_sales_account("COGS")
            .build()
            .unwrap();
        let err = LedgerEngine::new(chart, AdjustmentRules::standard(), TaxPolicy::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::UnknownAccount(_)));
    }

    #[test]
    fn new_accepts_a_consistent_custom_configuration() {
        let chart = ChartOfAccounts::builder()
            .account("Cash", AccountKind::Asset)
            .account("Prepaid Rent", AccountKind::Asset)
            .account("Rent", AccountKind::Expense)
            .account("COGS", AccountKind::Expense)
            .cash_account("Cash")
            .cost_of_sales_account("COGS")
            .build()
            .unwrap();
        let rules = AdjustmentRules::empty()
            .with_rule(AdjustmentKind::RentExpense, AdjustmentRule::new("Rent", "Prepaid Rent"));
        let engine = LedgerEngine::new(chart, rules, TaxPolicy::default()).unwrap();
        assert_eq!(engine.chart().cash_account(), "Cash");
        assert_eq!(engine.rules().iter().count(), 1);
    }

    #[test]
    fn empty_input_gives_zero_everything() {
        let engine = LedgerEngine::standard();
        let balances = engine.compute_balances(&[], &[]).unwrap();
        assert!(balances.is_empty());
        assert!(engine.build_journal(&[], &[]).unwrap().is_empty());
        assert!(engine.build_ledger(&[], &[]).unwrap().is_empty());
        assert_eq!(engine.categorize(&balances).unwrap(), CategorizedBalances::default());
        assert_eq!(engine.compute_totals(&balances).unwrap(), Totals::default());
        assert_eq!(
            engine.compute_profit_figures(&balances).unwrap(),
            ProfitFigures::default()
        );
        assert!(engine.balance_sheet(&balances).unwrap().is_balanced);

        let analysis = engine.analyze_amounts(&[]).unwrap();
        assert_eq!(analysis.transactions, 0);
        assert!(analysis.distribution.is_empty() && analysis.daily.is_empty());
    }
}
