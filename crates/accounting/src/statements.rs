//! Financial statements derived from balances.
//!
//! Raw balances carry the bookkeeping sign convention; everything here is the
//! display side: categorized groups with normalized signs, totals, the balance
//! sheet and the income statement.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tally_core::{DomainResult, ValueObject};

use crate::arith;
use crate::balance::Balances;
use crate::chart::{AccountKind, ChartOfAccounts};
use crate::tax::{ProfitFigures, TaxPolicy};

/// Difference below which the accounting equation is considered to hold.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Balances split by statement group, with display signs.
///
/// Contra-assets sit under `assets` as negative offsets. Liabilities keep their
/// raw credit-minus-debit value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategorizedBalances {
    pub assets: BTreeMap<String, Decimal>,
    pub liabilities: BTreeMap<String, Decimal>,
    pub equity: BTreeMap<String, Decimal>,
    pub revenues: BTreeMap<String, Decimal>,
    pub expenses: BTreeMap<String, Decimal>,
}

impl ValueObject for CategorizedBalances {}

pub fn categorize(
    chart: &ChartOfAccounts,
    balances: &Balances,
) -> DomainResult<CategorizedBalances> {
    let mut groups = CategorizedBalances::default();

    for (account, value) in balances.iter() {
        let (group, shown) = match chart.kind_of(account)? {
            AccountKind::Asset => (&mut groups.assets, value.abs()),
            AccountKind::ContraAsset => (&mut groups.assets, -value.abs()),
            AccountKind::Liability => (&mut groups.liabilities, value),
            AccountKind::Equity => (&mut groups.equity, value.abs()),
            AccountKind::Revenue => (&mut groups.revenues, value.abs()),
            AccountKind::Expense => (&mut groups.expenses, value.abs()),
        };
        group.insert(account.to_string(), shown);
    }

    Ok(groups)
}

/// Scalar aggregates of the categorized groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub total_revenues: Decimal,
    pub total_expenses: Decimal,
}

impl ValueObject for Totals {}

pub fn totals(chart: &ChartOfAccounts, groups: &CategorizedBalances) -> DomainResult<Totals> {
    let mut total_assets = Decimal::ZERO;
    for (account, value) in &groups.assets {
        total_assets = match chart.kind_of(account)? {
            AccountKind::ContraAsset => arith::sub(total_assets, value.abs())?,
            _ => arith::add(total_assets, *value)?,
        };
    }

    Ok(Totals {
        total_assets,
        total_liabilities: arith::sum(groups.liabilities.values().copied())?,
        total_equity: arith::sum(groups.equity.values().copied())?,
        total_revenues: arith::sum(groups.revenues.values().map(|v| v.abs()))?,
        total_expenses: arith::sum(groups.expenses.values().map(|v| v.abs()))?,
    })
}

/// Balance sheet with accrued income tax and profit share shown as liabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub assets: BTreeMap<String, Decimal>,
    pub liabilities: BTreeMap<String, Decimal>,
    pub equity: BTreeMap<String, Decimal>,
    pub income_tax_payable: Decimal,
    pub profit_share_payable: Decimal,
    pub total_assets: Decimal,
    /// Recorded liabilities plus accrued income tax and profit share.
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub net_profit: Decimal,
    pub total_equity_with_profit: Decimal,
    pub total_liabilities_and_equity: Decimal,
    /// `total_assets - total_liabilities_and_equity`.
    pub equation_gap: Decimal,
    pub is_balanced: bool,
}

impl ValueObject for BalanceSheet {}

pub fn balance_sheet(
    groups: CategorizedBalances,
    totals: &Totals,
    profit: &ProfitFigures,
) -> DomainResult<BalanceSheet> {
    let total_liabilities = arith::sum([
        totals.total_liabilities,
        profit.income_tax,
        profit.profit_share,
    ])?;
    let total_equity_with_profit = arith::add(totals.total_equity, profit.net_profit)?;
    let total_liabilities_and_equity = arith::add(total_liabilities, total_equity_with_profit)?;
    let equation_gap = arith::sub(totals.total_assets, total_liabilities_and_equity)?;

    Ok(BalanceSheet {
        assets: groups.assets,
        liabilities: groups.liabilities,
        equity: groups.equity,
        income_tax_payable: profit.income_tax,
        profit_share_payable: profit.profit_share,
        total_assets: totals.total_assets,
        total_liabilities,
        total_equity: totals.total_equity,
        net_profit: profit.net_profit,
        total_equity_with_profit,
        total_liabilities_and_equity,
        equation_gap,
        is_balanced: equation_gap.abs() < BALANCE_TOLERANCE,
    })
}

/// Income statement: sales, cost of sales, operating expenses, taxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub total_revenues: Decimal,
    pub cost_of_sales: Decimal,
    pub gross_profit: Decimal,
    pub operating_expenses: BTreeMap<String, Decimal>,
    pub total_operating_expenses: Decimal,
    pub operating_income: Decimal,
    #[serde(flatten)]
    pub profit: ProfitFigures,
}

impl ValueObject for IncomeStatement {}

pub fn income_statement(
    chart: &ChartOfAccounts,
    groups: &CategorizedBalances,
    totals: &Totals,
    policy: &TaxPolicy,
) -> DomainResult<IncomeStatement> {
    let cost_of_sales_account = chart.cost_of_sales_account();
    let cost_of_sales = groups
        .expenses
        .get(cost_of_sales_account)
        .map(|v| v.abs())
        .unwrap_or(Decimal::ZERO);

    let operating_expenses: BTreeMap<String, Decimal> = groups
        .expenses
        .iter()
        .filter(|(account, _)| account.as_str() != cost_of_sales_account)
        .map(|(account, value)| (account.clone(), value.abs()))
        .collect();
    let total_operating_expenses = arith::sum(operating_expenses.values().copied())?;

    let gross_profit = arith::sub(totals.total_revenues, cost_of_sales)?;

    Ok(IncomeStatement {
        total_revenues: totals.total_revenues,
        cost_of_sales,
        gross_profit,
        operating_expenses,
        total_operating_expenses,
        operating_income: arith::sub(gross_profit, total_operating_expenses)?,
        profit: policy.profit_figures(totals.total_revenues, totals.total_expenses)?,
    })
}
