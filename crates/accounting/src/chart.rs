use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tally_core::{DomainError, DomainResult};

use crate::entry::EntryType;

/// High-level account kind (determines sign convention and statement placement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountKind {
    Asset,
    /// Asset-side account that offsets a related asset (accumulated depreciation).
    ContraAsset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

impl AccountKind {
    /// The side that increases an account of this kind.
    ///
    /// Contra-assets follow the liability-like rule: a credit increases them.
    pub fn increasing_side(self) -> EntryType {
        match self {
            AccountKind::Asset | AccountKind::Expense => EntryType::Debit,
            AccountKind::ContraAsset
            | AccountKind::Liability
            | AccountKind::Equity
            | AccountKind::Revenue => EntryType::Credit,
        }
    }

    /// Signed contribution of a single entry to an account of this kind.
    pub fn signed(self, side: EntryType, amount: Decimal) -> Decimal {
        if side == self.increasing_side() {
            amount
        } else {
            -amount
        }
    }
}

/// Immutable registry of account names and their kinds.
///
/// Built once (usually [`ChartOfAccounts::standard`]) and injected into the
/// engine. Besides the kinds it names two role accounts: the cash account used
/// by the cash count and the cost-of-sales account used by the income statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartOfAccounts {
    accounts: BTreeMap<String, AccountKind>,
    cash_account: String,
    cost_of_sales_account: String,
}

impl ChartOfAccounts {
    pub fn builder() -> ChartBuilder {
        ChartBuilder::default()
    }

    /// The chart used by the bookkeeping application out of the box.
    pub fn standard() -> Self {
        let mut builder = Self::builder();
        for (name, kind) in STANDARD_ACCOUNTS {
            builder = builder.account(*name, *kind);
        }
        Self {
            accounts: builder.accounts,
            cash_account: "Caja".to_string(),
            cost_of_sales_account: "Costo de Ventas".to_string(),
        }
    }

    /// Kind of a registered account; unknown names are a configuration error.
    pub fn kind_of(&self, account: &str) -> DomainResult<AccountKind> {
        self.accounts
            .get(account)
            .copied()
            .ok_or_else(|| DomainError::unknown_account(account))
    }

    pub fn contains(&self, account: &str) -> bool {
        self.accounts.contains_key(account)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&str, AccountKind)> {
        self.accounts.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn cash_account(&self) -> &str {
        &self.cash_account
    }

    pub fn cost_of_sales_account(&self) -> &str {
        &self.cost_of_sales_account
    }
}

/// Builder for custom charts.
#[derive(Debug, Default)]
pub struct ChartBuilder {
    accounts: BTreeMap<String, AccountKind>,
    conflicts: Vec<String>,
    cash_account: Option<String>,
    cost_of_sales_account: Option<String>,
}

impl ChartBuilder {
    pub fn account(mut self, name: impl Into<String>, kind: AccountKind) -> Self {
        let name = name.into();
        match self.accounts.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(kind);
            }
            Entry::Occupied(slot) => {
                if *slot.get() != kind {
                    self.conflicts.push(slot.key().clone());
                }
            }
        }
        self
    }

    pub fn cash_account(mut self, name: impl Into<String>) -> Self {
        self.cash_account = Some(name.into());
        self
    }

    pub fn cost_of_sales_account(mut self, name: impl Into<String>) -> Self {
        self.cost_of_sales_account = Some(name.into());
        self
    }

    /// Validate and freeze the chart.
    ///
    /// Fails when an account was registered with two different kinds, or when a
    /// role account is missing or registered with the wrong kind.
    pub fn build(self) -> DomainResult<ChartOfAccounts> {
        if let Some(name) = self.conflicts.first() {
            return Err(DomainError::validation(format!(
                "account '{name}' registered with more than one kind"
            )));
        }

        let cash_account = self
            .cash_account
            .ok_or_else(|| DomainError::validation("chart has no cash account"))?;
        let cost_of_sales_account = self
            .cost_of_sales_account
            .ok_or_else(|| DomainError::validation("chart has no cost-of-sales account"))?;

        let expect_kind = |name: &str, expected: AccountKind| -> DomainResult<()> {
            let kind = self
                .accounts
                .get(name)
                .ok_or_else(|| DomainError::unknown_account(name))?;
            if *kind != expected {
                return Err(DomainError::validation(format!(
                    "account '{name}' must be {expected:?}, found {kind:?}"
                )));
            }
            Ok(())
        };
        expect_kind(&cash_account, AccountKind::Asset)?;
        expect_kind(&cost_of_sales_account, AccountKind::Expense)?;

        Ok(ChartOfAccounts {
            accounts: self.accounts,
            cash_account,
            cost_of_sales_account,
        })
    }
}

const STANDARD_ACCOUNTS: &[(&str, AccountKind)] = &[
    // current assets
    ("Caja", AccountKind::Asset),
    ("Banco", AccountKind::Asset),
    ("Clientes", AccountKind::Asset),
    ("Inventario", AccountKind::Asset),
    ("IVA Acreditado", AccountKind::Asset),
    ("Papelería y Útiles", AccountKind::Asset),
    ("Rentas Pagadas por Anticipado", AccountKind::Asset),
    // fixed assets
    ("Terreno", AccountKind::Asset),
    ("Edificio", AccountKind::Asset),
    ("Mobiliario", AccountKind::Asset),
    ("Equipo de Cómputo", AccountKind::Asset),
    ("Equipo de Reparto", AccountKind::Asset),
    ("Equipo de Transporte", AccountKind::Asset),
    // deferred assets
    ("Gastos de Instalación", AccountKind::Asset),
    // accumulated depreciation
    ("Depreciación Acumulada de Edificio", AccountKind::ContraAsset),
    ("Depreciación Acumulada de Mobiliario", AccountKind::ContraAsset),
    ("Depreciación Acumulada de Equipo de Cómputo", AccountKind::ContraAsset),
    ("Depreciación Acumulada de Equipo de Reparto", AccountKind::ContraAsset),
    ("Depreciación Acumulada de Equipo de Transporte", AccountKind::ContraAsset),
    ("Depreciación Acumulada de Gastos de Instalación", AccountKind::ContraAsset),
    // liabilities
    ("Documentos por Pagar", AccountKind::Liability),
    ("IVA Trasladado", AccountKind::Liability),
    ("IVA por Trasladar", AccountKind::Liability),
    ("Anticipo de Clientes", AccountKind::Liability),
    ("ISR por Pagar", AccountKind::Liability),
    ("PTU por Pagar", AccountKind::Liability),
    // equity
    ("Capital Social", AccountKind::Equity),
    ("Resultado del Ejercicio", AccountKind::Equity),
    // revenue
    ("Ventas", AccountKind::Revenue),
    // expenses
    ("Costo de Ventas", AccountKind::Expense),
    ("Gastos de Venta", AccountKind::Expense),
    ("Gastos de Administración", AccountKind::Expense),
    ("Gastos de Depreciación", AccountKind::Expense),
    ("ISR 30%", AccountKind::Expense),
    ("PTU 10%", AccountKind::Expense),
];
