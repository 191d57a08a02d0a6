use serde::Serialize;
use std::collections::BTreeMap;

use tally_core::{DomainError, DomainResult};

use crate::chart::ChartOfAccounts;
use crate::entry::{AdjustmentKind, EntryType};

/// Expansion of one adjustment kind: a debit leg and a credit leg, both
/// carrying the adjustment's amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjustmentRule {
    pub debit: String,
    pub credit: String,
}

impl AdjustmentRule {
    pub fn new(debit: impl Into<String>, credit: impl Into<String>) -> Self {
        Self {
            debit: debit.into(),
            credit: credit.into(),
        }
    }

    /// Legs in posting order: debit first, then credit.
    pub fn legs(&self) -> [(&str, EntryType); 2] {
        [
            (self.debit.as_str(), EntryType::Debit),
            (self.credit.as_str(), EntryType::Credit),
        ]
    }
}

/// Immutable table: adjustment kind -> paired legs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AdjustmentRules {
    rules: BTreeMap<AdjustmentKind, AdjustmentRule>,
}

impl AdjustmentRules {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The expansion table used by the bookkeeping application.
    pub fn standard() -> Self {
        const DEPRECIATION: &str = "Gastos de Depreciación";
        const ADMINISTRATION: &str = "Gastos de Administración";

        Self::empty()
            .with_rule(
                AdjustmentKind::DepreciationEdificio,
                AdjustmentRule::new(DEPRECIATION, "Depreciación Acumulada de Edificio"),
            )
            .with_rule(
                AdjustmentKind::DepreciationMobiliario,
                AdjustmentRule::new(DEPRECIATION, "Depreciación Acumulada de Mobiliario"),
            )
            .with_rule(
                AdjustmentKind::DepreciationComputo,
                AdjustmentRule::new(DEPRECIATION, "Depreciación Acumulada de Equipo de Cómputo"),
            )
            .with_rule(
                AdjustmentKind::DepreciationReparto,
                AdjustmentRule::new(DEPRECIATION, "Depreciación Acumulada de Equipo de Reparto"),
            )
            .with_rule(
                AdjustmentKind::DepreciationTransporte,
                AdjustmentRule::new(
                    DEPRECIATION,
                    "Depreciación Acumulada de Equipo de Transporte",
                ),
            )
            .with_rule(
                AdjustmentKind::DepreciationInstalacion,
                AdjustmentRule::new(
                    DEPRECIATION,
                    "Depreciación Acumulada de Gastos de Instalación",
                ),
            )
            .with_rule(
                AdjustmentKind::RentExpense,
                AdjustmentRule::new(ADMINISTRATION, "Rentas Pagadas por Anticipado"),
            )
            .with_rule(
                AdjustmentKind::StationeryExpense,
                AdjustmentRule::new(ADMINISTRATION, "Papelería y Útiles"),
            )
    }

    /// Register (or replace) the expansion of one kind.
    pub fn with_rule(mut self, kind: AdjustmentKind, rule: AdjustmentRule) -> Self {
        self.rules.insert(kind, rule);
        self
    }

    pub fn rule_for(&self, kind: AdjustmentKind) -> DomainResult<&AdjustmentRule> {
        self.rules
            .get(&kind)
            .ok_or_else(|| DomainError::validation(format!("no expansion rule for {kind}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (AdjustmentKind, &AdjustmentRule)> {
        self.rules.iter().map(|(kind, rule)| (*kind, rule))
    }

    /// Every leg account must exist in the chart.
    pub fn validate_against(&self, chart: &ChartOfAccounts) -> DomainResult<()> {
        for (_, rule) in self.iter() {
            for (account, _) in rule.legs() {
                chart.kind_of(account)?;
            }
        }
        Ok(())
    }
}
