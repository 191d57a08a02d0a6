use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::{DomainError, DomainResult, ValueObject};

use crate::arith;

/// What to do with tax figures when pre-tax profit is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossTreatment {
    /// No income tax or profit share on a loss.
    #[default]
    ClampToZero,
    /// Apply the rates to the (negative) profit as-is.
    Unconditional,
}

/// Income tax (ISR) and employee profit-share (PTU) rates.
///
/// Deserialization goes through [`TaxPolicy::new`], so out-of-range rates are
/// rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaxPolicyFields")]
pub struct TaxPolicy {
    income_tax_rate: Decimal,
    profit_share_rate: Decimal,
    loss_treatment: LossTreatment,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self {
            income_tax_rate: Decimal::new(30, 2),
            profit_share_rate: Decimal::new(10, 2),
            loss_treatment: LossTreatment::ClampToZero,
        }
    }
}

#[derive(Deserialize)]
struct TaxPolicyFields {
    income_tax_rate: Decimal,
    profit_share_rate: Decimal,
    #[serde(default)]
    loss_treatment: LossTreatment,
}

impl TryFrom<TaxPolicyFields> for TaxPolicy {
    type Error = DomainError;

    fn try_from(fields: TaxPolicyFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.income_tax_rate,
            fields.profit_share_rate,
            fields.loss_treatment,
        )
    }
}

impl TaxPolicy {
    /// Rates are fractions; together they may not exceed the whole profit.
    pub fn new(
        income_tax_rate: Decimal,
        profit_share_rate: Decimal,
        loss_treatment: LossTreatment,
    ) -> DomainResult<Self> {
        for (name, rate) in [
            ("income tax rate", income_tax_rate),
            ("profit share rate", profit_share_rate),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(DomainError::validation(format!(
                    "{name} must be between 0 and 1, got {rate}"
                )));
            }
        }
        if income_tax_rate + profit_share_rate > Decimal::ONE {
            return Err(DomainError::validation(
                "income tax and profit share rates exceed 100%",
            ));
        }
        Ok(Self {
            income_tax_rate,
            profit_share_rate,
            loss_treatment,
        })
    }

    pub fn income_tax_rate(&self) -> Decimal {
        self.income_tax_rate
    }

    pub fn profit_share_rate(&self) -> Decimal {
        self.profit_share_rate
    }

    pub fn loss_treatment(&self) -> LossTreatment {
        self.loss_treatment
    }

    /// Derive tax and net figures from revenue and expense totals.
    pub fn profit_figures(
        &self,
        total_revenues: Decimal,
        total_expenses: Decimal,
    ) -> DomainResult<ProfitFigures> {
        let pre_tax_profit = arith::sub(total_revenues, total_expenses)?;
        let taxable = match self.loss_treatment {
            LossTreatment::ClampToZero => pre_tax_profit.max(Decimal::ZERO),
            LossTreatment::Unconditional => pre_tax_profit,
        };
        let income_tax = arith::mul(taxable, self.income_tax_rate)?;
        let profit_share = arith::mul(taxable, self.profit_share_rate)?;
        let net_profit = arith::sub(arith::sub(pre_tax_profit, income_tax)?, profit_share)?;

        Ok(ProfitFigures {
            pre_tax_profit,
            income_tax,
            profit_share,
            net_profit,
        })
    }
}

/// Profit before and after income tax and profit share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfitFigures {
    pub pre_tax_profit: Decimal,
    pub income_tax: Decimal,
    pub profit_share: Decimal,
    pub net_profit: Decimal,
}

impl ValueObject for ProfitFigures {}
