//! Environment-driven configuration.
//!
//! | variable | default |
//! |---|---|
//! | `TALLY_INCOME_TAX_RATE` | `0.30` |
//! | `TALLY_PROFIT_SHARE_RATE` | `0.10` |
//! | `TALLY_TAX_ON_LOSS` | `clamp` (or `unconditional`) |
//!
//! Invalid values fall back to the default with a warning. The log format
//! (`TALLY_LOG_FORMAT`) is read by `tally_observability::init`.

use rust_decimal::Decimal;
use std::str::FromStr;

use tally_accounting::{LossTreatment, TaxPolicy};

pub const INCOME_TAX_RATE_VAR: &str = "TALLY_INCOME_TAX_RATE";
pub const PROFIT_SHARE_RATE_VAR: &str = "TALLY_PROFIT_SHARE_RATE";
pub const TAX_ON_LOSS_VAR: &str = "TALLY_TAX_ON_LOSS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub tax_policy: TaxPolicy,
}

impl ReportConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = TaxPolicy::default();

        let income_tax_rate = lookup(INCOME_TAX_RATE_VAR)
            .and_then(|raw| parse_or_warn(INCOME_TAX_RATE_VAR, &raw, Decimal::from_str))
            .unwrap_or(defaults.income_tax_rate());
        let profit_share_rate = lookup(PROFIT_SHARE_RATE_VAR)
            .and_then(|raw| parse_or_warn(PROFIT_SHARE_RATE_VAR, &raw, Decimal::from_str))
            .unwrap_or(defaults.profit_share_rate());
        let loss_treatment = lookup(TAX_ON_LOSS_VAR)
            .and_then(|raw| parse_or_warn(TAX_ON_LOSS_VAR, &raw, parse_loss_treatment))
            .unwrap_or(defaults.loss_treatment());

        let tax_policy = TaxPolicy::new(income_tax_rate, profit_share_rate, loss_treatment)
            .unwrap_or_else(|err| {
                tracing::warn!("invalid tax configuration ({err}); using defaults");
                defaults
            });

        Self { tax_policy }
    }
}

fn parse_loss_treatment(raw: &str) -> Result<LossTreatment, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "clamp" => Ok(LossTreatment::ClampToZero),
        "unconditional" => Ok(LossTreatment::Unconditional),
        other => Err(format!("expected 'clamp' or 'unconditional', got '{other}'")),
    }
}

fn parse_or_warn<T, E: core::fmt::Display>(
    key: &str,
    raw: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Option<T> {
    match parse(raw.trim()) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!("{key}={raw:?} is invalid ({err}); using default");
            None
        }
    }
}
