//! Checked decimal arithmetic.
//!
//! `Decimal`'s operators panic when a result leaves its range. Every sum the
//! engine derives from recorded amounts goes through these helpers instead, so
//! an out-of-range book fails the call with `InvalidAmount`.

use rust_decimal::Decimal;

use tally_core::{DomainError, DomainResult};

pub(crate) fn add(lhs: Decimal, rhs: Decimal) -> DomainResult<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| overflow(lhs, '+', rhs))
}

pub(crate) fn sub(lhs: Decimal, rhs: Decimal) -> DomainResult<Decimal> {
    lhs.checked_sub(rhs).ok_or_else(|| overflow(lhs, '-', rhs))
}

pub(crate) fn mul(lhs: Decimal, rhs: Decimal) -> DomainResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow(lhs, '*', rhs))
}

/// Division; the caller rules out a zero divisor.
pub(crate) fn div(lhs: Decimal, rhs: Decimal) -> DomainResult<Decimal> {
    if rhs.is_zero() {
        return Err(DomainError::validation(format!("{lhs} / 0 is undefined")));
    }
    lhs.checked_div(rhs).ok_or_else(|| overflow(lhs, '/', rhs))
}

pub(crate) fn sum(values: impl IntoIterator<Item = Decimal>) -> DomainResult<Decimal> {
    values.into_iter().try_fold(Decimal::ZERO, add)
}

fn overflow(lhs: Decimal, op: char, rhs: Decimal) -> DomainError {
    DomainError::invalid_amount(format!("{lhs} {op} {rhs} overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn in_range_results_pass_through() {
        assert_eq!(add(dec!(1.5), dec!(2)).unwrap(), dec!(3.5));
        assert_eq!(sub(dec!(1), dec!(2)).unwrap(), dec!(-1));
        assert_eq!(mul(dec!(3000), dec!(0.30)).unwrap(), dec!(900));
        assert_eq!(div(dec!(7), dec!(2)).unwrap(), dec!(3.5));
        assert_eq!(sum([dec!(1), dec!(2), dec!(3)]).unwrap(), dec!(6));
        assert_eq!(sum(Vec::new()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn overflow_is_an_invalid_amount() {
        let err = add(Decimal::MAX, Decimal::ONE).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(ref msg) if msg.contains("overflows")));
        assert!(sub(Decimal::MIN, Decimal::ONE).is_err());
        assert!(mul(Decimal::MAX, Decimal::TWO).is_err());
        assert!(sum([Decimal::MAX, Decimal::MAX]).is_err());
    }

    #[test]
    fn division_by_zero_is_rejected() {
        assert!(matches!(div(Decimal::ONE, Decimal::ZERO), Err(DomainError::Validation(_))));
    }
}
