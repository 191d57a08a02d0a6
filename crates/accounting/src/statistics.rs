//! Statistical analysis of recorded transaction amounts.
//!
//! Descriptive statistics, frequency and probability helpers, the normal and
//! binomial distributions, a one-sample t-test and least-squares regression.
//! Everything is computed in `Decimal`; transcendental functions come from
//! `rust_decimal`'s `maths` feature. Empty inputs give zeros, not errors.

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tally_core::{DomainError, DomainResult, ValueObject};

use crate::arith;
use crate::chart::{AccountKind, ChartOfAccounts};
use crate::entry::{EntryType, Transaction};

/// Bucket width used to group amounts in [`AmountAnalysis::distribution`].
pub const FREQUENCY_BUCKET: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Significance level behind [`TTest::significant`].
pub const DEFAULT_SIGNIFICANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Beyond this many standard deviations the normal CDF is taken as 0 or 1.
const CDF_CUTOFF: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Degrees of freedom above which the t distribution is treated as normal.
const NORMAL_APPROX_DF: usize = 30;

fn len(data: &[Decimal]) -> Decimal {
    Decimal::from(data.len())
}

fn sorted(data: &[Decimal]) -> Vec<Decimal> {
    let mut values = data.to_vec();
    values.sort();
    values
}

fn sqrt(value: Decimal) -> DomainResult<Decimal> {
    value
        .sqrt()
        .ok_or_else(|| DomainError::validation(format!("square root of {value} is undefined")))
}

pub fn mean(data: &[Decimal]) -> DomainResult<Decimal> {
    if data.is_empty() {
        return Ok(Decimal::ZERO);
    }
    arith::div(arith::sum(data.iter().copied())?, len(data))
}

pub fn median(data: &[Decimal]) -> DomainResult<Decimal> {
    median_of_sorted(&sorted(data))
}

fn median_of_sorted(values: &[Decimal]) -> DomainResult<Decimal> {
    let mid = values.len() / 2;
    match values.len() {
        0 => Ok(Decimal::ZERO),
        n if n % 2 == 0 => arith::div(arith::add(values[mid - 1], values[mid])?, Decimal::TWO),
        _ => Ok(values[mid]),
    }
}

/// Most frequent values, ascending. Empty when no value repeats.
pub fn modes(data: &[Decimal]) -> Vec<Decimal> {
    let mut frequency: BTreeMap<Decimal, usize> = BTreeMap::new();
    for value in data {
        *frequency.entry(value.normalize()).or_default() += 1;
    }
    let top = frequency.values().copied().max().unwrap_or(0);
    if top < 2 {
        return Vec::new();
    }
    frequency
        .into_iter()
        .filter(|(_, count)| *count == top)
        .map(|(value, _)| value)
        .collect()
}

/// Population variance (divides by `n`).
pub fn variance(data: &[Decimal]) -> DomainResult<Decimal> {
    if data.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let mean = mean(data)?;
    let mut squares = Decimal::ZERO;
    for value in data {
        let diff = arith::sub(*value, mean)?;
        squares = arith::add(squares, arith::mul(diff, diff)?)?;
    }
    arith::div(squares, len(data))
}

pub fn std_dev(data: &[Decimal]) -> DomainResult<Decimal> {
    sqrt(variance(data)?)
}

/// `max - min`, zero for an empty set.
pub fn range(data: &[Decimal]) -> DomainResult<Decimal> {
    match (data.iter().min(), data.iter().max()) {
        (Some(min), Some(max)) => arith::sub(*max, *min),
        _ => Ok(Decimal::ZERO),
    }
}

/// Quartiles by the median-of-halves method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: Decimal,
    pub q2: Decimal,
    pub q3: Decimal,
}

impl ValueObject for Quartiles {}

impl Quartiles {
    /// Interquartile range `q3 - q1`.
    pub fn iqr(&self) -> DomainResult<Decimal> {
        arith::sub(self.q3, self.q1)
    }
}

/// The median splits the set; q1 and q3 are the medians of the halves, which
/// exclude the middle value of an odd-length set. A single value is all
/// three quartiles.
pub fn quartiles(data: &[Decimal]) -> DomainResult<Quartiles> {
    let values = sorted(data);
    if let [only] = values.as_slice() {
        return Ok(Quartiles {
            q1: *only,
            q2: *only,
            q3: *only,
        });
    }
    let mid = values.len() / 2;
    let upper_start = if values.len() % 2 == 0 { mid } else { mid + 1 };
    Ok(Quartiles {
        q1: median_of_sorted(&values[..mid])?,
        q2: median_of_sorted(&values)?,
        q3: median_of_sorted(&values[upper_start..])?,
    })
}

/// Descriptive summary of one set of amounts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Descriptive {
    pub count: usize,
    pub mean: Decimal,
    pub median: Decimal,
    pub modes: Vec<Decimal>,
    pub variance: Decimal,
    pub std_dev: Decimal,
    pub range: Decimal,
    pub quartiles: Quartiles,
    pub iqr: Decimal,
}

impl ValueObject for Descriptive {}

pub fn describe(data: &[Decimal]) -> DomainResult<Descriptive> {
    let variance = variance(data)?;
    let quartiles = quartiles(data)?;
    Ok(Descriptive {
        count: data.len(),
        mean: mean(data)?,
        median: median(data)?,
        modes: modes(data),
        variance,
        std_dev: sqrt(variance)?,
        range: range(data)?,
        iqr: quartiles.iqr()?,
        quartiles,
    })
}

/// `favorable / total`, zero when there is nothing to count.
pub fn probability(favorable: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(favorable) / Decimal::from(total)
}

/// Share of values strictly above `threshold`.
pub fn probability_above(data: &[Decimal], threshold: Decimal) -> Decimal {
    let above = data.iter().filter(|value| **value > threshold).count();
    probability(above, data.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyBucket {
    /// Bucket center: the value rounded to the nearest multiple of the width.
    pub value: Decimal,
    pub frequency: usize,
    pub relative_frequency: Decimal,
}

/// Group values by rounding to the nearest multiple of `width` (halves round
/// away from zero). Buckets come out in ascending order.
pub fn frequency_distribution(
    data: &[Decimal],
    width: Decimal,
) -> DomainResult<Vec<FrequencyBucket>> {
    if width <= Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "bucket width must be positive, got {width}"
        )));
    }
    let mut counts: BTreeMap<Decimal, usize> = BTreeMap::new();
    for value in data {
        let steps = arith::div(*value, width)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        *counts.entry(arith::mul(steps, width)?.normalize()).or_default() += 1;
    }
    Ok(counts
        .into_iter()
        .map(|(value, frequency)| FrequencyBucket {
            value,
            frequency,
            relative_frequency: probability(frequency, data.len()),
        })
        .collect())
}

/// Standard score; zero when the spread is zero.
pub fn z_score(value: Decimal, mean: Decimal, std_dev: Decimal) -> DomainResult<Decimal> {
    if std_dev.is_zero() {
        return Ok(Decimal::ZERO);
    }
    arith::div(arith::sub(value, mean)?, std_dev)
}

/// Density of the normal distribution `N(mean, std_dev²)` at `x`.
pub fn normal_pdf(x: Decimal, mean: Decimal, std_dev: Decimal) -> DomainResult<Decimal> {
    if std_dev <= Decimal::ZERO {
        return Err(DomainError::validation(format!(
            "standard deviation must be positive, got {std_dev}"
        )));
    }
    let z = z_score(x, mean, std_dev)?;
    // `None` means the density underflowed.
    let density = z.checked_norm_pdf().unwrap_or(Decimal::ZERO);
    arith::div(density, std_dev)
}

/// Standard normal CDF.
pub fn normal_cdf(z: Decimal) -> Decimal {
    if z >= CDF_CUTOFF {
        Decimal::ONE
    } else if z <= -CDF_CUTOFF {
        Decimal::ZERO
    } else {
        z.norm_cdf()
    }
}

/// `P(X = successes)` for `X ~ Binomial(trials, p)`.
pub fn binomial_probability(trials: u32, successes: u32, p: Decimal) -> DomainResult<Decimal> {
    if successes > trials {
        return Err(DomainError::validation(format!(
            "{successes} successes out of {trials} trials"
        )));
    }
    if p < Decimal::ZERO || p > Decimal::ONE {
        return Err(DomainError::validation(format!(
            "probability must be between 0 and 1, got {p}"
        )));
    }

    // C(n, k) built up as C(n, i + 1) = C(n, i) * (n - i) / (i + 1); every step is exact.
    let k = successes.min(trials - successes);
    let mut combinations = Decimal::ONE;
    for i in 0..k {
        combinations = arith::mul(combinations, Decimal::from(trials - i))?;
        combinations = arith::div(combinations, Decimal::from(i + 1))?;
    }

    let hits = power(p, successes)?;
    let misses = power(arith::sub(Decimal::ONE, p)?, trials - successes)?;
    arith::mul(arith::mul(combinations, hits)?, misses)
}

fn power(base: Decimal, exponent: u32) -> DomainResult<Decimal> {
    base.checked_powi(i64::from(exponent))
        .ok_or_else(|| DomainError::invalid_amount(format!("{base}^{exponent} overflows")))
}

/// Which side of the null hypothesis a test rejects on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tail {
    #[default]
    TwoSided,
    /// Alternative: the true mean is greater.
    Upper,
    /// Alternative: the true mean is smaller.
    Lower,
}

/// One-sample t-test of a sample mean against a hypothesized mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TTest {
    pub t: Decimal,
    pub degrees_of_freedom: usize,
    /// Two-sided p-value.
    pub p_value: Decimal,
    pub sample_mean: Decimal,
    pub population_mean: Decimal,
    /// Two-sided rejection at [`DEFAULT_SIGNIFICANCE`].
    pub significant: bool,
}

impl ValueObject for TTest {}

impl TTest {
    pub fn rejects_null(&self, alpha: Decimal, tail: Tail) -> bool {
        let one_sided = self.p_value / Decimal::TWO;
        match tail {
            Tail::TwoSided => self.p_value < alpha,
            Tail::Upper => self.t > Decimal::ZERO && one_sided < alpha,
            Tail::Lower => self.t < Decimal::ZERO && one_sided < alpha,
        }
    }
}

/// Needs at least two values with nonzero spread. The standard error uses the
/// population standard deviation.
pub fn t_test(data: &[Decimal], population_mean: Decimal) -> DomainResult<TTest> {
    if data.len() < 2 {
        return Err(DomainError::validation("t-test needs at least two values"));
    }
    let spread = std_dev(data)?;
    if spread.is_zero() {
        return Err(DomainError::validation(
            "t-test is undefined for a sample without spread",
        ));
    }

    let sample_mean = mean(data)?;
    let standard_error = arith::div(spread, sqrt(len(data))?)?;
    let t = arith::div(arith::sub(sample_mean, population_mean)?, standard_error)?;
    let degrees_of_freedom = data.len() - 1;

    let tail = arith::sub(Decimal::ONE, t_cdf(t.abs(), degrees_of_freedom)?)?;
    let p_value = (tail * Decimal::TWO).clamp(Decimal::ZERO, Decimal::ONE);

    Ok(TTest {
        t,
        degrees_of_freedom,
        p_value,
        sample_mean,
        population_mean,
        significant: p_value < DEFAULT_SIGNIFICANCE,
    })
}

/// Approximate Student-t CDF for `t >= 0`: the normal CDF for large or very
/// small samples, `0.5 + 0.5 tanh(t / sqrt(df / (df - 2)))` in between.
fn t_cdf(t: Decimal, degrees_of_freedom: usize) -> DomainResult<Decimal> {
    if degrees_of_freedom > NORMAL_APPROX_DF || degrees_of_freedom <= 2 {
        return Ok(normal_cdf(t));
    }
    let df = Decimal::from(degrees_of_freedom);
    let scale = sqrt(arith::div(df, df - Decimal::TWO)?)?;
    let half = Decimal::new(5, 1);
    Ok(half + half * tanh(arith::div(t, scale)?))
}

fn tanh(x: Decimal) -> Decimal {
    // tanh(30) is 1 to well beyond 28 digits.
    if x > Decimal::from(30) {
        return Decimal::ONE;
    }
    match (x * Decimal::TWO).checked_exp() {
        Some(e) => (e - Decimal::ONE) / (e + Decimal::ONE),
        None => Decimal::ONE,
    }
}

fn paired(x: &[Decimal], y: &[Decimal]) -> DomainResult<()> {
    if x.len() != y.len() {
        return Err(DomainError::validation(format!(
            "paired series differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    Ok(())
}

/// Sums of co-deviations and squared deviations from the means.
struct Deviations {
    mean_x: Decimal,
    mean_y: Decimal,
    xy: Decimal,
    xx: Decimal,
    yy: Decimal,
}

fn deviations(x: &[Decimal], y: &[Decimal]) -> DomainResult<Deviations> {
    let (mean_x, mean_y) = (mean(x)?, mean(y)?);
    let (mut xy, mut xx, mut yy) = (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    for (xi, yi) in x.iter().zip(y) {
        let dx = arith::sub(*xi, mean_x)?;
        let dy = arith::sub(*yi, mean_y)?;
        xy = arith::add(xy, arith::mul(dx, dy)?)?;
        xx = arith::add(xx, arith::mul(dx, dx)?)?;
        yy = arith::add(yy, arith::mul(dy, dy)?)?;
    }
    Ok(Deviations {
        mean_x,
        mean_y,
        xy,
        xx,
        yy,
    })
}

/// Pearson correlation; zero for empty or constant series.
pub fn correlation(x: &[Decimal], y: &[Decimal]) -> DomainResult<Decimal> {
    paired(x, y)?;
    if x.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let d = deviations(x, y)?;
    if d.xx.is_zero() || d.yy.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let r = arith::div(d.xy, arith::mul(sqrt(d.xx)?, sqrt(d.yy)?)?)?;
    Ok(r.clamp(-Decimal::ONE, Decimal::ONE))
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Regression {
    pub slope: Decimal,
    pub intercept: Decimal,
    pub r_squared: Decimal,
}

impl ValueObject for Regression {}

impl Regression {
    pub fn predict(&self, x: Decimal) -> DomainResult<Decimal> {
        arith::add(arith::mul(self.slope, x)?, self.intercept)
    }
}

/// All zeros for empty series; slope zero when `x` is constant.
pub fn linear_regression(x: &[Decimal], y: &[Decimal]) -> DomainResult<Regression> {
    paired(x, y)?;
    if x.is_empty() {
        return Ok(Regression::default());
    }
    let d = deviations(x, y)?;
    let slope = if d.xx.is_zero() {
        Decimal::ZERO
    } else {
        arith::div(d.xy, d.xx)?
    };
    let r = correlation(x, y)?;
    Ok(Regression {
        slope,
        intercept: arith::sub(d.mean_y, arith::mul(slope, d.mean_x)?)?,
        r_squared: arith::mul(r, r)?,
    })
}

/// Income and expenses recorded on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFlow {
    pub date: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
    /// `income - expenses`.
    pub net: Decimal,
}

/// Transaction amounts split for analysis.
///
/// Income is a credit to a revenue account; an expense is a debit to an
/// expense account. Other movements only count toward `amounts`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmountSeries {
    pub amounts: Vec<Decimal>,
    pub income: Vec<Decimal>,
    pub expenses: Vec<Decimal>,
    /// One entry per transaction date, ascending.
    pub daily: Vec<DailyFlow>,
}

pub fn amount_series(
    chart: &ChartOfAccounts,
    transactions: &[Transaction],
) -> DomainResult<AmountSeries> {
    let mut series = AmountSeries::default();
    let mut by_date: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();

    for tx in transactions {
        let kind = chart.kind_of(&tx.account)?;
        let value = tx.amount.value();
        series.amounts.push(value);

        let day = by_date.entry(tx.date).or_default();
        match (kind, tx.entry_type) {
            (AccountKind::Revenue, EntryType::Credit) => {
                series.income.push(value);
                day.0 = arith::add(day.0, value)?;
            }
            (AccountKind::Expense, EntryType::Debit) => {
                series.expenses.push(value);
                day.1 = arith::add(day.1, value)?;
            }
            _ => {}
        }
    }

    for (date, (income, expenses)) in by_date {
        series.daily.push(DailyFlow {
            date,
            income,
            expenses,
            net: arith::sub(income, expenses)?,
        });
    }
    Ok(series)
}

/// Statistical overview of a set of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountAnalysis {
    pub transactions: usize,
    pub amounts: Descriptive,
    pub income: Descriptive,
    pub expenses: Descriptive,
    /// Share of transactions that are income.
    pub income_probability: Decimal,
    /// Share of transactions that are expenses.
    pub expense_probability: Decimal,
    pub distribution: Vec<FrequencyBucket>,
    pub daily: Vec<DailyFlow>,
    /// Daily income regressed on the day's position in `daily`.
    pub income_trend: Regression,
    /// Correlation of the i-th income with the i-th expense, over the shorter list.
    pub income_expense_correlation: Decimal,
}

impl ValueObject for AmountAnalysis {}

pub fn analyze(series: AmountSeries) -> DomainResult<AmountAnalysis> {
    let total = series.amounts.len();

    let positions: Vec<Decimal> = (0..series.daily.len()).map(Decimal::from).collect();
    let daily_income: Vec<Decimal> = series.daily.iter().map(|day| day.income).collect();
    let paired_len = series.income.len().min(series.expenses.len());

    Ok(AmountAnalysis {
        transactions: total,
        amounts: describe(&series.amounts)?,
        income: describe(&series.income)?,
        expenses: describe(&series.expenses)?,
        income_probability: probability(series.income.len(), total),
        expense_probability: probability(series.expenses.len(), total),
        distribution: frequency_distribution(&series.amounts, FREQUENCY_BUCKET)?,
        income_trend: linear_regression(&positions, &daily_income)?,
        income_expense_correlation: correlation(
            &series.income[..paired_len],
            &series.expenses[..paired_len],
        )?,
        daily: series.daily,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use tally_core::{Amount, TransactionId};

    fn close(actual: Decimal, expected: Decimal) -> bool {
        (actual - expected).abs() < dec!(0.000001)
    }

    #[test]
    fn empty_set_is_all_zeros() {
        let summary = describe(&[]).unwrap();
        assert_eq!(summary, Descriptive::default());
        assert!(frequency_distribution(&[], FREQUENCY_BUCKET).unwrap().is_empty());
        assert_eq!(probability(0, 0), Decimal::ZERO);
    }

    #[test]
    fn median_of_even_and_odd_sets() {
        assert_eq!(median(&[dec!(4), dec!(1), dec!(3), dec!(2)]).unwrap(), dec!(2.5));
        assert_eq!(median(&[dec!(9), dec!(1), dec!(5)]).unwrap(), dec!(5));
    }

    #[test]
    fn modes_need_a_repeat() {
        assert!(modes(&[dec!(1), dec!(2), dec!(3)]).is_empty());
        assert_eq!(modes(&[dec!(2), dec!(1), dec!(2), dec!(1), dec!(3)]), [dec!(1), dec!(2)]);
        assert_eq!(modes(&[dec!(5.0), dec!(5.00), dec!(7)]), [dec!(5)]);
    }

    #[test]
    fn population_variance_and_std_dev() {
        let data = [2, 4, 4, 4, 5, 5, 7, 9].map(Decimal::from);
        let summary = describe(&data).unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.mean, dec!(5));
        assert_eq!(summary.variance, dec!(4));
        assert_eq!(summary.std_dev, dec!(2));
        assert_eq!(summary.range, dec!(7));
        assert_eq!(summary.modes, [dec!(4)]);
    }

    #[test]
    fn quartiles_exclude_the_middle_of_odd_sets() {
        let even = quartiles(&(1..=8).map(Decimal::from).collect::<Vec<_>>()).unwrap();
        assert_eq!((even.q1, even.q2, even.q3), (dec!(2.5), dec!(4.5), dec!(6.5)));
        assert_eq!(even.iqr().unwrap(), dec!(4));

        let odd = quartiles(&(1..=7).map(Decimal::from).collect::<Vec<_>>()).unwrap();
        assert_eq!((odd.q1, odd.q2, odd.q3), (dec!(2), dec!(4), dec!(6)));

        let single = quartiles(&[dec!(12)]).unwrap();
        assert_eq!((single.q1, single.q3), (dec!(12), dec!(12)));
    }

    #[test]
    fn frequency_distribution_rounds_to_the_nearest_thousand() {
        let data = [dec!(950), dec!(1400), dec!(1600), dec!(2500)];
        let buckets = frequency_distribution(&data, FREQUENCY_BUCKET).unwrap();
        let summary: Vec<_> = buckets
            .iter()
            .map(|b| (b.value, b.frequency, b.relative_frequency))
            .collect();
        assert_eq!(
            summary,
            [
                (dec!(1000), 2, dec!(0.5)),
                (dec!(2000), 1, dec!(0.25)),
                (dec!(3000), 1, dec!(0.25)),
            ]
        );
        assert!(frequency_distribution(&[dec!(1)], Decimal::ZERO).is_err());
    }

    #[test]
    fn probability_above_a_threshold() {
        let data = [dec!(100), dec!(6000), dec!(12000), dec!(5000)];
        assert_eq!(probability_above(&data, dec!(5000)), dec!(0.5));
        assert_eq!(probability(1, 3), dec!(1) / dec!(3));
    }

    #[test]
    fn normal_distribution() {
        assert_eq!(z_score(dec!(7), dec!(5), dec!(2)).unwrap(), dec!(1));
        assert_eq!(z_score(dec!(7), dec!(5), Decimal::ZERO).unwrap(), Decimal::ZERO);

        assert!(close(normal_pdf(dec!(5), dec!(5), dec!(1)).unwrap(), dec!(0.3989423)));
        assert!(close(normal_pdf(dec!(5), dec!(5), dec!(2)).unwrap(), dec!(0.1994711)));
        assert_eq!(normal_pdf(dec!(1000), Decimal::ZERO, dec!(1)).unwrap(), Decimal::ZERO);
        assert!(normal_pdf(dec!(1), dec!(0), Decimal::ZERO).is_err());

        assert!(close(normal_cdf(Decimal::ZERO), dec!(0.5)));
        assert!(close(normal_cdf(dec!(1.96)), dec!(0.9750021)));
        assert_eq!(normal_cdf(dec!(50)), Decimal::ONE);
        assert_eq!(normal_cdf(dec!(-50)), Decimal::ZERO);
    }

    #[test]
    fn binomial() {
        assert_eq!(binomial_probability(10, 5, dec!(0.5)).unwrap(), dec!(0.24609375));
        assert_eq!(binomial_probability(4, 0, dec!(0.5)).unwrap(), dec!(0.0625));
        assert_eq!(binomial_probability(3, 3, Decimal::ONE).unwrap(), Decimal::ONE);
        assert!(binomial_probability(3, 4, dec!(0.5)).is_err());
        assert!(binomial_probability(3, 1, dec!(1.5)).is_err());
    }

    #[test]
    fn t_test_at_the_hypothesized_mean_is_not_significant() {
        let data = [dec!(10), dec!(12), dec!(14), dec!(16), dec!(18)];
        let test = t_test(&data, dec!(14)).unwrap();
        assert_eq!(test.t, Decimal::ZERO);
        assert_eq!(test.degrees_of_freedom, 4);
        assert_eq!(test.p_value, Decimal::ONE);
        assert!(!test.significant);
        assert!(!test.rejects_null(dec!(0.05), Tail::TwoSided));
    }

    #[test]
    fn t_test_far_from_the_hypothesized_mean_is_significant() {
        let data: Vec<Decimal> = (0..40).map(|i| Decimal::from(100 + i % 2)).collect();
        let test = t_test(&data, Decimal::ZERO).unwrap();
        assert!(test.t > Decimal::ZERO);
        assert_eq!(test.p_value, Decimal::ZERO);
        assert!(test.significant);
        assert!(test.rejects_null(dec!(0.01), Tail::Upper));
        assert!(!test.rejects_null(dec!(0.01), Tail::Lower));
    }

    #[test]
    fn t_test_needs_spread() {
        assert!(t_test(&[dec!(1)], Decimal::ZERO).is_err());
        assert!(t_test(&[dec!(3), dec!(3), dec!(3)], Decimal::ZERO).is_err());
    }

    #[test]
    fn regression_on_collinear_points() {
        let x = [0, 1, 2, 3].map(Decimal::from);
        let y = [1, 3, 5, 7].map(Decimal::from);
        let fit = linear_regression(&x, &y).unwrap();
        assert_eq!(fit.slope, dec!(2));
        assert_eq!(fit.intercept, dec!(1));
        assert!(close(fit.r_squared, Decimal::ONE));
        assert_eq!(fit.predict(dec!(10)).unwrap(), dec!(21));

        let falling = [7, 5, 3, 1].map(Decimal::from);
        assert!(close(correlation(&x, &falling).unwrap(), -Decimal::ONE));
    }

    #[test]
    fn constant_series_have_no_correlation() {
        let x = [dec!(4), dec!(4), dec!(4)];
        let y = [dec!(1), dec!(2), dec!(3)];
        assert_eq!(correlation(&x, &y).unwrap(), Decimal::ZERO);
        assert_eq!(linear_regression(&x, &y).unwrap().slope, Decimal::ZERO);
        assert_eq!(linear_regression(&[], &[]).unwrap(), Regression::default());
        assert!(matches!(
            correlation(&x, &y[..2]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn overflowing_spread_fails() {
        let err = variance(&[Decimal::MAX, -Decimal::MAX]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidAmount(_)));
    }

    fn tx(day: u32, account: &str, entry_type: EntryType, amount: Decimal) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            account: account.to_string(),
            entry_type,
            amount: Amount::new(amount).unwrap(),
            description: String::new(),
        }
    }

    #[test]
    fn series_splits_income_and_expenses_by_account_kind() {
        let series = amount_series(
            &ChartOfAccounts::standard(),
            &[
                tx(2, "Caja", EntryType::Debit, dec!(5000)),
                tx(2, "Ventas", EntryType::Credit, dec!(5000)),
                tx(1, "Costo de Ventas", EntryType::Debit, dec!(2000)),
                tx(1, "Caja", EntryType::Credit, dec!(2000)),
                tx(2, "Gastos de Venta", EntryType::Debit, dec!(300)),
            ],
        )
        .unwrap();

        assert_eq!(series.amounts.len(), 5);
        assert_eq!(series.income, [dec!(5000)]);
        assert_eq!(series.expenses, [dec!(2000), dec!(300)]);
        let daily: Vec<_> = series
            .daily
            .iter()
            .map(|d| (d.date.format("%d").to_string(), d.income, d.expenses, d.net))
            .collect();
        assert_eq!(
            daily,
            [
                ("01".to_string(), dec!(0), dec!(2000), dec!(-2000)),
                ("02".to_string(), dec!(5000), dec!(300), dec!(4700)),
            ]
        );
    }

    #[test]
    fn series_rejects_unknown_accounts() {
        let err = amount_series(
            &ChartOfAccounts::standard(),
            &[tx(1, "Caja Fuerte", EntryType::Debit, dec!(1))],
        )
        .unwrap_err();
        assert_eq!(err, DomainError::UnknownAccount("Caja Fuerte".to_string()));
    }

    #[test]
    fn analysis_of_a_small_book() {
        let series = amount_series(
            &ChartOfAccounts::standard(),
            &[
                tx(1, "Ventas", EntryType::Credit, dec!(1000)),
                tx(1, "Gastos de Venta", EntryType::Debit, dec!(100)),
                tx(2, "Ventas", EntryType::Credit, dec!(2000)),
                tx(2, "Gastos de Venta", EntryType::Debit, dec!(200)),
                tx(3, "Ventas", EntryType::Credit, dec!(3000)),
                tx(3, "Caja", EntryType::Debit, dec!(3000)),
            ],
        )
        .unwrap();
        let analysis = analyze(series).unwrap();

        assert_eq!(analysis.transactions, 6);
        assert_eq!(analysis.income.mean, dec!(2000));
        assert_eq!(analysis.expenses.median, dec!(150));
        assert_eq!(analysis.income_probability, dec!(0.5));
        assert_eq!(analysis.expense_probability, dec!(1) / dec!(3));
        assert_eq!(analysis.daily.len(), 3);
        assert_eq!(analysis.income_trend.slope, dec!(1000));
        assert_eq!(analysis.income_trend.intercept, dec!(1000));
        assert!(close(analysis.income_expense_correlation, Decimal::ONE));
    }

    fn arb_amounts() -> impl Strategy<Value = Vec<Decimal>> {
        prop::collection::vec((1i64..10_000_000i64).prop_map(|c| Decimal::new(c, 2)), 1..40)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: location statistics sit inside the data's bounds, in order.
        #[test]
        fn summary_is_bounded_and_ordered(data in arb_amounts()) {
            let min = *data.iter().min().unwrap();
            let max = *data.iter().max().unwrap();
            let summary = describe(&data).unwrap();
            let q = summary.quartiles;

            prop_assert!(min <= summary.mean && summary.mean <= max);
            prop_assert!(min <= q.q1 && q.q1 <= q.q2 && q.q2 <= q.q3 && q.q3 <= max);
            prop_assert_eq!(q.q2, summary.median);
            prop_assert!(summary.variance >= Decimal::ZERO);
            prop_assert_eq!(summary.range, max - min);
        }

        /// Property: a fit over exact points on a line recovers that line.
        #[test]
        fn regression_recovers_exact_lines(
            n in 2usize..30,
            intercept in -1000i64..1000,
            slope in -100i64..100,
        ) {
            let x: Vec<Decimal> = (0..n).map(Decimal::from).collect();
            let y: Vec<Decimal> = x
                .iter()
                .map(|xi| Decimal::from(intercept) + Decimal::from(slope) * xi)
                .collect();
            let fit = linear_regression(&x, &y).unwrap();
            prop_assert_eq!(fit.slope, Decimal::from(slope));
            prop_assert_eq!(fit.intercept, Decimal::from(intercept));
        }

        /// Property: bucket frequencies account for every value.
        #[test]
        fn distribution_counts_every_value(data in arb_amounts()) {
            let buckets = frequency_distribution(&data, FREQUENCY_BUCKET).unwrap();
            let counted: usize = buckets.iter().map(|b| b.frequency).sum();
            prop_assert_eq!(counted, data.len());
        }
    }
}
