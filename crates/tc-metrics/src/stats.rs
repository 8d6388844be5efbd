//! Statistics Engine.
//!
//! Every function here is pure and returns `None` for a value that cannot be
//! computed (too little data, a zero denominator, a negative variance). No
//! NaN or infinity ever escapes as `Some`.

use tc_types::{AlignedPriceMatrix, PortfolioCurve, ReturnMatrix, WeightVector};

use crate::returns::returns;

pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Pairs of values where both columns are present
pub(crate) fn paired<'a>(
    a: &'a [Option<f64>],
    b: &'a [Option<f64>],
) -> impl Iterator<Item = (f64, f64)> + 'a {
    a.iter().zip(b).filter_map(|(x, y)| Some(((*x)?, (*y)?)))
}

/// Pairwise-complete moments of two columns: `(n, cov, var_a, var_b)` with
/// sample (n - 1) normalisation. `None` with fewer than two shared points.
pub(crate) fn pairwise_moments(a: &[Option<f64>], b: &[Option<f64>]) -> Option<(usize, f64, f64, f64)> {
    let pairs: Vec<(f64, f64)> = paired(a, b).collect();
    let n = pairs.len();
    if n < 2 {
        return None;
    }
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    let denom = (n - 1) as f64;
    Some((n, cov / denom, var_a / denom, var_b / denom))
}

/// Geometric annualized return of a value curve.
///
/// `years` counts curve points, not intervals: `len / periods_per_year`.
pub fn annualized_return(curve: &PortfolioCurve, periods_per_year: u32) -> Option<f64> {
    if curve.len() < 2 || periods_per_year == 0 {
        return None;
    }
    let first = curve.first()?.value;
    let last = curve.last()?.value;
    if first == 0.0 {
        return None;
    }
    let total_return = last / first - 1.0;
    let years = curve.len() as f64 / periods_per_year as f64;
    if years <= 0.0 {
        return None;
    }
    finite((1.0 + total_return).powf(1.0 / years) - 1.0)
}

/// Pairwise-complete sample covariance of the return columns.
///
/// Entry `[i][j]` is `None` when columns `i` and `j` share fewer than two
/// observations.
pub fn covariance(returns: &ReturnMatrix) -> Vec<Vec<Option<f64>>> {
    let n = returns.column_count();
    let mut cov = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let value = pairwise_moments(returns.column(i), returns.column(j))
                .and_then(|(_, c, _, _)| finite(c));
            cov[i][j] = value;
            cov[j][i] = value;
        }
    }
    cov
}

/// Annualized portfolio volatility: `sqrt(wᵀ · Σ · w)` with
/// `Σ = covariance(returns) × periods_per_year`.
///
/// Tickers without a weight drop out of the quadratic form. A covariance entry
/// needed by two weighted tickers that is undefined makes the whole result
/// undefined. `weights` are the normalized ones, so an all-zero request is
/// measured with the near-uniform epsilon fallback rather than reporting zero.
pub fn annualized_volatility(
    matrix: &AlignedPriceMatrix,
    weights: &WeightVector,
    periods_per_year: u32,
) -> Option<f64> {
    if matrix.is_empty() {
        return None;
    }
    let rets = returns(matrix);
    if rets.is_empty() {
        return None;
    }

    let w = weights.aligned_to(rets.tickers());
    let cov = covariance(&rets);
    let scale = periods_per_year as f64;

    let mut variance = 0.0;
    for (i, wi) in w.iter().enumerate() {
        if *wi == 0.0 {
            continue;
        }
        for (j, wj) in w.iter().enumerate() {
            if *wj == 0.0 {
                continue;
            }
            variance += wi * wj * cov[i][j]? * scale;
        }
    }

    // Rounding noise around a zero-variance portfolio.
    if variance < 0.0 && variance > -f64::EPSILON {
        variance = 0.0;
    }
    if variance < 0.0 {
        return None;
    }
    finite(variance.sqrt())
}

/// `(annualized_return - risk_free_rate) / annualized_volatility`.
///
/// Undefined when either input is undefined or the volatility is zero.
pub fn sharpe_ratio(
    annualized_return: Option<f64>,
    annualized_volatility: Option<f64>,
    risk_free_rate: f64,
) -> Option<f64> {
    let ret = annualized_return?;
    let vol = annualized_volatility?;
    if vol == 0.0 {
        return None;
    }
    finite((ret - risk_free_rate) / vol)
}

/// Deepest fall from the running peak, as a non-positive fraction.
///
/// A flat or rising curve yields `0.0`; an empty one is undefined.
pub fn max_drawdown(curve: &PortfolioCurve) -> Option<f64> {
    let mut values = curve.values();
    let mut peak = values.next()?;
    let mut worst: f64 = 0.0;

    for value in values {
        if value > peak {
            peak = value;
        }
        let drawdown = finite(value / peak - 1.0)?;
        worst = worst.min(drawdown);
    }
    finite(worst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::normalize;
    use chrono::NaiveDate;
    use tc_types::{CurvePoint, Ticker};

    fn d(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(offset)
    }

    fn curve_of(values: &[f64]) -> PortfolioCurve {
        PortfolioCurve::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| CurvePoint { date: d(i as u64), value })
                .collect(),
        )
    }

    fn matrix(columns: Vec<(&str, Vec<Option<f64>>)>) -> AlignedPriceMatrix {
        let rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let dates = (0..rows as u64).map(d).collect();
        let (tickers, columns): (Vec<_>, Vec<_>) =
            columns.into_iter().map(|(t, c)| (Ticker::new(t), c)).unzip();
        AlignedPriceMatrix::from_columns(dates, tickers, columns).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn annualized_return_needs_two_points() {
        assert_eq!(annualized_return(&curve_of(&[]), 252), None);
        assert_eq!(annualized_return(&curve_of(&[1.0]), 252), None);
    }

    #[test]
    fn flat_curve_has_zero_return() {
        assert_eq!(annualized_return(&curve_of(&[1.0, 1.0]), 252), Some(0.0));
    }

    #[test]
    fn annualized_return_uses_point_count() {
        // 252 points growing 10% end to end is exactly one year.
        let mut values = vec![1.0; 252];
        values[251] = 1.1;
        let r = annualized_return(&curve_of(&values), 252).unwrap();
        assert!(approx(r, 0.1));

        // Two points over a 2-period year: years = 1.
        let r = annualized_return(&curve_of(&[1.0, 1.21]), 2).unwrap();
        assert!(approx(r, 0.21));
    }

    #[test]
    fn annualized_return_zero_periods_is_undefined() {
        assert_eq!(annualized_return(&curve_of(&[1.0, 2.0]), 0), None);
    }

    #[test]
    fn max_drawdown_rising_curve_is_zero() {
        assert_eq!(max_drawdown(&curve_of(&[1.0, 1.1, 1.2, 1.5])), Some(0.0));
        assert_eq!(max_drawdown(&curve_of(&[1.0])), Some(0.0));
    }

    #[test]
    fn max_drawdown_finds_deepest_trough() {
        assert_eq!(max_drawdown(&curve_of(&[1.0, 0.5, 1.0])), Some(-0.5));

        let dd = max_drawdown(&curve_of(&[100.0, 110.0, 99.0, 105.0, 120.0, 108.0])).unwrap();
        assert!(approx(dd, -0.1));
    }

    #[test]
    fn max_drawdown_empty_is_undefined() {
        assert_eq!(max_drawdown(&curve_of(&[])), None);
    }

    #[test]
    fn sharpe_undefined_on_zero_volatility() {
        assert_eq!(sharpe_ratio(Some(0.1), Some(0.0), 0.0), None);
        assert_eq!(sharpe_ratio(Some(0.1), None, 0.0), None);
        assert_eq!(sharpe_ratio(None, Some(0.2), 0.0), None);
    }

    #[test]
    fn sharpe_subtracts_risk_free_rate() {
        let s = sharpe_ratio(Some(0.12), Some(0.2), 0.02).unwrap();
        assert!(approx(s, 0.5));
    }

    #[test]
    fn covariance_is_pairwise_complete() {
        let m = matrix(vec![
            ("A", vec![Some(100.0), Some(110.0), Some(99.0), Some(108.9), None]),
            ("B", vec![Some(50.0), Some(55.0), Some(49.5), Some(54.45), Some(60.0)]),
        ]);
        let rets = returns(&m);
        let cov = covariance(&rets);

        // A and B move identically where both are present.
        let cab = cov[0][1].unwrap();
        let caa = cov[0][0].unwrap();
        assert!(approx(cab, caa));
        assert_eq!(cov[0][1], cov[1][0]);
        // B has one more observation than A.
        assert!(cov[1][1].is_some());
    }

    #[test]
    fn covariance_undefined_with_too_few_pairs() {
        let m = matrix(vec![
            ("A", vec![Some(1.0), Some(2.0), None, None]),
            ("B", vec![None, None, Some(3.0), Some(4.0)]),
        ]);
        let rets = returns(&m);
        let cov = covariance(&rets);
        assert_eq!(cov[0][1], None);
        assert_eq!(cov[0][0], None);
    }

    #[test]
    fn single_asset_volatility_matches_scaled_std() {
        let prices = [100.0, 102.0, 101.0, 105.0, 104.0];
        let m = matrix(vec![("A", prices.iter().map(|p| Some(*p)).collect())]);
        let w = normalize(vec![("A", 1.0)]);

        let rets: Vec<f64> = prices.windows(2).map(|p| p[1] / p[0] - 1.0).collect();
        let mean = rets.iter().sum::<f64>() / rets.len() as f64;
        let var = rets.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (rets.len() - 1) as f64;
        let expected = (var * 252.0).sqrt();

        let vol = annualized_volatility(&m, &w, 252).unwrap();
        assert!(approx(vol, expected));
    }

    #[test]
    fn constant_prices_have_zero_volatility() {
        let m = matrix(vec![("A", vec![Some(10.0); 5])]);
        let w = normalize(vec![("A", 1.0)]);
        assert_eq!(annualized_volatility(&m, &w, 252), Some(0.0));
    }

    #[test]
    fn volatility_undefined_without_returns() {
        let w = normalize(vec![("A", 1.0)]);
        assert_eq!(annualized_volatility(&AlignedPriceMatrix::default(), &w, 252), None);

        let single = matrix(vec![("A", vec![Some(10.0)])]);
        assert_eq!(annualized_volatility(&single, &w, 252), None);
    }

    #[test]
    fn volatility_undefined_when_weighted_pair_lacks_overlap() {
        let m = matrix(vec![
            ("A", vec![Some(1.0), Some(2.0), Some(2.5), None, None, None]),
            ("B", vec![None, None, None, Some(3.0), Some(4.0), Some(4.5)]),
        ]);
        let both = normalize(vec![("A", 0.5), ("B", 0.5)]);
        assert_eq!(annualized_volatility(&m, &both, 252), None);

        let only_a = normalize(vec![("A", 1.0), ("B", 0.0)]);
        assert!(annualized_volatility(&m, &only_a, 252).is_some());
    }

    #[test]
    fn diversification_lowers_volatility() {
        let m = matrix(vec![
            ("A", vec![Some(100.0), Some(110.0), Some(100.0), Some(110.0), Some(100.0)]),
            ("B", vec![Some(100.0), Some(90.0), Some(100.0), Some(90.0), Some(100.0)]),
        ]);
        let a_only = annualized_volatility(&m, &normalize(vec![("A", 1.0)]), 252).unwrap();
        let mixed =
            annualized_volatility(&m, &normalize(vec![("A", 0.5), ("B", 0.5)]), 252).unwrap();
        assert!(mixed < a_only);
    }
}
