//! Correlation Engine: pairwise Pearson correlation of asset returns.

use tracing::debug;

use tc_types::{AlignedPriceMatrix, CorrelationMatrix, ReturnMatrix};

use crate::returns::returns;
use crate::stats::{finite, pairwise_moments};

/// Decimal places kept in every correlation entry
pub const CORRELATION_DECIMALS: i32 = 4;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Pearson correlation over the rows where both columns have a value.
///
/// `None` with fewer than two shared rows or when either side has zero
/// variance over them.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let (_, cov, var_a, var_b) = pairwise_moments(a, b)?;
    if var_a <= 0.0 || var_b <= 0.0 {
        return None;
    }
    let r = finite(cov / (var_a.sqrt() * var_b.sqrt()))?;
    Some(r.clamp(-1.0, 1.0))
}

/// Correlation matrix of an already-derived return matrix.
pub fn correlate_returns(rets: &ReturnMatrix) -> CorrelationMatrix {
    let n = rets.column_count();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        // The diagonal is pinned to exactly 1 whenever the column varies at all.
        values[i][i] = pearson(rets.column(i), rets.column(i)).map(|_| 1.0);
        for j in (i + 1)..n {
            let r = pearson(rets.column(i), rets.column(j))
                .map(|r| round_to(r, CORRELATION_DECIMALS));
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!(tickers = n, "computed correlation matrix");
    CorrelationMatrix::from_rows(rets.tickers().to_vec(), values).unwrap_or_default()
}

/// Pairwise-complete return correlation for every ticker pair, rounded to
/// four decimals. An empty price matrix yields an empty result.
pub fn correlate(matrix: &AlignedPriceMatrix) -> CorrelationMatrix {
    if matrix.is_empty() {
        return CorrelationMatrix::empty();
    }
    correlate_returns(&returns(matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tc_types::Ticker;

    fn matrix(columns: Vec<(&str, Vec<Option<f64>>)>) -> AlignedPriceMatrix {
        let rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let dates = (0..rows as u64).map(|i| start + chrono::Days::new(i)).collect();
        let (tickers, columns): (Vec<_>, Vec<_>) =
            columns.into_iter().map(|(t, c)| (Ticker::new(t), c)).unzip();
        AlignedPriceMatrix::from_columns(dates, tickers, columns).unwrap()
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().map(|v| Some(*v)).collect()
    }

    fn sample() -> AlignedPriceMatrix {
        matrix(vec![
            ("A", some(&[100.0, 101.0, 99.5, 102.0, 103.5, 101.0, 104.0])),
            ("B", some(&[50.0, 50.8, 49.9, 51.5, 51.9, 50.2, 52.3])),
            ("C", some(&[20.0, 19.7, 20.4, 19.8, 19.5, 20.6, 19.9])),
        ])
    }

    #[test]
    fn diagonal_is_exactly_one() {
        let corr = correlate(&sample());
        for i in 0..corr.len() {
            assert_eq!(corr.at(i, i), Some(1.0));
        }
    }

    #[test]
    fn matrix_is_symmetric_and_bounded() {
        let corr = correlate(&sample());
        for i in 0..corr.len() {
            for j in 0..corr.len() {
                assert_eq!(corr.at(i, j), corr.at(j, i));
                let v = corr.at(i, j).unwrap();
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn entries_are_rounded_to_four_decimals() {
        let corr = correlate(&sample());
        let v = corr.get(&Ticker::new("A"), &Ticker::new("B")).unwrap();
        assert_eq!(v, (v * 10_000.0).round() / 10_000.0);
        assert!(v > 0.9);
        assert!(corr.get(&Ticker::new("A"), &Ticker::new("C")).unwrap() < 0.0);
    }

    #[test]
    fn perfectly_inverse_assets() {
        let m = matrix(vec![
            ("UP", some(&[100.0, 110.0, 99.0, 108.9])),
            ("DOWN", some(&[100.0, 90.0, 99.0, 89.1])),
        ]);
        let corr = correlate(&m);
        assert_eq!(corr.at(0, 1), Some(-1.0));
    }

    #[test]
    fn missing_rows_excluded_per_pair() {
        let m = matrix(vec![
            ("A", vec![Some(100.0), Some(110.0), Some(99.0), Some(108.9), None, Some(100.0)]),
            ("B", some(&[50.0, 55.0, 49.5, 54.45, 60.0, 61.0])),
        ]);
        let corr = correlate(&m);
        assert_eq!(corr.at(0, 1), Some(1.0));
    }

    #[test]
    fn constant_column_has_undefined_entries() {
        let m = matrix(vec![
            ("A", some(&[100.0, 101.0, 99.0])),
            ("FLAT", some(&[10.0, 10.0, 10.0])),
        ]);
        let corr = correlate(&m);
        assert_eq!(corr.at(0, 0), Some(1.0));
        assert_eq!(corr.at(1, 1), None);
        assert_eq!(corr.at(0, 1), None);
    }

    #[test]
    fn empty_matrix_gives_empty_result() {
        assert!(correlate(&AlignedPriceMatrix::default()).is_empty());
    }

    #[test]
    fn pearson_requires_two_pairs() {
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
        assert_eq!(pearson(&[Some(1.0), None], &[Some(2.0), Some(3.0)]), None);
    }
}
