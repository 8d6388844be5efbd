//! Portfolio Curve Builder.

use tracing::debug;

use tc_types::{AlignedPriceMatrix, CurvePoint, PortfolioCurve, WeightVector};

use crate::returns::returns;

/// Compound weighted daily returns into a value curve.
///
/// The first point sits on the earliest aligned date and equals `initial`.
/// Each return row then adds one point: `value[i] = value[i-1] * (1 + r[i])`,
/// where `r[i]` is the weight-sum of that day's returns. A missing per-ticker
/// return contributes zero, so partial-data days still move the curve.
pub fn curve(matrix: &AlignedPriceMatrix, weights: &WeightVector, initial: f64) -> PortfolioCurve {
    let Some(&start) = matrix.dates().iter().min() else {
        return PortfolioCurve::default();
    };

    let rets = returns(matrix);
    let aligned = weights.aligned_to(rets.tickers());

    let mut points = Vec::with_capacity(rets.row_count() + 1);
    points.push(CurvePoint {
        date: start,
        value: initial,
    });

    let mut value = initial;
    for (row, &date) in rets.dates().iter().enumerate() {
        let portfolio_return: f64 = rets
            .row(row)
            .zip(&aligned)
            .map(|(r, w)| r.unwrap_or(0.0) * w)
            .sum();
        value *= 1.0 + portfolio_return;
        points.push(CurvePoint { date, value });
    }

    debug!(points = points.len(), "built portfolio curve");
    PortfolioCurve::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::normalize;
    use chrono::NaiveDate;
    use tc_types::Ticker;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn matrix(columns: Vec<(&str, Vec<Option<f64>>)>) -> AlignedPriceMatrix {
        let rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let dates = (1..=rows as u32).map(d).collect();
        let (tickers, columns): (Vec<_>, Vec<_>) =
            columns.into_iter().map(|(t, c)| (Ticker::new(t), c)).unzip();
        AlignedPriceMatrix::from_columns(dates, tickers, columns).unwrap()
    }

    #[test]
    fn offsetting_assets_hold_the_curve_flat() {
        let m = matrix(vec![
            ("A", vec![Some(100.0), Some(110.0), Some(121.0)]),
            ("B", vec![Some(100.0), Some(90.0), Some(81.0)]),
        ]);
        let w = normalize(vec![("A", 0.5), ("B", 0.5)]);
        let c = curve(&m, &w, 1.0);

        assert_eq!(c.len(), 3);
        assert_eq!(c.dates().collect::<Vec<_>>(), vec![d(1), d(2), d(3)]);
        for value in c.values() {
            assert!((value - 1.0).abs() < 1e-12, "value {value}");
        }
    }

    #[test]
    fn compounding_matches_formula() {
        let m = matrix(vec![("A", vec![Some(100.0), Some(110.0), Some(99.0)])]);
        let w = normalize(vec![("A", 1.0)]);
        let c = curve(&m, &w, 1000.0);

        let values: Vec<f64> = c.values().collect();
        assert_eq!(values[0], 1000.0);
        assert!((values[1] - 1100.0).abs() < 1e-9);
        assert!((values[2] - 990.0).abs() < 1e-9);
    }

    #[test]
    fn missing_returns_contribute_zero() {
        let m = matrix(vec![
            ("A", vec![Some(100.0), None, Some(100.0)]),
            ("B", vec![Some(100.0), Some(120.0), Some(120.0)]),
        ]);
        let w = normalize(vec![("A", 0.5), ("B", 0.5)]);
        let c = curve(&m, &w, 1.0);

        let values: Vec<f64> = c.values().collect();
        assert_eq!(values.len(), 3);
        // Day 2: only B contributes 0.5 * 20%.
        assert!((values[1] - 1.10).abs() < 1e-12);
        // Day 3: A missing on day 2, B flat.
        assert!((values[2] - 1.10).abs() < 1e-12);
    }

    #[test]
    fn unweighted_tickers_contribute_nothing() {
        let m = matrix(vec![
            ("A", vec![Some(100.0), Some(150.0)]),
            ("B", vec![Some(100.0), Some(110.0)]),
        ]);
        let w = normalize(vec![("B", 1.0), ("GHOST", 0.0)]);
        let c = curve(&m, &w, 1.0);
        assert!((c.last().unwrap().value - 1.10).abs() < 1e-12);
    }

    #[test]
    fn empty_matrix_gives_empty_curve() {
        let w = normalize(vec![("A", 1.0)]);
        assert!(curve(&AlignedPriceMatrix::default(), &w, 1.0).is_empty());
    }

    #[test]
    fn single_row_gives_initial_point_only() {
        let m = matrix(vec![("A", vec![Some(100.0)])]);
        let w = normalize(vec![("A", 1.0)]);
        let c = curve(&m, &w, 1.0);
        assert_eq!(c.len(), 1);
        assert_eq!(c.first().unwrap().value, 1.0);
    }
}
