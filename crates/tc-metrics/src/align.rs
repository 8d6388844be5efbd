//! Series Aligner: outer-join price series on date.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use tc_types::{AlignedPriceMatrix, AlignedSeries, DatedMatrix, PriceSeries, Ticker};

/// Merge per-ticker series into one dates × tickers matrix.
///
/// Every date seen by any series becomes a row; gaps stay missing. Rows in
/// which no ticker has a price are dropped. Columns follow input order, and a
/// ticker supplied twice keeps its first series.
pub fn align(series: &[PriceSeries]) -> AlignedPriceMatrix {
    let mut tickers: Vec<Ticker> = Vec::with_capacity(series.len());
    let mut inputs: Vec<&PriceSeries> = Vec::with_capacity(series.len());
    for s in series {
        if tickers.contains(&s.ticker) {
            warn!(ticker = %s.ticker, "duplicate ticker in alignment input, keeping first series");
            continue;
        }
        tickers.push(s.ticker.clone());
        inputs.push(s);
    }

    // Only dates carrying a price are collected, so no all-missing row can appear.
    let dates: Vec<NaiveDate> = inputs
        .iter()
        .flat_map(|s| s.dates().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns: Vec<Vec<Option<f64>>> = inputs
        .iter()
        .map(|s| dates.iter().map(|d| s.get(d)).collect())
        .collect();

    debug!(rows = dates.len(), columns = tickers.len(), "aligned price series");

    AlignedPriceMatrix::new(DatedMatrix::from_columns(dates, tickers, columns).unwrap_or_default())
}

/// Aligned raw prices for chart display.
pub fn compute_aligned_series(series: &[PriceSeries]) -> AlignedSeries {
    let matrix = align(series);
    if matrix.row_count() == 0 {
        return AlignedSeries::default();
    }
    AlignedSeries {
        dates: matrix.dates().to_vec(),
        series: matrix
            .columns()
            .map(|(ticker, values)| (ticker.clone(), values.to_vec()))
            .collect(),
    }
}
