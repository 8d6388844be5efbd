//! Return Engine: simple period-over-period returns.

use std::borrow::Cow;

use tc_types::{AlignedPriceMatrix, DatedMatrix, ReturnMatrix};

/// `price[t] / price[t-1] - 1`, or `None` when either price is missing
pub fn simple_return(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let (previous, current) = (previous?, current?);
    if previous == 0.0 {
        return None;
    }
    let r = current / previous - 1.0;
    r.is_finite().then_some(r)
}

/// Derive the return matrix from aligned prices.
///
/// Rows are put in ascending date order before differencing. The leading row
/// has no predecessor and is dropped, as is any row where every ticker's
/// return is missing. Missing cells never borrow a neighbour's price.
pub fn returns(matrix: &AlignedPriceMatrix) -> ReturnMatrix {
    let tickers = matrix.tickers().to_vec();
    if matrix.row_count() < 2 {
        let columns = vec![Vec::new(); tickers.len()];
        return ReturnMatrix::new(
            DatedMatrix::from_columns(Vec::new(), tickers, columns).unwrap_or_default(),
        );
    }

    let prices: Cow<'_, DatedMatrix> = if matrix.is_sorted() {
        Cow::Borrowed(&**matrix)
    } else {
        Cow::Owned(matrix.sorted_by_date())
    };

    let dates = prices.dates()[1..].to_vec();
    let columns: Vec<Vec<Option<f64>>> = (0..prices.column_count())
        .map(|c| {
            prices
                .column(c)
                .windows(2)
                .map(|pair| simple_return(pair[0], pair[1]))
                .collect()
        })
        .collect();

    let full = DatedMatrix::from_columns(dates, tickers, columns).unwrap_or_default();
    ReturnMatrix::new(full.without_missing_rows())
}
