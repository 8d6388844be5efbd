//! Date-indexed matrices with an explicit missing marker per cell.
//!
//! Storage is column-major: one `Vec<Option<f64>>` per ticker, all columns the
//! same length as the date axis. `None` means "no observation", never a NaN.

use chrono::NaiveDate;
use std::ops::Deref;

use crate::errors::{MetricsError, TcResult};
use crate::market::Ticker;

/// Dates × tickers table shared by the price and return matrices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatedMatrix {
    dates: Vec<NaiveDate>,
    tickers: Vec<Ticker>,
    columns: Vec<Vec<Option<f64>>>,
}

impl DatedMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a date axis and one column per ticker.
    ///
    /// Rows are taken as given; no ordering is enforced here.
    pub fn from_columns(
        dates: Vec<NaiveDate>,
        tickers: Vec<Ticker>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> TcResult<Self> {
        if tickers.len() != columns.len() {
            return Err(MetricsError::ShapeMismatch {
                what: "column count".to_string(),
                expected: tickers.len(),
                actual: columns.len(),
            }
            .into());
        }
        for column in &columns {
            if column.len() != dates.len() {
                return Err(MetricsError::ShapeMismatch {
                    what: "column length".to_string(),
                    expected: dates.len(),
                    actual: column.len(),
                }
                .into());
            }
        }
        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn row_count(&self) -> usize {
        self.dates.len()
    }

    pub fn column_count(&self) -> usize {
        self.tickers.len()
    }

    /// True when there is no row or no column to work with
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.tickers.is_empty()
    }

    pub fn column(&self, idx: usize) -> &[Option<f64>] {
        &self.columns[idx]
    }

    pub fn position(&self, ticker: &Ticker) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    pub fn column_of(&self, ticker: &Ticker) -> Option<&[Option<f64>]> {
        self.position(ticker).map(|idx| self.column(idx))
    }

    pub fn columns(&self) -> impl Iterator<Item = (&Ticker, &[Option<f64>])> {
        self.tickers
            .iter()
            .zip(self.columns.iter().map(|c| c.as_slice()))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.columns.get(col).and_then(|c| c.get(row).copied().flatten())
    }

    pub fn row(&self, row: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.columns.iter().map(move |c| c[row])
    }

    pub fn is_row_missing(&self, row: usize) -> bool {
        self.columns.iter().all(|c| c[row].is_none())
    }

    /// Strictly ascending, duplicate-free date axis
    pub fn is_sorted(&self) -> bool {
        self.dates.windows(2).all(|w| w[0] < w[1])
    }

    /// Copy with rows stably reordered by ascending date
    pub fn sorted_by_date(&self) -> Self {
        let mut order: Vec<usize> = (0..self.dates.len()).collect();
        order.sort_by_key(|&i| self.dates[i]);
        self.select_rows(&order)
    }

    /// Drop every row in which all columns are missing
    pub fn without_missing_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.dates.len())
            .filter(|&i| !self.is_row_missing(i))
            .collect();
        self.select_rows(&keep)
    }

    fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            dates: rows.iter().map(|&i| self.dates[i]).collect(),
            tickers: self.tickers.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| rows.iter().map(|&i| c[i]).collect())
                .collect(),
        }
    }
}

/// Prices from every input series on the union of their dates.
///
/// Column order follows the input ticker order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedPriceMatrix(DatedMatrix);

impl AlignedPriceMatrix {
    pub fn new(inner: DatedMatrix) -> Self {
        Self(inner)
    }

    pub fn from_columns(
        dates: Vec<NaiveDate>,
        tickers: Vec<Ticker>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> TcResult<Self> {
        DatedMatrix::from_columns(dates, tickers, columns).map(Self)
    }
}

impl Deref for AlignedPriceMatrix {
    type Target = DatedMatrix;

    fn deref(&self) -> &DatedMatrix {
        &self.0
    }
}

/// Simple period-over-period returns derived from an [`AlignedPriceMatrix`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnMatrix(DatedMatrix);

impl ReturnMatrix {
    pub fn new(inner: DatedMatrix) -> Self {
        Self(inner)
    }
}

impl Deref for ReturnMatrix {
    type Target = DatedMatrix;

    fn deref(&self) -> &DatedMatrix {
        &self.0
    }
}
