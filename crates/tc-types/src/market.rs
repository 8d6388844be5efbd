use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{DataError, TcResult};

/// Identifier of a tradable asset (e.g. `AAPL`, `BTC-USD`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(ticker: &str) -> Self {
        Self(ticker.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Daily closing prices for one ticker, keyed by calendar date.
///
/// Dates are unique and iterate in ascending order. Every stored price is
/// finite and strictly positive; an empty series means the source had no data
/// in the requested range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: Ticker,
    prices: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<Ticker>) -> Self {
        Self {
            ticker: ticker.into(),
            prices: BTreeMap::new(),
        }
    }

    /// Build a series from `(date, price)` pairs. Later duplicates overwrite
    /// earlier ones.
    pub fn from_points<I>(ticker: impl Into<Ticker>, points: I) -> TcResult<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut series = Self::new(ticker);
        for (date, price) in points {
            series.insert(date, price)?;
        }
        Ok(series)
    }

    /// Insert a closing price, returning the previous price for that date.
    pub fn insert(&mut self, date: NaiveDate, price: f64) -> TcResult<Option<f64>> {
        if !is_valid_price(price) {
            return Err(DataError::InvalidPrice {
                ticker: self.ticker.to_string(),
                date: date.to_string(),
                price,
            }
            .into());
        }
        Ok(self.prices.insert(date, price))
    }

    pub fn get(&self, date: &NaiveDate) -> Option<f64> {
        self.prices.get(date).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.prices.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.prices.keys().next_back().copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.prices.keys()
    }

    /// Points in ascending date order
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &f64)> {
        self.prices.iter()
    }

    /// Restrict to the inclusive `[start, end]` window. A reversed window is
    /// empty.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> Self {
        if start > end {
            return Self::new(self.ticker.clone());
        }
        Self {
            ticker: self.ticker.clone(),
            prices: self
                .prices
                .range(start..=end)
                .map(|(d, p)| (*d, *p))
                .collect(),
        }
    }
}

pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
