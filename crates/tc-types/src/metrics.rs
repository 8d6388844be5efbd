use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::errors::{MetricsError, TcResult};
use crate::market::Ticker;

/// Trading days per year used for annualization
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 252;

/// Parameters for a single metrics computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Starting value of the portfolio curve.
    pub initial_value: f64,
    pub periods_per_year: u32,
    /// Annual risk-free rate subtracted in the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            initial_value: 1.0,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            risk_free_rate: 0.0,
        }
    }
}

impl MetricsConfig {
    pub fn with_initial_value(mut self, initial_value: f64) -> Self {
        self.initial_value = initial_value;
        self
    }

    pub fn with_periods_per_year(mut self, periods_per_year: u32) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    pub fn validate(&self) -> TcResult<()> {
        if self.periods_per_year == 0 {
            return Err(MetricsError::InvalidConfig {
                message: "periods_per_year must be positive".to_string(),
            }
            .into());
        }
        if !self.initial_value.is_finite() || self.initial_value <= 0.0 {
            return Err(MetricsError::InvalidConfig {
                message: format!("initial_value must be finite and positive, got {}", self.initial_value),
            }
            .into());
        }
        if !self.risk_free_rate.is_finite() {
            return Err(MetricsError::InvalidConfig {
                message: "risk_free_rate must be finite".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// How much usable history backed a computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    Ok,
    /// No ticker produced a single usable row.
    NoData,
    /// Fewer than two aligned rows, so no return could be derived.
    InsufficientHistory,
}

/// Portfolio statistics. `None` marks a value that could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub annualized_return: Option<f64>,
    pub annualized_volatility: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<f64>,
}

impl StatisticsResult {
    pub fn undefined() -> Self {
        Self::default()
    }

    pub fn is_undefined(&self) -> bool {
        self.annualized_return.is_none()
            && self.annualized_volatility.is_none()
            && self.sharpe_ratio.is_none()
            && self.max_drawdown.is_none()
    }
}

/// Symmetric ticker × ticker correlation table.
///
/// Serializes as a nested map keyed by ticker, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationMatrix {
    tickers: Vec<Ticker>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(tickers: Vec<Ticker>, values: Vec<Vec<Option<f64>>>) -> TcResult<Self> {
        let n = tickers.len();
        if values.len() != n {
            return Err(MetricsError::ShapeMismatch {
                what: "correlation rows".to_string(),
                expected: n,
                actual: values.len(),
            }
            .into());
        }
        if let Some(row) = values.iter().find(|row| row.len() != n) {
            return Err(MetricsError::ShapeMismatch {
                what: "correlation row length".to_string(),
                expected: n,
                actual: row.len(),
            }
            .into());
        }
        Ok(Self { tickers, values })
    }

    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn at(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j).copied().flatten())
    }

    pub fn get(&self, a: &Ticker, b: &Ticker) -> Option<f64> {
        let i = self.tickers.iter().position(|t| t == a)?;
        let j = self.tickers.iter().position(|t| t == b)?;
        self.at(i, j)
    }
}

struct CorrelationRow<'a> {
    tickers: &'a [Ticker],
    values: &'a [Option<f64>],
}

impl Serialize for CorrelationRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tickers.len()))?;
        for (ticker, value) in self.tickers.iter().zip(self.values) {
            map.serialize_entry(ticker, value)?;
        }
        map.end()
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tickers.len()))?;
        for (ticker, row) in self.tickers.iter().zip(&self.values) {
            map.serialize_entry(
                ticker,
                &CorrelationRow {
                    tickers: &self.tickers,
                    values: row,
                },
            )?;
        }
        map.end()
    }
}

/// Full output of one metrics request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    pub id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub status: DataStatus,
    /// Number of aligned price rows that backed the computation.
    pub observations: usize,
    pub statistics: StatisticsResult,
    pub correlation: CorrelationMatrix,
}

impl PortfolioMetrics {
    pub fn new(
        status: DataStatus,
        observations: usize,
        statistics: StatisticsResult,
        correlation: CorrelationMatrix,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            computed_at: Utc::now(),
            status,
            observations,
            statistics,
            correlation,
        }
    }

    /// Result carrying no statistics at all
    pub fn undefined(status: DataStatus, observations: usize) -> Self {
        Self::new(
            status,
            observations,
            StatisticsResult::undefined(),
            CorrelationMatrix::empty(),
        )
    }
}

/// Aligned raw prices for chart display, independent of any weighting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSeries {
    pub dates: Vec<NaiveDate>,
    pub series: Vec<(Ticker, Vec<Option<f64>>)>,
}

impl AlignedSeries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, ticker: &Ticker) -> Option<&[Option<f64>]> {
        self.series
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|(_, values)| values.as_slice())
    }
}

struct OrderedSeries<'a>(&'a [(Ticker, Vec<Option<f64>>)]);

impl Serialize for OrderedSeries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (ticker, values) in self.0 {
            map.serialize_entry(ticker, values)?;
        }
        map.end()
    }
}

impl Serialize for AlignedSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AlignedSeries", 2)?;
        state.serialize_field("dates", &self.dates)?;
        state.serialize_field("series", &OrderedSeries(&self.series))?;
        state.end()
    }
}
