//! Request and response bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tc_types::{
    validation_error, CorrelationMatrix, DataStatus, MetricsConfig, PortfolioMetrics, TcResult,
    Ticker,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortfolioWeight {
    pub ticker: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsRequest {
    pub weights: Vec<PortfolioWeight>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub risk_free_rate: Option<f64>,
    #[serde(default)]
    pub periods_per_year: Option<u32>,
    #[serde(default)]
    pub initial_value: Option<f64>,
}

impl MetricsRequest {
    /// Reject structurally invalid requests before any data is fetched.
    pub fn validate(&self) -> TcResult<()> {
        if self.weights.is_empty() {
            return Err(validation_error!("at least one ticker weight is required"));
        }
        for w in &self.weights {
            if w.ticker.trim().is_empty() {
                return Err(validation_error!("ticker must not be blank"));
            }
            if !w.weight.is_finite() || w.weight < 0.0 {
                return Err(validation_error!(
                    "weight for {} must be a finite non-negative number, got {}",
                    w.ticker,
                    w.weight
                ));
            }
        }
        Ok(())
    }

    pub fn tickers(&self) -> Vec<Ticker> {
        self.weights.iter().map(|w| Ticker::new(w.ticker.trim())).collect()
    }

    pub fn weight_pairs(&self) -> Vec<(Ticker, f64)> {
        self.weights
            .iter()
            .map(|w| (Ticker::new(w.ticker.trim()), w.weight))
            .collect()
    }

    /// Request overrides layered over the service defaults
    pub fn metrics_config(&self, defaults: &MetricsConfig) -> MetricsConfig {
        let mut config = defaults.clone();
        if let Some(rf) = self.risk_free_rate {
            config = config.with_risk_free_rate(rf);
        }
        if let Some(ppy) = self.periods_per_year {
            config = config.with_periods_per_year(ppy);
        }
        if let Some(initial) = self.initial_value {
            config = config.with_initial_value(initial);
        }
        config
    }
}

/// Metrics as the frontend consumes them. Undefined values are `null`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    pub annual_return: Option<f64>,
    pub annual_vol: Option<f64>,
    pub sharpe: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub correlation: CorrelationMatrix,
    pub status: DataStatus,
    pub observations: usize,
}

impl From<PortfolioMetrics> for MetricsResponse {
    fn from(m: PortfolioMetrics) -> Self {
        Self {
            annual_return: m.statistics.annualized_return,
            annual_vol: m.statistics.annualized_volatility,
            sharpe: m.statistics.sharpe_ratio,
            max_drawdown: m.statistics.max_drawdown,
            correlation: m.correlation,
            status: m.status,
            observations: m.observations,
        }
    }
}

/// `/prices` body. Every field is optional; anything missing yields an empty
/// response rather than an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricesRequest {
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl PricesRequest {
    /// Tickers and date range, or `None` when the request is incomplete
    pub fn parts(&self) -> TcResult<Option<(Vec<Ticker>, NaiveDate, NaiveDate)>> {
        let tickers: Vec<Ticker> = self
            .tickers
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(Ticker::new)
            .collect();
        let (Some(start), Some(end)) = (self.start.as_deref(), self.end.as_deref()) else {
            return Ok(None);
        };
        if tickers.is_empty() || start.trim().is_empty() || end.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some((tickers, parse_day(start)?, parse_day(end)?)))
    }
}

fn parse_day(raw: &str) -> TcResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| validation_error!("invalid date {:?}, expected YYYY-MM-DD", raw))
}
