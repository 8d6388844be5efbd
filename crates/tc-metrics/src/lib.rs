//! Portfolio risk/return metrics for Theorycrafter.
//!
//! Provides:
//! - Outer-join alignment of per-ticker price histories
//! - Weight normalization with an explicit all-zero fallback
//! - Simple returns and a compounded portfolio value curve
//! - Annualized return, annualized volatility, Sharpe ratio and max drawdown
//! - Pairwise-complete return correlation
//!
//! Everything here is synchronous and pure. Degenerate numeric input yields
//! `None` statistics plus a [`DataStatus`], never an error.

pub mod align;
pub mod correlation;
pub mod curve;
pub mod returns;
pub mod stats;
pub mod weights;

pub use align::{align, compute_aligned_series};
pub use correlation::{correlate, correlate_returns, pearson};
pub use curve::curve;
pub use returns::{returns, simple_return};
pub use stats::{annualized_return, annualized_volatility, covariance, max_drawdown, sharpe_ratio};
pub use weights::{normalize, ZERO_SUM_EPSILON};

use tracing::{debug, info};

use tc_types::{
    DataStatus, MetricsConfig, MetricsError, PortfolioMetrics, PriceSeries, StatisticsResult,
    TcResult, Ticker,
};

/// Stateless calculator tying the pipeline together.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute statistics and correlation for one weighted portfolio.
    ///
    /// Fails only for structurally invalid calls: no price series at all, or
    /// an invalid `config`. Missing or too-short history is reported through
    /// [`PortfolioMetrics::status`] with undefined statistics.
    pub fn compute(
        prices: &[PriceSeries],
        weights: &[(Ticker, f64)],
        config: &MetricsConfig,
    ) -> TcResult<PortfolioMetrics> {
        if prices.is_empty() {
            return Err(MetricsError::NoTickers.into());
        }
        config.validate()?;

        let matrix = align(prices);
        let observations = matrix.row_count();
        if observations == 0 {
            info!(tickers = prices.len(), "no price data for any requested ticker");
            return Ok(PortfolioMetrics::undefined(DataStatus::NoData, 0));
        }

        let rets = returns(&matrix);
        if rets.row_count() == 0 {
            info!(observations, "not enough history to derive returns");
            return Ok(PortfolioMetrics::undefined(
                DataStatus::InsufficientHistory,
                observations,
            ));
        }

        let weights = normalize(weights.iter().cloned());
        let value_curve = curve(&matrix, &weights, config.initial_value);

        let annualized_return = stats::annualized_return(&value_curve, config.periods_per_year);
        let annualized_volatility =
            stats::annualized_volatility(&matrix, &weights, config.periods_per_year);
        let statistics = StatisticsResult {
            annualized_return,
            annualized_volatility,
            sharpe_ratio: sharpe_ratio(annualized_return, annualized_volatility, config.risk_free_rate),
            max_drawdown: max_drawdown(&value_curve),
        };
        let correlation = correlate_returns(&rets);

        debug!(?statistics, observations, "computed portfolio metrics");
        Ok(PortfolioMetrics::new(
            DataStatus::Ok,
            observations,
            statistics,
            correlation,
        ))
    }
}

/// Free-function form of [`MetricsCalculator::compute`].
pub fn compute_metrics(
    prices: &[PriceSeries],
    weights: &[(Ticker, f64)],
    config: &MetricsConfig,
) -> TcResult<PortfolioMetrics> {
    MetricsCalculator::compute(prices, weights, config)
}
