use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

use tc_types::{DataError, PriceSeries, TcResult, Ticker};

use crate::providers::PriceHistoryProvider;

/// Fetches one price series per requested ticker from a provider.
#[derive(Debug, Clone)]
pub struct PriceHistoryLoader {
    provider: Arc<dyn PriceHistoryProvider>,
}

impl PriceHistoryLoader {
    pub fn new(provider: Arc<dyn PriceHistoryProvider>) -> Self {
        Self { provider }
    }

    /// Load the inclusive `[start, end]` history of every ticker.
    ///
    /// Output order follows `tickers`, with repeats removed. A provider failure
    /// for one ticker is logged and turned into an empty series so the other
    /// tickers still load.
    pub async fn load(
        &self,
        tickers: &[Ticker],
        start: NaiveDate,
        end: NaiveDate,
    ) -> TcResult<Vec<PriceSeries>> {
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }

        let mut out: Vec<PriceSeries> = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            if out.iter().any(|s| &s.ticker == ticker) {
                continue;
            }
            let series = match self.provider.fetch_price_history(ticker, start, end).await {
                Ok(series) => series,
                Err(e) => {
                    warn!(%ticker, provider = self.provider.name(), "price history fetch failed: {}", e);
                    PriceSeries::new(ticker.clone())
                }
            };
            out.push(series);
        }

        let empty = out.iter().filter(|s| s.is_empty()).count();
        info!(
            provider = self.provider.name(),
            tickers = out.len(),
            empty,
            %start,
            %end,
            "loaded price histories"
        );
        Ok(out)
    }
}
