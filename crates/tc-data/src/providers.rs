use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use csv::ReaderBuilder;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use tc_types::{is_valid_price, DataError, PriceSeries, TcResult, Ticker};

/// Trait for price-history sources (CSV files, synthetic data, memory, ...)
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync + std::fmt::Debug {
    /// Check if this provider can produce data for the given ticker
    fn supports_ticker(&self, ticker: &Ticker) -> bool;

    /// Closing prices for the inclusive `[start, end]` range.
    ///
    /// A ticker with no data in range yields an empty series, not an error.
    async fn fetch_price_history(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TcResult<PriceSeries>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Get provider configuration
    fn config(&self) -> serde_json::Value;
}

/// Reads one CSV file of daily closes per ticker.
///
/// Files need a date column (`Date`, `date`, `timestamp`, ...) and a close
/// column. An adjusted close column wins over a raw close when both exist.
#[derive(Debug)]
pub struct CsvPriceProvider {
    pub name: String,
    pub data_directory: PathBuf,
    pub file_pattern: String,
}

impl CsvPriceProvider {
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Self {
        Self {
            name: "CSV Provider".to_string(),
            data_directory: data_directory.as_ref().to_path_buf(),
            file_pattern: "{ticker}.csv".to_string(),
        }
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.file_pattern = pattern.to_string();
        self
    }

    fn file_path(&self, ticker: &Ticker) -> PathBuf {
        let filename = self.file_pattern.replace("{ticker}", ticker.as_str());
        self.data_directory.join(filename)
    }

    /// Parse CSV text into a series, keeping rows inside `[start, end]`.
    pub fn parse_csv(
        ticker: &Ticker,
        contents: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TcResult<PriceSeries> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DataError::ParseError {
                message: format!("Failed to read CSV headers: {}", e),
            })?
            .clone();
        let (date_idx, close_idx) = detect_columns(&headers)?;

        let mut series = PriceSeries::new(ticker.clone());
        for (line_num, result) in reader.records().enumerate() {
            let line = line_num + 2;
            let record = result.map_err(|e| DataError::ParseError {
                message: format!("Failed to read CSV record at line {}: {}", line, e),
            })?;

            let date = parse_date(record.get(date_idx).unwrap_or(""))?;
            if date < start || date > end {
                continue;
            }

            let raw = record.get(close_idx).unwrap_or("");
            if raw.is_empty() {
                warn!(%ticker, line, "skipping row with empty close");
                continue;
            }
            let price: f64 = raw.parse().map_err(|e| DataError::ParseError {
                message: format!("Could not parse close value '{}' at line {}: {}", raw, line, e),
            })?;
            if !is_valid_price(price) {
                warn!(%ticker, line, price, "skipping row with non-positive close");
                continue;
            }
            series.insert(date, price)?;
        }

        Ok(series)
    }
}

fn detect_columns(headers: &csv::StringRecord) -> TcResult<(usize, usize)> {
    let mut date_idx = None;
    let mut close_idx = None;
    let mut adj_close_idx = None;

    for (i, header) in headers.iter().enumerate() {
        match header.to_lowercase().as_str() {
            "date" | "timestamp" | "datetime" | "time" => date_idx = Some(i),
            "close" | "close_price" => close_idx = Some(i),
            "adj close" | "adj_close" | "adjclose" | "adjusted_close" => adj_close_idx = Some(i),
            _ => {}
        }
    }

    let date_idx = date_idx.ok_or_else(|| DataError::ParseError {
        message: "Could not find date column in CSV headers".to_string(),
    })?;
    let close_idx = adj_close_idx.or(close_idx).ok_or_else(|| DataError::ParseError {
        message: "Could not find close column in CSV headers".to_string(),
    })?;
    Ok((date_idx, close_idx))
}

fn parse_date(value: &str) -> TcResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.date());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y/%m/%d") {
        return Ok(date);
    }
    Err(DataError::ParseError {
        message: format!("Could not parse date: {}", value),
    }
    .into())
}

#[async_trait]
impl PriceHistoryProvider for CsvPriceProvider {
    fn supports_ticker(&self, ticker: &Ticker) -> bool {
        self.file_path(ticker).exists()
    }

    async fn fetch_price_history(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TcResult<PriceSeries> {
        let path = self.file_path(ticker);
        if !path.exists() {
            debug!(%ticker, path = %path.display(), "no CSV file for ticker");
            return Ok(PriceSeries::new(ticker.clone()));
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let series = Self::parse_csv(ticker, &contents, start, end)?;
        info!(%ticker, points = series.len(), "loaded CSV price history");
        Ok(series)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "csv",
            "directory": self.data_directory,
            "pattern": self.file_pattern
        })
    }
}

/// Deterministic synthetic closes for demos and local runs.
///
/// Each ticker walks from 1990-01-01 with its own seed, so a given date always
/// has the same price whatever range is requested. Dates before the origin have
/// no data. Crypto pairs
/// (`*-USD`) trade every day; everything else trades on weekdays only.
#[derive(Debug)]
pub struct SampleDataProvider {
    pub name: String,
}

const SAMPLE_TICKERS: &[&str] = &["AAPL", "GOOGL", "MSFT", "TSLA", "SPY", "BTC-USD", "ETH-USD"];

impl SampleDataProvider {
    pub fn new() -> Self {
        Self {
            name: "Sample Data Provider".to_string(),
        }
    }

    /// First session of every synthetic history; nothing is generated before it.
    fn origin() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default()
    }

    fn seed(ticker: &Ticker) -> u64 {
        // FNV-1a
        ticker
            .as_str()
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3))
    }

    fn trades_on(ticker: &Ticker, date: NaiveDate) -> bool {
        ticker.as_str().ends_with("-USD") || !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    fn starting_price(ticker: &Ticker) -> f64 {
        match ticker.as_str() {
            "AAPL" => 150.0,
            "GOOGL" => 2500.0,
            "MSFT" => 300.0,
            "TSLA" => 800.0,
            "SPY" => 400.0,
            "BTC-USD" => 45000.0,
            "ETH-USD" => 3000.0,
            _ => 100.0,
        }
    }
}

impl Default for SampleDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceHistoryProvider for SampleDataProvider {
    fn supports_ticker(&self, ticker: &Ticker) -> bool {
        SAMPLE_TICKERS.contains(&ticker.as_str())
    }

    async fn fetch_price_history(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TcResult<PriceSeries> {
        let mut series = PriceSeries::new(ticker.clone());
        if !self.supports_ticker(ticker) || start > end {
            return Ok(series);
        }

        let mut rng = ChaCha8Rng::seed_from_u64(Self::seed(ticker));
        let mut price = Self::starting_price(ticker);
        let mut date = Self::origin();

        while date <= end {
            if Self::trades_on(ticker, date) {
                // Random walk: ±2% per session with a slight upward drift.
                let change: f64 = rng.gen_range(-0.02..0.02) + 0.0003;
                price *= 1.0 + change;
                if date >= start {
                    series.insert(date, price)?;
                }
            }
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(series)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "sample",
            "supported_tickers": SAMPLE_TICKERS
        })
    }
}

/// In-memory provider backed by pre-built series
#[derive(Debug, Default)]
pub struct StaticPriceProvider {
    series: HashMap<Ticker, PriceSeries>,
}

impl StaticPriceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.series.insert(series.ticker.clone(), series);
        self
    }
}

#[async_trait]
impl PriceHistoryProvider for StaticPriceProvider {
    fn supports_ticker(&self, ticker: &Ticker) -> bool {
        self.series.contains_key(ticker)
    }

    async fn fetch_price_history(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> TcResult<PriceSeries> {
        Ok(self
            .series
            .get(ticker)
            .map(|s| s.window(start, end))
            .unwrap_or_else(|| PriceSeries::new(ticker.clone())))
    }

    fn name(&self) -> &str {
        "Static Provider"
    }

    fn config(&self) -> serde_json::Value {
        let mut tickers: Vec<&str> = self.series.keys().map(|t| t.as_str()).collect();
        tickers.sort_unstable();
        serde_json::json!({
            "type": "static",
            "tickers": tickers
        })
    }
}
