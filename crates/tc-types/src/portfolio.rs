use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::market::Ticker;

/// Per-ticker portfolio weights, in caller order.
///
/// Once produced by the normalizer the weights are non-negative and sum to 1.
/// Tickers with no entry weigh zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightVector {
    weights: Vec<(Ticker, f64)>,
}

impl WeightVector {
    /// Build from `(ticker, weight)` pairs. A repeated ticker keeps its last value.
    pub fn from_pairs(weights: Vec<(Ticker, f64)>) -> Self {
        let mut out: Vec<(Ticker, f64)> = Vec::with_capacity(weights.len());
        for (ticker, weight) in weights {
            match out.iter_mut().find(|(t, _)| *t == ticker) {
                Some(slot) => slot.1 = weight,
                None => out.push((ticker, weight)),
            }
        }
        Self { weights: out }
    }

    pub fn get(&self, ticker: &Ticker) -> f64 {
        self.weights
            .iter()
            .find(|(t, _)| t == ticker)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, f64)> {
        self.weights.iter().map(|(t, w)| (t, *w))
    }

    /// Weights reordered to match `tickers`; absent tickers get 0
    pub fn aligned_to(&self, tickers: &[Ticker]) -> Vec<f64> {
        tickers.iter().map(|t| self.get(t)).collect()
    }
}

/// A single dated value on the portfolio curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Compounded portfolio value through time, ascending by date
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioCurve {
    pub points: Vec<CurvePoint>,
}

impl PortfolioCurve {
    pub fn new(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&CurvePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&CurvePoint> {
        self.points.last()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }
}
