//! Weight Normalizer.

use tracing::debug;

use tc_types::{Ticker, WeightVector};

/// Added to every weight when the raw weights sum to exactly zero, turning an
/// all-zero request into a near-uniform allocation instead of a division by
/// zero.
pub const ZERO_SUM_EPSILON: f64 = 1e-12;

/// Scale raw weights so they sum to 1.
///
/// Non-negativity is the caller's job. A ticker given twice keeps its last
/// weight.
pub fn normalize<I, T>(weights: I) -> WeightVector
where
    I: IntoIterator<Item = (T, f64)>,
    T: Into<Ticker>,
{
    let raw = WeightVector::from_pairs(
        weights.into_iter().map(|(t, w)| (t.into(), w)).collect(),
    );

    let mut entries: Vec<(Ticker, f64)> = raw.iter().map(|(t, w)| (t.clone(), w)).collect();
    let mut total = raw.sum();
    if total == 0.0 {
        debug!(count = entries.len(), "all weights zero, applying epsilon fallback");
        for entry in &mut entries {
            entry.1 += ZERO_SUM_EPSILON;
        }
        total = ZERO_SUM_EPSILON * entries.len() as f64;
    }

    WeightVector::from_pairs(
        entries
            .into_iter()
            .map(|(t, w)| (t, w / total))
            .collect(),
    )
}
