//! Descriptive statistics over a closing-price series

use serde::{Deserialize, Serialize};

/// Summary of a closing-price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStatistics {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Close of the final row
    pub last_close: f64,
}

impl PriceStatistics {
    /// Compute statistics from closes in chronological order.
    ///
    /// Returns `None` for an empty slice. A single value has a standard
    /// deviation of zero.
    pub fn from_closes(closes: &[f64]) -> Option<Self> {
        let last_close = *closes.last()?;
        let count = closes.len();

        let mean = closes.iter().sum::<f64>() / count as f64;
        let min = closes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut sorted = closes.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        let std_dev = if count > 1 {
            let variance =
                closes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        } else {
            0.0
        };

        Some(Self {
            mean,
            median,
            std_dev,
            min,
            max,
            last_close,
        })
    }

    /// Whether the last close sits strictly above the mean
    pub fn is_above_mean(&self) -> bool {
        self.last_close > self.mean
    }

    /// `mean + k * std_dev`
    pub fn band(&self, k: f64) -> f64 {
        self.mean + k * self.std_dev
    }

    /// All six values rendered with two decimals
    pub fn formatted(&self) -> FormattedStatistics {
        FormattedStatistics {
            mean: format_price(self.mean),
            median: format_price(self.median),
            std_dev: format_price(self.std_dev),
            min: format_price(self.min),
            max: format_price(self.max),
            last_close: format_price(self.last_close),
        }
    }
}

/// Statistics as two-decimal strings, keyed the way the public API exposes them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedStatistics {
    #[serde(rename = "media")]
    pub mean: String,
    #[serde(rename = "mediana")]
    pub median: String,
    #[serde(rename = "desvio_padrao")]
    pub std_dev: String,
    #[serde(rename = "minimo")]
    pub min: String,
    #[serde(rename = "maximo")]
    pub max: String,
    #[serde(rename = "ultimo_valor")]
    pub last_close: String,
}

/// Format a value with exactly two decimal digits
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}
