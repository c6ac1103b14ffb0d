//! Market data sources

pub mod yahoo;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use yahoo::YahooFinanceClient;

/// One daily OHLCV row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

impl Quote {
    /// Calendar date of the row (UTC)
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Whether the session closed at or above its open
    pub fn is_gain(&self) -> bool {
        self.close >= self.open
    }
}

/// Anything that can return a daily price history for a symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    /// Daily rows between `start` and `end`. An unknown symbol may yield
    /// either an empty vector or an error.
    async fn daily_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>>;
}
