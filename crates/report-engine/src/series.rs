//! Shaping of the raw provider rows before analysis

use ta::{Next, indicators::SimpleMovingAverage};

use crate::api::Quote;
use crate::error::{Result, StockError};

/// Put provider rows into analysis shape.
///
/// Rows are sorted by timestamp, rows without a finite close are dropped,
/// duplicate timestamps keep the last row seen, and the final row is removed
/// since it may be a session that is still trading.
pub fn normalize(mut quotes: Vec<Quote>) -> Vec<Quote> {
    quotes.retain(|q| q.close.is_finite());
    quotes.sort_by_key(|q| q.timestamp);

    let mut rows: Vec<Quote> = Vec::with_capacity(quotes.len());
    for quote in quotes {
        match rows.last_mut() {
            Some(prev) if prev.timestamp == quote.timestamp => *prev = quote,
            _ => rows.push(quote),
        }
    }

    rows.pop();
    rows
}

/// The most recent `len` rows (or all of them when shorter)
pub fn trailing_window(quotes: &[Quote], len: usize) -> &[Quote] {
    &quotes[quotes.len().saturating_sub(len)..]
}

/// Closing prices in row order
pub fn closes(quotes: &[Quote]) -> Vec<f64> {
    quotes.iter().map(|q| q.close).collect()
}

/// Simple moving average aligned with `values`.
///
/// Entries before the window first fills are `None`.
pub fn simple_moving_average(values: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut sma =
        SimpleMovingAverage::new(period).map_err(|e| StockError::Other(e.to_string()))?;

    Ok(values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let avg = sma.next(value);
            (i + 1 >= period).then_some(avg)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn quote(day: i64, close: f64) -> Quote {
        let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        Quote {
            symbol: "TEST".to_string(),
            timestamp: base + Duration::days(day),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
            adjclose: close,
        }
    }

    fn base_day() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_normalize_drops_final_row() {
        let rows = normalize(vec![quote(0, 1.0), quote(1, 2.0), quote(2, 3.0)]);
        assert_eq!(closes(&rows), vec![1.0, 2.0]);
    }

    #[test]
    fn test_normalize_sorts_and_dedupes() {
        let rows = normalize(vec![
            quote(2, 3.0),
            quote(0, 1.0),
            quote(1, 2.0),
            quote(1, 2.5),
            quote(3, 4.0),
        ]);
        assert_eq!(closes(&rows), vec![1.0, 2.5, 3.0]);
        assert_eq!(rows[0].timestamp, base_day());
    }

    #[test]
    fn test_normalize_skips_non_finite_closes() {
        let rows = normalize(vec![quote(0, 1.0), quote(1, f64::NAN), quote(2, 3.0), quote(3, 4.0)]);
        assert_eq!(closes(&rows), vec![1.0, 3.0]);
    }

    #[test]
    fn test_normalize_single_row_is_empty() {
        assert!(normalize(vec![quote(0, 1.0)]).is_empty());
        assert!(normalize(Vec::new()).is_empty());
    }

    #[test]
    fn test_trailing_window() {
        let rows: Vec<Quote> = (0..400).map(|d| quote(d, d as f64)).collect();
        let window = trailing_window(&rows, 180);
        assert_eq!(window.len(), 180);
        assert_eq!(window[0].close, 220.0);
        assert_eq!(window[179].close, 399.0);

        let short = trailing_window(&rows[..10], 180);
        assert_eq!(short.len(), 10);
    }

    #[test]
    fn test_simple_moving_average_warmup() {
        let sma = simple_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(sma.len(), 5);
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert!((sma[2].unwrap() - 2.0).abs() < 1e-9);
        assert!((sma[4].unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_simple_moving_average_longer_than_series() {
        let sma = simple_moving_average(&[1.0, 2.0], 50).unwrap();
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn test_simple_moving_average_rejects_zero_period() {
        assert!(simple_moving_average(&[1.0], 0).is_err());
    }
}
