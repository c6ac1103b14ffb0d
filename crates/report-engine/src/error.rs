//! Error types for report generation

use thiserror::Error;

/// Report engine errors
#[derive(Debug, Error)]
pub enum StockError {
    /// The provider returned no usable rows for the symbol
    #[error("No price data found for {symbol}")]
    DataNotFound {
        symbol: String,
    },

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Chart drawing or encoding failed
    #[error("Chart error: {0}")]
    ChartError(String),

    /// Unknown report variant name
    #[error("Invalid report variant: {0}")]
    InvalidVariant(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Filesystem error while writing the chart
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl StockError {
    /// Build a `DataNotFound` error for `symbol`
    pub fn not_found(symbol: impl Into<String>) -> Self {
        Self::DataNotFound {
            symbol: symbol.into(),
        }
    }

    /// Whether this is the "no data for ticker" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DataNotFound { .. })
    }
}

/// Result type alias for report operations
pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::not_found("PETR4.SA");
        assert_eq!(err.to_string(), "No price data found for PETR4.SA");

        let err = StockError::InvalidVariant("pie".to_string());
        assert_eq!(err.to_string(), "Invalid report variant: pie");
    }

    #[test]
    fn test_is_not_found() {
        assert!(StockError::not_found("X").is_not_found());
        assert!(!StockError::ChartError("boom".to_string()).is_not_found());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StockError = io.into();
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("denied"));
    }
}
