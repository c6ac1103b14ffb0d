//! Price history reports
//!
//! This crate turns a ticker symbol into a small analysis report:
//!
//! - ~2 years of daily OHLCV history from Yahoo Finance
//! - Descriptive statistics over the closing prices (mean, median, sample
//!   standard deviation, min, max, last close)
//! - A PNG chart of the last ~6 months, either candlesticks with volume and
//!   20/50-day moving averages, or a close line with the median and ±1/2/3σ
//!   bands
//! - A plain-language explanation of the chart and numbers
//!
//! # Example
//!
//! ```rust,ignore
//! use report_engine::{AnalysisConfig, AnalysisEngine, ReportVariant};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> report_engine::Result<()> {
//!     let engine = AnalysisEngine::new(Arc::new(AnalysisConfig::default()));
//!
//!     let report = engine.analyze("PETR4.SA", Some(ReportVariant::Candlestick)).await?;
//!     println!("{}", report.explanation);
//!     println!("chart: {}", report.chart_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod explanation;
pub mod series;
pub mod statistics;

// Re-export main types for convenience
pub use api::{PriceHistorySource, Quote, YahooFinanceClient};
pub use chart::{BitmapChartRenderer, ChartRenderer, ChartRequest, chart_file_name, chart_path};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use engine::{AnalysisEngine, AnalysisReport, ReportVariant};
pub use error::{Result, StockError};
pub use explanation::explain;
pub use statistics::{FormattedStatistics, PriceStatistics, format_price};
