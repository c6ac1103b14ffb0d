//! Analysis result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::StockError;
use crate::statistics::PriceStatistics;

/// Which chart (and explanation) a report is built around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReportVariant {
    /// Candles with volume and 20/50-day moving averages
    #[default]
    #[serde(rename = "candle")]
    Candlestick,
    /// Close line with a 20-day average, the median and ±1/2/3σ bands
    #[serde(rename = "bandas")]
    DeviationBands,
}

impl ReportVariant {
    /// Short name accepted on the query string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candlestick => "candle",
            Self::DeviationBands => "bandas",
        }
    }
}

impl fmt::Display for ReportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportVariant {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "candle" | "candlestick" | "velas" => Ok(Self::Candlestick),
            "bandas" | "bands" | "deviation_bands" | "desvio" => Ok(Self::DeviationBands),
            other => Err(StockError::InvalidVariant(other.to_string())),
        }
    }
}

/// Successful outcome of [`AnalysisEngine::analyze`](super::AnalysisEngine::analyze)
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Uppercase ticker as sent to the provider
    pub symbol: String,
    pub variant: ReportVariant,
    pub statistics: PriceStatistics,
    /// Where the PNG was written
    pub chart_path: PathBuf,
    pub explanation: String,
    /// Rows used for the statistics (after trimming)
    pub data_points: usize,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// File name of the chart, used to build its public URL
    pub fn chart_file_name(&self) -> Option<&str> {
        self.chart_path.file_name().and_then(|name| name.to_str())
    }
}
