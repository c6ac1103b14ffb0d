//! Configuration for report generation

use crate::engine::ReportVariant;
use crate::error::{Result, StockError};
use report_utils::{EnvError, env_string, env_var};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest history that may be requested (~100 years)
pub const MAX_LOOKBACK_DAYS: u32 = 36_500;

/// Largest chart edge in pixels
pub const MAX_CHART_SIDE: u32 = 10_000;

/// Configuration for the analysis pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Calendar days of history requested, counted back from now
    pub lookback_days: u32,

    /// Maximum number of trailing rows drawn on the chart
    pub chart_window: usize,

    /// Directory charts are written to
    pub output_dir: PathBuf,

    /// Variant used when a request does not ask for one
    pub default_variant: ReportVariant,

    /// Chart size in pixels
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lookback_days: 730,     // ~2 years
            chart_window: 180,      // ~6 months of sessions
            output_dir: PathBuf::from("static"),
            default_variant: ReportVariant::Candlestick,
            chart_width: 1600,
            chart_height: 800,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Overlay `REPORT_*` environment variables on this configuration
    pub fn with_env(self) -> Result<Self> {
        AnalysisConfigBuilder::from(self).with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.lookback_days == 0 || self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(StockError::ConfigError(format!(
                "lookback_days must be between 1 and {MAX_LOOKBACK_DAYS}, got {}",
                self.lookback_days
            )));
        }

        if self.chart_window == 0 {
            return Err(StockError::ConfigError(
                "chart_window must be greater than 0".to_string(),
            ));
        }

        if self.chart_width < 100 || self.chart_height < 100 {
            return Err(StockError::ConfigError(format!(
                "chart size {}x{} is too small",
                self.chart_width, self.chart_height
            )));
        }

        if self.chart_width > MAX_CHART_SIDE || self.chart_height > MAX_CHART_SIDE {
            return Err(StockError::ConfigError(format!(
                "chart size {}x{} exceeds {MAX_CHART_SIDE} px",
                self.chart_width, self.chart_height
            )));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(StockError::ConfigError(
                "output_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    lookback_days: Option<u32>,
    chart_window: Option<usize>,
    output_dir: Option<PathBuf>,
    default_variant: Option<ReportVariant>,
    chart_width: Option<u32>,
    chart_height: Option<u32>,
}

impl From<AnalysisConfig> for AnalysisConfigBuilder {
    fn from(config: AnalysisConfig) -> Self {
        Self {
            lookback_days: Some(config.lookback_days),
            chart_window: Some(config.chart_window),
            output_dir: Some(config.output_dir),
            default_variant: Some(config.default_variant),
            chart_width: Some(config.chart_width),
            chart_height: Some(config.chart_height),
        }
    }
}

impl AnalysisConfigBuilder {
    /// Set the history lookback in calendar days
    pub fn lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = Some(days);
        self
    }

    /// Set how many trailing rows are charted
    pub fn chart_window(mut self, rows: usize) -> Self {
        self.chart_window = Some(rows);
        self
    }

    /// Set the chart output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the default report variant
    pub fn default_variant(mut self, variant: ReportVariant) -> Self {
        self.default_variant = Some(variant);
        self
    }

    /// Set the chart size in pixels
    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = Some(width);
        self.chart_height = Some(height);
        self
    }

    /// Read `REPORT_LOOKBACK_DAYS`, `REPORT_CHART_WINDOW`, `REPORT_OUTPUT_DIR`
    /// and `REPORT_VARIANT` when they are set
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(days) = env_var("REPORT_LOOKBACK_DAYS").map_err(config_error)? {
            self.lookback_days = Some(days);
        }
        if let Some(rows) = env_var("REPORT_CHART_WINDOW").map_err(config_error)? {
            self.chart_window = Some(rows);
        }
        if let Some(dir) = env_string("REPORT_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(dir));
        }
        if let Some(variant) = env_var("REPORT_VARIANT").map_err(config_error)? {
            self.default_variant = Some(variant);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();

        let config = AnalysisConfig {
            lookback_days: self.lookback_days.unwrap_or(defaults.lookback_days),
            chart_window: self.chart_window.unwrap_or(defaults.chart_window),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            default_variant: self.default_variant.unwrap_or(defaults.default_variant),
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
            chart_height: self.chart_height.unwrap_or(defaults.chart_height),
        };

        config.validate()?;
        Ok(config)
    }
}

fn config_error(e: EnvError) -> StockError {
    StockError::ConfigError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.lookback_days, 730);
        assert_eq!(config.chart_window, 180);
        assert_eq!(config.output_dir, PathBuf::from("static"));
        assert_eq!(config.default_variant, ReportVariant::Candlestick);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalysisConfig::builder()
            .lookback_days(365)
            .chart_window(90)
            .output_dir("charts")
            .default_variant(ReportVariant::DeviationBands)
            .chart_size(800, 400)
            .build()
            .unwrap();

        assert_eq!(config.lookback_days, 365);
        assert_eq!(config.chart_window, 90);
        assert_eq!(config.output_dir, PathBuf::from("charts"));
        assert_eq!(config.default_variant, ReportVariant::DeviationBands);
        assert_eq!((config.chart_width, config.chart_height), (800, 400));
    }

    #[test]
    fn test_validation_rejects_zero_window() {
        let config = AnalysisConfig {
            chart_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(AnalysisConfig::builder().lookback_days(0).build().is_err());
    }

    #[test]
    fn test_validation_rejects_tiny_chart() {
        assert!(AnalysisConfig::builder().chart_size(10, 800).build().is_err());
    }

    #[test]
    fn test_validation_rejects_oversized_values() {
        assert!(AnalysisConfig::builder().lookback_days(u32::MAX).build().is_err());
        assert!(
            AnalysisConfig::builder()
                .lookback_days(MAX_LOOKBACK_DAYS + 1)
                .build()
                .is_err()
        );
        assert!(AnalysisConfig::builder().lookback_days(MAX_LOOKBACK_DAYS).build().is_ok());
        assert!(AnalysisConfig::builder().chart_size(1600, 20_000).build().is_err());
        assert!(AnalysisConfig::builder().chart_size(u32::MAX, 800).build().is_err());
    }

    #[test]
    fn test_serialized_variant_uses_query_name() {
        let config = AnalysisConfig::builder()
            .default_variant(ReportVariant::DeviationBands)
            .build()
            .unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["default_variant"], "bandas");
    }

    #[test]
    fn test_builder_from_config_keeps_values() {
        let base = AnalysisConfig::builder().chart_window(42).build().unwrap();
        let rebuilt = AnalysisConfigBuilder::from(base.clone()).build().unwrap();
        assert_eq!(base, rebuilt);
    }
}
