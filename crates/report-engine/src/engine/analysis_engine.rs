//! Fetch → statistics → chart → explanation pipeline

use chrono::{Duration, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::result::{AnalysisReport, ReportVariant};
use crate::api::{PriceHistorySource, YahooFinanceClient};
use crate::chart::{self, BitmapChartRenderer, ChartRenderer, ChartRequest};
use crate::config::AnalysisConfig;
use crate::error::{Result, StockError};
use crate::explanation::explain;
use crate::series;
use crate::statistics::PriceStatistics;

/// Runs one report per call; holds no per-request state
#[derive(Clone)]
pub struct AnalysisEngine {
    config: Arc<AnalysisConfig>,
    source: Arc<dyn PriceHistorySource>,
    renderer: Arc<dyn ChartRenderer>,
}

impl AnalysisEngine {
    /// Engine backed by Yahoo Finance and the plotters renderer
    pub fn new(config: Arc<AnalysisConfig>) -> Self {
        Self::with_parts(
            config,
            Arc::new(YahooFinanceClient::new()),
            Arc::new(BitmapChartRenderer::new()),
        )
    }

    /// Engine with an explicit data source and renderer
    pub fn with_parts(
        config: Arc<AnalysisConfig>,
        source: Arc<dyn PriceHistorySource>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        Self {
            config,
            source,
            renderer,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Where the chart for `ticker` is (or will be) written
    pub fn chart_path(&self, ticker: &str) -> PathBuf {
        chart::chart_path(&self.config.output_dir, ticker)
    }

    /// Produce the full report for `ticker`.
    ///
    /// Any failure to obtain rows from the provider, and an empty history,
    /// both yield [`StockError::DataNotFound`]; nothing is written to disk in
    /// that case. `variant` falls back to the configured default.
    pub async fn analyze(
        &self,
        ticker: &str,
        variant: Option<ReportVariant>,
    ) -> Result<AnalysisReport> {
        let symbol = ticker.trim().to_uppercase();
        let variant = variant.unwrap_or(self.config.default_variant);

        let end = Utc::now();
        let start = end
            .checked_sub_signed(Duration::days(i64::from(self.config.lookback_days)))
            .ok_or_else(|| {
                StockError::ConfigError(format!(
                    "lookback of {} days is out of range",
                    self.config.lookback_days
                ))
            })?;

        let raw = match self.source.daily_history(&symbol, start, end).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(%symbol, error = %e, "Price history unavailable");
                return Err(StockError::not_found(symbol));
            }
        };
        debug!(%symbol, rows = raw.len(), "Price history received");

        let rows = series::normalize(raw);
        let closes = series::closes(&rows);
        let Some(statistics) = PriceStatistics::from_closes(&closes) else {
            info!(%symbol, "No usable price rows");
            return Err(StockError::not_found(symbol));
        };

        let window = series::trailing_window(&rows, self.config.chart_window).to_vec();
        let chart_path = self.chart_path(&symbol);
        let request = ChartRequest {
            symbol: symbol.clone(),
            variant,
            window,
            statistics,
            width: self.config.chart_width,
            height: self.config.chart_height,
        };

        let renderer = Arc::clone(&self.renderer);
        let path = chart_path.clone();
        tokio::task::spawn_blocking(move || chart::write_chart(renderer.as_ref(), &request, &path))
            .await
            .map_err(|e| StockError::Other(format!("Chart task failed: {e}")))??;

        let explanation = explain(&symbol, &statistics, variant);
        info!(%symbol, %variant, rows = rows.len(), chart = %chart_path.display(), "Report generated");

        Ok(AnalysisReport {
            symbol,
            variant,
            statistics,
            chart_path,
            explanation,
            data_points: rows.len(),
            generated_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for AnalysisEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockPriceHistorySource, Quote};
    use chrono::DateTime;
    use std::path::Path;
    use std::sync::Mutex;

    /// Writes a marker file and remembers what it was asked to draw
    #[derive(Default)]
    struct RecordingRenderer {
        windows: Mutex<Vec<(ReportVariant, usize, f64)>>,
        statistics: Mutex<Vec<PriceStatistics>>,
        drawn_rows: Mutex<Vec<Vec<Quote>>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, request: &ChartRequest, path: &Path) -> Result<()> {
            let last = request.window.last().map_or(f64::NAN, |q| q.close);
            self.windows
                .lock()
                .unwrap()
                .push((request.variant, request.window.len(), last));
            self.statistics.lock().unwrap().push(request.statistics);
            self.drawn_rows.lock().unwrap().push(request.window.clone());
            std::fs::write(path, b"png")?;
            Ok(())
        }
    }

    fn history(len: usize) -> Vec<Quote> {
        let base = DateTime::from_timestamp(1_650_000_000, 0).unwrap();
        (0..len)
            .map(|i| {
                let close = 20.0 + (i as f64 * 0.11).cos() * 4.0 + i as f64 * 0.02;
                Quote {
                    symbol: "PETR4.SA".to_string(),
                    timestamp: base + Duration::days(i as i64),
                    open: close - 0.3,
                    high: close + 0.8,
                    low: close - 0.9,
                    close,
                    volume: 5_000_000,
                    adjclose: close,
                }
            })
            .collect()
    }

    fn engine(
        dir: &Path,
        source: MockPriceHistorySource,
        renderer: Arc<RecordingRenderer>,
    ) -> AnalysisEngine {
        let config = AnalysisConfig::builder().output_dir(dir).build().unwrap();
        AnalysisEngine::with_parts(Arc::new(config), Arc::new(source), renderer)
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let dir = tempfile::tempdir().unwrap();
        let rows = history(500);
        let expected_last = rows[498].close;

        let mut source = MockPriceHistorySource::new();
        source
            .expect_daily_history()
            .withf(|symbol, start, end| {
                symbol == "PETR4.SA" && (*end - *start).num_days() == 730
            })
            .times(1)
            .returning(move |_, _, _| Ok(rows.clone()));

        let renderer = Arc::new(RecordingRenderer::default());
        let engine = engine(dir.path(), source, Arc::clone(&renderer));

        let report = engine.analyze("petr4.sa", None).await.unwrap();

        assert_eq!(report.symbol, "PETR4.SA");
        assert_eq!(report.variant, ReportVariant::Candlestick);
        assert_eq!(report.data_points, 499);
        assert!((report.statistics.last_close - expected_last).abs() < 1e-12);
        let s = report.statistics;
        for value in [s.mean, s.median, s.last_close] {
            assert!(s.min <= value && value <= s.max);
        }
        assert_eq!(report.chart_path, dir.path().join("grafico_PETR4_SA.png"));
        assert!(report.chart_path.exists());
        assert!(report.explanation.contains("PETR4.SA"));

        let drawn = renderer.windows.lock().unwrap();
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].0, ReportVariant::Candlestick);
        assert_eq!(drawn[0].1, 180);
        assert!((drawn[0].2 - expected_last).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_chart_reference_lines_use_full_series() {
        let dir = tempfile::tempdir().unwrap();
        let rows = history(500);

        let mut source = MockPriceHistorySource::new();
        source
            .expect_daily_history()
            .returning(move |_, _, _| Ok(rows.clone()));

        let renderer = Arc::new(RecordingRenderer::default());
        let engine = engine(dir.path(), source, Arc::clone(&renderer));

        let report = engine
            .analyze("PETR4.SA", Some(ReportVariant::DeviationBands))
            .await
            .unwrap();

        let sent = renderer.statistics.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], report.statistics);

        let drawn = renderer.drawn_rows.lock().unwrap();
        assert_eq!(drawn[0].len(), 180);
        let window_only = PriceStatistics::from_closes(&series::closes(&drawn[0])).unwrap();
        assert_ne!(sent[0], window_only);
        assert!((sent[0].mean - window_only.mean).abs() > 1e-6);
    }

    #[tokio::test]
    async fn test_out_of_range_lookback_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockPriceHistorySource::new();
        source.expect_daily_history().times(0);

        let config = AnalysisConfig {
            lookback_days: u32::MAX,
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let engine = AnalysisEngine::with_parts(
            Arc::new(config),
            Arc::new(source),
            Arc::new(RecordingRenderer::default()),
        );

        let err = engine.analyze("PETR4.SA", None).await.unwrap_err();
        assert!(matches!(err, StockError::ConfigError(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_short_history_is_charted_whole() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockPriceHistorySource::new();
        source
            .expect_daily_history()
            .returning(|_, _, _| Ok(history(40)));

        let renderer = Arc::new(RecordingRenderer::default());
        let engine = engine(dir.path(), source, Arc::clone(&renderer));

        let report = engine
            .analyze("VALE3.SA", Some(ReportVariant::DeviationBands))
            .await
            .unwrap();

        assert_eq!(report.variant, ReportVariant::DeviationBands);
        assert!(report.explanation.contains("desvios padrão"));
        let drawn = renderer.windows.lock().unwrap();
        assert_eq!(drawn[0].0, ReportVariant::DeviationBands);
        assert_eq!(drawn[0].1, 39);
        assert_eq!(report.data_points, 39);
    }

    #[tokio::test]
    async fn test_empty_history_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockPriceHistorySource::new();
        source.expect_daily_history().returning(|_, _, _| Ok(Vec::new()));

        let renderer = Arc::new(RecordingRenderer::default());
        let engine = engine(&dir.path().join("static"), source, Arc::clone(&renderer));

        let err = engine.analyze("ZZZZINVALID", None).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(err.to_string().contains("ZZZZINVALID"));
        assert!(renderer.windows.lock().unwrap().is_empty());
        assert!(!engine.chart_path("ZZZZINVALID").exists());
    }

    #[tokio::test]
    async fn test_provider_error_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockPriceHistorySource::new();
        source
            .expect_daily_history()
            .returning(|_, _, _| Err(StockError::YahooFinanceError("no quotes".to_string())));

        let renderer = Arc::new(RecordingRenderer::default());
        let engine = engine(dir.path(), source, renderer);

        let err = engine.analyze("ZZZZINVALID", None).await.unwrap_err();
        assert!(matches!(err, StockError::DataNotFound { ref symbol } if symbol == "ZZZZINVALID"));
    }

    #[tokio::test]
    async fn test_single_row_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockPriceHistorySource::new();
        source.expect_daily_history().returning(|_, _, _| Ok(history(1)));

        let renderer = Arc::new(RecordingRenderer::default());
        let engine = engine(dir.path(), source, renderer);

        assert!(engine.analyze("NEW3.SA", None).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_not_found_leaves_existing_chart_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = MockPriceHistorySource::new();
        source.expect_daily_history().returning(|_, _, _| Ok(Vec::new()));

        let renderer = Arc::new(RecordingRenderer::default());
        let engine = engine(dir.path(), source, renderer);

        let path = engine.chart_path("ABEV3.SA");
        std::fs::write(&path, b"previous").unwrap();

        assert!(engine.analyze("ABEV3.SA", None).await.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
    }

    #[test]
    fn test_chart_path_is_pure() {
        let engine = AnalysisEngine::new(Arc::new(AnalysisConfig::default()));
        assert_eq!(engine.chart_path("PETR4.SA"), PathBuf::from("static/grafico_PETR4_SA.png"));
        assert_eq!(engine.chart_path("PETR4.SA"), engine.chart_path("PETR4.SA"));
    }
}
