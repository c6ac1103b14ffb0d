//! Chart artifacts
//!
//! A chart lives at a path derived only from the ticker, so repeated requests
//! overwrite the same file. Writes go through a uniquely named temporary file
//! in the same directory followed by a rename; concurrent requests for one
//! ticker therefore always leave a complete image behind (last writer wins).

mod bitmap;

use std::fs;
use std::path::{Path, PathBuf};

use crate::api::Quote;
use crate::engine::ReportVariant;
use crate::error::Result;
use crate::statistics::PriceStatistics;

pub use bitmap::BitmapChartRenderer;

/// Everything a renderer needs to draw one report chart
#[derive(Debug, Clone)]
pub struct ChartRequest {
    pub symbol: String,
    pub variant: ReportVariant,
    /// Trailing rows to draw, oldest first
    pub window: Vec<Quote>,
    /// Statistics over the full series (reference lines use these)
    pub statistics: PriceStatistics,
    pub width: u32,
    pub height: u32,
}

/// Draws a [`ChartRequest`] into a PNG file
pub trait ChartRenderer: Send + Sync {
    /// Render to `path`, which ends in `.png`
    fn render(&self, request: &ChartRequest, path: &Path) -> Result<()>;
}

/// `grafico_<TICKER>.png`, with anything but ASCII letters and digits turned into `_`
pub fn chart_file_name(ticker: &str) -> String {
    let sanitized: String = ticker
        .to_uppercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("grafico_{sanitized}.png")
}

/// Deterministic chart location for `ticker` under `output_dir`
pub fn chart_path(output_dir: &Path, ticker: &str) -> PathBuf {
    output_dir.join(chart_file_name(ticker))
}

/// Render `request` and move the result over `path` in one step
pub fn write_chart(renderer: &dyn ChartRenderer, request: &ChartRequest, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("grafico");
    let tmp = path.with_file_name(format!(".{stem}.{}.png", uuid::Uuid::new_v4().simple()));

    if let Err(e) = renderer.render(request, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), variant = %request.variant, "Chart written");
    Ok(())
}
