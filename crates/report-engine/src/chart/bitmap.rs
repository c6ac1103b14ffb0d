//! PNG rendering with plotters

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{ChartRenderer, ChartRequest};
use crate::api::Quote;
use crate::engine::ReportVariant;
use crate::error::{Result, StockError};
use crate::series;

const GAIN: RGBColor = RGBColor(38, 166, 91);
const LOSS: RGBColor = RGBColor(214, 39, 40);
const BLUE_LINE: RGBColor = RGBColor(31, 119, 180);
const ORANGE_LINE: RGBColor = RGBColor(255, 127, 14);
const MEDIAN: RGBColor = RGBColor(148, 103, 189);

/// Colour per deviation band, in the order +1σ, -1σ, +2σ, -2σ, +3σ, -3σ
const BAND_COLORS: [RGBColor; 6] = [
    RGBColor(44, 160, 44),
    RGBColor(152, 223, 138),
    RGBColor(227, 119, 194),
    RGBColor(247, 182, 210),
    RGBColor(140, 86, 75),
    RGBColor(196, 156, 148),
];

const FONT: &str = "sans-serif";

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders report charts to PNG files through the plotters bitmap backend
#[derive(Debug, Clone)]
pub struct BitmapChartRenderer {
    short_period: usize,
    long_period: usize,
}

impl Default for BitmapChartRenderer {
    fn default() -> Self {
        Self {
            short_period: 20,
            long_period: 50,
        }
    }
}

impl BitmapChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moving-average periods (candlestick uses both, bands uses the short one)
    pub fn with_periods(short_period: usize, long_period: usize) -> Self {
        Self {
            short_period,
            long_period,
        }
    }

    fn draw_candlestick(&self, area: &Area<'_>, request: &ChartRequest) -> Result<()> {
        let window = &request.window;
        let n = window.len();
        let x_range = -1.0..n as f64;
        let x_label = |x: &f64| date_label(window, *x);

        let (_, height) = area.dim_in_pixel();
        let (upper, lower) = area.split_vertically(height * 3 / 4);

        let (lo, hi) = padded_bounds(window.iter().flat_map(|q| [q.low, q.high]));
        let mut chart = ChartBuilder::on(&upper)
            .margin(10)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range.clone(), lo..hi)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Preço (R$)")
            .y_label_formatter(&|y| format!("{y:.2}"))
            .x_labels(0)
            .draw()
            .map_err(chart_err)?;

        let candle_width = ((f64::from(request.width) * 0.8 / n as f64) * 0.6).max(1.0) as u32;
        chart
            .draw_series(window.iter().enumerate().map(|(i, q)| {
                CandleStick::new(
                    i as f64,
                    q.open,
                    q.high,
                    q.low,
                    q.close,
                    GAIN.filled(),
                    LOSS.filled(),
                    candle_width,
                )
            }))
            .map_err(chart_err)?;

        let closes = series::closes(window);
        for (period, color) in [
            (self.short_period, BLUE_LINE),
            (self.long_period, ORANGE_LINE),
        ] {
            let points = average_points(&closes, period)?;
            if points.is_empty() {
                continue;
            }
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(chart_err)?
                .label(format!("Média Móvel {period}d"))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(chart_err)?;

        let max_volume = window.iter().map(|q| q.volume).max().unwrap_or(0).max(1) as f64;
        let mut volume_chart = ChartBuilder::on(&lower)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, 0.0..max_volume * 1.1)
            .map_err(chart_err)?;

        volume_chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Volume")
            .y_labels(3)
            .y_label_formatter(&|v| compact_volume(*v))
            .x_labels(8)
            .x_label_formatter(&x_label)
            .draw()
            .map_err(chart_err)?;

        volume_chart
            .draw_series(window.iter().enumerate().map(|(i, q)| {
                let x = i as f64;
                let color = if q.is_gain() { GAIN } else { LOSS };
                Rectangle::new([(x - 0.35, 0.0), (x + 0.35, q.volume as f64)], color.mix(0.6).filled())
            }))
            .map_err(chart_err)?;

        Ok(())
    }

    fn draw_deviation_bands(&self, area: &Area<'_>, request: &ChartRequest) -> Result<()> {
        let window = &request.window;
        let stats = &request.statistics;
        let n = window.len();
        let x_range = -1.0..n as f64;
        let x_label = |x: &f64| date_label(window, *x);

        let mut levels = vec![(
            format!("Mediana (R$ {:.2})", stats.median),
            stats.median,
            MEDIAN,
            LineKind::Dashed,
        )];
        for (i, k) in [1.0, -1.0, 2.0, -2.0, 3.0, -3.0].into_iter().enumerate() {
            let value = stats.band(k);
            levels.push((
                format!("{k:+}σ (R$ {value:.2})"),
                value,
                BAND_COLORS[i],
                LineKind::Dotted,
            ));
        }

        let closes = series::closes(window);
        let (lo, hi) = padded_bounds(
            closes
                .iter()
                .copied()
                .chain(levels.iter().map(|(_, value, _, _)| *value)),
        );

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, lo..hi)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Preço (R$)")
            .y_label_formatter(&|y| format!("{y:.2}"))
            .x_labels(8)
            .x_label_formatter(&x_label)
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(
                closes.iter().enumerate().map(|(i, &c)| (i as f64, c)),
                BLUE_LINE.stroke_width(2),
            ))
            .map_err(chart_err)?
            .label("Fechamento")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE_LINE.stroke_width(2)));

        let points = average_points(&closes, self.short_period)?;
        if !points.is_empty() {
            let period = self.short_period;
            chart
                .draw_series(LineSeries::new(points, ORANGE_LINE.stroke_width(2)))
                .map_err(chart_err)?
                .label(format!("Média Móvel {period}d"))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ORANGE_LINE.stroke_width(2)));
        }

        for (label, value, color, kind) in levels {
            let segments = kind.segments(-1.0, n as f64);
            chart
                .draw_series(segments.into_iter().map(|(start, end)| {
                    PathElement::new(vec![(start, value), (end, value)], color.stroke_width(2))
                }))
                .map_err(chart_err)?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(chart_err)?;

        Ok(())
    }
}

impl ChartRenderer for BitmapChartRenderer {
    fn render(&self, request: &ChartRequest, path: &Path) -> Result<()> {
        if request.window.is_empty() {
            return Err(StockError::ChartError(format!(
                "no rows to draw for {}",
                request.symbol
            )));
        }

        let root = BitMapBackend::new(path, (request.width, request.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        let title = format!("Análise de Preços - {}", request.symbol.to_uppercase());
        let area = root.titled(&title, (FONT, 28)).map_err(chart_err)?;

        match request.variant {
            ReportVariant::Candlestick => self.draw_candlestick(&area, request)?,
            ReportVariant::DeviationBands => self.draw_deviation_bands(&area, request)?,
        }

        root.present().map_err(chart_err)?;
        Ok(())
    }
}

/// Stroke pattern of a horizontal reference line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Dashed,
    Dotted,
}

impl LineKind {
    /// Visible `(start, end)` pieces between `from` and `to`, in x units
    fn segments(self, from: f64, to: f64) -> Vec<(f64, f64)> {
        let (on, off) = match self {
            Self::Dashed => (2.0, 1.0),
            Self::Dotted => (0.4, 0.8),
        };

        let mut pieces = Vec::new();
        let mut start = from;
        while start < to {
            pieces.push((start, (start + on).min(to)));
            start += on + off;
        }
        pieces
    }
}

fn chart_err(e: impl std::fmt::Display) -> StockError {
    StockError::ChartError(e.to_string())
}

fn average_points(closes: &[f64], period: usize) -> Result<Vec<(f64, f64)>> {
    Ok(series::simple_moving_average(closes, period)?
        .into_iter()
        .enumerate()
        .filter_map(|(i, avg)| avg.map(|v| (i as f64, v)))
        .collect())
}

/// Min and max of `values` with 5% head room on each side
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

fn date_label(window: &[Quote], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 0.25 {
        return String::new();
    }
    window
        .get(idx as usize)
        .map(|q| q.date().format("%d/%m/%y").to_string())
        .unwrap_or_default()
}

fn compact_volume(volume: f64) -> String {
    if volume >= 1e9 {
        format!("{:.1}B", volume / 1e9)
    } else if volume >= 1e6 {
        format!("{:.1}M", volume / 1e6)
    } else if volume >= 1e3 {
        format!("{:.1}K", volume / 1e3)
    } else {
        format!("{volume:.0}")
    }
}
