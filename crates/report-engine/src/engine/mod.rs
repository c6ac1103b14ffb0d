//! Report engine
//!
//! Core coordination layer: one call turns a ticker into statistics, a chart
//! on disk and an explanation

pub mod analysis_engine;
pub mod result;

pub use analysis_engine::AnalysisEngine;
pub use result::{AnalysisReport, ReportVariant};
