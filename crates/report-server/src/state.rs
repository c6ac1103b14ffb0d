use std::path::Path;

use report_engine::AnalysisEngine;

use crate::config::ServerConfig;
use crate::pages::PageRenderer;

/// Shared, read-only state handed to every handler
#[derive(Debug)]
pub struct AppState {
    pub engine: AnalysisEngine,
    pub pages: PageRenderer,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(engine: AnalysisEngine, pages: PageRenderer, config: ServerConfig) -> Self {
        Self {
            engine,
            pages,
            config,
        }
    }

    /// Directory charts are written to and served from
    pub fn static_dir(&self) -> &Path {
        &self.engine.config().output_dir
    }

    /// Public URL of the chart stored under `file_name`
    pub fn chart_url(&self, file_name: &str) -> String {
        self.config.static_url(file_name)
    }
}
