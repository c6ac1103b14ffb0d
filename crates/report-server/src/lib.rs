//! HTTP front end for ticker reports
//!
//! Serves a landing page, a JSON report endpoint, an HTML report page and the
//! generated chart images. Every report request runs one full analysis
//! through [`report_engine::AnalysisEngine`].
//!
//! # Example
//!
//! ```rust,ignore
//! use report_server::{AppState, PageRenderer, ServerConfig, router};
//! use report_engine::{AnalysisConfig, AnalysisEngine};
//! use std::sync::Arc;
//!
//! let engine = AnalysisEngine::new(Arc::new(AnalysisConfig::default()));
//! let state = AppState::new(engine, PageRenderer::new()?, ServerConfig::default());
//! let app = router(Arc::new(state));
//! ```

pub mod config;
pub mod error;
pub mod pages;
pub mod routes;
pub mod state;
pub mod static_files;

use axum::Router;
use axum::routing::get;
use std::sync::Arc;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{ApiError, PageError, ServerError};
pub use pages::PageRenderer;
pub use routes::{ReportQuery, ReportResponse};
pub use state::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let static_route = format!(
        "{}/{{*path}}",
        state.config.static_url_prefix.trim_end_matches('/')
    );

    Router::new()
        .route("/", get(routes::home))
        .route("/api/analise/{ticker}", get(routes::api_report))
        .route("/relatorio/{ticker}", get(routes::html_report))
        .route(&static_route, get(static_files::serve_static))
        .with_state(state)
}
