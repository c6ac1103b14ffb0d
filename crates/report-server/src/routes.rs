//! Request handlers for the landing page and the two report endpoints

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use report_engine::{AnalysisReport, FormattedStatistics, ReportVariant, StockError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::ApiError;
use crate::pages;
use crate::state::AppState;

/// Query string accepted by both report endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub variante: Option<String>,
}

impl ReportQuery {
    fn variant(&self) -> Result<Option<ReportVariant>, StockError> {
        self.variante
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::parse::<ReportVariant>)
            .transpose()
    }
}

/// Body of a successful `GET /api/analise/{ticker}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub ticker_analisado: String,
    pub estatisticas: FormattedStatistics,
    pub explicacao_analise: String,
    pub url_grafico: String,
}

impl ReportResponse {
    fn from_report(state: &AppState, report: AnalysisReport) -> Self {
        let url_grafico = report
            .chart_file_name()
            .map(|name| state.chart_url(name))
            .unwrap_or_default();

        Self {
            ticker_analisado: report.symbol,
            estatisticas: report.statistics.formatted(),
            explicacao_analise: report.explanation,
            url_grafico,
        }
    }
}

fn not_found_detail(ticker: &str) -> String {
    format!("Ticker '{ticker}' não encontrado.")
}

pub async fn home(State(state): State<Arc<AppState>>) -> Response {
    match state.pages.render(pages::HOME, json!({})) {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_page_error(&e),
    }
}

pub async fn api_report(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, ApiError> {
    let variant = query
        .variant()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match state.engine.analyze(&ticker, variant).await {
        Ok(report) => Ok(Json(ReportResponse::from_report(&state, report))),
        Err(e) if e.is_not_found() => Err(ApiError::NotFound(not_found_detail(&ticker))),
        Err(e) => {
            error!(%ticker, error = %e, "Report generation failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

pub async fn html_report(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let variant = match query.variant() {
        Ok(variant) => variant,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    info!(%ticker, "Generating web report");

    let report = match state.engine.analyze(&ticker, variant).await {
        Ok(report) => report,
        Err(e) if e.is_not_found() => {
            let shown = ticker.trim().to_uppercase();
            return match state.pages.render(pages::NOT_FOUND, json!({ "ticker": shown })) {
                Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
                Err(e) => internal_page_error(&e),
            };
        }
        Err(e) => {
            error!(%ticker, error = %e, "Report generation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let paragrafos: Vec<&str> = report
        .explanation
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    let url_grafico = report
        .chart_file_name()
        .map(|name| state.chart_url(name))
        .unwrap_or_default();

    let ctx = json!({
        "ticker": report.symbol,
        "estatisticas": report.statistics.formatted(),
        "explicacao": report.explanation,
        "paragrafos": paragrafos,
        "url_grafico": url_grafico,
    });

    match state.pages.render(pages::REPORT, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_page_error(&e),
    }
}

fn internal_page_error(e: &crate::error::PageError) -> Response {
    error!(error = %e, "Page rendering failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}
