//! Ticker report web server

use anyhow::Context;
use clap::Parser;
use report_engine::{AnalysisConfig, AnalysisEngine, ReportVariant};
use report_server::{AppState, PageRenderer, ServerConfig, router};
use report_utils::{LogFormat, env_var, init_tracing};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "report-server")]
#[command(about = "Web reports with statistics and charts for stock tickers", long_about = None)]
struct Args {
    /// Address to bind (overrides REPORT_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory charts are written to and served from
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Directory of *.html files replacing the built-in pages
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Default report variant: candle or bandas
    #[arg(long)]
    variant: Option<ReportVariant>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_format = if args.log_json {
        LogFormat::Json
    } else {
        env_var::<LogFormat>("REPORT_LOG_FORMAT")?.unwrap_or_default()
    };
    init_tracing(log_format);

    let mut analysis = AnalysisConfig::builder().with_env()?;
    if let Some(dir) = args.output_dir {
        analysis = analysis.output_dir(dir);
    }
    if let Some(variant) = args.variant {
        analysis = analysis.default_variant(variant);
    }
    let analysis = analysis.build()?;

    let mut server = ServerConfig::builder().with_env()?;
    if let Some(host) = args.host {
        server = server.host(host);
    }
    if let Some(port) = args.port {
        server = server.port(port);
    }
    if let Some(dir) = args.template_dir {
        server = server.template_dir(dir);
    }
    let server = server.build()?;

    tokio::fs::create_dir_all(&analysis.output_dir)
        .await
        .with_context(|| format!("creating {}", analysis.output_dir.display()))?;

    let pages = match &server.template_dir {
        Some(dir) => PageRenderer::with_overrides(dir)?,
        None => PageRenderer::new()?,
    };

    info!(
        output_dir = %analysis.output_dir.display(),
        lookback_days = analysis.lookback_days,
        chart_window = analysis.chart_window,
        variant = %analysis.default_variant,
        "Analysis configured"
    );

    let engine = AnalysisEngine::new(Arc::new(analysis));
    let addr = server.bind_addr();
    let app = router(Arc::new(AppState::new(engine, pages, server)));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
