use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use docchat_core::{IndexingConfig, IngestPolicy};
use docchat_ollama::OllamaClient;
use docchat_rag::{IndexBuilder, PdfLoader};
use docchat_web::{
    AppContext, DEFAULT_BIND, DEFAULT_PDF_DIR, WebConfig, display_banner, print_warning, serve,
};

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "Chat with a directory of PDF documents", long_about = None)]
struct Cli {
    /// Address the web server listens on
    #[arg(long, env = "DOCCHAT_BIND", default_value = DEFAULT_BIND)]
    bind: SocketAddr,

    /// Directory holding the PDF documents
    #[arg(long, env = "DOCCHAT_PDF_DIR", default_value = DEFAULT_PDF_DIR)]
    pdf_dir: PathBuf,

    /// Image shown in the sidebar
    #[arg(long, env = "DOCCHAT_LOGO")]
    logo: Option<PathBuf>,

    /// Leave unreadable files out instead of failing the index build
    #[arg(long, env = "DOCCHAT_SKIP_INVALID")]
    skip_invalid_pdfs: bool,

    /// Minutes of inactivity after which a session is dropped
    #[arg(long, env = "DOCCHAT_SESSION_IDLE_MINUTES", default_value_t = 120)]
    session_idle_minutes: u64,
}

impl Cli {
    fn web_config(&self) -> WebConfig {
        WebConfig {
            bind: self.bind,
            pdf_dir: self.pdf_dir.clone(),
            logo: self.logo.clone(),
            ingest_policy: if self.skip_invalid_pdfs {
                IngestPolicy::SkipInvalid
            } else {
                IngestPolicy::FailFast
            },
            session_idle_timeout: Duration::from_secs(self.session_idle_minutes.saturating_mul(60)),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,docchat=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.web_config();

    let ollama = OllamaClient::from_env().context("invalid Ollama configuration")?;
    display_banner(&config, &ollama.config().chat_model, &ollama.config().embed_model);

    if let Err(e) = ollama.ping().await {
        tracing::warn!(error = %e, "model server check failed");
        print_warning(&format!(
            "Ollama is not reachable at {}. Questions will fail until it is.",
            ollama.config().base_url
        ));
    }

    let builder = IndexBuilder::new(
        &config.pdf_dir,
        Arc::new(PdfLoader::new()),
        Arc::new(ollama.clone()),
        IndexingConfig::default(),
    )?
    .with_policy(config.ingest_policy);

    let ctx = Arc::new(AppContext::new(config.clone(), Arc::new(ollama), Arc::new(builder)).await?);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    serve(ctx.clone(), listener, shutdown_signal()).await?;
    ctx.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
