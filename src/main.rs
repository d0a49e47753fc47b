//! CopyLess HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use copyless::config::Config;
use copyless::embedding::{EncoderConfig, SentenceEmbedder};
use copyless::gateway::{HandlerState, create_router_with_state};
use copyless::service::PlagiarismService;
use copyless::web::WebComparer;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        corpus = %config.corpus_path.display(),
        "CopyLess starting"
    );

    if let Some(model_dir) = &config.model_path {
        if !config.engine.model_id_matches(model_dir) {
            tracing::warn!(
                model_id = %config.engine.embedding_model_id,
                model_dir = %model_dir.display(),
                "COPYLESS_MODEL_ID does not name the model directory; the directory wins"
            );
        }
    }

    let encoder_config = EncoderConfig::from_model_path(config.model_path.clone());
    if encoder_config.testing_stub {
        tracing::warn!("No COPYLESS_MODEL_PATH configured, running embedder in stub mode");
    }
    let embedder = Arc::new(SentenceEmbedder::load(encoder_config)?);

    let engine = config.engine.clone();
    let corpus_path = config.corpus_path.clone();
    let service_embedder = embedder.clone();
    let service = tokio::task::spawn_blocking(move || {
        PlagiarismService::new(engine, corpus_path, service_embedder)
    })
    .await?;

    if !service.is_ready() {
        tracing::warn!("Serving without corpus indices; /api/v1/check will return 503");
    }

    let web = WebComparer::from_config(&config, embedder)?;

    let state = HandlerState::new(Arc::new(service), Arc::new(web));
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("CopyLess shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("COPYLESS_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(_) => return 1,
    };

    rt.block_on(async {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        {
            Ok(client) => client,
            Err(_) => return 1,
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
