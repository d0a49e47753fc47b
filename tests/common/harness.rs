//! Test server harness.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use copyless::gateway::{HandlerState, create_router_with_state};
use copyless::service::PlagiarismService;
use copyless::web::{MockPageFetcher, WebComparer};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::fixtures::stub_embedder;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Serves `service` on an ephemeral port with web search disabled.
pub async fn spawn_server(service: PlagiarismService) -> std::io::Result<TestServer> {
    let web = WebComparer::new(None, Arc::new(MockPageFetcher::new()), stub_embedder());
    spawn_server_with(service, web).await
}

pub async fn spawn_server_with(
    service: PlagiarismService,
    web: WebComparer,
) -> std::io::Result<TestServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let app = create_router_with_state(HandlerState::new(Arc::new(service), Arc::new(web)));
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    wait_for_server_ready(addr).await?;

    Ok(TestServer {
        addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}

async fn wait_for_server_ready(addr: SocketAddr) -> std::io::Result<()> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS);
    let client = reqwest::Client::new();
    let url = format!("http://{}/healthz", addr);

    loop {
        if let Ok(res) = client.get(&url).send().await {
            if res.status().is_success() {
                return Ok(());
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("server at {addr} did not become healthy"),
            ));
        }
        tokio::time::sleep(Duration::from_millis(STARTUP_POLL_INTERVAL_MS)).await;
    }
}
