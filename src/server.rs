//! HTTP front end: one route that answers with a card PNG.

use std::io::BufRead;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::any;
use axum_server::tls_rustls::RustlsConfig;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::card;
use crate::config::{CardQuery, CardTarget, ServerConfig};
use crate::error::{CardError, Result};
use crate::font_storage::FontStorage;

const CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate, max-age=86400";

/// Shared by every request. Renders only read from it.
#[derive(Clone)]
pub struct AppState {
    api: ApiClient,
    fonts: Arc<FontStorage>,
}

impl AppState {
    pub fn new(api: ApiClient, fonts: Arc<FontStorage>) -> Self {
        Self { api, fonts }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/", any(card_handler)).with_state(state)
}

/// Serves cards on the configured address, over TLS when `use_https` is set,
/// until Ctrl-C, SIGTERM or, when `watch_stdin` is set, a `quit` line on
/// stdin.
pub async fn run(
    config: ServerConfig,
    fonts: Arc<FontStorage>,
    watch_stdin: bool,
) -> anyhow::Result<()> {
    let api = ApiClient::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let app = router(AppState::new(api, fonts.clone()));
    let addr = resolve(&config.listen_address()).await?;

    if config.use_https {
        let (cert, key) = config.tls_paths()?;
        let tls = tls_config(cert, key).await?;
        let handle = axum_server::Handle::new();
        let shutdown = handle.clone();
        tokio::spawn(async move {
            shutdown_signal(watch_stdin).await;
            shutdown.graceful_shutdown(Some(Duration::from_secs(10)));
        });

        info!(%addr, faces = fonts.len(), "card server listening (https)");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("card server exited")?;
    } else {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind card server on {addr}"))?;
        info!(%addr, faces = fonts.len(), "card server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(watch_stdin))
            .await
            .context("card server exited")?;
    }

    info!("card server stopped");
    Ok(())
}

async fn resolve(addr: &str) -> anyhow::Result<SocketAddr> {
    tokio::net::lookup_host(addr)
        .await
        .with_context(|| format!("failed to resolve listen address {addr}"))?
        .next()
        .with_context(|| format!("listen address {addr} resolved to nothing"))
}

async fn tls_config(cert: &Path, key: &Path) -> anyhow::Result<RustlsConfig> {
    // reqwest picks its provider explicitly, the server uses the process default
    let _ = rustls::crypto::ring::default_provider().install_default();
    RustlsConfig::from_pem_file(cert, key).await.with_context(|| {
        format!(
            "failed to load TLS certificate {} and key {}",
            cert.display(),
            key.display()
        )
    })
}

async fn shutdown_signal(watch_stdin: bool) {
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut term) = signal(SignalKind::terminate()) {
            term.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    let quit = async {
        if !watch_stdin {
            return std::future::pending::<()>().await;
        }
        match quit_command().await {
            Ok(()) => {}
            // stdin closed, keep serving
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = quit => {},
    }
    info!("shutting down card server");
}

/// Resolves once a `quit` line is read from stdin.
///
/// Reads on a plain thread: a blocking read inside the runtime would keep it
/// from shutting down.
fn quit_command() -> oneshot::Receiver<()> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim() == "quit" => {
                    let _ = tx.send(());
                    return;
                }
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => println!("cmd not supported: {}", line.trim()),
                Err(err) => {
                    warn!(error = %err, "failed to read stdin");
                    return;
                }
            }
        }
    });
    rx
}

async fn card_handler(
    State(state): State<AppState>,
    method: Method,
    query: std::result::Result<Query<CardQuery>, QueryRejection>,
) -> Response {
    if method != Method::GET {
        return CardError::InvalidInput("Method must be GET".to_string()).into_response();
    }
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(error = %rejection, "malformed card query");
            return CardError::InvalidInput(format!("bad query: {}", rejection.body_text()))
                .into_response();
        }
    };
    info!(?query, "card requested");

    match render_card(&state, query).await {
        Ok(png) => png_response(png),
        Err(err) => {
            warn!(error = %err, "card request failed");
            err.into_response()
        }
    }
}

async fn render_card(state: &AppState, query: CardQuery) -> Result<Vec<u8>> {
    let config = query.card_config();
    let fonts = state.fonts.clone();

    match query.target()? {
        CardTarget::Author { steam_id } => {
            let author = state.api.fetch_author(config.version, &steam_id).await?;
            render_blocking(move || card::render_author_card(&author, &config, &fonts)).await
        }
        CardTarget::Mod { name } => {
            let data = state.api.fetch_mod_card(config.version, &name).await?;
            render_blocking(move || card::render_mod_card(&data, &config, &fonts)).await
        }
    }
}

/// Rasterizing is CPU bound, keep it off the async workers.
async fn render_blocking<F>(render: F) -> Result<Vec<u8>>
where
    F: FnOnce() -> Result<Vec<u8>> + Send + 'static,
{
    tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| CardError::Encode(format!("render task failed: {e}")))?
}

fn png_response(png: Vec<u8>) -> Response {
    let mut response = Response::new(png.into());
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
    response
}

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
