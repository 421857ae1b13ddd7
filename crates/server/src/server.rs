use std::{net::SocketAddr, sync::Arc};

use axum::{Router, extract::State, routing::get};

use crate::ServerError;
use engine::Engine;

const SERVICE_NAME: &str = "hisob";

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn index() -> &'static str {
    SERVICE_NAME
}

/// `200 ok` while the store answers, `503` otherwise.
async fn health(State(state): State<ServerState>) -> Result<&'static str, ServerError> {
    state.engine.ping().await?;
    Ok("ok")
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
