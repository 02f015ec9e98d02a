//! Axum-based RPC server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use disperse_asset::MemoryHost;
use disperse_engine::DisperseContract;
use disperse_store::{CommitStore, SnapshotStore};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

use crate::error::RpcError;
use crate::handlers;

/// Escrow backend chosen at startup (LMDB or in-memory).
pub type SharedStore = Box<dyn CommitStore + Send + Sync>;

/// Where the host is saved between restarts.
pub type SharedSnapshots = Box<dyn SnapshotStore + Send + Sync>;

/// The host ledger and the contract deployed on it.
pub struct Ledger {
    pub host: MemoryHost,
    pub contract: DisperseContract<SharedStore>,
    /// `None` keeps the host volatile.
    pub snapshots: Option<SharedSnapshots>,
}

impl Ledger {
    pub fn new(host: MemoryHost, contract: DisperseContract<SharedStore>) -> Self {
        Self {
            host,
            contract,
            snapshots: None,
        }
    }

    pub fn with_snapshots(mut self, snapshots: SharedSnapshots) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    /// Save the host after a successful mutation.
    ///
    /// The escrow store has already committed by the time this runs; a failure
    /// here is reported as a server error and logged.
    pub fn persist(&self) -> Result<(), RpcError> {
        let Some(snapshots) = &self.snapshots else {
            return Ok(());
        };
        let saved = self
            .host
            .to_snapshot()
            .map_err(|e| e.to_string())
            .and_then(|bytes| snapshots.save_snapshot(&bytes).map_err(|e| e.to_string()));
        saved.map_err(|e| {
            error!(error = %e, "failed to save host snapshot");
            RpcError::Server(format!("host snapshot: {e}"))
        })
    }
}

/// Shared handler state. Requests are applied one at a time, in arrival order.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<Ledger>>,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/disperse-native", post(handlers::disperse_native))
        .route("/disperse-fungible", post(handlers::disperse_fungible))
        .route("/disperse-eth", post(handlers::disperse_native))
        .route("/disperse-erc20", post(handlers::disperse_fungible))
        .route("/commit", post(handlers::commit))
        .route("/approve", post(handlers::approve))
        .route("/commitments/:account", get(handlers::commit_record))
        .route("/commitments/:account/native", get(handlers::native_commitment))
        .route("/commitments/:account/tokens/:asset", get(handlers::token_commitment))
        .route("/balances/:account/native", get(handlers::native_balance))
        .route("/balances/:account/tokens/:asset", get(handlers::token_balance))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct RpcServer {
    pub port: u16,
    pub state: AppState,
}

impl RpcServer {
    pub fn new(port: u16, state: AppState) -> Self {
        Self { port, state }
    }

    /// Bind and serve until the process is shut down.
    pub async fn start(&self) -> Result<(), RpcError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        info!(%addr, "RPC server listening");
        axum::serve(listener, router(self.state.clone()))
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}
