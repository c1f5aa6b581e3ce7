//! TCP query server

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rpio_condition::ControlRules;
use rpio_state_store::SharedStateStore;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::error::{QueryError, QueryResult};
use crate::protocol::{QueryRequest, StatusResponse, MAX_REQUEST_BYTES, METHOD_GET_STATUS};

/// Pause after a failed accept before polling the listener again
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Serves `get_status` snapshots of the state store
pub struct QueryServer {
    listener: TcpListener,
    store: SharedStateStore,
    rules: Arc<ControlRules>,
}

impl QueryServer {
    /// Bind the listening socket
    pub async fn bind(
        addr: SocketAddr,
        store: SharedStateStore,
        rules: Arc<ControlRules>,
    ) -> QueryResult<Self> {
        let listener = TcpListener::bind(addr).await?;

        Ok(Self {
            listener,
            store,
            rules,
        })
    }

    pub fn local_addr(&self) -> QueryResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` fires
    ///
    /// Each connection is handled on its own task. Dropping the listener on
    /// exit stops new connections; handlers already running finish on
    /// their own.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        match self.listener.local_addr() {
            Ok(addr) => info!(%addr, "Query server listening"),
            Err(e) => warn!(error = %e, "Query server listening on unknown address"),
        }

        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let store = self.store.clone();
                        let rules = self.rules.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, store, rules).await {
                                debug!(%peer, error = %e, "Query dropped");
                            }
                        });
                    }
                    Err(e) => accept_failed(&e).await,
                },
            }
        }

        info!("Query server stopped");
    }
}

/// Accept errors such as EMFILE persist, so an immediate retry would spin
async fn accept_failed(error: &io::Error) {
    warn!(%error, backoff = ?ACCEPT_BACKOFF, "Failed to accept query connection");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}

#[instrument(level = "debug", skip(stream, store, rules))]
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    store: SharedStateStore,
    rules: Arc<ControlRules>,
) -> QueryResult<()> {
    let mut buf = [0u8; MAX_REQUEST_BYTES];
    let len = stream.read(&mut buf).await?;

    let request = QueryRequest::decode(&buf[..len])?;
    debug!(method = %request.method, "Request");

    if request.method != METHOD_GET_STATUS {
        return Err(QueryError::UnknownMethod(request.method));
    }

    let response = StatusResponse::new(store.snapshot().await, &rules);
    let payload = response.encode()?;
    debug!(bytes = payload.len(), "Response");

    stream.write_all(&payload).await?;
    stream.shutdown().await?;
    Ok(())
}
