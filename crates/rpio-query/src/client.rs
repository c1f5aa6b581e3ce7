//! Minimal query client

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{QueryError, QueryResult};
use crate::protocol::{QueryRequest, StatusResponse};

/// Ask a running daemon for its current status
pub async fn fetch_status(addr: SocketAddr) -> QueryResult<StatusResponse> {
    let mut stream = TcpStream::connect(addr).await?;

    let request = serde_json::to_vec(&QueryRequest::get_status()).map_err(QueryError::Encode)?;
    stream.write_all(&request).await?;
    stream.shutdown().await?;

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await?;

    if reply.is_empty() {
        return Err(QueryError::NoResponse);
    }

    serde_json::from_slice(&reply).map_err(QueryError::InvalidResponse)
}
