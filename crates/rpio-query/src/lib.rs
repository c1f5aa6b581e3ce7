//! Query interface for rpioalert
//!
//! A deliberately small protocol: one JSON request per TCP connection, one
//! JSON reply, then the connection is closed.
//!
//! ```text
//! → {"method": "get_status"}
//! ← {"status": {...}, "condition": {...}, "led": [...]}
//! ```
//!
//! Anything other than a well-formed `get_status` request is answered by
//! closing the connection without a payload.

mod client;
mod error;
pub mod protocol;
mod server;

pub use client::fetch_status;
pub use error::{QueryError, QueryResult};
pub use protocol::{
    ConditionReport, QueryRequest, StatusReport, StatusResponse, MAX_REQUEST_BYTES,
    METHOD_GET_STATUS,
};
pub use server::QueryServer;
