//! JSON-RPC 2.0 transport for the transfer engine.
//!
//! Three calls, nothing more: fetch a recent blockhash, probe whether an
//! account exists, and submit a signed transaction. Requests go over a
//! pooled HTTPS client with fixed connect/read timeouts; the crate does no
//! retrying of its own beyond what the transport already provides for
//! idempotent calls.
//!
//! Error split follows the RPC boundary: [`RpcError::Transport`] when the
//! endpoint could not be reached or timed out, [`RpcError::Protocol`] when
//! the endpoint answered with a JSON-RPC `error` member (its message is
//! preserved verbatim, since it usually carries the actionable on-chain
//! detail), and [`RpcError::Malformed`] when a reply could not be decoded.

pub mod client;
pub mod error;
pub mod types;

pub use client::RpcClient;
pub use error::RpcError;
pub use types::{Commitment, SendOptions};
