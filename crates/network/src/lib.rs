// crates/network/src/lib.rs
//! HTTP transport for the quote server

mod client;
mod error;
mod remote;

pub use client::{parse_endpoint, Client, ClientConfig};
pub use error::{NetworkError, NetworkResult};
pub use remote::HttpRemote;
