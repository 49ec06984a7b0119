//! SerpApi Google Maps client.
//!
//! Provides place search and review pagination against the SerpApi
//! endpoint, with bounded exponential-backoff retry on every outbound call.

mod client;
mod retry;
mod transport;

pub use client::SerpApiClient;
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, SerpTransport, DEFAULT_BASE_URL};
