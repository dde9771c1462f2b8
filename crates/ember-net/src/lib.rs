//! Networking for Ember: URL splitting, a raw-socket HTTP/1.0 GET
//! client, and the TLS provider abstraction.
//!
//! The browser only sees the [`Fetch`] trait. [`HttpFetcher`] is the
//! socket implementation; HTTPS goes through whatever [`TlsProvider`]
//! it was built with.

mod config;
mod error;
pub mod http;
mod stream;
pub mod tls;
#[cfg(feature = "tls-rustls")]
pub mod tls_rustls;
pub mod url;

pub use config::NetConfig;
pub use error::FetchError;
pub use http::{Fetch, HttpFetcher};
pub use stream::NetworkStream;
pub use tls::TlsProvider;
#[cfg(feature = "tls-rustls")]
pub use tls_rustls::RustlsTlsProvider;
pub use url::{ParsedUrl, Scheme};
