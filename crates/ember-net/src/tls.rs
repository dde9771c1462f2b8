//! TLS provider abstraction.
//!
//! The fetcher wraps a plain TCP [`NetworkStream`] through a
//! [`TlsProvider`] so it never depends on a concrete TLS library.

use crate::error::FetchError;
use crate::stream::NetworkStream;

/// Provides TLS client connections.
pub trait TlsProvider: Send + Sync {
    /// Wrap `stream` in a TLS client session, completing the handshake
    /// before returning.
    ///
    /// `server_name` is used for SNI and certificate verification.
    /// Any failure is reported as [`FetchError::Connect`].
    fn connect_tls(
        &self,
        stream: Box<dyn NetworkStream>,
        server_name: &str,
    ) -> Result<Box<dyn NetworkStream>, FetchError>;
}
