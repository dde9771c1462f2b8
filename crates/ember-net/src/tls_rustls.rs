//! [`TlsProvider`] backed by rustls + ring.
//!
//! Enabled by the `tls-rustls` feature. Trust comes from the platform
//! certificate store; when that yields nothing usable the bundled
//! Mozilla roots are used instead.

use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use crate::error::FetchError;
use crate::stream::NetworkStream;
use crate::tls::TlsProvider;

/// Shared, reusable TLS client configuration (one per process).
pub struct RustlsTlsProvider {
    config: Arc<ClientConfig>,
}

impl RustlsTlsProvider {
    /// Build a provider that trusts the platform's root certificates.
    pub fn new() -> Self {
        Self::with_root_store(platform_roots())
    }

    /// Build a provider that trusts exactly `roots`.
    pub fn with_root_store(roots: RootCertStore) -> Self {
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for RustlsTlsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsProvider for RustlsTlsProvider {
    fn connect_tls(
        &self,
        mut stream: Box<dyn NetworkStream>,
        server_name: &str,
    ) -> Result<Box<dyn NetworkStream>, FetchError> {
        let sni = ServerName::try_from(server_name.to_owned())
            .map_err(|e| FetchError::Connect(format!("invalid server name: {e}")))?;

        let mut conn = ClientConnection::new(Arc::clone(&self.config), sni)
            .map_err(|e| FetchError::Connect(format!("TLS init: {e}")))?;

        // rustls is lazy; pump the handshake now so certificate errors
        // surface here rather than on the first read.
        while conn.is_handshaking() {
            conn.complete_io(&mut stream)
                .map_err(|e| FetchError::Connect(format!("TLS handshake with {server_name}: {e}")))?;
        }
        log::debug!("TLS session established with {server_name}");

        Ok(Box::new(StreamOwned::new(conn, stream)))
    }
}

fn platform_roots() -> RootCertStore {
    let mut roots = RootCertStore::empty();

    let native = rustls_native_certs::load_native_certs();
    for err in &native.errors {
        log::warn!("platform trust store: {err}");
    }
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    if ignored > 0 {
        log::debug!("ignored {ignored} unparsable platform root certificates");
    }

    if added == 0 {
        log::warn!("no usable platform root certificates, using bundled Mozilla roots");
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }
    roots
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

    use super::*;
    use crate::http::exchange;
    use crate::url::ParsedUrl;

    #[test]
    fn platform_roots_are_never_empty() {
        assert!(!platform_roots().is_empty());
    }

    #[test]
    fn get_over_tls_to_local_server() {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert_der = cert.der().clone();
        let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));

        let server_config = Arc::new(
            rustls::ServerConfig::builder()
                .with_no_client_auth()
                .with_single_cert(vec![cert_der.clone()], key_der)
                .unwrap(),
        );

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (tcp, _) = listener.accept().unwrap();
            let conn = rustls::ServerConnection::new(server_config).unwrap();
            let mut tls = StreamOwned::new(conn, tcp);
            let mut buf = [0u8; 512];
            let n = tls.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            tls.write_all(b"HTTP/1.0 200 OK\r\n\r\nsecure body").unwrap();
            tls.conn.send_close_notify();
            tls.flush().unwrap();
            request
        });

        let mut roots = RootCertStore::empty();
        roots.add(cert_der).unwrap();
        let provider = RustlsTlsProvider::with_root_store(roots);

        let tcp = TcpStream::connect(addr).unwrap();
        let stream = provider.connect_tls(Box::new(tcp), "localhost").unwrap();
        let body = exchange(stream, &ParsedUrl::parse("https://localhost/hello")).unwrap();

        assert_eq!(body, "secure body");
        let request = server.join().unwrap();
        assert_eq!(request, "GET /hello HTTP/1.0\r\nHost: localhost\r\n\r\n");
    }

    #[test]
    fn untrusted_certificate_is_connect_error() {
        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let key_der = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
        let server_config = Arc::new(
            rustls::ServerConfig::builder()
                .with_no_client_auth()
                .with_single_cert(vec![cert.der().clone()], key_der)
                .unwrap(),
        );

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (tcp, _) = listener.accept().unwrap();
            let conn = rustls::ServerConnection::new(server_config).unwrap();
            let mut tls = StreamOwned::new(conn, tcp);
            let mut buf = [0u8; 64];
            // The client aborts the handshake; the server just sees an error.
            let _ = tls.read(&mut buf);
        });

        // Trust store that does not contain the server's certificate.
        let provider = RustlsTlsProvider::with_root_store(RootCertStore::from_iter(
            webpki_roots::TLS_SERVER_ROOTS.iter().cloned(),
        ));
        let tcp = TcpStream::connect(addr).unwrap();
        let err = provider
            .connect_tls(Box::new(tcp), "localhost")
            .err()
            .unwrap();
        assert!(matches!(err, FetchError::Connect(_)));
        let _ = server.join();
    }
}
