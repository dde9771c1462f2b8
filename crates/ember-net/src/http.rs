//! Minimal HTTP/1.0 GET client.
//!
//! One request per connection: connect, optionally upgrade to TLS,
//! write `GET {path} HTTP/1.0` with a single `Host` header, read until
//! the server closes, and hand back everything after the first blank
//! line. Status codes are not interpreted and redirects are not
//! followed; a 3xx body is returned like any other.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use crate::config::NetConfig;
use crate::error::FetchError;
use crate::stream::NetworkStream;
use crate::tls::TlsProvider;
use crate::url::{ParsedUrl, Scheme};

/// Header/body separator.
const SEPARATOR: &[u8] = b"\r\n\r\n";

/// Anything that can turn a URL into a response body.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> Result<String, FetchError>,
{
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self(url)
    }
}

/// Socket-backed [`Fetch`] implementation.
pub struct HttpFetcher {
    config: NetConfig,
    tls: Option<Box<dyn TlsProvider>>,
}

impl HttpFetcher {
    /// A fetcher without TLS: `https` URLs fail with
    /// [`FetchError::Connect`].
    pub fn new(config: NetConfig) -> Self {
        Self { config, tls: None }
    }

    /// Attach a TLS provider for `https` URLs.
    pub fn set_tls_provider(&mut self, provider: Box<dyn TlsProvider>) {
        self.tls = Some(provider);
    }

    pub fn has_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Fetch `url` from the socket address `addr` rather than the one
    /// derived from the URL's host and default port.
    fn fetch_from(&self, url: &ParsedUrl, addr: &str) -> Result<String, FetchError> {
        log::debug!("GET {url} via {addr}");
        let stream = self.open(url, addr)?;
        exchange(stream, url)
    }

    /// Connect and, for `https`, complete the TLS handshake.
    fn open(&self, url: &ParsedUrl, addr: &str) -> Result<Box<dyn NetworkStream>, FetchError> {
        let tcp = tcp_connect(addr, &self.config)?;
        match url.scheme {
            Scheme::Http => Ok(Box::new(tcp)),
            Scheme::Https => {
                let provider = self.tls.as_deref().ok_or_else(|| {
                    FetchError::Connect(format!("TLS not available for {}", url.host))
                })?;
                provider.connect_tls(Box::new(tcp), &url.host)
            },
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(NetConfig::default())
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = ParsedUrl::parse(url);
        let addr = format!("{}:{}", parsed.host, parsed.port());
        self.fetch_from(&parsed, &addr)
    }
}

// -------------------------------------------------------------------
// Wire format
// -------------------------------------------------------------------

/// The exact bytes sent for `url`.
pub fn request_text(url: &ParsedUrl) -> String {
    format!("GET {} HTTP/1.0\r\nHost: {}\r\n\r\n", url.path, url.host)
}

/// Send the request on an open stream, read to EOF, return the body.
pub(crate) fn exchange<S: Read + Write>(mut stream: S, url: &ParsedUrl) -> Result<String, FetchError> {
    stream
        .write_all(request_text(url).as_bytes())
        .and_then(|()| stream.flush())
        .map_err(|e| FetchError::Connect(format!("send request: {e}")))?;

    let raw = read_response(&mut stream)?;
    log::debug!("{} bytes from {}", raw.len(), url.host);
    split_response(&raw)
}

/// Split a raw response once on the first `\r\n\r\n`, discard the
/// headers, and decode the body as (lossy) UTF-8.
pub fn split_response(raw: &[u8]) -> Result<String, FetchError> {
    let header_end = find_subsequence(raw, SEPARATOR).ok_or(FetchError::Malformed)?;
    let body = &raw[header_end + SEPARATOR.len()..];
    Ok(String::from_utf8_lossy(body).into_owned())
}

// -------------------------------------------------------------------
// Internals
// -------------------------------------------------------------------

fn tcp_connect(addr: &str, config: &NetConfig) -> Result<TcpStream, FetchError> {
    let stream = match config.connect_timeout() {
        None => TcpStream::connect(addr)
            .map_err(|e| FetchError::Connect(format!("TCP connect to {addr}: {e}")))?,
        Some(timeout) => {
            let sock_addr = addr
                .to_socket_addrs()
                .map_err(|e| FetchError::Connect(format!("DNS resolution failed: {e}")))?
                .next()
                .ok_or_else(|| FetchError::Connect(format!("no addresses for {addr}")))?;
            TcpStream::connect_timeout(&sock_addr, timeout)
                .map_err(|e| FetchError::Connect(format!("TCP connect to {addr}: {e}")))?
        },
    };

    stream
        .set_read_timeout(config.read_timeout())
        .map_err(|e| FetchError::Connect(format!("set read timeout: {e}")))?;

    Ok(stream)
}

/// Read until the peer closes the connection. A read timeout fails
/// the whole response rather than returning what arrived so far.
fn read_response(stream: &mut impl Read) -> Result<Vec<u8>, FetchError> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // TLS peers that close without close_notify.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut =>
            {
                return Err(FetchError::Connect(format!(
                    "read timed out after {} bytes",
                    buf.len()
                )));
            },
            Err(e) => return Err(FetchError::Connect(format!("read response: {e}"))),
        }
    }
    Ok(buf)
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serve one canned response on a loopback port. The join handle
    /// yields the request bytes the server received.
    fn serve_once(response: &'static [u8]) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut req = Vec::new();
            let mut buf = [0u8; 1024];
            while find_subsequence(&req, SEPARATOR).is_none() {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                req.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response).unwrap();
            String::from_utf8(req).unwrap()
        });
        (addr, handle)
    }

    #[test]
    fn request_text_is_minimal_http10() {
        let url = ParsedUrl::parse("http://example.com/index.html");
        assert_eq!(
            request_text(&url),
            "GET /index.html HTTP/1.0\r\nHost: example.com\r\n\r\n"
        );
    }

    #[test]
    fn split_returns_body_verbatim() {
        let body = split_response(b"HTTP/1.0 200 OK\r\nHost: x\r\n\r\nBODY").unwrap();
        assert_eq!(body, "BODY");
    }

    #[test]
    fn split_only_on_first_separator() {
        let body = split_response(b"HTTP/1.0 200 OK\r\n\r\na\r\n\r\nb").unwrap();
        assert_eq!(body, "a\r\n\r\nb");
    }

    #[test]
    fn split_without_separator_is_malformed() {
        let err = split_response(b"HTTP/1.0 200 OK\r\nHost: x\r\nBODY").unwrap_err();
        assert_eq!(err, FetchError::Malformed);
    }

    #[test]
    fn split_empty_body() {
        assert_eq!(split_response(b"HTTP/1.0 204 No Content\r\n\r\n").unwrap(), "");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let body = split_response(b"HTTP/1.0 200 OK\r\n\r\nok\xFF").unwrap();
        assert_eq!(body, "ok\u{FFFD}");
    }

    #[test]
    fn redirect_body_is_returned_as_is() {
        let raw = b"HTTP/1.0 301 Moved\r\nLocation: /new\r\n\r\n<a href=\"/new\">moved</a>";
        assert_eq!(split_response(raw).unwrap(), "<a href=\"/new\">moved</a>");
    }

    #[test]
    fn fetch_over_loopback() {
        let (addr, server) = serve_once(b"HTTP/1.0 200 OK\r\nHost: x\r\n\r\nBODY");
        let fetcher = HttpFetcher::default();
        let url = ParsedUrl::parse("http://example.test/page");

        let body = fetcher.fetch_from(&url, &addr).unwrap();
        assert_eq!(body, "BODY");

        let request = server.join().unwrap();
        assert_eq!(request, "GET /page HTTP/1.0\r\nHost: example.test\r\n\r\n");
    }

    #[test]
    fn loopback_without_separator_is_malformed() {
        let (addr, server) = serve_once(b"HTTP/1.0 200 OK\r\nHost: x\r\nBODY");
        let fetcher = HttpFetcher::default();
        let url = ParsedUrl::parse("http://example.test/");

        let err = fetcher.fetch_from(&url, &addr).unwrap_err();
        assert_eq!(err, FetchError::Malformed);
        let _ = server.join();
    }

    #[test]
    fn stalled_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let _server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            stream.write_all(b"HTTP/1.0 200 OK\r\n\r\n<p>first half").unwrap();
            thread::sleep(std::time::Duration::from_secs(3));
        });

        let fetcher = HttpFetcher::new(NetConfig {
            read_timeout_secs: Some(1),
            ..NetConfig::default()
        });
        let url = ParsedUrl::parse("http://example.test/slow");
        let err = fetcher.fetch_from(&url, &addr).unwrap_err();
        assert!(
            matches!(err, FetchError::Connect(ref m) if m.starts_with("read timed out after")),
            "{err}"
        );
    }

    #[test]
    fn https_without_tls_is_connect_error() {
        let (addr, server) = serve_once(b"");
        let fetcher = HttpFetcher::default();
        assert!(!fetcher.has_tls());
        let url = ParsedUrl::parse("https://example.test/");

        let err = fetcher.fetch_from(&url, &addr).unwrap_err();
        assert!(matches!(err, FetchError::Connect(ref m) if m.contains("TLS not available")));
        drop(server);
    }

    #[test]
    fn refused_connection_is_connect_error() {
        // Bind then drop to get a port nobody is listening on.
        let port = {
            let l = TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let fetcher = HttpFetcher::default();
        let url = ParsedUrl::parse("http://127.0.0.1/");
        let err = fetcher
            .fetch_from(&url, &format!("127.0.0.1:{port}"))
            .unwrap_err();
        assert!(matches!(err, FetchError::Connect(_)));
    }

    #[test]
    fn unresolvable_host_is_connect_error() {
        let fetcher = HttpFetcher::default();
        let err = fetcher.fetch("http://host.invalid/").unwrap_err();
        assert!(matches!(err, FetchError::Connect(_)));
    }

    #[test]
    fn closures_implement_fetch() {
        let fake = |url: &str| -> Result<String, FetchError> { Ok(format!("<p>{url}</p>")) };
        assert_eq!(fake.fetch("http://a.test/").unwrap(), "<p>http://a.test/</p>");
    }
}
