/// Why a fetch produced no body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// DNS, TCP, TLS, or socket I/O failure.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response had no `\r\n\r\n` header/body separator.
    #[error("malformed response: no header/body separator")]
    Malformed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_display_carries_reason() {
        let e = FetchError::Connect("DNS resolution failed".into());
        assert_eq!(e.to_string(), "connection failed: DNS resolution failed");
    }

    #[test]
    fn malformed_display() {
        assert!(FetchError::Malformed.to_string().contains("separator"));
    }
}
