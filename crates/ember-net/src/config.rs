use std::time::Duration;

use serde::Deserialize;

/// Socket settings for [`HttpFetcher`](crate::HttpFetcher).
///
/// Both timeouts default to `None`: the fetch blocks for as long as the
/// transport lets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Socket read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
}

impl NetConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_timeouts() {
        let cfg = NetConfig::default();
        assert_eq!(cfg.connect_timeout(), None);
        assert_eq!(cfg.read_timeout(), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: NetConfig = toml::from_str("read_timeout_secs = 15").unwrap();
        assert_eq!(cfg.read_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(cfg.connect_timeout(), None);
    }
}
