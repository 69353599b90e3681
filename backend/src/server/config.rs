//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use catalogue::settings::CatalogueSettings;

/// Resolved configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) page_size: u64,
    pub(crate) top_stores_limit: usize,
    pub(crate) query_timeout: Duration,
    pub(crate) slug_retry_attempts: u32,
    pub(crate) seed_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Resolve loaded settings into a server configuration.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the bind address does not parse.
    pub fn from_settings(settings: &CatalogueSettings) -> std::io::Result<Self> {
        let raw = settings.bind_addr.as_str();
        let bind_addr = raw.parse::<SocketAddr>().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw}: {err}"),
            )
        })?;
        Ok(Self {
            bind_addr,
            page_size: settings.page_size,
            top_stores_limit: settings.top_stores_limit,
            query_timeout: settings.query_timeout(),
            slug_retry_attempts: settings.slug_retry_attempts,
            seed_path: settings.seed_path().map(PathBuf::from),
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> CatalogueSettings {
        CatalogueSettings {
            bind_addr: "127.0.0.1:9000".to_owned(),
            page_size: 4,
            top_stores_limit: 10,
            query_timeout_ms: 250,
            slug_retry_attempts: 3,
            seed_path: None,
        }
    }

    #[rstest]
    fn resolves_loaded_settings(settings: CatalogueSettings) {
        let config = ServerConfig::from_settings(&settings).expect("valid settings");
        assert_eq!(config.bind_addr().port(), 9000);
        assert_eq!(config.query_timeout, Duration::from_millis(250));
        assert!(config.seed_path.is_none());
    }

    #[rstest]
    fn rejects_malformed_bind_addresses(mut settings: CatalogueSettings) {
        settings.bind_addr = "localhost".to_owned();
        let error = ServerConfig::from_settings(&settings).expect_err("bad address");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }
}
