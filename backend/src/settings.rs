//! Catalogue configuration loaded via OrthoConfig.
//!
//! Values come from `CATALOGUE_*` environment variables, command-line flags
//! or configuration files. Unset fields fall back to the defaults declared
//! on each field; seeding stays off unless `seed_path` is given.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Runtime settings for the catalogue server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CATALOGUE")]
pub struct CatalogueSettings {
    /// Socket address the HTTP server binds to.
    #[ortho_config(default = "0.0.0.0:8080".to_owned())]
    pub bind_addr: String,
    /// Stores per listing page.
    #[ortho_config(default = 4)]
    pub page_size: u64,
    /// Number of stores returned by the top-stores ranking.
    #[ortho_config(default = 10)]
    pub top_stores_limit: usize,
    /// Deadline applied to each document-store call, in milliseconds.
    #[ortho_config(default = 5_000)]
    pub query_timeout_ms: u64,
    /// Slug assignment attempts before a write is reported as a conflict.
    #[ortho_config(default = 3)]
    pub slug_retry_attempts: u32,
    /// JSON fixture loaded into the document store at startup.
    pub seed_path: Option<PathBuf>,
}

impl CatalogueSettings {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Seed fixture path, when seeding is configured.
    pub fn seed_path(&self) -> Option<&Path> {
        self.seed_path.as_deref()
    }
}
