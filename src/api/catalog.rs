//! Catalog document client
//!
//! Fetches the series/season/episode catalog from the backend. One uncached
//! request per call, no retry.

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;

use crate::api::backend::Backend;
use crate::models::Catalog;

/// Why the catalog could not be loaded
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot reach backend: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Backend returned HTTP {0}")]
    Status(u16),
    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalog client bound to one backend origin
pub struct CatalogClient {
    backend: Backend,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            client: reqwest::Client::new(),
        }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Fetch and parse the catalog, bypassing any HTTP cache
    pub async fn fetch(&self) -> Result<Catalog, CatalogError> {
        let url = self.backend.catalog_url();
        tracing::info!(%url, "fetching catalog");

        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "catalog request failed");
            return Err(CatalogError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let catalog = Catalog::from_json(&text).map_err(|e| {
            tracing::error!(error = %e, "catalog parse failed");
            CatalogError::Parse(e)
        })?;

        tracing::info!(
            series = catalog.series_names().count(),
            episodes = catalog.episode_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}
