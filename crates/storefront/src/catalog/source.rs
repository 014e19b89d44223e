//! Catalog sources and the resolver that walks them.

use std::path::PathBuf;

use mountrush_core::Product;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use super::{Catalog, CatalogTier, builtin};
use crate::storage::{KeyValueStore, codec, load_json, storage_keys};

/// Why a single catalog source could not supply products.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No override list is stored.
    #[error("no product override is stored")]
    NoOverride,

    /// The source parsed but held no usable products.
    #[error("catalog source has no products")]
    Empty,

    /// Reading the catalog file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("catalog request returned status {0}")]
    Status(u16),

    /// The catalog file is not JSON.
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One place the product list can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The administrator's override list in the key-value store.
    Override,
    /// A JSON product file on disk.
    File(PathBuf),
    /// A JSON product file served over HTTP.
    Remote(Url),
    /// The compiled-in sample products.
    BuiltIn,
}

impl CatalogSource {
    /// Interpret a configured catalog location.
    ///
    /// `http://` and `https://` locations that parse as URLs are fetched;
    /// anything else is a filesystem path.
    #[must_use]
    pub fn from_location(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            if let Ok(url) = Url::parse(location) {
                return Self::Remote(url);
            }
        }
        Self::File(PathBuf::from(location))
    }

    /// The tier this source represents.
    #[must_use]
    pub const fn tier(&self) -> CatalogTier {
        match self {
            Self::Override => CatalogTier::Override,
            Self::File(_) => CatalogTier::File,
            Self::Remote(_) => CatalogTier::Remote,
            Self::BuiltIn => CatalogTier::BuiltIn,
        }
    }

    /// Load products from this source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is absent, unreadable, unparseable, or
    /// yields no valid products.
    pub async fn load<S>(
        &self,
        store: &S,
        client: &reqwest::Client,
    ) -> Result<Vec<Product>, CatalogError>
    where
        S: KeyValueStore + ?Sized,
    {
        let products = match self {
            Self::Override => {
                let value = load_json(store, storage_keys::PRODUCTS).ok_or(CatalogError::NoOverride)?;
                codec::decode_products(value)
            }
            Self::File(path) => {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Io {
                        path: path.clone(),
                        source,
                    })?;
                codec::decode_products(serde_json::from_str(&text)?)
            }
            Self::Remote(url) => {
                let response = client
                    .get(url.clone())
                    .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
                    .send()
                    .await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status(status.as_u16()));
                }
                let body = response.text().await?;
                codec::decode_products(serde_json::from_str(&body)?)
            }
            Self::BuiltIn => builtin::sample_products(),
        };

        if products.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(products)
    }
}

/// Resolves the active catalog by trying sources in order.
#[derive(Debug, Clone)]
pub struct CatalogResolver {
    sources: Vec<CatalogSource>,
    client: reqwest::Client,
}

impl CatalogResolver {
    /// Create a resolver over an explicit source order.
    #[must_use]
    pub const fn new(sources: Vec<CatalogSource>, client: reqwest::Client) -> Self {
        Self { sources, client }
    }

    /// The standard chain: override, then `location`, then the built-in samples.
    #[must_use]
    pub fn standard(location: &str, client: reqwest::Client) -> Self {
        Self::new(
            vec![
                CatalogSource::Override,
                CatalogSource::from_location(location),
                CatalogSource::BuiltIn,
            ],
            client,
        )
    }

    /// Sources in the order they are tried.
    #[must_use]
    pub fn sources(&self) -> &[CatalogSource] {
        &self.sources
    }

    /// Resolve the catalog.
    ///
    /// The first source that yields products wins. Failures are logged and
    /// skipped. If every configured source fails, the built-in samples are
    /// used, so the result is never empty.
    #[instrument(skip_all)]
    pub async fn resolve<S>(&self, store: &S) -> Catalog
    where
        S: KeyValueStore + ?Sized,
    {
        for source in &self.sources {
            match source.load(store, &self.client).await {
                Ok(products) => {
                    info!(tier = %source.tier(), count = products.len(), "Catalog resolved");
                    return Catalog::new(products, source.tier());
                }
                Err(e) => debug!(tier = %source.tier(), error = %e, "Catalog source unavailable"),
            }
        }

        info!("All catalog sources failed, using built-in samples");
        Catalog::new(builtin::sample_products(), CatalogTier::BuiltIn)
    }
}
