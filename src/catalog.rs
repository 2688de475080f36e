//! Product catalog loaded from a static storefront export.
//!
//! The export is a JSON object with a `products` array. Only the fields the
//! assistant needs are read; everything else in the export is ignored.
//!
//! The catalog is read once at startup and handed to the assistant as an
//! immutable value. A missing or unparseable export is not fatal: it becomes
//! [`CatalogState::Unavailable`], which search callers must report
//! separately from "no products matched".

use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    products: Vec<RawProduct>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    title: Option<String>,
    handle: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    vendor: Option<String>,
    product_type: Option<String>,
    #[serde(default)]
    variants: Vec<RawVariant>,
    #[serde(default)]
    images: Vec<RawImage>,
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    src: Option<String>,
}

impl RawProduct {
    fn normalize(self) -> Option<Product> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let handle = self.handle.filter(|h| !h.trim().is_empty())?;
        Some(Product {
            title,
            handle,
            vendor: self.vendor.unwrap_or_default(),
            product_type: self.product_type.unwrap_or_default(),
            tags: self.tags,
            price: self.variants.into_iter().next().and_then(|v| v.price),
            image: self.images.into_iter().next().and_then(|i| i.src),
        })
    }
}

/// Immutable, in-memory list of products in export order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Parse an export. Entries lacking a title or handle are skipped.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: RawCatalog = serde_json::from_str(raw)?;
        let total = parsed.products.len();
        let products: Vec<Product> = parsed
            .products
            .into_iter()
            .filter_map(RawProduct::normalize)
            .collect();
        if products.len() < total {
            warn!(
                skipped = total - products.len(),
                "catalog entries without title or handle were skipped"
            );
        }
        Ok(Self { products })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                CatalogError::Missing(path.to_path_buf())
            } else {
                CatalogError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&raw).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Outcome of loading the catalog at startup.
#[derive(Debug, Clone)]
pub enum CatalogState {
    Ready(Catalog),
    /// The export could not be read; carries the reason for diagnostics.
    Unavailable(String),
}

impl CatalogState {
    pub fn load(path: &Path) -> Self {
        match Catalog::load(path) {
            Ok(catalog) => {
                info!(path = %path.display(), products = catalog.len(), "catalog loaded");
                CatalogState::Ready(catalog)
            }
            Err(e) => {
                warn!(error = %e, "catalog unavailable; product search disabled");
                CatalogState::Unavailable(e.to_string())
            }
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            CatalogState::Ready(catalog) => Some(catalog),
            CatalogState::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CatalogState::Ready(_))
    }
}

/// Storefront link for a product handle.
pub fn product_url(storefront_domain: &str, handle: &str) -> String {
    format!("https://{}/en-eu/products/{}", storefront_domain, handle)
}
