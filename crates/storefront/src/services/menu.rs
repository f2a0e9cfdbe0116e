//! Menu catalog backed by a JSON file.
//!
//! The file holds `{ "menuItems": [...] }`. Reads go through a `moka` cache
//! (single entry, 5-minute TTL); a successful [`MenuCatalog::replace`]
//! rewrites the file and drops the cached copy.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use bihar_bhojan_core::ProductId;
use bihar_bhojan_core::menu::{MenuDocument, MenuItem, MenuValidationError, validate_menu};

/// Errors from reading or writing the menu file.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu file not found")]
    NotFound,

    #[error("Invalid JSON format in menu file")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Invalid menu data structure")]
    InvalidStructure,

    /// The proposed menu failed validation.
    #[error(transparent)]
    Invalid(#[from] MenuValidationError),

    #[error("Permission denied to write menu file")]
    PermissionDenied,

    #[error("Failed to load menu items. Please try again.")]
    Read(#[source] std::io::Error),

    #[error("Failed to update menu items. Please try again.")]
    Write(#[source] std::io::Error),
}

/// Read-mostly access to the menu file.
#[derive(Clone)]
pub struct MenuCatalog {
    inner: Arc<MenuCatalogInner>,
}

struct MenuCatalogInner {
    path: PathBuf,
    cache: Cache<(), Arc<Vec<MenuItem>>>,
}

impl MenuCatalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(MenuCatalogInner {
                path: path.into(),
                cache,
            }),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// All menu items in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or malformed.
    #[instrument(skip(self), fields(path = %self.inner.path.display()))]
    pub async fn items(&self) -> Result<Arc<Vec<MenuItem>>, MenuError> {
        if let Some(items) = self.inner.cache.get(&()).await {
            debug!("Cache hit for menu");
            return Ok(items);
        }

        let items = Arc::new(read_menu_file(&self.inner.path).await?);
        self.inner.cache.insert((), Arc::clone(&items)).await;
        Ok(items)
    }

    /// Look up one item by id.
    ///
    /// # Errors
    ///
    /// See [`MenuCatalog::items`].
    pub async fn find(&self, id: &ProductId) -> Result<Option<MenuItem>, MenuError> {
        let items = self.items().await?;
        Ok(items.iter().find(|item| &item.id == id).cloned())
    }

    /// Validate `items` and make them the whole menu.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Invalid`] for a rejected menu, otherwise a write
    /// error. The file is left untouched when validation fails.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn replace(&self, items: Vec<MenuItem>) -> Result<(), MenuError> {
        validate_menu(&items)?;

        let document = MenuDocument { menu_items: items };
        let json = serde_json::to_string_pretty(&document).map_err(MenuError::InvalidJson)?;

        tokio::fs::write(&self.inner.path, json)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::PermissionDenied => MenuError::PermissionDenied,
                _ => MenuError::Write(e),
            })?;

        self.inner.cache.invalidate(&()).await;
        tracing::info!(count = document.menu_items.len(), "Menu updated");
        Ok(())
    }
}

/// Read and decode the menu file.
///
/// The document must be an object with a `menuItems` array; anything else is
/// reported as a structure error rather than a JSON error.
pub async fn read_menu_file(path: &Path) -> Result<Vec<MenuItem>, MenuError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => MenuError::NotFound,
            _ => MenuError::Read(e),
        })?;

    let value: serde_json::Value = serde_json::from_str(&content).map_err(MenuError::InvalidJson)?;
    if !value.get("menuItems").is_some_and(serde_json::Value::is_array) {
        return Err(MenuError::InvalidStructure);
    }

    let document: MenuDocument =
        serde_json::from_value(value).map_err(|_| MenuError::InvalidStructure)?;
    Ok(document.menu_items)
}
