//! Session-scoped shopping cart.
//!
//! A [`CartStore`] owns the line items for one browsing session and writes
//! the full item list back to its [`SessionStorage`] after every mutation.
//! Totals are never stored; [`CartStore::totals`] recomputes them from the
//! items on each call.
//!
//! Two tabs sharing one session each hold their own copy of the cart and
//! persist independently, so the last write wins. This is a known
//! limitation, not something the store tries to reconcile.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// Storage key the serialized cart lives under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Session-scoped key-value store the cart persists into.
pub trait SessionStorage {
    /// Read the raw value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`.
    fn set_item(&mut self, key: &str, value: String);
}

/// In-process [`SessionStorage`] backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }
}

impl<S: SessionStorage + ?Sized> SessionStorage for &mut S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: String) {
        (**self).set_item(key, value);
    }
}

/// Product details needed to put something in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemInput {
    pub product_id: ProductId,
    pub name: String,
    pub localized_name: String,
    pub unit_price: Money,
    pub image: String,
}

/// One product-quantity pair in the cart. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub localized_name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub image_ref: String,
}

impl LineItem {
    /// `unit_price × quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

impl From<LineItemInput> for LineItem {
    fn from(input: LineItemInput) -> Self {
        Self {
            product_id: input.product_id,
            name: input.name,
            localized_name: input.localized_name,
            unit_price: input.unit_price,
            quantity: 1,
            image_ref: input.image,
        }
    }
}

/// Derived cart totals, each rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    /// Compute totals for a list of line items.
    #[must_use]
    pub fn from_items(items: &[LineItem]) -> Self {
        let subtotal = items.iter().map(LineItem::line_total).sum::<Money>().round_cents();
        let tax = subtotal.tax();
        Self {
            subtotal,
            tax,
            total: (subtotal + tax).round_cents(),
        }
    }
}

/// The cart for one session, bound to the storage it persists into.
#[derive(Debug)]
pub struct CartStore<S: SessionStorage> {
    storage: S,
    items: Vec<LineItem>,
}

impl<S: SessionStorage> CartStore<S> {
    /// Restore the cart from `storage`.
    ///
    /// A missing key yields an empty cart. A value that fails to parse is
    /// logged and also yields an empty cart; the bad value is left in place
    /// until the next mutation overwrites it.
    pub fn load(storage: S) -> Self {
        let items = match storage.get_item(CART_STORAGE_KEY) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<LineItem>>(&raw) {
                Ok(mut items) => {
                    items.retain(|item| item.quantity > 0);
                    items
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse stored cart, starting empty");
                    Vec::new()
                }
            },
        };

        Self { storage, items }
    }

    /// Add one unit of a product, inserting it if absent.
    pub fn add(&mut self, input: LineItemInput) {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == input.product_id)
        {
            Some(item) => item.quantity = item.quantity.saturating_add(1),
            None => self.items.push(input.into()),
        }
        self.persist();
    }

    /// Remove a product. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|item| &item.product_id != product_id);
        self.persist();
    }

    /// Overwrite a product's quantity; zero or less removes it.
    ///
    /// Setting the quantity of a product that is not in the cart does nothing.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
        {
            item.quantity = quantity;
        }
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Subtotal, tax and total for the current items.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::from_items(&self.items)
    }

    /// Give the storage back, e.g. to flush it somewhere else.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => self.storage.set_item(CART_STORAGE_KEY, json),
            Err(e) => tracing::error!(error = %e, "Failed to serialize cart"),
        }
    }
}
