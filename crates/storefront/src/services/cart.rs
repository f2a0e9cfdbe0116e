//! Binds the cart store to the HTTP session.
//!
//! The cart lives in the tower-sessions record as the same JSON string the
//! store would write to any other session storage. Each request takes a
//! snapshot, lets [`CartStore`] work on it synchronously, and writes the
//! snapshot back only if the store changed it.

use std::collections::HashMap;

use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use bihar_bhojan_core::cart::{CART_STORAGE_KEY, CartStore, SessionStorage};

/// A cart bound to the current request's session.
pub type SessionCart = CartStore<SessionSnapshot>;

/// Request-local copy of the session keys the cart uses.
#[derive(Debug, Default)]
pub struct SessionSnapshot {
    values: HashMap<String, String>,
    dirty: bool,
}

impl SessionStorage for SessionSnapshot {
    fn get_item(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
        self.dirty = true;
    }
}

/// Restore the cart from the session.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load(session: &Session) -> Result<SessionCart, SessionError> {
    let mut snapshot = SessionSnapshot::default();
    if let Some(raw) = session.get::<String>(CART_STORAGE_KEY).await? {
        snapshot.values.insert(CART_STORAGE_KEY.to_owned(), raw);
    }
    Ok(CartStore::load(snapshot))
}

/// Write the cart back if it changed.
///
/// # Errors
///
/// Returns an error if the session store cannot be written.
pub async fn save(session: &Session, cart: SessionCart) -> Result<(), SessionError> {
    let snapshot = cart.into_storage();
    if !snapshot.dirty {
        return Ok(());
    }
    if let Some(raw) = snapshot.values.get(CART_STORAGE_KEY) {
        session.insert(CART_STORAGE_KEY, raw).await?;
    }
    Ok(())
}
