//! Application state shared across handlers.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use bihar_bhojan_core::booking::MemoryBookingStore;
use bihar_bhojan_core::session::TokenSigner;

use crate::config::StorefrontConfig;
use crate::db::{Bookings, PgBookingStore};
use crate::services::{
    AdminAuthService, BookingService, EmailNotifier, MailTransport, MenuCatalog,
};

/// Booking service as wired into the server.
pub type AppBookingService = BookingService<Bookings, EmailNotifier>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the services handlers call into.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: Option<PgPool>,
    bookings: AppBookingService,
    notifier: EmailNotifier,
    menu: MenuCatalog,
    admin_auth: AdminAuthService,
}

impl AppState {
    /// Create the production state backed by `PostgreSQL` and Resend.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let transport = MailTransport::from_config(&config.email);
        let store = Bookings::Postgres(PgBookingStore::new(pool.clone()));
        Self::build(config, Some(pool), store, transport)
    }

    /// Create a state with in-memory bookings and the given mail transport.
    ///
    /// Used by tests and local runs without a database.
    #[must_use]
    pub fn in_memory(config: StorefrontConfig, transport: MailTransport) -> Self {
        let store = Bookings::Memory(MemoryBookingStore::new());
        Self::build(config, None, store, transport)
    }

    fn build(
        config: StorefrontConfig,
        pool: Option<PgPool>,
        store: Bookings,
        transport: MailTransport,
    ) -> Self {
        let notifier = EmailNotifier::new(
            config.email.from.clone(),
            config.restaurant.clone(),
            &config.base_url,
            transport,
        );
        let admin_auth = AdminAuthService::new(
            config.admin_password.clone(),
            TokenSigner::new(config.session_secret.clone()),
            config.secure_cookies(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                bookings: BookingService::new(store, notifier.clone()),
                menu: MenuCatalog::new(config.menu_path.clone()),
                notifier,
                admin_auth,
                pool,
                config,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the database pool, if the state runs on `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get the booking service.
    #[must_use]
    pub fn bookings(&self) -> &AppBookingService {
        &self.inner.bookings
    }

    /// Get the notifier used for contact messages.
    #[must_use]
    pub fn notifier(&self) -> &EmailNotifier {
        &self.inner.notifier
    }

    /// Get the menu catalog.
    #[must_use]
    pub fn menu(&self) -> &MenuCatalog {
        &self.inner.menu
    }

    /// Get the admin login service.
    #[must_use]
    pub fn admin_auth(&self) -> &AdminAuthService {
        &self.inner.admin_auth
    }

    /// Today's date in the restaurant's time zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now()
            .with_timezone(&self.inner.config.restaurant.utc_offset)
            .date_naive()
    }
}
