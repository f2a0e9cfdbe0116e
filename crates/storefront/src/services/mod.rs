//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `admin_auth` - Admin password login and session cookies
//! - `bookings` - Table bookings (validate, store, notify)
//! - `cart` - Cart persistence in the HTTP session
//! - `contact` - Contact form forwarding
//! - `mail` - Email notifications via Resend
//! - `menu` - Menu file catalog

pub mod admin_auth;
pub mod bookings;
pub mod cart;
pub mod contact;
pub mod mail;
pub mod menu;

pub use admin_auth::{ADMIN_COOKIE_NAME, AdminAuthError, AdminAuthService};
pub use bookings::{BookingError, BookingService};
pub use mail::{EmailNotifier, MailError, MailTransport, Notifier, Outbox};
pub use menu::{MenuCatalog, MenuError};
