//! Bihar Bhojan Core - domain library.
//!
//! This crate holds the logic shared by the storefront server, the CLI and
//! the integration tests:
//! - `storefront` - Public site and password-gated admin API
//! - `cli` - Migrations and menu/booking maintenance
//!
//! # Architecture
//!
//! The core crate performs no network or database I/O. Collaborators that do
//! (session storage, booking persistence) are expressed as traits and passed
//! in by the caller. The optional `postgres` feature only adds `sqlx` type
//! mappings.
//!
//! # Modules
//!
//! - [`types`] - Money, phone, email, IDs and statuses
//! - [`cart`] - Session cart store and derived totals
//! - [`order`] - WhatsApp order message and deep link
//! - [`validation`] - Booking, contact, checkout and login forms
//! - [`session`] - Signed admin session tokens
//! - [`booking`] - Booking records and the `BookingStore` trait
//! - [`menu`] - Menu items, filtering and menu file validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod booking;
pub mod cart;
pub mod menu;
pub mod order;
pub mod session;
pub mod types;
pub mod validation;

pub use types::*;
