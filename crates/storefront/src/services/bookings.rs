//! Table booking workflow: validate, store, notify.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::instrument;

use bihar_bhojan_core::booking::{Booking, BookingStore, StoreError};
use bihar_bhojan_core::validation::{BookingForm, ValidationError};
use bihar_bhojan_core::{BookingId, BookingStatus, InvalidStatus};

use crate::services::mail::Notifier;

/// Errors surfaced by [`BookingService`]. Display strings are shown to users.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),

    #[error("Booking not found.")]
    NotFound,

    #[error("Failed to create booking. Please try again.")]
    Create(#[source] StoreError),

    #[error("Failed to fetch bookings. Please try again.")]
    Fetch(#[source] StoreError),

    #[error("Failed to update booking status. Please try again.")]
    Update(#[source] StoreError),
}

/// Booking operations over a store and a notifier.
#[derive(Clone)]
pub struct BookingService<S, N> {
    store: S,
    notifier: N,
}

impl<S: BookingStore, N: Notifier> BookingService<S, N> {
    pub const fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validate and store a booking, then notify the restaurant.
    ///
    /// The notification is not awaited; a failed send does not fail the
    /// booking.
    ///
    /// # Errors
    ///
    /// Returns the first validation error, or [`BookingError::Create`].
    #[instrument(skip(self, form))]
    pub async fn create(&self, form: &BookingForm, today: NaiveDate) -> Result<Booking, BookingError> {
        let request = form.validate(today)?;
        let booking = self.store.create(request).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to store booking");
            BookingError::Create(e)
        })?;

        tracing::info!(booking_id = %booking.id, party_size = booking.party_size, "Booking created");
        self.notifier.booking_received(&booking);
        Ok(booking)
    }

    /// Every booking, newest date first.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Fetch`] if the store fails.
    pub async fn list(&self) -> Result<Vec<Booking>, BookingError> {
        self.store.list().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch bookings");
            BookingError::Fetch(e)
        })
    }

    /// Change a booking's status and email the guest.
    ///
    /// Any status may follow any other. An `id` that is not a booking id is
    /// treated as not found.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidStatus`] for an unknown status,
    /// [`BookingError::NotFound`], or [`BookingError::Update`].
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: &str) -> Result<Booking, BookingError> {
        let status: BookingStatus = status.parse()?;
        let id: BookingId = id.parse().map_err(|_| BookingError::NotFound)?;

        let booking = self
            .store
            .update_status(id, status)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => BookingError::NotFound,
                e => {
                    tracing::error!(error = %e, "Failed to update booking status");
                    BookingError::Update(e)
                }
            })?;

        tracing::info!(booking_id = %booking.id, status = %booking.status, "Booking status updated");
        self.notifier.booking_status_changed(&booking);
        Ok(booking)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::RestaurantConfig;
    use crate::services::mail::{EmailNotifier, MailTransport, Outbox};
    use bihar_bhojan_core::booking::MemoryBookingStore;

    fn service(outbox: &Outbox) -> BookingService<MemoryBookingStore, EmailNotifier> {
        let notifier = EmailNotifier::new(
            "bookings@biharbhojan.com",
            RestaurantConfig::default(),
            "http://localhost:3000",
            MailTransport::Memory(outbox.clone()),
        );
        BookingService::new(MemoryBookingStore::new(), notifier)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn form() -> BookingForm {
        serde_json::from_value(serde_json::json!({
            "name": "Sunita Devi",
            "email": "sunita@example.in",
            "phone": "9876501234",
            "date": "2026-03-20",
            "time": "20:00",
            "partySize": 3
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_stores_and_notifies() {
        let outbox = Outbox::new();
        let service = service(&outbox);

        let booking = service.create(&form(), today()).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(service.list().await.unwrap().len(), 1);

        let emails = outbox.emails();
        assert_eq!(emails.len(), 1);
        assert_eq!(
            emails.first().unwrap().subject,
            "New Booking: Sunita Devi - 3 people"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_form_without_storing() {
        let outbox = Outbox::new();
        let service = service(&outbox);
        let mut form = form();
        form.phone = Some("12345".into());

        let err = service.create(&form, today()).await.unwrap_err();
        assert_eq!(err.to_string(), "Phone number must be 10 digits");
        assert!(service.list().await.unwrap().is_empty());
        assert!(outbox.emails().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_notifies_guest() {
        let outbox = Outbox::new();
        let service = service(&outbox);
        let booking = service.create(&form(), today()).await.unwrap();

        let updated = service
            .update_status(&booking.id.to_string(), "confirmed")
            .await
            .unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);

        let last = outbox.emails().pop().unwrap();
        assert_eq!(last.to, "sunita@example.in");
        assert_eq!(last.subject, "Booking CONFIRMED: Bihar Bhojan - 20/03/2026");
    }

    #[tokio::test]
    async fn test_update_status_errors() {
        let outbox = Outbox::new();
        let service = service(&outbox);

        let err = service
            .update_status(&BookingId::new().to_string(), "seated")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status. Must be pending, confirmed, or cancelled."
        );

        let err = service
            .update_status(&BookingId::new().to_string(), "cancelled")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Booking not found.");

        let err = service.update_status("not-a-uuid", "cancelled").await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound));
        assert!(outbox.emails().is_empty());
    }
}
