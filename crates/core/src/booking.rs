//! Table bookings and their persistence seam.
//!
//! [`BookingStore`] is what the booking service talks to. The storefront
//! backs it with Postgres; [`MemoryBookingStore`] backs it with a vector for
//! tests and local runs without a database.

use std::future::Future;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::types::{BookingId, BookingStatus, Email, PhoneNumber};
use crate::validation::BookingRequest;

/// A stored table booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub date: NaiveDate,
    pub time: String,
    pub party_size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// A new `pending` booking created at `now`.
    #[must_use]
    pub fn from_request(request: BookingRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: BookingId::new(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            date: request.date,
            time: request.time,
            party_size: request.party_size,
            special_requests: request.special_requests,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Date as `dd/mm/yyyy`, the way Indian guests read it.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// Date spelled out, e.g. `Saturday, 14 March 2026`.
    #[must_use]
    pub fn long_date(&self) -> String {
        self.date.format("%A, %-d %B %Y").to_string()
    }

    /// `1 person`, `4 people`.
    #[must_use]
    pub fn party_label(&self) -> String {
        if self.party_size == 1 {
            "1 person".to_owned()
        } else {
            format!("{} people", self.party_size)
        }
    }

    /// Ordering key for listings: newest date first, then latest time.
    fn listing_key(&self) -> (NaiveDate, &str) {
        (self.date, self.time.as_str())
    }
}

/// Errors from a [`BookingStore`].
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("booking not found")]
    NotFound,
    #[error("booking store error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(e))
    }
}

/// Persistence for bookings.
pub trait BookingStore: Send + Sync {
    /// Store a validated request as a new `pending` booking.
    fn create(
        &self,
        request: BookingRequest,
    ) -> impl Future<Output = Result<Booking, StoreError>> + Send;

    /// All bookings, by date then time, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Booking>, StoreError>> + Send;

    /// Set a booking's status and return the updated record.
    ///
    /// Returns [`StoreError::NotFound`] if no booking has this id.
    fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> impl Future<Output = Result<Booking, StoreError>> + Send;
}

/// [`BookingStore`] held in process memory.
#[derive(Debug, Default)]
pub struct MemoryBookingStore {
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryBookingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn create_now(&self, request: BookingRequest) -> Booking {
        let booking = Booking::from_request(request, Utc::now());
        self.bookings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(booking.clone());
        booking
    }

    fn list_now(&self) -> Vec<Booking> {
        let mut bookings = self
            .bookings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        bookings.sort_by(|a, b| b.listing_key().cmp(&a.listing_key()));
        bookings
    }

    fn update_now(&self, id: BookingId, status: BookingStatus) -> Result<Booking, StoreError> {
        let mut bookings = self.bookings.write().unwrap_or_else(PoisonError::into_inner);
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(StoreError::NotFound)?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }
}

impl BookingStore for MemoryBookingStore {
    fn create(
        &self,
        request: BookingRequest,
    ) -> impl Future<Output = Result<Booking, StoreError>> + Send {
        std::future::ready(Ok(self.create_now(request)))
    }

    fn list(&self) -> impl Future<Output = Result<Vec<Booking>, StoreError>> + Send {
        std::future::ready(Ok(self.list_now()))
    }

    fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> impl Future<Output = Result<Booking, StoreError>> + Send {
        std::future::ready(self.update_now(id, status))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(date: (i32, u32, u32), time: &str) -> BookingRequest {
        BookingRequest {
            name: "Asha Kumari".into(),
            email: Email::parse("asha@example.in").unwrap(),
            phone: PhoneNumber::parse("9876543210").unwrap(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: time.into(),
            party_size: 1,
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn test_new_bookings_start_pending() {
        let store = MemoryBookingStore::new();
        let booking = store.create(request((2026, 3, 20), "19:30")).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.created_at, booking.updated_at);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_time_desc() {
        let store = MemoryBookingStore::new();
        store.create(request((2026, 3, 20), "12:00")).await.unwrap();
        store.create(request((2026, 3, 21), "13:00")).await.unwrap();
        store.create(request((2026, 3, 20), "19:30")).await.unwrap();

        let listed: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| (b.date.to_string(), b.time))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("2026-03-21".to_owned(), "13:00".to_owned()),
                ("2026-03-20".to_owned(), "19:30".to_owned()),
                ("2026-03-20".to_owned(), "12:00".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_status_missing_is_not_found() {
        let store = MemoryBookingStore::new();
        let result = store.update_status(BookingId::new(), BookingStatus::Confirmed).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_cancelled_booking_can_be_confirmed_again() {
        let store = MemoryBookingStore::new();
        let booking = store.create(request((2026, 3, 20), "19:30")).await.unwrap();
        store.update_status(booking.id, BookingStatus::Cancelled).await.unwrap();
        let updated = store.update_status(booking.id, BookingStatus::Confirmed).await.unwrap();
        assert_eq!(updated.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_display_helpers() {
        let mut booking = Booking::from_request(request((2026, 3, 7), "19:30"), Utc::now());
        assert_eq!(booking.display_date(), "07/03/2026");
        assert_eq!(booking.long_date(), "Saturday, 7 March 2026");
        assert_eq!(booking.party_label(), "1 person");
        booking.party_size = 6;
        assert_eq!(booking.party_label(), "6 people");
    }

    #[test]
    fn test_serializes_camel_case_without_empty_requests() {
        let booking = Booking::from_request(request((2026, 3, 7), "19:30"), Utc::now());
        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["partySize"], 1);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["date"], "2026-03-07");
        assert!(json.get("specialRequests").is_none());
    }
}
