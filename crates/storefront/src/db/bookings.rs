//! Booking persistence in `PostgreSQL`.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bihar_bhojan_core::booking::{Booking, BookingStore, MemoryBookingStore, StoreError};
use bihar_bhojan_core::validation::BookingRequest;
use bihar_bhojan_core::{BookingId, BookingStatus, Email, PhoneNumber};

use super::RepositoryError;

const BOOKING_COLUMNS: &str = "id, name, email, phone, date, time, party_size, \
                               special_requests, status, created_at, updated_at";

/// A `bookings` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    date: NaiveDate,
    time: String,
    party_size: i16,
    special_requests: Option<String>,
    status: BookingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepositoryError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let phone = PhoneNumber::parse(&row.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
        })?;
        let party_size = u8::try_from(row.party_size).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "invalid party size in database: {}",
                row.party_size
            ))
        })?;

        Ok(Self {
            id: BookingId::from_uuid(row.id),
            name: row.name,
            email,
            phone,
            date: row.date,
            time: row.time,
            party_size,
            special_requests: row.special_requests,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// [`BookingStore`] over the `bookings` table.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new pending booking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, request: BookingRequest) -> Result<Booking, RepositoryError> {
        let booking = Booking::from_request(request, Utc::now());
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r"
            INSERT INTO bookings (id, name, email, phone, date, time, party_size,
                                  special_requests, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {BOOKING_COLUMNS}
            "
        ))
        .bind(booking.id)
        .bind(&booking.name)
        .bind(booking.email.as_str())
        .bind(booking.phone.as_str())
        .bind(booking.date)
        .bind(&booking.time)
        .bind(i16::from(booking.party_size))
        .bind(booking.special_requests.as_deref())
        .bind(booking.status)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// All bookings, newest date and time first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY date DESC, time DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    /// Set the status of one booking.
    ///
    /// Returns `Ok(None)` if no booking has this id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r"
            UPDATE bookings
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Booking::try_from).transpose()
    }
}

impl BookingStore for PgBookingStore {
    async fn create(&self, request: BookingRequest) -> Result<Booking, StoreError> {
        self.insert(request).await.map_err(StoreError::backend)
    }

    async fn list(&self) -> Result<Vec<Booking>, StoreError> {
        self.list_all().await.map_err(StoreError::backend)
    }

    async fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<Booking, StoreError> {
        self.set_status(id, status)
            .await
            .map_err(StoreError::backend)?
            .ok_or(StoreError::NotFound)
    }
}

/// The booking store the server runs with.
pub enum Bookings {
    Postgres(PgBookingStore),
    /// Process memory; bookings are lost on restart.
    Memory(MemoryBookingStore),
}

impl BookingStore for Bookings {
    fn create(
        &self,
        request: BookingRequest,
    ) -> impl Future<Output = Result<Booking, StoreError>> + Send {
        async move {
            match self {
                Self::Postgres(store) => store.create(request).await,
                Self::Memory(store) => store.create(request).await,
            }
        }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<Booking>, StoreError>> + Send {
        async move {
            match self {
                Self::Postgres(store) => store.list().await,
                Self::Memory(store) => store.list().await,
            }
        }
    }

    fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> impl Future<Output = Result<Booking, StoreError>> + Send {
        async move {
            match self {
                Self::Postgres(store) => store.update_status(id, status).await,
                Self::Memory(store) => store.update_status(id, status).await,
            }
        }
    }
}
