//! Booking inspection.

use thiserror::Error;

use bihar_bhojan_core::{BookingStatus, InvalidStatus};
use bihar_bhojan_storefront::db::{PgBookingStore, RepositoryError};

use super::{DatabaseError, connect};

/// Errors that can occur while listing bookings.
#[derive(Debug, Error)]
pub enum BookingsError {
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),

    #[error(transparent)]
    Connect(#[from] DatabaseError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Print bookings, newest date first.
#[allow(clippy::print_stdout)]
pub async fn list(status: Option<&str>) -> Result<(), BookingsError> {
    let status: Option<BookingStatus> = status.map(str::parse).transpose()?;

    let pool = connect().await?;
    let bookings = PgBookingStore::new(pool).list_all().await?;

    let mut shown = 0_usize;
    for booking in bookings
        .iter()
        .filter(|b| status.is_none_or(|s| b.status == s))
    {
        println!(
            "{}  {} {:>5}  {:<9}  {:>2} guests  {} <{}> {}",
            booking.id,
            booking.display_date(),
            booking.time,
            booking.status.as_str(),
            booking.party_size,
            booking.name,
            booking.email,
            booking.phone,
        );
        shown += 1;
    }

    tracing::info!("{shown} bookings");
    Ok(())
}
