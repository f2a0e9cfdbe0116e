//! Email notifications for bookings and contact messages.
//!
//! Bodies are rendered from Askama templates (HTML + plain text) and sent
//! through the Resend HTTP API. Sending is fire-and-forget: callers never
//! wait on delivery and never see its outcome, which is only logged.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use askama::Template;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

use bihar_bhojan_core::BookingStatus;
use bihar_bhojan_core::booking::Booking;
use bihar_bhojan_core::validation::ContactMessage;

use crate::config::{EmailConfig, RestaurantConfig};

/// Resend send-email endpoint.
const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Upper bound on a single delivery attempt.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Templates
// =============================================================================

#[derive(Template)]
#[template(path = "email/booking_received.html")]
struct BookingReceivedHtml<'a> {
    booking: &'a Booking,
    special_requests: &'a str,
    admin_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/booking_received.txt")]
struct BookingReceivedText<'a> {
    booking: &'a Booking,
    special_requests: &'a str,
}

#[derive(Template)]
#[template(path = "email/booking_status.html")]
struct BookingStatusHtml<'a> {
    booking: &'a Booking,
    confirmed: bool,
    restaurant_phone: &'a str,
    restaurant_email: &'a str,
    restaurant_whatsapp: &'a str,
}

#[derive(Template)]
#[template(path = "email/booking_status.txt")]
struct BookingStatusText<'a> {
    booking: &'a Booking,
    confirmed: bool,
}

#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactHtml<'a> {
    message: &'a ContactMessage,
}

#[derive(Template)]
#[template(path = "email/contact.txt")]
struct ContactText<'a> {
    message: &'a ContactMessage,
}

// =============================================================================
// Errors and messages
// =============================================================================

/// Errors that can occur when rendering or sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Resend rejected the message.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Delivery did not finish in time.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// A fully rendered email ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub reply_to: Option<String>,
}

/// Request body for `POST /emails`.
#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

// =============================================================================
// Transports
// =============================================================================

/// Thin client for the Resend API.
#[derive(Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    api_key: SecretString,
}

impl ResendClient {
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Send one email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Resend answers non-2xx.
    pub async fn send(&self, from: &str, email: &OutgoingEmail) -> Result<(), MailError> {
        let body = ResendRequest {
            from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// In-memory record of sent emails, for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    emails: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl Outbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, email: OutgoingEmail) {
        self.emails
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email);
    }

    /// Everything delivered so far, oldest first.
    #[must_use]
    pub fn emails(&self) -> Vec<OutgoingEmail> {
        self.emails
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Where rendered emails go.
#[derive(Clone)]
pub enum MailTransport {
    /// Deliver through Resend.
    Resend(ResendClient),
    /// Log the email at info level instead of sending it.
    Log,
    /// Keep the email in an [`Outbox`].
    Memory(Outbox),
}

impl MailTransport {
    /// Resend when an API key is configured, otherwise log.
    #[must_use]
    pub fn from_config(config: &EmailConfig) -> Self {
        config
            .resend_api_key
            .clone()
            .map_or(Self::Log, |key| Self::Resend(ResendClient::new(key)))
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Outbound notifications raised by the booking and contact flows.
///
/// Every method returns immediately; delivery happens in the background.
pub trait Notifier: Send + Sync {
    /// Tell the restaurant about a new booking.
    fn booking_received(&self, booking: &Booking);

    /// Tell the guest their booking changed status.
    fn booking_status_changed(&self, booking: &Booking);

    /// Forward a contact form message to the restaurant.
    fn contact_message(&self, message: &ContactMessage);
}

/// [`Notifier`] that sends email.
#[derive(Clone)]
pub struct EmailNotifier {
    from: String,
    restaurant: RestaurantConfig,
    admin_url: String,
    transport: MailTransport,
}

impl EmailNotifier {
    #[must_use]
    pub fn new(
        from: impl Into<String>,
        restaurant: RestaurantConfig,
        base_url: &str,
        transport: MailTransport,
    ) -> Self {
        Self {
            from: from.into(),
            restaurant,
            admin_url: format!("{}/admin", base_url.trim_end_matches('/')),
            transport,
        }
    }

    /// Render the "new booking" email for the restaurant inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render_booking_received(&self, booking: &Booking) -> Result<OutgoingEmail, MailError> {
        let special_requests = booking.special_requests.as_deref().unwrap_or_default();
        let html = BookingReceivedHtml {
            booking,
            special_requests,
            admin_url: &self.admin_url,
        }
        .render()?;
        let text = BookingReceivedText {
            booking,
            special_requests,
        }
        .render()?;

        Ok(OutgoingEmail {
            to: self.restaurant.email.clone(),
            subject: format!("New Booking: {} - {} people", booking.name, booking.party_size),
            html,
            text,
            reply_to: None,
        })
    }

    /// Render the status update email for the guest.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render_booking_status(&self, booking: &Booking) -> Result<OutgoingEmail, MailError> {
        let confirmed = booking.status == BookingStatus::Confirmed;
        let html = BookingStatusHtml {
            booking,
            confirmed,
            restaurant_phone: &self.restaurant.phone,
            restaurant_email: &self.restaurant.email,
            restaurant_whatsapp: &self.restaurant.whatsapp,
        }
        .render()?;
        let text = BookingStatusText { booking, confirmed }.render()?;

        Ok(OutgoingEmail {
            to: booking.email.to_string(),
            subject: format!(
                "Booking {}: Bihar Bhojan - {}",
                booking.status.as_str().to_uppercase(),
                booking.display_date()
            ),
            html,
            text,
            reply_to: None,
        })
    }

    /// Render a contact form message, replying to the sender.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render_contact(&self, message: &ContactMessage) -> Result<OutgoingEmail, MailError> {
        Ok(OutgoingEmail {
            to: self.restaurant.email.clone(),
            subject: format!("Contact Form: {}", message.name),
            html: ContactHtml { message }.render()?,
            text: ContactText { message }.render()?,
            reply_to: Some(message.email.to_string()),
        })
    }

    /// Hand a rendered email to the transport without waiting for it.
    fn dispatch(&self, kind: &'static str, rendered: Result<OutgoingEmail, MailError>) {
        let email = match rendered {
            Ok(email) => email,
            Err(e) => {
                tracing::error!(kind, error = %e, "Failed to render email");
                return;
            }
        };

        match &self.transport {
            MailTransport::Resend(client) => {
                let client = client.clone();
                let from = self.from.clone();
                tokio::spawn(async move {
                    let result = tokio::time::timeout(SEND_TIMEOUT, client.send(&from, &email))
                        .await
                        .unwrap_or(Err(MailError::Timeout(SEND_TIMEOUT)));
                    match result {
                        Ok(()) => {
                            tracing::info!(kind, to = %email.to, subject = %email.subject, "Email sent successfully");
                        }
                        Err(e) => {
                            tracing::error!(kind, to = %email.to, error = %e, "Failed to send email");
                        }
                    }
                });
            }
            MailTransport::Log => {
                tracing::info!(
                    kind,
                    to = %email.to,
                    from = %self.from,
                    subject = %email.subject,
                    body = %email.text,
                    "Email not sent (no API key configured)"
                );
            }
            MailTransport::Memory(outbox) => outbox.push(email),
        }
    }
}

impl Notifier for EmailNotifier {
    fn booking_received(&self, booking: &Booking) {
        self.dispatch("booking_received", self.render_booking_received(booking));
    }

    fn booking_status_changed(&self, booking: &Booking) {
        self.dispatch("booking_status", self.render_booking_status(booking));
    }

    fn contact_message(&self, message: &ContactMessage) {
        self.dispatch("contact", self.render_contact(message));
    }
}
