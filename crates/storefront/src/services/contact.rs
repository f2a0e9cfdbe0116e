//! Contact form handling.

use bihar_bhojan_core::validation::{ContactForm, ContactMessage, ValidationError};

use crate::services::mail::Notifier;

/// Validate a contact form and forward it to the restaurant.
///
/// Delivery runs in the background; success only means the message passed
/// validation and was handed off.
///
/// # Errors
///
/// Returns the first validation error in field order.
pub fn send<N: Notifier>(notifier: &N, form: &ContactForm) -> Result<ContactMessage, ValidationError> {
    let message = form.validate()?;
    tracing::info!(name = %message.name, "Contact message received");
    notifier.contact_message(&message);
    Ok(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::RestaurantConfig;
    use crate::services::mail::{EmailNotifier, MailTransport, Outbox};

    fn notifier(outbox: &Outbox) -> EmailNotifier {
        EmailNotifier::new(
            "contact@biharbhojan.com",
            RestaurantConfig::default(),
            "http://localhost:3000",
            MailTransport::Memory(outbox.clone()),
        )
    }

    fn form(message: &str) -> ContactForm {
        ContactForm {
            name: Some("Prakash".into()),
            email: Some("prakash@example.in".into()),
            phone: Some("9000012345".into()),
            message: Some(message.into()),
        }
    }

    #[test]
    fn test_valid_message_is_forwarded() {
        let outbox = Outbox::new();
        send(&notifier(&outbox), &form("Is the thali available on Sundays?")).unwrap();
        assert_eq!(outbox.emails().len(), 1);
    }

    #[test]
    fn test_short_message_is_rejected() {
        let outbox = Outbox::new();
        let err = send(&notifier(&outbox), &form("Hi there")).unwrap_err();
        assert_eq!(err.to_string(), "Message must be at least 10 characters");
        assert!(outbox.emails().is_empty());
    }
}
