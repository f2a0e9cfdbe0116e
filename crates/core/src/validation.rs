//! Form validation.
//!
//! Each form has a raw, stringly-typed shape that deserializes from whatever
//! the client sent, and a `validate` method that returns the typed value or
//! the first [`ValidationError`] in field order. Validation never touches
//! external state; anything time-dependent (the booking date) takes "today"
//! from the caller.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{Email, PhoneError, PhoneNumber};

/// Maximum party size accepted for a table booking.
pub const MAX_PARTY_SIZE: u8 = 20;

/// Shortest password the admin login form accepts.
pub const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("Invalid regex"));

/// First rule violation found while validating a form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Wire name of the offending field (`partySize`, not `party_size`).
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    #[must_use]
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

type Result<T> = std::result::Result<T, ValidationError>;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn required<'a>(value: Option<&'a str>, field: &'static str, message: &'static str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::new(field, message)),
    }
}

fn name(value: Option<&str>) -> Result<String> {
    let v = required(value, "name", "Name is required")?;
    match char_len(v) {
        n if n < 2 => Err(ValidationError::new("name", "Name must be at least 2 characters")),
        n if n > 100 => Err(ValidationError::new("name", "Name must be less than 100 characters")),
        _ => Ok(v.to_owned()),
    }
}

fn email(value: Option<&str>) -> Result<Email> {
    let v = required(value, "email", "Email is required")?;
    Email::parse(v).map_err(|_| ValidationError::new("email", "Please enter a valid email address"))
}

fn phone(value: Option<&str>) -> Result<PhoneNumber> {
    PhoneNumber::parse(value.unwrap_or_default()).map_err(|e| match e {
        PhoneError::Empty => ValidationError::new("phone", "Phone number is required"),
        PhoneError::NotTenDigits => ValidationError::new("phone", "Phone number must be 10 digits"),
    })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its calendar date is used).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn booking_date(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let date = value
        .and_then(parse_date)
        .ok_or_else(|| ValidationError::new("date", "Please select a valid date"))?;
    if date < today {
        return Err(ValidationError::new("date", "Please select a future date"));
    }
    Ok(date)
}

fn booking_time(value: Option<&str>) -> Result<String> {
    let v = required(value, "time", "Time is required")?;
    if !TIME_RE.is_match(v) {
        return Err(ValidationError::new("time", "Please enter a valid time (HH:MM)"));
    }
    // `9:05` is stored as `09:05` so listings order by time correctly.
    Ok(format!("{v:0>5}"))
}

fn party_size(value: Option<&serde_json::Value>) -> Result<u8> {
    const FIELD: &str = "partySize";

    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| ValidationError::new(FIELD, "Party size must be a number"))?;

    if number.fract() != 0.0 {
        return Err(ValidationError::new(FIELD, "Party size must be a whole number"));
    }
    if number < 1.0 {
        return Err(ValidationError::new(FIELD, "Party size must be at least 1"));
    }
    if number > f64::from(MAX_PARTY_SIZE) {
        return Err(ValidationError::new(FIELD, "Party size must be at most 20"));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(number as u8)
}

fn special_requests(value: Option<&str>) -> Result<Option<String>> {
    match value {
        None | Some("") => Ok(None),
        Some(v) if char_len(v) > 500 => Err(ValidationError::new(
            "specialRequests",
            "Special requests must be less than 500 characters",
        )),
        Some(v) => Ok(Some(v.to_owned())),
    }
}

// =============================================================================
// Booking
// =============================================================================

/// Booking form as submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub party_size: Option<serde_json::Value>,
    pub special_requests: Option<String>,
}

/// A validated table booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub date: NaiveDate,
    /// `HH:MM`, 24-hour. A one-digit hour is zero-padded.
    pub time: String,
    pub party_size: u8,
    pub special_requests: Option<String>,
}

impl BookingForm {
    /// Validate against `today`, the restaurant's current calendar date.
    ///
    /// # Errors
    ///
    /// Returns the first failing field in form order.
    pub fn validate(&self, today: NaiveDate) -> Result<BookingRequest> {
        Ok(BookingRequest {
            name: name(self.name.as_deref())?,
            email: email(self.email.as_deref())?,
            phone: phone(self.phone.as_deref())?,
            date: booking_date(self.date.as_deref(), today)?,
            time: booking_time(self.time.as_deref())?,
            party_size: party_size(self.party_size.as_ref())?,
            special_requests: special_requests(self.special_requests.as_deref())?,
        })
    }
}

// =============================================================================
// Contact
// =============================================================================

/// Contact form as submitted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// A validated contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub phone: PhoneNumber,
    pub message: String,
}

impl ContactForm {
    /// # Errors
    ///
    /// Returns the first failing field in form order.
    pub fn validate(&self) -> Result<ContactMessage> {
        let name = name(self.name.as_deref())?;
        let email = email(self.email.as_deref())?;
        let phone = phone(self.phone.as_deref())?;

        let message = required(self.message.as_deref(), "message", "Message is required")?;
        match char_len(message) {
            n if n < 10 => {
                return Err(ValidationError::new("message", "Message must be at least 10 characters"));
            }
            n if n > 1000 => {
                return Err(ValidationError::new("message", "Message must be less than 1000 characters"));
            }
            _ => {}
        }

        Ok(ContactMessage {
            name,
            email,
            phone,
            message: message.to_owned(),
        })
    }
}

// =============================================================================
// WhatsApp customer info
// =============================================================================

/// Delivery details entered at checkout.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CustomerInfoForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Validated delivery details. Only ever used to build the outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: PhoneNumber,
    pub address: String,
}

impl CustomerInfoForm {
    /// # Errors
    ///
    /// Returns the first failing field in form order.
    pub fn validate(&self) -> Result<CustomerInfo> {
        let name = name(self.name.as_deref())?;
        let phone = phone(self.phone.as_deref())?;

        let address = required(self.address.as_deref(), "address", "Delivery address is required")?;
        match char_len(address) {
            n if n < 10 => {
                return Err(ValidationError::new("address", "Address must be at least 10 characters"));
            }
            n if n > 300 => {
                return Err(ValidationError::new("address", "Address must be less than 300 characters"));
            }
            _ => {}
        }

        Ok(CustomerInfo {
            name,
            phone,
            address: address.to_owned(),
        })
    }
}

// =============================================================================
// Admin login
// =============================================================================

/// Admin login form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminLoginForm {
    pub password: Option<String>,
}

impl AdminLoginForm {
    /// Check the password field's shape and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the password is missing or shorter than 8 characters.
    pub fn validate(&self) -> Result<&str> {
        let password = required(self.password.as_deref(), "password", "Password is required")?;
        if char_len(password) < MIN_ADMIN_PASSWORD_LENGTH {
            return Err(ValidationError::new("password", "Password must be at least 8 characters"));
        }
        Ok(password)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn booking() -> BookingForm {
        BookingForm {
            name: Some("Asha Kumari".into()),
            email: Some("asha@example.in".into()),
            phone: Some("9876543210".into()),
            date: Some("2026-03-20".into()),
            time: Some("19:30".into()),
            party_size: Some(json!(4)),
            special_requests: None,
        }
    }

    #[test]
    fn test_valid_booking() {
        let request = booking().validate(today()).unwrap();
        assert_eq!(request.party_size, 4);
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());
        assert_eq!(request.special_requests, None);
    }

    #[test]
    fn test_booking_today_is_allowed_yesterday_is_not() {
        let mut form = booking();
        form.date = Some("2026-03-14".into());
        assert!(form.validate(today()).is_ok());

        form.date = Some("2026-03-13".into());
        let err = form.validate(today()).unwrap_err();
        assert_eq!(err.field, "date");
        assert!(err.message.contains("future date"));
    }

    #[test]
    fn test_booking_date_accepts_timestamp() {
        let mut form = booking();
        form.date = Some("2026-03-20T00:00:00.000Z".into());
        assert!(form.validate(today()).is_ok());
        form.date = Some("next tuesday".into());
        assert_eq!(form.validate(today()).unwrap_err().message, "Please select a valid date");
    }

    #[test]
    fn test_party_size_rules() {
        let cases = [
            (json!(21), "Party size must be at most 20"),
            (json!(0), "Party size must be at least 1"),
            (json!(2.5), "Party size must be a whole number"),
            (json!("many"), "Party size must be a number"),
            (json!(null), "Party size must be a number"),
        ];
        for (value, message) in cases {
            let mut form = booking();
            form.party_size = Some(value);
            assert_eq!(form.validate(today()).unwrap_err().message, message);
        }

        let mut form = booking();
        form.party_size = Some(json!("20"));
        assert_eq!(form.validate(today()).unwrap().party_size, 20);
        form.party_size = Some(json!(1));
        assert_eq!(form.validate(today()).unwrap().party_size, 1);
    }

    #[test]
    fn test_time_format() {
        for ok in ["00:00", "9:05", "23:59"] {
            let mut form = booking();
            form.time = Some(ok.into());
            assert!(form.validate(today()).is_ok(), "{ok} should be valid");
        }
        for bad in ["24:00", "12:60", "noon", "12:5"] {
            let mut form = booking();
            form.time = Some(bad.into());
            assert_eq!(
                form.validate(today()).unwrap_err().message,
                "Please enter a valid time (HH:MM)"
            );
        }
        let mut form = booking();
        form.time = Some(String::new());
        assert_eq!(form.validate(today()).unwrap_err().message, "Time is required");
    }

    #[test]
    fn test_single_digit_hour_is_padded() {
        let mut form = booking();
        form.time = Some("9:05".into());
        assert_eq!(form.validate(today()).unwrap().time, "09:05");
        form.time = Some("19:30".into());
        assert_eq!(form.validate(today()).unwrap().time, "19:30");
    }

    #[test]
    fn test_first_error_wins_in_field_order() {
        let form = BookingForm {
            name: Some("A".into()),
            phone: Some("123".into()),
            ..BookingForm::default()
        };
        let err = form.validate(today()).unwrap_err();
        assert_eq!(err, ValidationError::new("name", "Name must be at least 2 characters"));
    }

    #[test]
    fn test_special_requests_limit() {
        let mut form = booking();
        form.special_requests = Some(String::new());
        assert_eq!(form.validate(today()).unwrap().special_requests, None);

        form.special_requests = Some("अ".repeat(500));
        assert!(form.validate(today()).is_ok());

        form.special_requests = Some("a".repeat(501));
        assert_eq!(form.validate(today()).unwrap_err().field, "specialRequests");
    }

    #[test]
    fn test_name_length_counts_characters() {
        let mut form = booking();
        form.name = Some("राम".into());
        assert!(form.validate(today()).is_ok());
        form.name = Some("x".repeat(101));
        assert_eq!(
            form.validate(today()).unwrap_err().message,
            "Name must be less than 100 characters"
        );
    }

    #[test]
    fn test_phone_messages() {
        let form = CustomerInfoForm {
            name: Some("Asha".into()),
            phone: Some("123".into()),
            address: Some("12 Boring Road, Patna".into()),
        };
        let err = form.validate().unwrap_err();
        assert!(err.message.contains("10 digits"));

        let form = CustomerInfoForm {
            phone: Some("9876543210".into()),
            ..form
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_customer_address_rules() {
        let mut form = CustomerInfoForm {
            name: Some("Asha".into()),
            phone: Some("9876543210".into()),
            address: None,
        };
        assert_eq!(form.validate().unwrap_err().message, "Delivery address is required");
        form.address = Some("Patna".into());
        assert_eq!(
            form.validate().unwrap_err().message,
            "Address must be at least 10 characters"
        );
        form.address = Some("x".repeat(301));
        assert_eq!(
            form.validate().unwrap_err().message,
            "Address must be less than 300 characters"
        );
    }

    #[test]
    fn test_contact_message_rules() {
        let mut form = ContactForm {
            name: Some("Ravi".into()),
            email: Some("ravi@example.in".into()),
            phone: Some("9876543210".into()),
            message: Some("Hi".into()),
        };
        assert_eq!(
            form.validate().unwrap_err().message,
            "Message must be at least 10 characters"
        );
        form.message = Some("Do you cater for weddings?".into());
        assert!(form.validate().is_ok());

        form.email = Some("ravi-at-example".into());
        assert_eq!(
            form.validate().unwrap_err().message,
            "Please enter a valid email address"
        );
    }

    #[test]
    fn test_admin_password_rules() {
        assert_eq!(
            AdminLoginForm { password: None }.validate().unwrap_err().message,
            "Password is required"
        );
        assert_eq!(
            AdminLoginForm { password: Some("short".into()) }
                .validate()
                .unwrap_err()
                .message,
            "Password must be at least 8 characters"
        );
        assert_eq!(
            AdminLoginForm { password: Some("longenough".into()) }.validate().unwrap(),
            "longenough"
        );
    }

    #[test]
    fn test_booking_form_deserializes_camel_case() {
        let form: BookingForm = serde_json::from_value(json!({
            "name": "Asha Kumari",
            "email": "asha@example.in",
            "phone": "9876543210",
            "date": "2026-03-20",
            "time": "19:30",
            "partySize": 2,
            "specialRequests": "Window seat"
        }))
        .unwrap();
        let request = form.validate(today()).unwrap();
        assert_eq!(request.special_requests.as_deref(), Some("Window seat"));
    }
}
