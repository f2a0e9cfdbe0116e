//! WhatsApp order messages.
//!
//! Turns a cart plus validated delivery details into the plain-text order
//! summary the restaurant receives, and the `wa.me` link that opens WhatsApp
//! with that summary pre-filled. The layout and URL scheme are consumed by
//! people and by WhatsApp respectively, so both are fixed byte for byte.

use std::fmt::Write as _;

use serde::Serialize;

use crate::cart::{CartTotals, LineItem};
use crate::validation::CustomerInfo;

/// Country code prepended to restaurant numbers that lack one.
pub const COUNTRY_CODE: &str = "91";

const HEADER: &str = "🍽️ *Bihar Bhojan Order*\n\n";
const FOOTER: &str = "Payment: Cash on Delivery";

/// Render the order summary.
///
/// Items are listed 1-based in cart order using their primary (English)
/// name. An empty item list still renders, with zero totals. `customer` must
/// already be validated.
#[must_use]
pub fn format_message(items: &[LineItem], customer: &CustomerInfo) -> String {
    let totals = CartTotals::from_items(items);
    let mut message = String::from(HEADER);

    // Writing into a String cannot fail.
    let _ = write!(
        message,
        "*Customer:* {}\n*Phone:* {}\n*Address:* {}\n\n",
        customer.name, customer.phone, customer.address
    );

    message.push_str("*Order Items:*\n");
    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(
            message,
            "{}. {} x{} - ₹{}",
            index + 1,
            item.name,
            item.quantity,
            item.line_total().plain()
        );
    }

    let _ = write!(
        message,
        "\n*Subtotal:* {}\n*Tax (5%):* {}\n*Total:* {}\n\n",
        totals.subtotal, totals.tax, totals.total
    );
    message.push_str(FOOTER);

    message
}

/// Build the `wa.me` deep link for `phone` with `message` pre-filled.
///
/// A number already starting with `91` is taken as carrying the country
/// code, so a bare ten-digit number that happens to start with `91` is not
/// prefixed.
#[must_use]
pub fn build_deep_link(phone: &str, message: &str) -> String {
    let phone = if phone.starts_with(COUNTRY_CODE) {
        phone.to_owned()
    } else {
        format!("{COUNTRY_CODE}{phone}")
    };

    format!("https://wa.me/{phone}?text={}", encode_uri_component(message))
}

/// Percent-encode like `encodeURIComponent`.
///
/// `urlencoding` leaves only `A-Z a-z 0-9 - . _ ~` unescaped; the URI
/// component set additionally keeps `! ' ( ) *` literal.
fn encode_uri_component(s: &str) -> String {
    urlencoding::encode(s)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// A formatted order ready to hand to the customer's browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLink {
    pub message: String,
    pub url: String,
}

impl CheckoutLink {
    /// Format the message for `items` and link it to the restaurant's number.
    #[must_use]
    pub fn build(items: &[LineItem], customer: &CustomerInfo, restaurant_phone: &str) -> Self {
        let message = format_message(items, customer);
        let url = build_deep_link(restaurant_phone, &message);
        Self { message, url }
    }
}
