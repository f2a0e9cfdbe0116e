//! Integration tests for browsing the menu, filling the cart and checking
//! out over WhatsApp.

use axum::http::StatusCode;
use serde_json::json;

use bihar_bhojan_integration_tests::TestApp;

fn customer() -> serde_json::Value {
    json!({
        "name": "Sunita Devi",
        "phone": "9876500000",
        "address": "12 Boring Road, Patna"
    })
}

// =============================================================================
// Menu
// =============================================================================

#[tokio::test]
async fn test_menu_lists_everything_including_unavailable() {
    let mut app = TestApp::new().await;
    let response = app.get("/api/menu").await;

    assert_eq!(response.status, StatusCode::OK);
    let items = response.data().as_array().unwrap();
    assert_eq!(items.len(), 12);
    assert!(items.iter().any(|item| item["id"] == "aloo-chop" && item["isAvailable"] == false));
}

#[tokio::test]
async fn test_menu_filters_combine() {
    let mut app = TestApp::new().await;

    let mithai = app.get("/api/menu?category=mithai").await;
    let ids: Vec<_> = mithai
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["khaja", "thekua"]);

    let non_veg = app.get("/api/menu?diet=non-veg").await;
    assert_eq!(non_veg.data().as_array().unwrap().len(), 2);

    let sattu = app.get("/api/menu?q=SATTU").await;
    assert_eq!(sattu.data().as_array().unwrap().len(), 3);

    let paratha = app.get("/api/menu?category=sattu-specials&q=paratha").await;
    assert_eq!(paratha.data()[0]["id"], "sattu-paratha");
    assert_eq!(paratha.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_menu_rejects_unknown_category() {
    let mut app = TestApp::new().await;
    let response = app.get("/api/menu?category=pizza").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(response.error().is_some_and(|e| e.contains("pizza")));
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_starts_empty() {
    let mut app = TestApp::new().await;
    let response = app.get("/api/cart").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["itemCount"], 0);
    assert_eq!(response.data()["items"], json!([]));
    assert_eq!(response.data()["total"], "0.00");
}

#[tokio::test]
async fn test_cart_totals_follow_mutations() {
    let mut app = TestApp::new().await;

    app.post("/api/cart/add", &json!({ "productId": "litti-chokha" })).await;
    app.post("/api/cart/add", &json!({ "productId": "litti-chokha" })).await;
    let cart = app
        .post("/api/cart/add", &json!({ "productId": "sattu-sharbat" }))
        .await;

    assert_eq!(cart.data()["itemCount"], 3);
    assert_eq!(cart.data()["subtotal"], "420.00");
    assert_eq!(cart.data()["tax"], "21.00");
    assert_eq!(cart.data()["total"], "441.00");

    let cart = app
        .post(
            "/api/cart/update",
            &json!({ "productId": "sattu-sharbat", "quantity": 3 }),
        )
        .await;
    assert_eq!(cart.data()["itemCount"], 5);
    assert_eq!(cart.data()["total"], "567.00");

    let cart = app
        .post(
            "/api/cart/update",
            &json!({ "productId": "litti-chokha", "quantity": 0 }),
        )
        .await;
    assert_eq!(cart.data()["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart.data()["items"][0]["productId"], "sattu-sharbat");

    let cart = app
        .post("/api/cart/remove", &json!({ "productId": "sattu-sharbat" }))
        .await;
    assert_eq!(cart.data()["itemCount"], 0);
}

#[tokio::test]
async fn test_cart_line_uses_menu_details() {
    let mut app = TestApp::new().await;
    let cart = app
        .post("/api/cart/add", &json!({ "productId": "thekua", "unitPrice": "1.00" }))
        .await;

    let line = &cart.data()["items"][0];
    assert_eq!(line["name"], "Thekua");
    assert_eq!(line["localizedName"], "ठेकुआ");
    assert_eq!(line["imageRef"], "/images/dishes/thekua.jpg");
    assert_eq!(cart.data()["subtotal"], "100.00");
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let mut app = TestApp::new().await;
    app.post("/api/cart/add", &json!({ "productId": "khaja" })).await;
    app.post("/api/cart/clear", &json!({})).await;

    let cart = app.get("/api/cart").await;
    assert_eq!(cart.data()["itemCount"], 0);
}

#[tokio::test]
async fn test_cart_belongs_to_the_session_cookie() {
    let mut app = TestApp::new().await;
    app.post("/api/cart/add", &json!({ "productId": "khaja" })).await;
    let visitor = app.take_cookies();

    assert_eq!(app.get("/api/cart").await.data()["itemCount"], 0);

    app.restore_cookies(visitor);
    assert_eq!(app.get("/api/cart").await.data()["itemCount"], 1);
}

#[tokio::test]
async fn test_unavailable_item_cannot_be_added() {
    let mut app = TestApp::new().await;
    let response = app
        .post("/api/cart/add", &json!({ "productId": "aloo-chop" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), Some("This item is currently unavailable"));
    assert_eq!(app.get("/api/cart").await.data()["itemCount"], 0);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_whatsapp_checkout_builds_message_and_clears_cart() {
    let mut app = TestApp::new().await;
    app.post("/api/cart/add", &json!({ "productId": "litti-chokha" })).await;
    app.post("/api/cart/add", &json!({ "productId": "litti-chokha" })).await;
    app.post("/api/cart/add", &json!({ "productId": "sattu-sharbat" })).await;
    app.post(
        "/api/cart/update",
        &json!({ "productId": "sattu-sharbat", "quantity": 3 }),
    )
    .await;

    let response = app.post("/api/checkout/whatsapp", &customer()).await;
    assert_eq!(response.status, StatusCode::OK);

    let expected = "🍽️ *Bihar Bhojan Order*\n\n\
                    *Customer:* Sunita Devi\n\
                    *Phone:* 9876500000\n\
                    *Address:* 12 Boring Road, Patna\n\n\
                    *Order Items:*\n\
                    1. Litti Chokha x2 - ₹360\n\
                    2. Sattu Sharbat x3 - ₹180\n\
                    \n*Subtotal:* ₹540.00\n\
                    *Tax (5%):* ₹27.00\n\
                    *Total:* ₹567.00\n\n\
                    Payment: Cash on Delivery";
    assert_eq!(response.data()["message"], expected);

    let url = response.data()["url"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/919876543210?text=%F0%9F%8D%BD"));
    assert!(url.contains("*Customer%3A*%20Sunita%20Devi"));

    let cart = app.get("/api/cart").await;
    assert_eq!(cart.data()["itemCount"], 0);
}

#[tokio::test]
async fn test_malformed_cart_and_checkout_bodies_get_tagged_failures() {
    let mut app = TestApp::new().await;

    let response = app
        .post("/api/cart/update", &json!({ "productId": "litti-chokha", "quantity": "two" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
    assert!(response.error().is_some_and(|e| e.contains("quantity")));

    let response = app
        .post(
            "/api/checkout/whatsapp",
            &json!({ "name": ["Ravi"], "phone": "9123456780", "address": "Boring Road, Patna" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["success"], false);
}

#[tokio::test]
async fn test_checkout_with_empty_cart() {
    let mut app = TestApp::new().await;
    let response = app.post("/api/checkout/whatsapp", &customer()).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), Some("Your cart is empty"));
}

#[tokio::test]
async fn test_checkout_validation_keeps_cart() {
    let mut app = TestApp::new().await;
    app.post("/api/cart/add", &json!({ "productId": "ghugni" })).await;

    let response = app
        .post(
            "/api/checkout/whatsapp",
            &json!({ "name": "Sunita Devi", "phone": "98765", "address": "12 Boring Road, Patna" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), Some("Phone number must be 10 digits"));

    let response = app
        .post(
            "/api/checkout/whatsapp",
            &json!({ "name": "Sunita Devi", "phone": "9876500000", "address": "Patna" }),
        )
        .await;
    assert_eq!(response.error(), Some("Address must be at least 10 characters"));

    assert_eq!(app.get("/api/cart").await.data()["itemCount"], 1);
}
