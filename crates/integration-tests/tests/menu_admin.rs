//! Integration tests for editing the menu through the admin API.

use axum::http::StatusCode;
use serde_json::{Value, json};

use bihar_bhojan_integration_tests::{SAMPLE_MENU, TestApp};

fn dish(id: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": "Makhana Kheer",
        "nameHi": "मखाना खीर",
        "description": "Fox nuts simmered in milk with cardamom",
        "descriptionHi": "इलायची वाले दूध में पका मखाना",
        "price": price,
        "category": "mithai",
        "image": "/images/dishes/makhana-kheer.webp",
        "isVeg": true,
        "isAvailable": true,
        "featured": false
    })
}

async fn menu_on_disk(app: &TestApp) -> Value {
    let raw = tokio::fs::read_to_string(app.menu_path()).await.unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_menu_editing_requires_login() {
    let mut app = TestApp::new().await;

    assert_eq!(app.get("/admin/menu").await.status, StatusCode::UNAUTHORIZED);
    let response = app.put("/admin/menu", &json!([dish("makhana-kheer", 150.0)])).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let sample: Value = serde_json::from_str(SAMPLE_MENU).unwrap();
    assert_eq!(menu_on_disk(&app).await, sample);
}

#[tokio::test]
async fn test_admin_reads_full_menu() {
    let mut app = TestApp::new().await;
    app.login_admin().await;

    let response = app.get("/admin/menu").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_replace_menu_is_visible_immediately() {
    let mut app = TestApp::new().await;
    // Warm the cache so the replace has something to invalidate
    assert_eq!(app.get("/api/menu").await.data().as_array().unwrap().len(), 12);

    app.login_admin().await;
    let response = app
        .put(
            "/admin/menu",
            &json!([dish("makhana-kheer", 150.0), dish("malpua", 90.5)]),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{response:?}");
    assert_eq!(response.body["success"], true);

    let listed = app.get("/api/menu").await;
    let ids: Vec<_> = listed
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["makhana-kheer", "malpua"]);

    let on_disk = menu_on_disk(&app).await;
    assert_eq!(on_disk["menuItems"][1]["price"], 90.5);
}

#[tokio::test]
async fn test_replaced_menu_feeds_the_cart() {
    let mut app = TestApp::new().await;
    app.login_admin().await;
    app.put("/admin/menu", &json!([dish("malpua", 90.5)])).await;

    let cart = app.post("/api/cart/add", &json!({ "productId": "malpua" })).await;
    assert_eq!(cart.status, StatusCode::OK);
    assert_eq!(cart.data()["subtotal"], "90.50");
    assert_eq!(cart.data()["tax"], "4.53");

    let gone = app
        .post("/api/cart/add", &json!({ "productId": "litti-chokha" }))
        .await;
    assert_eq!(gone.error(), Some("Menu item not found"));
}

#[tokio::test]
async fn test_invalid_menus_are_rejected_and_file_kept() {
    let mut app = TestApp::new().await;
    app.login_admin().await;
    let before = menu_on_disk(&app).await;

    let response = app
        .put(
            "/admin/menu",
            &json!([dish("malpua", 90.0), dish("malpua", 95.0)]),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), Some("Duplicate menu item IDs found"));

    let response = app
        .put("/admin/menu", &json!([dish("malpua", 90.0), dish("kheer", -5.0)]))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error(),
        Some("Validation error: 1.price - Price must be a positive number")
    );

    let mut bad_image = dish("malpua", 90.0);
    bad_image["image"] = json!("https://cdn.example.com/malpua.jpg");
    let response = app.put("/admin/menu", &json!([bad_image])).await;
    assert_eq!(
        response.error(),
        Some("Validation error: 0.image - Invalid image path format")
    );

    let response = app.put("/admin/menu", &json!([])).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    assert_eq!(menu_on_disk(&app).await, before);
}

#[tokio::test]
async fn test_broken_menu_file_is_a_server_error() {
    let mut app = TestApp::with_menu("{ \"menuItems\": ").await;

    let response = app.get("/api/menu").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), Some("Invalid JSON format in menu file"));
}
