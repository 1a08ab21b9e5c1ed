//! Integration tests for inventory search and management mutations.

use axum::http::StatusCode;
use serde_json::json;

use oakline_integration_tests::{TestApp, office_chair_attrs};

fn sofa_request() -> serde_json::Value {
    json!({
        "category": "Sofa",
        "attributes": {
            "name": "Linen Sofa",
            "description": "Three-seat sofa with washable linen covers",
            "price": "850.00",
            "dimensions": "220x95x85 cm",
            "serial_number": "SF-2001",
            "quantity": 4,
            "weight": "48.0",
            "manufacturing_country": "Sweden",
            "seat_count": 3,
            "convertible_to_bed": true,
        },
    })
}

#[tokio::test]
async fn test_inventory_mutations_require_management() {
    let app = TestApp::new();

    let anonymous = app.post("/inventory", None, sofa_request()).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let cookie = app.login_client("dana").await;
    let client = app.post("/inventory", Some(&cookie), sofa_request()).await;
    assert_eq!(client.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_search_and_remove() {
    let app = TestApp::with_office_chairs(10);
    let cookie = app.login_management("morgan").await;

    let created = app.post("/inventory", Some(&cookie), sofa_request()).await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    assert_eq!(created.body["category"], "Sofa");
    assert_eq!(created.body["seat_count"], 3);

    // Duplicate serial within the category conflicts.
    let duplicate = app.post("/inventory", Some(&cookie), sofa_request()).await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    // Filters compose.
    let everything = app.get("/inventory", None).await;
    assert_eq!(everything.body.as_array().unwrap().len(), 2);

    let sofas = app.get("/inventory?category=Sofa", None).await;
    assert_eq!(sofas.body.as_array().unwrap().len(), 1);
    assert_eq!(sofas.body[0]["name"], "Linen Sofa");

    let pricey = app.get("/inventory?min_price=500", None).await;
    assert_eq!(pricey.body.as_array().unwrap().len(), 1);

    let none = app
        .get("/inventory?category=Sofa&max_price=100", None)
        .await;
    assert_eq!(none.status, StatusCode::NOT_FOUND);

    // Remove it again.
    let removed = app
        .delete(
            "/inventory",
            Some(&cookie),
            json!({ "category": "Sofa", "serial_number": "SF-2001" }),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let gone = app.get("/inventory?category=Sofa", None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rejects_invalid_attributes() {
    let app = TestApp::new();
    let cookie = app.login_management("morgan").await;

    let mut attributes = office_chair_attrs(10);
    attributes.remove("leg_count");
    let missing = app
        .post(
            "/inventory",
            Some(&cookie),
            json!({ "category": "Chair", "attributes": attributes }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let unknown = app
        .post(
            "/inventory",
            Some(&cookie),
            json!({ "category": "Hammock", "attributes": office_chair_attrs(10) }),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_quantity() {
    let app = TestApp::with_office_chairs(10);
    let cookie = app.login_management("morgan").await;

    let updated = app
        .put(
            "/inventory/quantity",
            Some(&cookie),
            json!({ "category": "Chair", "serial_number": "CH-1001", "quantity": 3 }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);

    let search = app.get("/inventory?name=Office%20Chair", None).await;
    assert_eq!(search.body[0]["quantity"], 3);

    let missing = app
        .put(
            "/inventory/quantity",
            Some(&cookie),
            json!({ "category": "Chair", "serial_number": "CH-9999", "quantity": 3 }),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
