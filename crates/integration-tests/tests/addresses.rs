//! Integration tests for delivery address management.
//!
//! These tests require:
//! - A running server (cargo run -p trikart-server)
//! - `TRIKART_EXPOSE_VERIFICATION_CODES=true` in the server environment
//!
//! Run with: cargo test -p trikart-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use trikart_integration_tests::{base_url, register_user};

/// Create an address for the given user and return its id.
async fn create_address(client: &Client, token: &str, label: &str) -> i64 {
    let resp = client
        .post(format!("{}/api/addresses", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "label": label,
            "house": "1203",
            "street": "Sector 22B",
            "landmark": "Near the market",
            "city": "Chandigarh"
        }))
        .send()
        .await
        .expect("Failed to create address");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse address");
    body.get("id")
        .and_then(Value::as_i64)
        .expect("address has no id")
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running server with TRIKART_EXPOSE_VERIFICATION_CODES=true"]
async fn test_address_crud() {
    let client = Client::new();
    let base_url = base_url();

    let (token, _) = register_user(&client, "addresses").await;
    let id = create_address(&client, &token, "Home").await;

    // Listed for the owner
    let resp = client
        .get(format!("{base_url}/api/addresses"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list addresses");
    assert_eq!(resp.status(), StatusCode::OK);

    let addresses: Vec<Value> = resp.json().await.expect("Failed to parse addresses");
    assert_eq!(addresses.len(), 1);
    assert_eq!(
        addresses
            .first()
            .and_then(|a| a.get("label"))
            .and_then(Value::as_str),
        Some("Home")
    );

    // Update the label and landmark
    let resp = client
        .put(format!("{base_url}/api/addresses/{id}"))
        .bearer_auth(&token)
        .json(&json!({
            "label": "Office",
            "house": "SCO 41",
            "street": "Phase 7",
            "city": "Mohali"
        }))
        .send()
        .await
        .expect("Failed to update address");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse address");
    assert_eq!(body.get("label").and_then(Value::as_str), Some("Office"));
    assert_eq!(body.get("city").and_then(Value::as_str), Some("Mohali"));
    // Landmark was omitted from the update, so it clears
    assert!(body.get("landmark").is_none_or(Value::is_null));

    // Delete and verify the list is empty
    let resp = client
        .delete(format!("{base_url}/api/addresses/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete address");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/addresses"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list addresses");
    let addresses: Vec<Value> = resp.json().await.expect("Failed to parse addresses");
    assert!(addresses.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running server with TRIKART_EXPOSE_VERIFICATION_CODES=true"]
async fn test_address_rejects_unserviceable_city() {
    let client = Client::new();

    let (token, _) = register_user(&client, "bad-city-address").await;

    let resp = client
        .post(format!("{}/api/addresses", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "label": "Home",
            "house": "12",
            "street": "MG Road",
            "city": "Delhi"
        }))
        .send()
        .await
        .expect("Failed to submit address");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running server with TRIKART_EXPOSE_VERIFICATION_CODES=true"]
async fn test_address_rejects_blank_required_fields() {
    let client = Client::new();

    let (token, _) = register_user(&client, "blank-address").await;

    let resp = client
        .post(format!("{}/api/addresses", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "label": "Home",
            "house": "   ",
            "street": "Sector 17",
            "city": "Chandigarh"
        }))
        .send()
        .await
        .expect("Failed to submit address");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Ownership Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running server with TRIKART_EXPOSE_VERIFICATION_CODES=true"]
async fn test_addresses_are_owner_scoped() {
    let client = Client::new();
    let base_url = base_url();

    let (owner_token, _) = register_user(&client, "owner").await;
    let (other_token, _) = register_user(&client, "other").await;
    let id = create_address(&client, &owner_token, "Home").await;

    // Not in the other user's list
    let resp = client
        .get(format!("{base_url}/api/addresses"))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("Failed to list addresses");
    let addresses: Vec<Value> = resp.json().await.expect("Failed to parse addresses");
    assert!(addresses.is_empty());

    // Mutations by the other user look like the address does not exist
    let resp = client
        .put(format!("{base_url}/api/addresses/{id}"))
        .bearer_auth(&other_token)
        .json(&json!({
            "label": "Hijacked",
            "house": "1",
            "street": "Anywhere",
            "city": "Chandigarh"
        }))
        .send()
        .await
        .expect("Failed to submit update");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .delete(format!("{base_url}/api/addresses/{id}"))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("Failed to submit delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Still intact for the owner
    let resp = client
        .get(format!("{base_url}/api/addresses"))
        .bearer_auth(&owner_token)
        .send()
        .await
        .expect("Failed to list addresses");
    let addresses: Vec<Value> = resp.json().await.expect("Failed to parse addresses");
    assert_eq!(addresses.len(), 1);
}
