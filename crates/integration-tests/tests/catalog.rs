//! Integration tests for category and product browsing.
//!
//! These tests require:
//! - A running server (cargo run -p trikart-server)
//! - `TRIKART_EXPOSE_VERIFICATION_CODES=true` in the server environment
//! - A seeded catalog (cargo run -p trikart-cli -- seed)
//!
//! Run with: cargo test -p trikart-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::Value;

use trikart_integration_tests::{base_url, register_user};

// ============================================================================
// Category Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running server with a seeded catalog"]
async fn test_categories_are_public() {
    let client = Client::new();

    // No token needed for category browsing
    let resp = client
        .get(format!("{}/api/categories", base_url()))
        .send()
        .await
        .expect("Failed to list categories");
    assert_eq!(resp.status(), StatusCode::OK);

    let categories: Vec<Value> = resp.json().await.expect("Failed to parse categories");
    assert!(
        !categories.is_empty(),
        "Catalog is empty; run `cargo run -p trikart-cli -- seed` first"
    );
    assert!(
        categories
            .first()
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
            .is_some()
    );
}

#[tokio::test]
#[ignore = "Requires a running server with a seeded catalog"]
async fn test_category_detail_includes_its_products() {
    let client = Client::new();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/api/categories"))
        .send()
        .await
        .expect("Failed to list categories");
    let categories: Vec<Value> = resp.json().await.expect("Failed to parse categories");
    let id = categories
        .first()
        .and_then(|c| c.get("id"))
        .and_then(Value::as_i64)
        .expect("no seeded categories");

    let resp = client
        .get(format!("{base_url}/api/categories/{id}"))
        .send()
        .await
        .expect("Failed to fetch category");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse category");
    assert_eq!(body.get("id").and_then(Value::as_i64), Some(id));

    let products = body
        .get("products")
        .and_then(Value::as_array)
        .expect("category detail has no products array");
    for product in products {
        assert_eq!(product.get("categoryId").and_then(Value::as_i64), Some(id));
    }
}

#[tokio::test]
#[ignore = "Requires a running server"]
async fn test_unknown_category_is_404() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/categories/999999", base_url()))
        .send()
        .await
        .expect("Failed to fetch category");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Category not found")
    );
}

// ============================================================================
// Product Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires a running server with a seeded catalog"]
async fn test_product_listing_and_detail() {
    let client = Client::new();
    let base_url = base_url();

    let (token, _) = register_user(&client, "catalog").await;

    let resp = client
        .get(format!("{base_url}/api/products"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse products");
    assert!(
        !products.is_empty(),
        "Catalog is empty; run `cargo run -p trikart-cli -- seed` first"
    );

    let id = products
        .first()
        .and_then(|p| p.get("id"))
        .and_then(Value::as_i64)
        .expect("product has no id");

    let resp = client
        .get(format!("{base_url}/api/products/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(body.get("id").and_then(Value::as_i64), Some(id));
    // Detail view carries the category inline
    assert!(body.get("category").and_then(|c| c.get("name")).is_some());
    // Prices are decimal strings on the wire
    assert!(body.get("price").and_then(Value::as_str).is_some());
}

#[tokio::test]
#[ignore = "Requires a running server with a seeded catalog"]
async fn test_product_flag_filters() {
    let client = Client::new();
    let base_url = base_url();

    let (token, _) = register_user(&client, "filters").await;

    // isFeatured=true narrows to featured products only
    let resp = client
        .get(format!("{base_url}/api/products?isFeatured=true"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list featured products");
    assert_eq!(resp.status(), StatusCode::OK);

    let featured: Vec<Value> = resp.json().await.expect("Failed to parse products");
    for product in &featured {
        assert_eq!(product.get("isFeatured").and_then(Value::as_bool), Some(true));
    }

    // Anything but the literal "true" is ignored, so this is the full list
    let resp = client
        .get(format!("{base_url}/api/products?isFeatured=false"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list products");
    let unfiltered: Vec<Value> = resp.json().await.expect("Failed to parse products");

    let resp = client
        .get(format!("{base_url}/api/products"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list products");
    let all: Vec<Value> = resp.json().await.expect("Failed to parse products");

    assert_eq!(unfiltered.len(), all.len());
    assert!(featured.len() <= all.len());
}

#[tokio::test]
#[ignore = "Requires a running server with a seeded catalog"]
async fn test_product_search() {
    let client = Client::new();
    let base_url = base_url();

    let (token, _) = register_user(&client, "search").await;

    let resp = client
        .get(format!("{base_url}/api/products"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list products");
    let all: Vec<Value> = resp.json().await.expect("Failed to parse products");
    let name = all
        .first()
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .expect("no seeded products");

    // Search by a fragment of a known product name, mixed case
    let fragment = name.chars().take(4).collect::<String>().to_uppercase();
    let resp = client
        .get(format!("{base_url}/api/products?search={fragment}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to search products");
    assert_eq!(resp.status(), StatusCode::OK);

    let hits: Vec<Value> = resp.json().await.expect("Failed to parse products");
    assert!(
        hits.iter()
            .any(|p| p.get("name").and_then(Value::as_str) == Some(name)),
        "search for {fragment:?} did not return {name:?}"
    );
}

#[tokio::test]
#[ignore = "Requires a running server with TRIKART_EXPOSE_VERIFICATION_CODES=true"]
async fn test_unknown_product_is_404() {
    let client = Client::new();

    let (token, _) = register_user(&client, "missing-product").await;

    let resp = client
        .get(format!("{}/api/products/999999", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
