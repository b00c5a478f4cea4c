//! Category and product types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trikart_core::{CategoryId, Money, ProductId};

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A catalog product.
///
/// `price` is the selling price; `original_price` is the pre-discount
/// price shown struck through by the client, when present.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Money,
    pub original_price: Option<Money>,
    pub available_stock: i64,
    pub is_featured: bool,
    pub is_bestseller: bool,
    pub rating: f64,
    pub review_count: i64,
    pub tax_percent: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with every product in it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithProducts {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}

/// A product with its category attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_serializes_price_as_string() {
        let product = Product {
            id: ProductId::new(1),
            category_id: CategoryId::new(2),
            name: "Steel Water Bottle 1L".to_owned(),
            description: None,
            image_url: None,
            price: Money::parse("499.00").unwrap(),
            original_price: Some(Money::parse("599.00").unwrap()),
            available_stock: 25,
            is_featured: true,
            is_bestseller: false,
            rating: 4.3,
            review_count: 112,
            tax_percent: 18.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], "499.00");
        assert_eq!(json["originalPrice"], "599.00");
        assert_eq!(json["isFeatured"], true);
        assert_eq!(json["categoryId"], 2);
    }
}
