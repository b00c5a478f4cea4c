//! Seed the database with the demo catalog.
//!
//! Inserts a fixed set of categories and products for local development and
//! demos. Seeding is idempotent: a catalog that already has products is left
//! alone unless `--clear` is passed.
//!
//! # Usage
//!
//! ```bash
//! tk-cli seed
//! tk-cli seed --clear
//! ```
//!
//! # Environment Variables
//!
//! - `TRIKART_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`)

use sqlx::SqlitePool;

use trikart_core::Money;
use trikart_server::db::catalog::{CatalogRepository, NewCategory, NewProduct};
use trikart_server::db::{self, RepositoryError};

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Catalog write failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// What the seeder did.
#[derive(Debug)]
pub enum SeedOutcome {
    /// Catalog was empty (or cleared) and the demo data was inserted.
    Seeded { categories: usize, products: usize },
    /// Catalog already had products and `--clear` was not passed.
    SkippedNonEmpty { existing: i64 },
}

/// Seed the demo catalog.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database cannot be
/// opened, or an insert fails.
pub async fn run(clear: bool) -> Result<(), SeedError> {
    let database_url =
        super::database_url().ok_or(SeedError::MissingEnvVar("TRIKART_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    match seed_catalog(&pool, clear).await? {
        SeedOutcome::Seeded {
            categories,
            products,
        } => {
            tracing::info!("Seeding complete! {categories} categories, {products} products");
        }
        SeedOutcome::SkippedNonEmpty { existing } => {
            tracing::warn!(
                "Catalog already has {existing} products; nothing to do (pass --clear to replace)"
            );
        }
    }

    Ok(())
}

/// Insert the demo catalog into the given database.
async fn seed_catalog(pool: &SqlitePool, clear: bool) -> Result<SeedOutcome, SeedError> {
    let repo = CatalogRepository::new(pool);

    if clear {
        tracing::info!("Clearing existing catalog...");
        repo.clear_catalog().await?;
    } else {
        let existing = repo.count_products().await?;
        if existing > 0 {
            return Ok(SeedOutcome::SkippedNonEmpty { existing });
        }
    }

    let mut products = 0;
    for seed in DEMO_CATALOG {
        let category = repo
            .insert_category(&NewCategory {
                name: seed.name,
                description: Some(seed.description),
                image_url: None,
            })
            .await?;

        for item in seed.products {
            repo.insert_product(&NewProduct {
                category_id: category.id,
                name: item.name,
                description: item.description,
                image_url: None,
                price: Money::from_rupees(item.price_rupees),
                original_price: item.original_price_rupees.map(Money::from_rupees),
                available_stock: item.stock,
                is_featured: item.is_featured,
                is_bestseller: item.is_bestseller,
                rating: item.rating,
                review_count: item.review_count,
                tax_percent: item.tax_percent,
            })
            .await?;
            products += 1;
        }

        tracing::info!("Seeded '{}' ({} products)", seed.name, seed.products.len());
    }

    Ok(SeedOutcome::Seeded {
        categories: DEMO_CATALOG.len(),
        products,
    })
}

// =============================================================================
// Demo Catalog
// =============================================================================

struct SeedCategory {
    name: &'static str,
    description: &'static str,
    products: &'static [SeedProduct],
}

struct SeedProduct {
    name: &'static str,
    description: Option<&'static str>,
    price_rupees: u32,
    original_price_rupees: Option<u32>,
    stock: i64,
    is_featured: bool,
    is_bestseller: bool,
    rating: f64,
    review_count: i64,
    tax_percent: f64,
}

/// Demo inventory for a Tricity general store.
///
/// Prices are whole rupees; tax percentages follow the GST slab each item
/// actually falls under.
const DEMO_CATALOG: &[SeedCategory] = &[
    SeedCategory {
        name: "Grocery & Staples",
        description: "Atta, rice, dal, and cooking essentials",
        products: &[
            SeedProduct {
                name: "Aashirvaad Whole Wheat Atta 5kg",
                description: Some("Stone-ground whole wheat flour"),
                price_rupees: 260,
                original_price_rupees: Some(285),
                stock: 40,
                is_featured: true,
                is_bestseller: true,
                rating: 4.6,
                review_count: 412,
                tax_percent: 5.0,
            },
            SeedProduct {
                name: "India Gate Basmati Rice 1kg",
                description: Some("Long-grain aged basmati"),
                price_rupees: 145,
                original_price_rupees: None,
                stock: 35,
                is_featured: false,
                is_bestseller: true,
                rating: 4.4,
                review_count: 268,
                tax_percent: 5.0,
            },
            SeedProduct {
                name: "Tata Toor Dal 1kg",
                description: None,
                price_rupees: 168,
                original_price_rupees: Some(180),
                stock: 30,
                is_featured: false,
                is_bestseller: false,
                rating: 4.3,
                review_count: 190,
                tax_percent: 5.0,
            },
            SeedProduct {
                name: "Fortune Kachi Ghani Mustard Oil 1L",
                description: None,
                price_rupees: 152,
                original_price_rupees: Some(165),
                stock: 25,
                is_featured: false,
                is_bestseller: false,
                rating: 4.2,
                review_count: 145,
                tax_percent: 5.0,
            },
        ],
    },
    SeedCategory {
        name: "Snacks & Beverages",
        description: "Namkeen, biscuits, tea, and cold drinks",
        products: &[
            SeedProduct {
                name: "Haldiram's Aloo Bhujia 400g",
                description: Some("Classic spicy potato namkeen"),
                price_rupees: 95,
                original_price_rupees: Some(110),
                stock: 60,
                is_featured: true,
                is_bestseller: true,
                rating: 4.5,
                review_count: 521,
                tax_percent: 12.0,
            },
            SeedProduct {
                name: "Parle-G Gold Biscuits 1kg",
                description: None,
                price_rupees: 140,
                original_price_rupees: None,
                stock: 80,
                is_featured: false,
                is_bestseller: true,
                rating: 4.4,
                review_count: 389,
                tax_percent: 18.0,
            },
            SeedProduct {
                name: "Tata Tea Premium 500g",
                description: Some("Strong Assam blend"),
                price_rupees: 290,
                original_price_rupees: Some(310),
                stock: 45,
                is_featured: true,
                is_bestseller: false,
                rating: 4.5,
                review_count: 437,
                tax_percent: 5.0,
            },
            SeedProduct {
                name: "Frooti Mango Drink 1.2L",
                description: None,
                price_rupees: 85,
                original_price_rupees: None,
                stock: 50,
                is_featured: false,
                is_bestseller: false,
                rating: 4.1,
                review_count: 156,
                tax_percent: 12.0,
            },
        ],
    },
    SeedCategory {
        name: "Personal Care",
        description: "Soap, shampoo, and daily hygiene",
        products: &[
            SeedProduct {
                name: "Dettol Original Soap (4 x 125g)",
                description: None,
                price_rupees: 172,
                original_price_rupees: Some(190),
                stock: 55,
                is_featured: false,
                is_bestseller: true,
                rating: 4.6,
                review_count: 603,
                tax_percent: 18.0,
            },
            SeedProduct {
                name: "Clinic Plus Strong & Long Shampoo 650ml",
                description: None,
                price_rupees: 315,
                original_price_rupees: Some(340),
                stock: 30,
                is_featured: false,
                is_bestseller: false,
                rating: 4.3,
                review_count: 278,
                tax_percent: 18.0,
            },
            SeedProduct {
                name: "Colgate MaxFresh Toothpaste 150g",
                description: Some("Cooling crystal gel"),
                price_rupees: 95,
                original_price_rupees: None,
                stock: 70,
                is_featured: true,
                is_bestseller: false,
                rating: 4.4,
                review_count: 342,
                tax_percent: 18.0,
            },
            SeedProduct {
                name: "Nivea Nourishing Body Lotion 400ml",
                description: None,
                price_rupees: 299,
                original_price_rupees: Some(325),
                stock: 20,
                is_featured: false,
                is_bestseller: false,
                rating: 4.5,
                review_count: 187,
                tax_percent: 18.0,
            },
        ],
    },
    SeedCategory {
        name: "Household Essentials",
        description: "Cleaning and home care supplies",
        products: &[
            SeedProduct {
                name: "Surf Excel Matic Liquid 2L",
                description: Some("Front-load washing machine detergent"),
                price_rupees: 410,
                original_price_rupees: Some(450),
                stock: 35,
                is_featured: true,
                is_bestseller: true,
                rating: 4.7,
                review_count: 712,
                tax_percent: 18.0,
            },
            SeedProduct {
                name: "Vim Dishwash Bar (3 x 200g)",
                description: None,
                price_rupees: 60,
                original_price_rupees: None,
                stock: 90,
                is_featured: false,
                is_bestseller: true,
                rating: 4.3,
                review_count: 298,
                tax_percent: 18.0,
            },
            SeedProduct {
                name: "Lizol Disinfectant Floor Cleaner 2L",
                description: None,
                price_rupees: 390,
                original_price_rupees: Some(420),
                stock: 25,
                is_featured: false,
                is_bestseller: false,
                rating: 4.5,
                review_count: 234,
                tax_percent: 18.0,
            },
            SeedProduct {
                name: "Good Knight Gold Flash Refill (2 pack)",
                description: None,
                price_rupees: 145,
                original_price_rupees: Some(160),
                stock: 40,
                is_featured: false,
                is_bestseller: false,
                rating: 4.2,
                review_count: 126,
                tax_percent: 18.0,
            },
        ],
    },
];
