//! Integration tests for the stock ledger.
//!
//! Exercises reconcile/load/sell/reset against a real database:
//! - Reconcile creates the full canonical cell set and is idempotent
//! - Load/sell round-trip, sold-counter bookkeeping
//! - Insufficient stock and invalid quantities reject without effect
//! - Scheme change resets every quantity and recreates the cell set
//! - Size ordering follows the scheme, not insertion order

use assert_matches::assert_matches;
use sqlx::SqlitePool;

use magazzino_core::error::CoreError;
use magazzino_core::sizes::SizeScheme;
use magazzino_db::error::StoreError;
use magazzino_db::models::product::SaveProduct;
use magazzino_db::repositories::{ColorRepo, ProductRepo, StockRepo};
use magazzino_db::schema;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_product(code: &str, scheme: SizeScheme) -> SaveProduct {
    SaveProduct {
        code: code.to_string(),
        name: Some(format!("Product {code}")),
        category: None,
        legacy_color: None,
        materials: None,
        description: None,
        unit_cost: None,
        price_range: None,
        production_notes: None,
        size_scheme: scheme,
    }
}

async fn setup_product(pool: &SqlitePool, code: &str, scheme: SizeScheme) {
    schema::init(pool).await.unwrap();
    ProductRepo::save(pool, &new_product(code, scheme))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: reconcile creates the canonical cell set at zero
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_reconcile_creates_full_cell_set(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;

    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();

    let sizes = StockRepo::sizes_for_color(&pool, "P1", "Blu").await.unwrap();
    let labels: Vec<&str> = sizes.iter().map(|s| s.size.as_str()).collect();
    assert_eq!(labels, vec!["38", "40", "42", "44", "46", "48", "50", "52"]);
    assert!(sizes.iter().all(|s| s.quantity == 0));

    // The color is registered as a side effect.
    let colors = ColorRepo::list(&pool, "P1").await.unwrap();
    assert_eq!(colors, vec!["Blu".to_string()]);
}

// ---------------------------------------------------------------------------
// Test: reconcile is idempotent
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_reconcile_twice_preserves_quantities(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;

    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();
    StockRepo::load(&pool, "P1", "Blu", "42", 5).await.unwrap();

    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();

    let sizes = StockRepo::sizes_for_color(&pool, "P1", "Blu").await.unwrap();
    assert_eq!(sizes.len(), 8, "no duplicate cells after second reconcile");
    let for_42 = sizes.iter().find(|s| s.size == "42").unwrap();
    assert_eq!(for_42.quantity, 5, "second reconcile must not touch quantities");
}

// ---------------------------------------------------------------------------
// Test: load then sell round-trips, sold counter moves
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_load_sell_scenario(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;
    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();

    let after_load = StockRepo::load(&pool, "P1", "Blu", "42", 5).await.unwrap();
    assert_eq!(after_load, 5);

    let after_sell = StockRepo::sell(&pool, "P1", "Blu", "42", 3).await.unwrap();
    assert_eq!(after_sell, 2);

    let product = ProductRepo::find(&pool, "P1").await.unwrap().unwrap();
    assert_eq!(product.units_sold, 3);

    // Selling more than available fails and changes nothing.
    let err = StockRepo::sell(&pool, "P1", "Blu", "42", 10).await.unwrap_err();
    assert_matches!(
        err,
        StoreError::Core(CoreError::InsufficientStock {
            available: 2,
            requested: 10
        })
    );

    let sizes = StockRepo::sizes_for_color(&pool, "P1", "Blu").await.unwrap();
    let for_42 = sizes.iter().find(|s| s.size == "42").unwrap();
    assert_eq!(for_42.quantity, 2, "failed sell must not change the quantity");

    let product = ProductRepo::find(&pool, "P1").await.unwrap().unwrap();
    assert_eq!(product.units_sold, 3, "failed sell must not bump the counter");
}

// ---------------------------------------------------------------------------
// Test: load and sell round-trip back to the prior quantity
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_load_then_sell_same_qty_round_trips(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Letter).await;
    StockRepo::reconcile(&pool, "P1", "Nero", SizeScheme::Letter)
        .await
        .unwrap();
    StockRepo::load(&pool, "P1", "Nero", "M", 4).await.unwrap();

    StockRepo::load(&pool, "P1", "Nero", "M", 7).await.unwrap();
    let after = StockRepo::sell(&pool, "P1", "Nero", "M", 7).await.unwrap();
    assert_eq!(after, 4);
}

// ---------------------------------------------------------------------------
// Test: non-positive quantities are rejected no-ops
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_non_positive_quantities_rejected(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;
    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();
    StockRepo::load(&pool, "P1", "Blu", "42", 5).await.unwrap();

    let err = StockRepo::load(&pool, "P1", "Blu", "42", 0).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));

    let err = StockRepo::sell(&pool, "P1", "Blu", "42", -2).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));

    let sizes = StockRepo::sizes_for_color(&pool, "P1", "Blu").await.unwrap();
    let for_42 = sizes.iter().find(|s| s.size == "42").unwrap();
    assert_eq!(for_42.quantity, 5);
}

// ---------------------------------------------------------------------------
// Test: mutating a missing cell is refused
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_missing_cell_is_not_found(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;

    // "Verde" was never reconciled, so no cells exist for it.
    let err = StockRepo::load(&pool, "P1", "Verde", "42", 1).await.unwrap_err();
    assert_matches!(
        err,
        StoreError::Core(CoreError::NotFound {
            entity: "stock cell",
            ..
        })
    );

    let err = StockRepo::sell(&pool, "P1", "Verde", "42", 1).await.unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Test: scheme change resets every quantity for every color
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_reset_for_scheme_change(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;
    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();
    StockRepo::reconcile(&pool, "P1", "Rosso", SizeScheme::Numeric)
        .await
        .unwrap();
    StockRepo::load(&pool, "P1", "Blu", "42", 5).await.unwrap();
    StockRepo::load(&pool, "P1", "Rosso", "46", 9).await.unwrap();

    StockRepo::reset_for_scheme_change(&pool, "P1", SizeScheme::Letter)
        .await
        .unwrap();

    for color in ["Blu", "Rosso"] {
        let sizes = StockRepo::sizes_for_color(&pool, "P1", color).await.unwrap();
        let labels: Vec<&str> = sizes.iter().map(|s| s.size.as_str()).collect();
        assert_eq!(labels, vec!["XS", "S", "M", "L", "XL"], "color {color}");
        assert!(
            sizes.iter().all(|s| s.quantity == 0),
            "all quantities reset for {color}"
        );
    }
    assert_eq!(StockRepo::total_for_product(&pool, "P1").await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: letter sizes come back in semantic order
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_letter_ordering_ignores_insertion_order(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Letter).await;
    ColorRepo::add(&pool, "P1", "Nero").await.unwrap();

    // Insert cells directly, scrambled.
    for size in ["XL", "M", "XS", "L", "S"] {
        sqlx::query(
            "INSERT INTO taglie_prodotti (codice_prodotto, colore, taglia, quantita) \
             VALUES ('P1', 'Nero', ?, 0)",
        )
        .bind(size)
        .execute(&pool)
        .await
        .unwrap();
    }

    let sizes = StockRepo::sizes_for_color(&pool, "P1", "Nero").await.unwrap();
    let labels: Vec<&str> = sizes.iter().map(|s| s.size.as_str()).collect();
    assert_eq!(labels, vec!["XS", "S", "M", "L", "XL"]);
}

// ---------------------------------------------------------------------------
// Test: totals per color and per product
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_totals(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;
    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();
    StockRepo::reconcile(&pool, "P1", "Rosso", SizeScheme::Numeric)
        .await
        .unwrap();

    StockRepo::load(&pool, "P1", "Blu", "40", 2).await.unwrap();
    StockRepo::load(&pool, "P1", "Blu", "42", 3).await.unwrap();
    StockRepo::load(&pool, "P1", "Rosso", "44", 4).await.unwrap();

    assert_eq!(StockRepo::total_for_color(&pool, "P1", "Blu").await.unwrap(), 5);
    assert_eq!(
        StockRepo::total_for_color(&pool, "P1", "Rosso").await.unwrap(),
        4
    );
    assert_eq!(StockRepo::total_for_product(&pool, "P1").await.unwrap(), 9);

    // Unknown color and product sum to zero.
    assert_eq!(
        StockRepo::total_for_color(&pool, "P1", "Verde").await.unwrap(),
        0
    );
    assert_eq!(StockRepo::total_for_product(&pool, "NOPE").await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: bulk per-size overwrite
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_set_quantities_updates_and_inserts(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;
    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();

    let entries = vec![
        ("42".to_string(), "5".to_string()),
        ("44".to_string(), "-3".to_string()),
        ("60".to_string(), "2".to_string()),
        ("".to_string(), "9".to_string()),
    ];
    StockRepo::set_quantities(&pool, "P1", "Blu", &entries)
        .await
        .unwrap();

    let sizes = StockRepo::sizes_for_color(&pool, "P1", "Blu").await.unwrap();
    let qty = |label: &str| sizes.iter().find(|s| s.size == label).map(|s| s.quantity);
    assert_eq!(qty("42"), Some(5));
    assert_eq!(qty("44"), Some(0), "negative input clamps to zero");
    assert_eq!(qty("60"), Some(2), "unknown size is inserted");
}

#[sqlx::test]
async fn test_set_quantities_rejects_non_numeric_without_effect(pool: SqlitePool) {
    setup_product(&pool, "P1", SizeScheme::Numeric).await;
    StockRepo::reconcile(&pool, "P1", "Blu", SizeScheme::Numeric)
        .await
        .unwrap();
    StockRepo::load(&pool, "P1", "Blu", "42", 5).await.unwrap();

    let entries = vec![
        ("42".to_string(), "7".to_string()),
        ("44".to_string(), "boom".to_string()),
    ];
    let err = StockRepo::set_quantities(&pool, "P1", "Blu", &entries)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Core(CoreError::Validation(_)));

    let sizes = StockRepo::sizes_for_color(&pool, "P1", "Blu").await.unwrap();
    let for_42 = sizes.iter().find(|s| s.size == "42").unwrap();
    assert_eq!(for_42.quantity, 5, "rejected update must not half-apply");
}
