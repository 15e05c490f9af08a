//! Repository for the `immagini_prodotti` table.
//!
//! Gallery rows only; the files themselves are written and removed by the
//! caller.

use magazzino_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::image::{CreateProductImage, ProductImage};

/// Column list shared across queries.
const COLUMNS: &str = "id, codice_prodotto AS product_code, percorso_file AS file_path, \
    ordine AS position, principale AS is_principal";

/// Provides gallery operations for product images.
pub struct ImageRepo;

impl ImageRepo {
    /// Register an already-stored image file, returning the created row.
    ///
    /// The new image goes to the end of the gallery; the first image of a
    /// product becomes its principal one.
    pub async fn add(
        pool: &SqlitePool,
        input: &CreateProductImage,
    ) -> Result<ProductImage, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (next_position,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(ordine), 0) + 1 FROM immagini_prodotti WHERE codice_prodotto = ?",
        )
        .bind(&input.product_code)
        .fetch_one(&mut *tx)
        .await?;

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM immagini_prodotti WHERE codice_prodotto = ?")
                .bind(&input.product_code)
                .fetch_one(&mut *tx)
                .await?;
        let is_principal = count == 0;

        let query = format!(
            "INSERT INTO immagini_prodotti (codice_prodotto, percorso_file, ordine, principale) \
             VALUES (?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        let image = sqlx::query_as::<_, ProductImage>(&query)
            .bind(&input.product_code)
            .bind(&input.file_path)
            .bind(next_position)
            .bind(is_principal)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(image)
    }

    /// List a product's gallery in display order.
    pub async fn list(
        pool: &SqlitePool,
        product_code: &str,
    ) -> Result<Vec<ProductImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM immagini_prodotti \
             WHERE codice_prodotto = ? \
             ORDER BY ordine ASC"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(product_code)
            .fetch_all(pool)
            .await
    }

    /// The product's principal image, if it has any images at all.
    pub async fn principal(
        pool: &SqlitePool,
        product_code: &str,
    ) -> Result<Option<ProductImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM immagini_prodotti \
             WHERE codice_prodotto = ? AND principale = 1 \
             LIMIT 1"
        );
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(product_code)
            .fetch_optional(pool)
            .await
    }

    /// Delete a gallery row, returning it so the caller can unlink the
    /// file. Returns `None` if no such row exists.
    ///
    /// When the removed image was the principal one, the first remaining
    /// image in display order is promoted, keeping exactly one principal
    /// while any image exists.
    pub async fn delete(
        pool: &SqlitePool,
        image_id: DbId,
    ) -> Result<Option<ProductImage>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM immagini_prodotti WHERE id = ?");
        let image = sqlx::query_as::<_, ProductImage>(&query)
            .bind(image_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(image) = image else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM immagini_prodotti WHERE id = ?")
            .bind(image_id)
            .execute(&mut *tx)
            .await?;

        if image.is_principal {
            let first_remaining: Option<(i64,)> = sqlx::query_as(
                "SELECT id FROM immagini_prodotti \
                 WHERE codice_prodotto = ? \
                 ORDER BY ordine ASC \
                 LIMIT 1",
            )
            .bind(&image.product_code)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some((promoted_id,)) = first_remaining {
                sqlx::query("UPDATE immagini_prodotti SET principale = 1 WHERE id = ?")
                    .bind(promoted_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(image))
    }
}
