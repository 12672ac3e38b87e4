//! Catalog database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::{Product, ProductVariant};

impl Database {
    /// Insert or update a product.
    pub fn upsert_product(&self, product: &Product) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO products (product_id, name, manufacturer, hcpcs_code, active, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))
            ON CONFLICT(product_id) DO UPDATE SET
                name = excluded.name,
                manufacturer = excluded.manufacturer,
                hcpcs_code = excluded.hcpcs_code,
                active = excluded.active,
                updated_at = datetime('now')
            "#,
            params![
                product.product_id,
                product.name,
                product.manufacturer,
                product.hcpcs_code,
                product.active,
            ],
        )?;
        Ok(())
    }

    /// Get a product by ID.
    pub fn get_product(&self, product_id: &str) -> DbResult<Option<Product>> {
        self.conn
            .query_row(
                r#"
                SELECT product_id, name, manufacturer, hcpcs_code, active
                FROM products
                WHERE product_id = ?
                "#,
                [product_id],
                |row| {
                    Ok(Product {
                        product_id: row.get(0)?,
                        name: row.get(1)?,
                        manufacturer: row.get(2)?,
                        hcpcs_code: row.get(3)?,
                        active: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert or update a product variant.
    pub fn upsert_variant(&self, variant: &ProductVariant) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO product_variants (variant_id, product_id, size, active, updated_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            ON CONFLICT(variant_id) DO UPDATE SET
                product_id = excluded.product_id,
                size = excluded.size,
                active = excluded.active,
                updated_at = datetime('now')
            "#,
            params![
                variant.variant_id,
                variant.product_id,
                variant.size,
                variant.active,
            ],
        )?;
        Ok(())
    }

    /// Get a variant by ID.
    pub fn get_variant(&self, variant_id: &str) -> DbResult<Option<ProductVariant>> {
        self.conn
            .query_row(
                r#"
                SELECT variant_id, product_id, size, active
                FROM product_variants
                WHERE variant_id = ?
                "#,
                [variant_id],
                |row| {
                    Ok(ProductVariant {
                        variant_id: row.get(0)?,
                        product_id: row.get(1)?,
                        size: row.get(2)?,
                        active: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// List the variants of a product, ordered by ID.
    pub fn list_variants(&self, product_id: &str) -> DbResult<Vec<ProductVariant>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT variant_id, product_id, size, active
            FROM product_variants
            WHERE product_id = ?
            ORDER BY variant_id
            "#,
        )?;

        let rows = stmt.query_map([product_id], |row| {
            Ok(ProductVariant {
                variant_id: row.get(0)?,
                product_id: row.get(1)?,
                size: row.get(2)?,
                active: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
