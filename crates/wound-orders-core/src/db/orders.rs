//! Order database operations.

use chrono::Datelike;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Order, OrderDocument, OrderItem, OrderStatus, ShippingDetails};

const ORDER_COLUMNS: &str = r#"
    order_id, order_number, provider_id, patient_id,
    facility_name, phone_number, street, city, zip_code, country,
    status, delivery_date, created_at, updated_at
"#;

/// Format a human-facing order number ("PH-2026-00042").
pub fn format_order_number(prefix: &str, year: i32, sequence: i64) -> String {
    format!("{}-{}-{:05}", prefix, year, sequence)
}

impl Database {
    /// Insert an order together with all of its items.
    ///
    /// Either the order and every item are written, or nothing is. The
    /// order number is derived from the row sequence and written back into
    /// `order.order_number`.
    pub fn insert_order(&self, order: &mut Order, number_prefix: &str) -> DbResult<()> {
        let order_number = self.with_savepoint("insert_order", || {
            self.conn.execute(
                &format!(
                    "INSERT INTO orders ({ORDER_COLUMNS}) VALUES (
                        ?1, NULL, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
                    )"
                ),
                params![
                    order.order_id,
                    order.provider_id,
                    order.patient_id,
                    order.shipping.facility_name,
                    order.shipping.phone_number,
                    order.shipping.street,
                    order.shipping.city,
                    order.shipping.zip_code,
                    order.shipping.country,
                    order.status.as_str(),
                    order.delivery_date,
                    order.created_at,
                    order.updated_at,
                ],
            )?;

            let sequence = self.conn.last_insert_rowid();
            let order_number =
                format_order_number(number_prefix, chrono::Utc::now().year(), sequence);
            self.conn.execute(
                "UPDATE orders SET order_number = ?1 WHERE order_id = ?2",
                params![order_number, order.order_id],
            )?;

            for item in &order.items {
                if item.order_id != order.order_id {
                    return Err(DbError::Constraint(format!(
                        "Item {} does not belong to order {}",
                        item.item_id, order.order_id
                    )));
                }
                self.conn.execute(
                    r#"
                    INSERT INTO order_items (item_id, order_id, product_id, variant_id, quantity)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        item.item_id,
                        item.order_id,
                        item.product_id,
                        item.variant_id,
                        item.quantity,
                    ],
                )?;
            }

            Ok(order_number)
        })?;

        order.order_number = Some(order_number);
        Ok(())
    }

    /// Get an order (with items) by ID.
    pub fn get_order(&self, order_id: &str) -> DbResult<Option<Order>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?"),
                [order_id],
                map_order_row,
            )
            .optional()?;

        match row {
            Some(row) => Ok(Some(self.hydrate_order(row)?)),
            None => Ok(None),
        }
    }

    /// Get an order only if it was placed by `provider_id`.
    pub fn get_order_for_provider(
        &self,
        order_id: &str,
        provider_id: &str,
    ) -> DbResult<Option<Order>> {
        Ok(self
            .get_order(order_id)?
            .filter(|order| order.provider_id == provider_id))
    }

    /// List a patient's orders, newest first, optionally limited.
    pub fn list_orders_for_patient(
        &self,
        patient_id: &str,
        limit: Option<usize>,
    ) -> DbResult<Vec<Order>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE patient_id = ?1
             ORDER BY created_at DESC, seq DESC
             LIMIT ?2"
        ))?;

        let rows = stmt.query_map(params![patient_id, limit], map_order_row)?;

        let mut orders = Vec::new();
        for row in rows {
            orders.push(self.hydrate_order(row?)?);
        }
        Ok(orders)
    }

    /// Count a patient's orders.
    pub fn count_orders_for_patient(&self, patient_id: &str) -> DbResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM orders WHERE patient_id = ?",
            [patient_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Move an order to `next`, enforcing the order lifecycle.
    ///
    /// Orders in a terminal status never change again, and delivered ones
    /// are also frozen by a trigger. Reaching `delivered` stamps the
    /// delivery date.
    pub fn update_order_status(&self, order_id: &str, next: OrderStatus) -> DbResult<()> {
        let current: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM orders WHERE order_id = ?",
                [order_id],
                |row| row.get(0),
            )
            .optional()?;

        let current = current.ok_or_else(|| DbError::NotFound(format!("order {}", order_id)))?;
        let current = string_to_status(&current)?;

        if current.is_terminal() {
            return Err(DbError::Constraint(format!(
                "Order {} is {} and can no longer change",
                order_id,
                current.as_str()
            )));
        }
        if !current.can_transition_to(next) {
            return Err(DbError::Constraint(format!(
                "Invalid order status transition: {} -> {}",
                current.as_str(),
                next.as_str()
            )));
        }

        let delivery_date = (next == OrderStatus::Delivered)
            .then(|| chrono::Utc::now().format("%Y-%m-%d").to_string());

        self.conn.execute(
            r#"
            UPDATE orders SET
                status = ?2,
                delivery_date = COALESCE(?3, delivery_date),
                updated_at = ?4
            WHERE order_id = ?1
            "#,
            params![
                order_id,
                next.as_str(),
                delivery_date,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Record a generated document for an order.
    pub fn insert_order_document(&self, document: &OrderDocument) -> DbResult<()> {
        let emailed_to_json = serde_json::to_string(&document.emailed_to)?;
        self.conn.execute(
            r#"
            INSERT INTO order_documents (
                document_id, order_id, kind, blob_path, sha256, emailed_to, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                document.document_id,
                document.order_id,
                document.kind,
                document.blob_path,
                document.sha256,
                emailed_to_json,
                document.created_at,
            ],
        )?;
        Ok(())
    }

    /// List documents generated for an order, oldest first.
    pub fn list_order_documents(&self, order_id: &str) -> DbResult<Vec<OrderDocument>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT document_id, order_id, kind, blob_path, sha256, emailed_to, created_at
            FROM order_documents
            WHERE order_id = ?
            ORDER BY created_at, rowid
            "#,
        )?;

        let rows = stmt.query_map([order_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (document_id, order_id, kind, blob_path, sha256, emailed_to, created_at) = row?;
            documents.push(OrderDocument {
                document_id,
                order_id,
                kind,
                blob_path,
                sha256,
                emailed_to: serde_json::from_str(&emailed_to)?,
                created_at,
            });
        }
        Ok(documents)
    }

    fn list_order_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT item_id, order_id, product_id, variant_id, quantity
            FROM order_items
            WHERE order_id = ?
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([order_id], |row| {
            Ok(OrderItem {
                item_id: row.get(0)?,
                order_id: row.get(1)?,
                product_id: row.get(2)?,
                variant_id: row.get(3)?,
                quantity: row.get(4)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn hydrate_order(&self, row: OrderRow) -> DbResult<Order> {
        let items = self.list_order_items(&row.order_id)?;
        let status = string_to_status(&row.status)?;

        Ok(Order {
            order_id: row.order_id,
            order_number: row.order_number,
            provider_id: row.provider_id,
            patient_id: row.patient_id,
            shipping: ShippingDetails {
                facility_name: row.facility_name,
                phone_number: row.phone_number,
                street: row.street,
                city: row.city,
                zip_code: row.zip_code,
                country: row.country,
            },
            status,
            delivery_date: row.delivery_date,
            items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Intermediate row struct for database mapping.
struct OrderRow {
    order_id: String,
    order_number: Option<String>,
    provider_id: String,
    patient_id: String,
    facility_name: String,
    phone_number: String,
    street: String,
    city: String,
    zip_code: String,
    country: Option<String>,
    status: String,
    delivery_date: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_order_row(row: &Row<'_>) -> rusqlite::Result<OrderRow> {
    Ok(OrderRow {
        order_id: row.get(0)?,
        order_number: row.get(1)?,
        provider_id: row.get(2)?,
        patient_id: row.get(3)?,
        facility_name: row.get(4)?,
        phone_number: row.get(5)?,
        street: row.get(6)?,
        city: row.get(7)?,
        zip_code: row.get(8)?,
        country: row.get(9)?,
        status: row.get(10)?,
        delivery_date: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn string_to_status(s: &str) -> Result<OrderStatus, DbError> {
    OrderStatus::parse(s).ok_or_else(|| DbError::Constraint(format!("Unknown order status: {}", s)))
}
