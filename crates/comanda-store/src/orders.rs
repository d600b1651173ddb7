use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use tracing::debug;

use comanda_core::types::OrderStatus;

use crate::customers::fetch_customer;
use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::types::{
    Order, OrderDraft, OrderItem, OrderItemWithProduct, OrderPatch, OrderWithRelations, Product,
};

/// Column order shared by every query in this module.
const ORDER_SELECT: &str = "SELECT id, date, max_time_delivery, min_time_delivery, \
     order_status, customer_id, user_id FROM orders";

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    let date: String = row.get(1)?;
    let status: String = row.get(4)?;
    Ok(Order {
        id: row.get(0)?,
        date: DateTime::parse_from_rfc3339(&date)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default(),
        max_time_delivery: row.get(2)?,
        min_time_delivery: row.get(3)?,
        order_status: OrderStatus::from_str(&status).unwrap_or_default(),
        customer_id: row.get(5)?,
        user_id: row.get(6)?,
    })
}

pub(crate) fn fetch_order(db: &Connection, id: i64) -> Result<Order> {
    db.query_row(
        &format!("{} WHERE id = ?1", ORDER_SELECT),
        params![id],
        row_to_order,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("order", id))
}

/// Line items for one order, each joined with its product.
fn fetch_line_items(db: &Connection, order_id: i64) -> Result<Vec<OrderItemWithProduct>> {
    let mut stmt = db.prepare(
        "SELECT oi.id, oi.quantity, oi.price, oi.product_id, oi.order_id, p.id, p.name
         FROM order_products oi
         JOIN products p ON p.id = oi.product_id
         WHERE oi.order_id = ?1
         ORDER BY oi.id",
    )?;
    let rows = stmt.query_map(params![order_id], |row| {
        Ok(OrderItemWithProduct {
            item: OrderItem {
                id: row.get(0)?,
                quantity: row.get(1)?,
                price: row.get(2)?,
                product_id: row.get(3)?,
                order_id: row.get(4)?,
            },
            product: Product {
                id: row.get(5)?,
                name: row.get(6)?,
            },
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<_>>()?)
}

impl Store {
    /// List orders with customer and line items attached. One query per
    /// relation per order — fine at this table size.
    pub fn list_orders(&self) -> Result<Vec<OrderWithRelations>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!("{} ORDER BY id", ORDER_SELECT))?;
        let orders: Vec<Order> = stmt
            .query_map([], row_to_order)?
            .collect::<rusqlite::Result<_>>()?;

        let mut out = Vec::with_capacity(orders.len());
        for order in orders {
            let customer = fetch_customer(&db, order.customer_id)?;
            let order_product = fetch_line_items(&db, order.id)?;
            out.push(OrderWithRelations {
                order,
                customer,
                order_product,
            });
        }
        Ok(out)
    }

    pub fn create_order(&self, draft: &OrderDraft) -> Result<Order> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO orders (date, max_time_delivery, min_time_delivery, order_status,
             customer_id, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.date.to_rfc3339(),
                draft.max_time_delivery,
                draft.min_time_delivery,
                draft.order_status.to_string(),
                draft.customer_id,
                draft.user_id,
            ],
        )?;
        let order = fetch_order(&db, db.last_insert_rowid())?;
        debug!(order_id = order.id, "order created");
        Ok(order)
    }

    pub fn replace_order(&self, id: i64, draft: &OrderDraft) -> Result<Order> {
        let db = self.db.lock().unwrap();
        let affected = db.execute(
            "UPDATE orders SET date = ?1, max_time_delivery = ?2, min_time_delivery = ?3,
             order_status = ?4, customer_id = ?5, user_id = ?6 WHERE id = ?7",
            params![
                draft.date.to_rfc3339(),
                draft.max_time_delivery,
                draft.min_time_delivery,
                draft.order_status.to_string(),
                draft.customer_id,
                draft.user_id,
                id,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("order", id));
        }
        fetch_order(&db, id)
    }

    pub fn patch_order(&self, id: i64, patch: &OrderPatch) -> Result<Order> {
        let db = self.db.lock().unwrap();
        let current = fetch_order(&db, id)?;
        let merged = OrderDraft {
            date: patch.date.unwrap_or(current.date),
            max_time_delivery: patch.max_time_delivery.clone().or(current.max_time_delivery),
            min_time_delivery: patch.min_time_delivery.clone().or(current.min_time_delivery),
            order_status: patch.order_status.unwrap_or(current.order_status),
            customer_id: patch.customer_id.unwrap_or(current.customer_id),
            user_id: patch.user_id.unwrap_or(current.user_id),
        };
        db.execute(
            "UPDATE orders SET date = ?1, max_time_delivery = ?2, min_time_delivery = ?3,
             order_status = ?4, customer_id = ?5, user_id = ?6 WHERE id = ?7",
            params![
                merged.date.to_rfc3339(),
                merged.max_time_delivery,
                merged.min_time_delivery,
                merged.order_status.to_string(),
                merged.customer_id,
                merged.user_id,
                id,
            ],
        )?;
        fetch_order(&db, id)
    }

    /// Delete an order. Its line items go with it (ON DELETE CASCADE).
    pub fn delete_order(&self, id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let affected = db.execute("DELETE FROM orders WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found("order", id));
        }
        debug!(order_id = id, "order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_store;
    use crate::types::{CustomerDraft, OrderItemDraft, ProductDraft, UserDraft};
    use comanda_core::types::UserRole;

    fn seed(store: &Store) -> (i64, i64) {
        let customer = store
            .create_customer(&CustomerDraft {
                name: "Alice".to_string(),
                phone: None,
                address: None,
                address_number: None,
                complement: None,
                zip: None,
                recipient: None,
            })
            .unwrap();
        let user = store
            .create_user(&UserDraft {
                name: "Bruno".to_string(),
                role: UserRole::Admin,
                email: "bruno@example.com".to_string(),
                password: "pw".to_string(),
                oauth_provider: None,
                oauth_id: None,
            })
            .unwrap();
        (customer.id, user.id)
    }

    fn draft(customer_id: i64, user_id: i64) -> OrderDraft {
        OrderDraft {
            date: "2026-08-30T12:00:00Z".parse().unwrap(),
            max_time_delivery: Some("18:00".to_string()),
            min_time_delivery: Some("17:00".to_string()),
            order_status: OrderStatus::Pending,
            customer_id,
            user_id,
        }
    }

    #[test]
    fn create_and_fetch_round_trips_date_and_status() {
        let store = test_store();
        let (customer_id, user_id) = seed(&store);
        let order = store.create_order(&draft(customer_id, user_id)).unwrap();

        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.date, "2026-08-30T12:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(order.max_time_delivery.as_deref(), Some("18:00"));
    }

    #[test]
    fn list_orders_hydrates_relations() {
        let store = test_store();
        let (customer_id, user_id) = seed(&store);
        let order = store.create_order(&draft(customer_id, user_id)).unwrap();
        let product = store
            .create_product(&ProductDraft {
                name: "Espresso".to_string(),
            })
            .unwrap();
        store
            .create_order_item(&OrderItemDraft {
                quantity: 2,
                price: 4.5,
                product_id: product.id,
                order_id: order.id,
            })
            .unwrap();

        let listed = store.list_orders().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer.name, "Alice");
        assert_eq!(listed[0].order_product.len(), 1);
        assert_eq!(listed[0].order_product[0].product.name, "Espresso");
        assert_eq!(listed[0].order_product[0].item.quantity, 2);
    }

    #[test]
    fn patch_moves_status_only() {
        let store = test_store();
        let (customer_id, user_id) = seed(&store);
        let order = store.create_order(&draft(customer_id, user_id)).unwrap();

        let patched = store
            .patch_order(
                order.id,
                &OrderPatch {
                    order_status: Some(OrderStatus::Delivered),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(patched.order_status, OrderStatus::Delivered);
        assert_eq!(patched.customer_id, customer_id);
    }

    #[test]
    fn unknown_customer_violates_foreign_key() {
        let store = test_store();
        let (_, user_id) = seed(&store);
        let err = store.create_order(&draft(999, user_id)).unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn deleting_order_cascades_to_line_items() {
        let store = test_store();
        let (customer_id, user_id) = seed(&store);
        let order = store.create_order(&draft(customer_id, user_id)).unwrap();
        let product = store
            .create_product(&ProductDraft {
                name: "Espresso".to_string(),
            })
            .unwrap();
        store
            .create_order_item(&OrderItemDraft {
                quantity: 1,
                price: 4.5,
                product_id: product.id,
                order_id: order.id,
            })
            .unwrap();

        store.delete_order(order.id).unwrap();
        assert!(store.list_order_items().unwrap().is_empty());
        // the product itself survives
        assert_eq!(store.list_products().unwrap().len(), 1);
    }
}
