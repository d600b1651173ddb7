use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::types::{OrderItem, OrderItemDraft, OrderItemPatch};

const ITEM_SELECT: &str =
    "SELECT id, quantity, price, product_id, order_id FROM order_products";

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderItem> {
    Ok(OrderItem {
        id: row.get(0)?,
        quantity: row.get(1)?,
        price: row.get(2)?,
        product_id: row.get(3)?,
        order_id: row.get(4)?,
    })
}

fn fetch_item(db: &Connection, id: i64) -> Result<OrderItem> {
    db.query_row(
        &format!("{} WHERE id = ?1", ITEM_SELECT),
        params![id],
        row_to_item,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("order item", id))
}

impl Store {
    pub fn list_order_items(&self) -> Result<Vec<OrderItem>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!("{} ORDER BY id", ITEM_SELECT))?;
        let rows = stmt.query_map([], row_to_item)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn create_order_item(&self, draft: &OrderItemDraft) -> Result<OrderItem> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO order_products (quantity, price, product_id, order_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![draft.quantity, draft.price, draft.product_id, draft.order_id],
        )?;
        fetch_item(&db, db.last_insert_rowid())
    }

    pub fn replace_order_item(&self, id: i64, draft: &OrderItemDraft) -> Result<OrderItem> {
        let db = self.db.lock().unwrap();
        let affected = db.execute(
            "UPDATE order_products SET quantity = ?1, price = ?2, product_id = ?3, order_id = ?4
             WHERE id = ?5",
            params![draft.quantity, draft.price, draft.product_id, draft.order_id, id],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("order item", id));
        }
        fetch_item(&db, id)
    }

    pub fn patch_order_item(&self, id: i64, patch: &OrderItemPatch) -> Result<OrderItem> {
        let db = self.db.lock().unwrap();
        let current = fetch_item(&db, id)?;
        let merged = OrderItemDraft {
            quantity: patch.quantity.unwrap_or(current.quantity),
            price: patch.price.unwrap_or(current.price),
            product_id: patch.product_id.unwrap_or(current.product_id),
            order_id: patch.order_id.unwrap_or(current.order_id),
        };
        db.execute(
            "UPDATE order_products SET quantity = ?1, price = ?2, product_id = ?3, order_id = ?4
             WHERE id = ?5",
            params![merged.quantity, merged.price, merged.product_id, merged.order_id, id],
        )?;
        fetch_item(&db, id)
    }

    pub fn delete_order_item(&self, id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let affected = db.execute("DELETE FROM order_products WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found("order item", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_store;
    use crate::types::{CustomerDraft, OrderDraft, ProductDraft, UserDraft};
    use comanda_core::types::{OrderStatus, UserRole};

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
                role: UserRole::User,
                email: "bruno@example.com".to_string(),
                password: "pw".to_string(),
                oauth_provider: None,
                oauth_id: None,
            })
            .unwrap();
        let order = store
            .create_order(&OrderDraft {
                date: "2026-08-30T12:00:00Z".parse().unwrap(),
                max_time_delivery: None,
                min_time_delivery: None,
                order_status: OrderStatus::Pending,
                customer_id: customer.id,
                user_id: user.id,
            })
            .unwrap();
        let product = store
            .create_product(&ProductDraft {
                name: "Espresso".to_string(),
            })
            .unwrap();
        (order.id, product.id)
    }

    #[test]
    fn create_patch_delete() {
        let store = test_store();
        let (order_id, product_id) = seed(&store);

        let item = store
            .create_order_item(&OrderItemDraft {
                quantity: 3,
                price: 4.5,
                product_id,
                order_id,
            })
            .unwrap();
        assert_eq!(item.quantity, 3);

        let patched = store
            .patch_order_item(
                item.id,
                &OrderItemPatch {
                    quantity: Some(5),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(patched.quantity, 5);
        assert_eq!(patched.price, 4.5);

        store.delete_order_item(item.id).unwrap();
        assert!(matches!(
            store.delete_order_item(item.id),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn create_requires_existing_order_and_product() {
        let store = test_store();
        let (order_id, _) = seed(&store);
        let err = store
            .create_order_item(&OrderItemDraft {
                quantity: 1,
                price: 1.0,
                product_id: 999,
                order_id,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
