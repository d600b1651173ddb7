use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::types::{Product, ProductDraft, ProductPatch};

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn fetch_product(db: &Connection, id: i64) -> Result<Product> {
    db.query_row(
        "SELECT id, name FROM products WHERE id = ?1",
        params![id],
        row_to_product,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("product", id))
}

impl Store {
    pub fn list_products(&self) -> Result<Vec<Product>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare("SELECT id, name FROM products ORDER BY id")?;
        let rows = stmt.query_map([], row_to_product)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO products (name) VALUES (?1)",
            params![draft.name],
        )?;
        fetch_product(&db, db.last_insert_rowid())
    }

    pub fn replace_product(&self, id: i64, draft: &ProductDraft) -> Result<Product> {
        let db = self.db.lock().unwrap();
        let affected = db.execute(
            "UPDATE products SET name = ?1 WHERE id = ?2",
            params![draft.name, id],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("product", id));
        }
        fetch_product(&db, id)
    }

    pub fn patch_product(&self, id: i64, patch: &ProductPatch) -> Result<Product> {
        let db = self.db.lock().unwrap();
        let current = fetch_product(&db, id)?;
        let name = patch.name.clone().unwrap_or(current.name);
        db.execute(
            "UPDATE products SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        fetch_product(&db, id)
    }

    pub fn delete_product(&self, id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let affected = db.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found("product", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_store;

    #[test]
    fn crud_cycle() {
        let store = test_store();
        let created = store
            .create_product(&ProductDraft {
                name: "Espresso".to_string(),
            })
            .unwrap();

        let renamed = store
            .replace_product(
                created.id,
                &ProductDraft {
                    name: "Double Espresso".to_string(),
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "Double Espresso");

        let patched = store
            .patch_product(created.id, &ProductPatch { name: None })
            .unwrap();
        assert_eq!(patched.name, "Double Espresso");

        store.delete_product(created.id).unwrap();
        assert!(store.list_products().unwrap().is_empty());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = test_store();
        assert!(matches!(
            store.patch_product(7, &ProductPatch::default()),
            Err(StoreError::NotFound { entity: "product", id: 7 })
        ));
    }
}
