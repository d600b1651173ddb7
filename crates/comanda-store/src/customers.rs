use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::types::{Customer, CustomerDraft, CustomerPatch};

/// Column order shared by every query in this module.
const CUSTOMER_SELECT: &str = "SELECT id, name, phone, address, address_number, \
     complement, zip, recipient FROM customers";

fn row_to_customer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        address: row.get(3)?,
        address_number: row.get(4)?,
        complement: row.get(5)?,
        zip: row.get(6)?,
        recipient: row.get(7)?,
    })
}

pub(crate) fn fetch_customer(db: &Connection, id: i64) -> Result<Customer> {
    db.query_row(
        &format!("{} WHERE id = ?1", CUSTOMER_SELECT),
        params![id],
        row_to_customer,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("customer", id))
}

impl Store {
    pub fn list_customers(&self) -> Result<Vec<Customer>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!("{} ORDER BY id", CUSTOMER_SELECT))?;
        let rows = stmt.query_map([], row_to_customer)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO customers (name, phone, address, address_number, complement, zip, recipient)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                draft.name,
                draft.phone,
                draft.address,
                draft.address_number,
                draft.complement,
                draft.zip,
                draft.recipient,
            ],
        )?;
        fetch_customer(&db, db.last_insert_rowid())
    }

    pub fn replace_customer(&self, id: i64, draft: &CustomerDraft) -> Result<Customer> {
        let db = self.db.lock().unwrap();
        let affected = db.execute(
            "UPDATE customers SET name = ?1, phone = ?2, address = ?3, address_number = ?4,
             complement = ?5, zip = ?6, recipient = ?7 WHERE id = ?8",
            params![
                draft.name,
                draft.phone,
                draft.address,
                draft.address_number,
                draft.complement,
                draft.zip,
                draft.recipient,
                id,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("customer", id));
        }
        fetch_customer(&db, id)
    }

    pub fn patch_customer(&self, id: i64, patch: &CustomerPatch) -> Result<Customer> {
        let db = self.db.lock().unwrap();
        let current = fetch_customer(&db, id)?;
        let merged = CustomerDraft {
            name: patch.name.clone().unwrap_or(current.name),
            phone: patch.phone.clone().or(current.phone),
            address: patch.address.clone().or(current.address),
            address_number: patch.address_number.clone().or(current.address_number),
            complement: patch.complement.clone().or(current.complement),
            zip: patch.zip.clone().or(current.zip),
            recipient: patch.recipient.clone().or(current.recipient),
        };
        db.execute(
            "UPDATE customers SET name = ?1, phone = ?2, address = ?3, address_number = ?4,
             complement = ?5, zip = ?6, recipient = ?7 WHERE id = ?8",
            params![
                merged.name,
                merged.phone,
                merged.address,
                merged.address_number,
                merged.complement,
                merged.zip,
                merged.recipient,
                id,
            ],
        )?;
        fetch_customer(&db, id)
    }

    pub fn delete_customer(&self, id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let affected = db.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found("customer", id));
        }
        Ok(())
    }
}
