use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use comanda_core::types::UserRole;

use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::types::{User, UserDraft, UserPatch};

/// Column order shared by every query in this module. The password column is
/// deliberately never selected — responses must not echo credentials.
const USER_SELECT: &str =
    "SELECT id, name, role, email, oauth_provider, oauth_id FROM users";

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role = UserRole::from_str(&row.get::<_, String>(2)?).unwrap_or_default();
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        role,
        email: row.get(3)?,
        oauth_provider: row.get(4)?,
        oauth_id: row.get(5)?,
    })
}

fn fetch_user(db: &Connection, id: i64) -> Result<User> {
    db.query_row(
        &format!("{} WHERE id = ?1", USER_SELECT),
        params![id],
        row_to_user,
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("user", id))
}

fn fetch_password(db: &Connection, id: i64) -> Result<String> {
    db.query_row(
        "SELECT password FROM users WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()?
    .ok_or_else(|| StoreError::not_found("user", id))
}

impl Store {
    pub fn list_users(&self) -> Result<Vec<User>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!("{} ORDER BY id", USER_SELECT))?;
        let rows = stmt.query_map([], row_to_user)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn create_user(&self, draft: &UserDraft) -> Result<User> {
        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO users (name, role, email, password, oauth_provider, oauth_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.name,
                draft.role.to_string(),
                draft.email,
                draft.password,
                draft.oauth_provider,
                draft.oauth_id,
            ],
        )?;
        fetch_user(&db, db.last_insert_rowid())
    }

    pub fn replace_user(&self, id: i64, draft: &UserDraft) -> Result<User> {
        let db = self.db.lock().unwrap();
        let affected = db.execute(
            "UPDATE users SET name = ?1, role = ?2, email = ?3, password = ?4,
             oauth_provider = ?5, oauth_id = ?6 WHERE id = ?7",
            params![
                draft.name,
                draft.role.to_string(),
                draft.email,
                draft.password,
                draft.oauth_provider,
                draft.oauth_id,
                id,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("user", id));
        }
        fetch_user(&db, id)
    }

    pub fn patch_user(&self, id: i64, patch: &UserPatch) -> Result<User> {
        let db = self.db.lock().unwrap();
        let current = fetch_user(&db, id)?;
        let password = match patch.password.clone() {
            Some(p) => p,
            None => fetch_password(&db, id)?,
        };
        let merged = UserDraft {
            name: patch.name.clone().unwrap_or(current.name),
            role: patch.role.unwrap_or(current.role),
            email: patch.email.clone().unwrap_or(current.email),
            password,
            oauth_provider: patch.oauth_provider.clone().or(current.oauth_provider),
            oauth_id: patch.oauth_id.clone().or(current.oauth_id),
        };
        db.execute(
            "UPDATE users SET name = ?1, role = ?2, email = ?3, password = ?4,
             oauth_provider = ?5, oauth_id = ?6 WHERE id = ?7",
            params![
                merged.name,
                merged.role.to_string(),
                merged.email,
                merged.password,
                merged.oauth_provider,
                merged.oauth_id,
                id,
            ],
        )?;
        fetch_user(&db, id)
    }

    pub fn delete_user(&self, id: i64) -> Result<()> {
        let db = self.db.lock().unwrap();
        let affected = db.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }
}
