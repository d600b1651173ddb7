use std::sync::Mutex;

use rusqlite::Connection;

/// All persistence for the order-management domain.
///
/// Thread-safe: wraps the SQLite connection in a Mutex. Every public method
/// takes the lock for the duration of one database operation; uniqueness and
/// referential integrity are SQLite's job (foreign_keys=ON), not ours.
pub struct Store {
    pub(crate) db: Mutex<Connection>,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_store() -> Store {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    conn.execute_batch("PRAGMA foreign_keys=ON;")
        .expect("enable foreign keys");
    crate::db::init_db(&conn).expect("init schema");
    Store::new(conn)
}
