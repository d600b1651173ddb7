use rusqlite::{Connection, Result};

/// Initialise all tables. Safe to call on every startup — CREATE IF NOT
/// EXISTS means it's idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    create_customers_table(conn)?;
    create_products_table(conn)?;
    create_users_table(conn)?;
    create_orders_table(conn)?;
    create_order_products_table(conn)?;
    Ok(())
}

fn create_customers_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS customers (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            phone           TEXT,
            address         TEXT,
            address_number  TEXT,
            complement      TEXT,
            zip             TEXT,
            recipient       TEXT
        );",
    )
}

fn create_products_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS products (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL
        );",
    )
}

fn create_users_table(conn: &Connection) -> Result<()> {
    // UNIQUE email keeps one account per address; enforcement stays in SQLite.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            role            TEXT NOT NULL DEFAULT 'USER',
            email           TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            oauth_provider  TEXT,
            oauth_id        TEXT
        );",
    )
}

fn create_orders_table(conn: &Connection) -> Result<()> {
    // date is RFC 3339 text; delivery window bounds are HH:MM text.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS orders (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            date               TEXT NOT NULL,
            max_time_delivery  TEXT,
            min_time_delivery  TEXT,
            order_status       TEXT NOT NULL DEFAULT 'PENDING',
            customer_id        INTEGER NOT NULL REFERENCES customers(id),
            user_id            INTEGER NOT NULL REFERENCES users(id)
        );
        CREATE INDEX IF NOT EXISTS idx_orders_customer
            ON orders(customer_id);",
    )
}

fn create_order_products_table(conn: &Connection) -> Result<()> {
    // Line items vanish with their order; products outlive their line items.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS order_products (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            quantity    INTEGER NOT NULL,
            price       REAL NOT NULL,
            product_id  INTEGER NOT NULL REFERENCES products(id),
            order_id    INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_order_products_order
            ON order_products(order_id);",
    )
}
