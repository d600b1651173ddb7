use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use comanda_server::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comanda_server=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path via COMANDA_CONFIG env > ~/.comanda/comanda.toml
    let config_path = std::env::var("COMANDA_CONFIG").ok();
    let config = comanda_core::config::ComandaConfig::load(config_path.as_deref())
        .unwrap_or_else(|e| {
            tracing::warn!("Config load failed ({}), using defaults", e);
            comanda_core::config::ComandaConfig::default()
        });

    let bind = config.server.bind.clone();
    let port = config.server.port;

    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(&db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    comanda_store::db::init_db(&db)?;
    info!("database schema ready");

    // the store gets its own connection; the init handle is dropped
    let store_conn = rusqlite::Connection::open(&db_path)?;
    store_conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    let store = comanda_store::store::Store::new(store_conn);

    let state = Arc::new(app::AppState::new(config, store));
    let router = app::build_router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("comanda server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
