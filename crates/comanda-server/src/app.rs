use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use comanda_core::config::ComandaConfig;
use comanda_store::store::Store;

use crate::sse::broadcast::EventBroadcaster;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: ComandaConfig,
    pub store: Store,
    /// Arc so per-connection deregistration guards can hold a reference
    /// independent of the full state.
    pub broadcaster: Arc<EventBroadcaster>,
}

impl AppState {
    pub fn new(config: ComandaConfig, store: Store) -> Self {
        Self {
            config,
            store,
            broadcaster: Arc::new(EventBroadcaster::new()),
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    use crate::http::{customers, order_items, orders, products, users};

    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/events", get(crate::sse::stream::events_handler))
        .route("/customer", get(customers::list).post(customers::create))
        .route(
            "/customer/{id}",
            put(customers::replace)
                .patch(customers::patch)
                .delete(customers::remove),
        )
        .route("/product", get(products::list).post(products::create))
        .route(
            "/product/{id}",
            put(products::replace)
                .patch(products::patch)
                .delete(products::remove),
        )
        .route("/user", get(users::list).post(users::create))
        .route(
            "/user/{id}",
            put(users::replace)
                .patch(users::patch)
                .delete(users::remove),
        )
        .route("/order", get(orders::list).post(orders::create))
        .route(
            "/order/{id}",
            put(orders::replace)
                .patch(orders::patch)
                .delete(orders::remove),
        )
        .route(
            "/order-product",
            get(order_items::list).post(order_items::create),
        )
        .route(
            "/order-product/{id}",
            put(order_items::replace)
                .patch(order_items::patch)
                .delete(order_items::remove),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
}
