use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use comanda_store::types::{Order, OrderDraft, OrderPatch, OrderWithRelations};

use crate::app::AppState;
use crate::http::{require_delivery_time, ApiError};

/// Event name broadcast to SSE subscribers when an order is created.
pub const NEW_ORDER_EVENT: &str = "new_order";

pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderWithRelations>>, ApiError> {
    Ok(Json(state.store.list_orders()?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OrderDraft>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    require_delivery_time(body.max_time_delivery.as_ref())?;
    require_delivery_time(body.min_time_delivery.as_ref())?;
    let order = state.store.create_order(&body)?;

    state.broadcaster.publish(NEW_ORDER_EVENT, &order);

    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<OrderDraft>,
) -> Result<Json<Order>, ApiError> {
    require_delivery_time(body.max_time_delivery.as_ref())?;
    require_delivery_time(body.min_time_delivery.as_ref())?;
    Ok(Json(state.store.replace_order(id, &body)?))
}

pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    require_delivery_time(body.max_time_delivery.as_ref())?;
    require_delivery_time(body.min_time_delivery.as_ref())?;
    Ok(Json(state.store.patch_order(id, &body)?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_order(id)?;
    Ok(StatusCode::NO_CONTENT)
}
