use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use comanda_store::types::{OrderItem, OrderItemDraft, OrderItemPatch};

use crate::app::AppState;
use crate::http::ApiError;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<OrderItem>>, ApiError> {
    Ok(Json(state.store.list_order_items()?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OrderItemDraft>,
) -> Result<(StatusCode, Json<OrderItem>), ApiError> {
    let item = state.store.create_order_item(&body)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<OrderItemDraft>,
) -> Result<Json<OrderItem>, ApiError> {
    Ok(Json(state.store.replace_order_item(id, &body)?))
}

pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<OrderItemPatch>,
) -> Result<Json<OrderItem>, ApiError> {
    Ok(Json(state.store.patch_order_item(id, &body)?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_order_item(id)?;
    Ok(StatusCode::NO_CONTENT)
}
