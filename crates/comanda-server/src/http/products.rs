use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use comanda_store::types::{Product, ProductDraft, ProductPatch};

use crate::app::AppState;
use crate::http::ApiError;

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.store.list_products()?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.store.create_product(&body)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<ProductDraft>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.store.replace_product(id, &body)?))
}

pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.store.patch_product(id, &body)?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_product(id)?;
    Ok(StatusCode::NO_CONTENT)
}
