use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use comanda_store::types::{Customer, CustomerDraft, CustomerPatch};

use crate::app::AppState;
use crate::http::{require_max_len, require_opt_max_len, ApiError};

fn validate_draft(draft: &CustomerDraft) -> Result<(), ApiError> {
    require_max_len("name", &draft.name, 100)?;
    require_opt_max_len("phone", draft.phone.as_ref(), 20)?;
    require_opt_max_len("address", draft.address.as_ref(), 150)?;
    require_opt_max_len("addressNumber", draft.address_number.as_ref(), 10)?;
    require_opt_max_len("complement", draft.complement.as_ref(), 20)?;
    require_opt_max_len("zip", draft.zip.as_ref(), 10)?;
    require_opt_max_len("recipient", draft.recipient.as_ref(), 100)?;
    Ok(())
}

fn validate_patch(patch: &CustomerPatch) -> Result<(), ApiError> {
    require_opt_max_len("name", patch.name.as_ref(), 100)?;
    require_opt_max_len("phone", patch.phone.as_ref(), 20)?;
    require_opt_max_len("address", patch.address.as_ref(), 150)?;
    require_opt_max_len("addressNumber", patch.address_number.as_ref(), 10)?;
    require_opt_max_len("complement", patch.complement.as_ref(), 20)?;
    require_opt_max_len("zip", patch.zip.as_ref(), 10)?;
    require_opt_max_len("recipient", patch.recipient.as_ref(), 100)?;
    Ok(())
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.store.list_customers()?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CustomerDraft>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    validate_draft(&body)?;
    let customer = state.store.create_customer(&body)?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<CustomerDraft>,
) -> Result<Json<Customer>, ApiError> {
    validate_draft(&body)?;
    Ok(Json(state.store.replace_customer(id, &body)?))
}

pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<CustomerPatch>,
) -> Result<Json<Customer>, ApiError> {
    validate_patch(&body)?;
    Ok(Json(state.store.patch_customer(id, &body)?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_customer(id)?;
    Ok(StatusCode::NO_CONTENT)
}
