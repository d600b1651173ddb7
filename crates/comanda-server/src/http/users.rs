use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use comanda_store::types::{User, UserDraft, UserPatch};

use crate::app::AppState;
use crate::http::{require_email, ApiError};

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.store.list_users()?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserDraft>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    require_email(&body.email)?;
    let user = state.store.create_user(&body)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UserDraft>,
) -> Result<Json<User>, ApiError> {
    require_email(&body.email)?;
    Ok(Json(state.store.replace_user(id, &body)?))
}

pub async fn patch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    if let Some(ref email) = body.email {
        require_email(email)?;
    }
    Ok(Json(state.store.patch_user(id, &body)?))
}

pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_user(id)?;
    Ok(StatusCode::NO_CONTENT)
}
