//! Category endpoints

use axum::extract::{Path, State};
use axum::Json;
use finboard_core::Category;

use super::{BulkDeletePayload, NamePayload};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::{AppState, Data};

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Data<Vec<Category>>>> {
    let categories = state.store.list_categories(&user.0).await?;
    Ok(Json(Data::new(categories)))
}

pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Data<Category>>> {
    let category = state.store.get_category(&user.0, id).await?;
    Ok(Json(Data::new(category)))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NamePayload>,
) -> ApiResult<Json<Data<Category>>> {
    let name = payload.validated()?;
    let category = state.store.create_category(&user.0, name).await?;
    log::info!("category {} created for {}", category.id, user.0);
    Ok(Json(Data::new(category)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NamePayload>,
) -> ApiResult<Json<Data<Category>>> {
    let name = payload.validated()?;
    let category = state.store.update_category(&user.0, id, name).await?;
    Ok(Json(Data::new(category)))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Data<i64>>> {
    state.store.delete_category(&user.0, id).await?;
    Ok(Json(Data::new(id)))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BulkDeletePayload>,
) -> ApiResult<Json<Data<u64>>> {
    let deleted = state
        .store
        .bulk_delete_categories(&user.0, &payload.ids)
        .await?;
    Ok(Json(Data::new(deleted)))
}
