//! Account endpoints

use axum::extract::{Path, State};
use axum::Json;
use finboard_core::Account;

use super::{BulkDeletePayload, NamePayload};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::{AppState, Data};

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Data<Vec<Account>>>> {
    let accounts = state.store.list_accounts(&user.0).await?;
    Ok(Json(Data::new(accounts)))
}

pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Data<Account>>> {
    let account = state.store.get_account(&user.0, id).await?;
    Ok(Json(Data::new(account)))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NamePayload>,
) -> ApiResult<Json<Data<Account>>> {
    let name = payload.validated()?;
    let account = state.store.create_account(&user.0, name).await?;
    log::info!("account {} created for {}", account.id, user.0);
    Ok(Json(Data::new(account)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<NamePayload>,
) -> ApiResult<Json<Data<Account>>> {
    let name = payload.validated()?;
    let account = state.store.update_account(&user.0, id, name).await?;
    Ok(Json(Data::new(account)))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Data<i64>>> {
    state.store.delete_account(&user.0, id).await?;
    log::info!("account {} deleted for {}", id, user.0);
    Ok(Json(Data::new(id)))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BulkDeletePayload>,
) -> ApiResult<Json<Data<u64>>> {
    let deleted = state
        .store
        .bulk_delete_accounts(&user.0, &payload.ids)
        .await?;
    log::info!("{} accounts deleted for {}", deleted, user.0);
    Ok(Json(Data::new(deleted)))
}
