//! Transaction endpoints
//!
//! Beyond plain CRUD this resource carries the bulk operations and the CSV
//! import. The import accepts raw CSV text plus a column mapping and is
//! atomic: a mapping missing a required field, or any unparsable row,
//! rejects the whole upload with nothing inserted.

use axum::extract::{Path, Query, State};
use axum::Json;
use finboard_core::import::{map_rows, parse_csv, ColumnMapping};
use finboard_core::{Period, Transaction, TransactionDraft, TransactionUpdate};
use serde::Deserialize;

use super::{parse_date_param, BulkDeletePayload};
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::{AppState, Data};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub account_id: Option<i64>,
}

impl TransactionQuery {
    /// Effective window; unparsable dates are rejected, absent ones default
    /// to the trailing dashboard window
    fn period(&self) -> ApiResult<Period> {
        let from = parse_date_param(self.from.as_deref(), "from")?;
        let to = parse_date_param(self.to.as_deref(), "to")?;
        Ok(Period::resolve(from, to))
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkCreatePayload {
    pub transactions: Vec<TransactionDraft>,
}

#[derive(Debug, Deserialize)]
pub struct ImportPayload {
    pub account_id: i64,
    pub csv: String,
    pub mapping: ColumnMapping,
}

pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TransactionQuery>,
) -> ApiResult<Json<Data<Vec<Transaction>>>> {
    let period = query.period()?;
    let transactions = state
        .store
        .list_transactions(&user.0, &period, query.account_id)
        .await?;
    Ok(Json(Data::new(transactions)))
}

pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Data<Transaction>>> {
    let transaction = state.store.get_transaction(&user.0, id).await?;
    Ok(Json(Data::new(transaction)))
}

pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(draft): Json<TransactionDraft>,
) -> ApiResult<Json<Data<Transaction>>> {
    let transaction = state.store.create_transaction(&user.0, &draft).await?;
    Ok(Json(Data::new(transaction)))
}

pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(patch): Json<TransactionUpdate>,
) -> ApiResult<Json<Data<Transaction>>> {
    let transaction = state.store.update_transaction(&user.0, id, &patch).await?;
    Ok(Json(Data::new(transaction)))
}

pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Data<i64>>> {
    state.store.delete_transaction(&user.0, id).await?;
    Ok(Json(Data::new(id)))
}

pub async fn bulk_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BulkCreatePayload>,
) -> ApiResult<Json<Data<Vec<Transaction>>>> {
    let created = state
        .store
        .bulk_create_transactions(&user.0, &payload.transactions)
        .await?;
    log::info!("{} transactions created for {}", created.len(), user.0);
    Ok(Json(Data::new(created)))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BulkDeletePayload>,
) -> ApiResult<Json<Data<u64>>> {
    let deleted = state
        .store
        .bulk_delete_transactions(&user.0, &payload.ids)
        .await?;
    log::info!("{} transactions deleted for {}", deleted, user.0);
    Ok(Json(Data::new(deleted)))
}

pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ImportPayload>,
) -> ApiResult<Json<Data<Vec<Transaction>>>> {
    let document = parse_csv(&payload.csv)?;
    let rows = map_rows(&document, &payload.mapping)?;

    let created = state
        .store
        .import_transactions(&user.0, payload.account_id, &rows)
        .await?;
    log::info!("imported {} transactions for {}", created.len(), user.0);
    Ok(Json(Data::new(created)))
}
