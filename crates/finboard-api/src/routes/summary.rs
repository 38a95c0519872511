//! Summary endpoint
//!
//! One read-only query group per request: current-window totals, previous
//! window totals, the per-day series, and the category breakdown, assembled
//! into the single snapshot the dashboard consumes.

use axum::extract::{Query, State};
use axum::Json;
use finboard_core::summary::build_report;
use finboard_core::{Period, SummaryReport};
use serde::Deserialize;

use super::parse_date_param;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::{AppState, Data};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub account_id: Option<i64>,
}

pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<Data<SummaryReport>>> {
    let from = parse_date_param(query.from.as_deref(), "from")?;
    let to = parse_date_param(query.to.as_deref(), "to")?;
    let period = Period::resolve(from, to);
    let previous = period.previous();

    let current_totals = state
        .store
        .period_totals(&user.0, query.account_id, &period)
        .await?;
    let previous_totals = state
        .store
        .period_totals(&user.0, query.account_id, &previous)
        .await?;
    let daily_rows = state
        .store
        .daily_totals(&user.0, query.account_id, &period)
        .await?;
    let category_rows = state
        .store
        .category_spend(&user.0, query.account_id, &period)
        .await?;

    let report = build_report(
        &period,
        current_totals,
        previous_totals,
        daily_rows,
        category_rows,
    );
    Ok(Json(Data::new(report)))
}
