//! Entrepreneur resource handlers: list by category, read one, update url.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::models::{EntrepreneurFilter, EntrepreneurUpdate, EntrepreneursModel};
use crate::response;
use crate::sql::PgExecutor;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    pub category_id: i64,
}

pub async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(params): Query<ListParams>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let executor = PgExecutor::new(state.pool.clone());
    let filter = EntrepreneurFilter {
        category_id: params.category_id,
        ..Default::default()
    };
    let entrepreneurs = EntrepreneursModel::get_entrepreneurs(&ctx, &filter, &executor).await?;
    Ok(response::success_many(entrepreneurs))
}

pub async fn read(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let executor = PgExecutor::new(state.pool.clone());
    let filter = EntrepreneurFilter {
        entrepreneur_id: id,
        ..Default::default()
    };
    let entrepreneur = EntrepreneursModel::get_entrepreneur(&ctx, &filter, &executor).await?;
    Ok(response::success_one_ok(entrepreneur))
}

pub async fn update_url(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Json(payload): Json<EntrepreneurUpdate>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let executor = PgExecutor::new(state.pool.clone());
    EntrepreneursModel::update_url_entrepreneur(&ctx, id, &payload, &executor).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
