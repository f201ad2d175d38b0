//! IPO REST API
//!
//! CRUD over the record collection plus the fixed status sub-collections
//! and the per-record performance endpoint. List responses use the summary
//! projection; everything else uses the full one.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use tracing::info;

use super::{db_error, not_found, validation_error};
use crate::AppState;
use crate::entities::{
    ipos::{self, IpoStatus, IssueType},
    prelude::Ipos,
};
use crate::models::ipo::{
    ErrorResponse, IpoCreateRequest, IpoListQuery, IpoResponse, IpoSummary, IpoUpdateRequest,
    PerformanceResponse,
};
use crate::services::ipo_query;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Get the IPO list in the summary projection
///
/// GET /api/ipo
///
/// Query parameters: `search` (company_name/price_band substring), `status`,
/// `issue_type`, `ordering` (e.g. `-issue_size`). Unknown filter or ordering
/// values are ignored and the default ordering (descending open_date)
/// applies.
pub async fn list_ipos(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IpoListQuery>,
) -> Result<Json<Vec<IpoSummary>>, ApiError> {
    info!(
        search = ?query.search,
        status = ?query.status,
        issue_type = ?query.issue_type,
        ordering = ?query.ordering,
        "IPO list request received"
    );

    let select = ipo_query::order_by_key(
        ipo_query::select_filtered(&query.filters()),
        query.ordering.as_deref(),
    );
    let records = select.all(&state.db).await.map_err(db_error)?;

    let origin = state.assets.origin(&headers);
    let summaries = records
        .iter()
        .map(|record| IpoSummary::from_model(record, origin.as_deref()))
        .collect::<Vec<_>>();

    info!(count = summaries.len(), "IPO list returned");
    Ok(Json(summaries))
}

/// Create an IPO record
///
/// POST /api/ipo
///
/// Rejects duplicate company names, non-positive monetary values and
/// unknown enum values with a 400 naming the offending field.
pub async fn create_ipo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<IpoCreateRequest>,
) -> Result<(StatusCode, Json<IpoResponse>), ApiError> {
    payload.validate().map_err(validation_error)?;

    // Unique company_name across all records
    let existing = Ipos::find()
        .filter(ipos::Column::CompanyName.eq(&payload.company_name))
        .one(&state.db)
        .await
        .map_err(db_error)?;
    if existing.is_some() {
        return Err(validation_error("company_name already exists"));
    }

    let now = Utc::now().fixed_offset();
    let record = ipos::ActiveModel {
        company_name: Set(payload.company_name.clone()),
        price_band: Set(payload.price_band.clone()),
        open_date: Set(payload.open_date),
        close_date: Set(payload.close_date),
        issue_size: Set(payload.issue_size),
        issue_type: Set(payload.parsed_issue_type()),
        listing_date: Set(payload.listing_date),
        status: Set(payload.parsed_status()),
        ipo_price: Set(payload.ipo_price),
        listing_price: Set(payload.listing_price),
        current_market_price: Set(payload.current_market_price),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(db_error)?;

    info!(id = record.id, company = %record.company_name, "IPO created");
    let origin = state.assets.origin(&headers);
    Ok((
        StatusCode::CREATED,
        Json(IpoResponse::from_model(&record, origin.as_deref())),
    ))
}

/// Get one IPO in the full projection
///
/// GET /api/ipo/{id}
pub async fn get_ipo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<IpoResponse>, ApiError> {
    let record = Ipos::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(id))?;

    let origin = state.assets.origin(&headers);
    Ok(Json(IpoResponse::from_model(&record, origin.as_deref())))
}

/// Replace an IPO record
///
/// PUT /api/ipo/{id} — the create-time required fields must be present
pub async fn update_ipo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<IpoUpdateRequest>,
) -> Result<Json<IpoResponse>, ApiError> {
    apply_update(&state, &headers, id, payload, true).await
}

/// Partially update an IPO record
///
/// PATCH /api/ipo/{id} — omitted fields are left untouched
pub async fn patch_ipo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<IpoUpdateRequest>,
) -> Result<Json<IpoResponse>, ApiError> {
    apply_update(&state, &headers, id, payload, false).await
}

async fn apply_update(
    state: &AppState,
    headers: &HeaderMap,
    id: i32,
    payload: IpoUpdateRequest,
    require_all: bool,
) -> Result<Json<IpoResponse>, ApiError> {
    payload.validate(require_all).map_err(validation_error)?;

    let record = Ipos::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(id))?;

    if let Some(ref name) = payload.company_name {
        if *name != record.company_name {
            let clash = Ipos::find()
                .filter(ipos::Column::CompanyName.eq(name))
                .filter(ipos::Column::Id.ne(id))
                .one(&state.db)
                .await
                .map_err(db_error)?;
            if clash.is_some() {
                return Err(validation_error("company_name already exists"));
            }
        }
    }

    let mut active = record.into_active_model();
    if let Some(name) = payload.company_name {
        active.company_name = Set(name);
    }
    if let Some(band) = payload.price_band {
        active.price_band = Set(band);
    }
    if let Some(date) = payload.open_date {
        active.open_date = Set(date);
    }
    if let Some(date) = payload.close_date {
        active.close_date = Set(date);
    }
    if let Some(size) = payload.issue_size {
        active.issue_size = Set(size);
    }
    if let Some(raw) = payload.issue_type.as_deref() {
        // validate() guarantees the value parses
        active.issue_type = Set(IssueType::parse(raw).unwrap_or_default());
    }
    if let Some(date) = payload.listing_date {
        active.listing_date = Set(Some(date));
    }
    if let Some(raw) = payload.status.as_deref() {
        active.status = Set(IpoStatus::parse(raw).unwrap_or_default());
    }
    if let Some(price) = payload.ipo_price {
        active.ipo_price = Set(Some(price));
    }
    if let Some(price) = payload.listing_price {
        active.listing_price = Set(Some(price));
    }
    if let Some(price) = payload.current_market_price {
        active.current_market_price = Set(Some(price));
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.db).await.map_err(db_error)?;

    info!(id = updated.id, "IPO updated");
    let origin = state.assets.origin(headers);
    Ok(Json(IpoResponse::from_model(&updated, origin.as_deref())))
}

/// Delete an IPO record
///
/// DELETE /api/ipo/{id}
pub async fn delete_ipo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = Ipos::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(db_error)?;

    if result.rows_affected == 0 {
        return Err(not_found(id));
    }
    info!(id, "IPO deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/ipo/upcoming
pub async fn upcoming_ipos(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<IpoResponse>>, ApiError> {
    status_collection(&state, &headers, IpoStatus::Upcoming).await
}

/// GET /api/ipo/ongoing
pub async fn ongoing_ipos(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<IpoResponse>>, ApiError> {
    status_collection(&state, &headers, IpoStatus::Ongoing).await
}

/// GET /api/ipo/listed
pub async fn listed_ipos(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<IpoResponse>>, ApiError> {
    status_collection(&state, &headers, IpoStatus::Listed).await
}

async fn status_collection(
    state: &AppState,
    headers: &HeaderMap,
    status: IpoStatus,
) -> Result<Json<Vec<IpoResponse>>, ApiError> {
    let records = ipo_query::select_with_status(status)
        .all(&state.db)
        .await
        .map_err(db_error)?;

    let origin = state.assets.origin(headers);
    Ok(Json(
        records
            .iter()
            .map(|record| IpoResponse::from_model(record, origin.as_deref()))
            .collect(),
    ))
}

/// Performance metrics for one record: the stored prices plus both derived
/// metrics, nothing else
///
/// GET /api/ipo/{id}/performance
pub async fn ipo_performance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PerformanceResponse>, ApiError> {
    let record = Ipos::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(PerformanceResponse::from_model(&record)))
}
