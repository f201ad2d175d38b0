//! Multipart uploads for the binary asset fields
//!
//! One endpoint per asset field. The blob goes through the asset store, the
//! record keeps the returned relative path.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use tracing::{error, info};

use super::{db_error, not_found, validation_error};
use crate::AppState;
use crate::entities::prelude::Ipos;
use crate::models::ipo::{ErrorResponse, IpoResponse};
use crate::services::asset_store::AssetKind;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// POST /api/ipo/{id}/logo
pub async fn upload_logo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<IpoResponse>, ApiError> {
    store_asset(&state, &headers, id, multipart, AssetKind::Logo).await
}

/// POST /api/ipo/{id}/rhp
pub async fn upload_rhp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<IpoResponse>, ApiError> {
    store_asset(&state, &headers, id, multipart, AssetKind::Rhp).await
}

/// POST /api/ipo/{id}/drhp
pub async fn upload_drhp(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<IpoResponse>, ApiError> {
    store_asset(&state, &headers, id, multipart, AssetKind::Drhp).await
}

async fn store_asset(
    state: &AppState,
    headers: &HeaderMap,
    id: i32,
    mut multipart: Multipart,
    kind: AssetKind,
) -> Result<Json<IpoResponse>, ApiError> {
    let record = Ipos::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(id))?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| validation_error(format!("invalid multipart body: {}", e)))?
        .ok_or_else(|| validation_error("file field is required"))?;

    let original_name = field.file_name().unwrap_or("upload").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| validation_error(format!("failed to read upload: {}", e)))?;
    if bytes.is_empty() {
        return Err(validation_error("uploaded file is empty"));
    }

    let path = state
        .assets
        .store(kind, &original_name, &bytes)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to store uploaded asset");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to store upload: {}", e),
                }),
            )
        })?;

    let mut active = record.into_active_model();
    match kind {
        AssetKind::Logo => active.logo = Set(Some(path.clone())),
        AssetKind::Rhp => active.rhp_document = Set(Some(path.clone())),
        AssetKind::Drhp => active.drhp_document = Set(Some(path.clone())),
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(&state.db).await.map_err(db_error)?;

    info!(id, path = %path, "Asset stored");
    let origin = state.assets.origin(headers);
    Ok(Json(IpoResponse::from_model(&updated, origin.as_deref())))
}
