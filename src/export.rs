//! CSV download of the current user's vehicle list.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    state::AppState,
    vehicles::{dto::format_timestamp, repo::Vehicle},
};

const FILENAME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

#[instrument(skip_all)]
pub async fn download(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let mut conn = state.db.acquire().await?;
    let vehicles = Vehicle::list_for_user(&mut *conn, user.id, None).await?;
    let body = render_csv(&vehicles)?;

    let stamp = OffsetDateTime::now_utc()
        .format(&FILENAME_FORMAT)
        .map_err(|e| AppError::Internal(e.into()))?;
    info!(user_id = user.id, rows = vehicles.len(), "vehicle export");
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"vehicles_{stamp}.csv\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// Serializes vehicles in the order given, one record per row under a
/// header row.
fn render_csv(vehicles: &[Vehicle]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["id", "brand", "model", "year", "plate_number", "created_at"])
        .map_err(|e| AppError::Internal(e.into()))?;
    for vehicle in vehicles {
        writer
            .write_record([
                vehicle.id.to_string(),
                vehicle.brand.clone(),
                vehicle.model.clone(),
                vehicle.year.to_string(),
                vehicle.plate_number.clone(),
                format_timestamp(vehicle.created_at),
            ])
            .map_err(|e| AppError::Internal(e.into()))?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(e.into_error().into()))
}
