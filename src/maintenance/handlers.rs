use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::{form_rejection, AppError, GENERIC_MESSAGE},
    flash,
    maintenance::{
        dto::{MaintenanceForm, MaintenanceFormPage},
        repo::MaintenanceLog,
    },
    state::AppState,
    validate::{validate_maintenance, FieldError, Validation},
    vehicles::repo::Vehicle,
};

#[instrument(skip_all)]
pub async fn new_page(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Path(vehicle_id): Path<i64>,
) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);

    let mut conn = state.db.acquire().await?;
    let vehicle = Vehicle::find(&mut *conn, user.id, vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found.".into()))?;

    let page = MaintenanceFormPage {
        vehicle: vehicle.into(),
        flash,
    };
    Ok((jar, Json(page)).into_response())
}

#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Path(vehicle_id): Path<i64>,
    Form(form): Form<MaintenanceForm>,
) -> Result<Response, AppError> {
    let mut tx = state.db.begin().await?;

    // The parent vehicle must exist and be this user's before the fields
    // are even looked at.
    let vehicle = Vehicle::find(&mut *tx, user.id, vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found.".into()))?;

    let input = match validate_maintenance(
        &form.maintenance_type,
        &form.maintenance_date,
        form.cost.as_deref(),
    ) {
        Validation::Valid(input) => input,
        Validation::Invalid(errors) => {
            return Ok(form_rejection(StatusCode::UNPROCESSABLE_ENTITY, &errors, &form))
        }
    };
    let description = form
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    match MaintenanceLog::insert(&mut *tx, vehicle.id, vehicle.user_id, &input, description).await {
        Ok(log) => {
            tx.commit().await?;
            info!(
                user_id = user.id,
                vehicle_id = vehicle.id,
                log_id = log.id,
                "maintenance log added"
            );
            Ok(flash::redirect(
                jar,
                flash::Level::Success,
                "Maintenance log added successfully.",
                &format!("/vehicle/{}", vehicle.id),
            ))
        }
        Err(err) => {
            error!(error = %err, user_id = user.id, vehicle_id = vehicle.id, "add maintenance log failed");
            let errors = [FieldError::new("form", GENERIC_MESSAGE)];
            Ok(form_rejection(StatusCode::INTERNAL_SERVER_ERROR, &errors, &form))
        }
    }
}

#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let mut tx = state.db.begin().await?;

    // Look up the parent vehicle first so success can land back on its page.
    let log = MaintenanceLog::find(&mut *tx, user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Maintenance log not found.".into()))?;

    if !MaintenanceLog::delete(&mut *tx, user.id, id).await? {
        return Err(AppError::NotFound("Maintenance log not found.".into()));
    }
    tx.commit().await?;
    info!(user_id = user.id, log_id = id, "maintenance log deleted");
    Ok(flash::redirect(
        jar,
        flash::Level::Success,
        "Maintenance log deleted successfully.",
        &format!("/vehicle/{}", log.vehicle_id),
    ))
}
