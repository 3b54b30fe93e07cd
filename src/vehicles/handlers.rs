use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::{form_rejection, is_unique_violation, AppError, GENERIC_MESSAGE},
    flash,
    maintenance::{dto::LogItem, repo::MaintenanceLog},
    state::AppState,
    validate::{validate_vehicle, FieldError, Validation},
    vehicles::{
        dto::{VehicleDetailPage, VehicleForm, VehicleFormPage, VehicleItem, VehicleListPage},
        repo::Vehicle,
    },
};

const DUPLICATE_PLATE: &str = "That plate number is already registered to one of your vehicles.";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[instrument(skip(state, jar))]
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);
    let search = query.search.unwrap_or_default().trim().to_string();

    let mut conn = state.db.acquire().await?;
    let term = (!search.is_empty()).then_some(search.as_str());
    let vehicles = Vehicle::list_for_user(&mut *conn, user.id, term).await?;
    let stats = Vehicle::stats_for_user(&mut *conn, user.id).await?;

    let page = VehicleListPage {
        vehicles: vehicles.into_iter().map(VehicleItem::from).collect(),
        search,
        stats: stats.into(),
        flash,
    };
    Ok((jar, Json(page)).into_response())
}

pub async fn new_page(_user: CurrentUser, jar: CookieJar) -> Response {
    let (jar, flash) = flash::take(jar);
    (
        jar,
        Json(VehicleFormPage {
            vehicle: None,
            flash,
        }),
    )
        .into_response()
}

#[instrument(skip(state, jar, form))]
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Form(form): Form<VehicleForm>,
) -> Result<Response, AppError> {
    let input = match validate_vehicle(&form.brand, &form.model, &form.year, &form.plate) {
        Validation::Valid(input) => input,
        Validation::Invalid(errors) => {
            return Ok(form_rejection(StatusCode::UNPROCESSABLE_ENTITY, &errors, &form))
        }
    };

    let mut tx = state.db.begin().await?;
    if Vehicle::plate_taken(&mut *tx, user.id, &input.plate_number, None).await? {
        return Ok(duplicate_plate(&form));
    }
    match Vehicle::insert(&mut *tx, user.id, &input).await {
        Ok(vehicle) => {
            tx.commit().await?;
            info!(user_id = user.id, vehicle_id = vehicle.id, "vehicle added");
            Ok(flash::redirect(
                jar,
                flash::Level::Success,
                "Vehicle added successfully.",
                "/vehicles",
            ))
        }
        Err(err) if is_unique_violation(&err) => Ok(duplicate_plate(&form)),
        Err(err) => {
            error!(error = %err, user_id = user.id, "add vehicle failed");
            Ok(persistence_failure(&form))
        }
    }
}

#[instrument(skip(state, jar))]
pub async fn detail(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);

    let mut conn = state.db.acquire().await?;
    let vehicle = Vehicle::find(&mut *conn, user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found.".into()))?;
    let logs = MaintenanceLog::list_for_vehicle(&mut *conn, user.id, vehicle.id).await?;

    let page = VehicleDetailPage {
        vehicle: vehicle.into(),
        maintenance_logs: logs.into_iter().map(LogItem::from).collect(),
        flash,
    };
    Ok((jar, Json(page)).into_response())
}

#[instrument(skip(state, jar))]
pub async fn edit_page(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let (jar, flash) = flash::take(jar);

    let mut conn = state.db.acquire().await?;
    let vehicle = Vehicle::find(&mut *conn, user.id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Vehicle not found.".into()))?;

    let page = VehicleFormPage {
        vehicle: Some(vehicle.into()),
        flash,
    };
    Ok((jar, Json(page)).into_response())
}

#[instrument(skip(state, jar, form))]
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Path(id): Path<i64>,
    Form(form): Form<VehicleForm>,
) -> Result<Response, AppError> {
    let input = match validate_vehicle(&form.brand, &form.model, &form.year, &form.plate) {
        Validation::Valid(input) => input,
        Validation::Invalid(errors) => {
            return Ok(form_rejection(StatusCode::UNPROCESSABLE_ENTITY, &errors, &form))
        }
    };

    let mut tx = state.db.begin().await?;
    if Vehicle::plate_taken(&mut *tx, user.id, &input.plate_number, Some(id)).await? {
        return Ok(duplicate_plate(&form));
    }
    match Vehicle::update(&mut *tx, user.id, id, &input).await {
        Ok(true) => {
            tx.commit().await?;
            info!(user_id = user.id, vehicle_id = id, "vehicle updated");
            Ok(flash::redirect(
                jar,
                flash::Level::Success,
                "Vehicle updated successfully.",
                "/vehicles",
            ))
        }
        Ok(false) => Err(AppError::NotFound("Vehicle not found.".into())),
        Err(err) if is_unique_violation(&err) => Ok(duplicate_plate(&form)),
        Err(err) => {
            error!(error = %err, user_id = user.id, vehicle_id = id, "update vehicle failed");
            Ok(persistence_failure(&form))
        }
    }
}

#[instrument(skip(state, jar))]
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let mut tx = state.db.begin().await?;
    if !Vehicle::delete(&mut *tx, user.id, id).await? {
        return Err(AppError::NotFound("Vehicle not found.".into()));
    }
    tx.commit().await?;
    info!(user_id = user.id, vehicle_id = id, "vehicle deleted");
    Ok(flash::redirect(
        jar,
        flash::Level::Success,
        "Vehicle deleted successfully.",
        "/vehicles",
    ))
}

fn duplicate_plate(form: &VehicleForm) -> Response {
    let errors = [FieldError::new("plate", DUPLICATE_PLATE)];
    form_rejection(StatusCode::UNPROCESSABLE_ENTITY, &errors, form)
}

fn persistence_failure(form: &VehicleForm) -> Response {
    let errors = [FieldError::new("form", GENERIC_MESSAGE)];
    form_rejection(StatusCode::INTERNAL_SERVER_ERROR, &errors, form)
}
