//! Landing page, dashboard and the odd static route.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    flash::Flash,
    maintenance::{dto::RecentLogItem, repo::MaintenanceLog},
    state::AppState,
    vehicles::repo::Vehicle,
};

/// Landing counters are intentionally global, not scoped to a user.
#[derive(Debug, Serialize)]
pub struct LandingPage {
    pub total_vehicles: i64,
    pub total_users: i64,
    pub total_maintenance_logs: i64,
    pub flash: Option<Flash>,
}

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub vehicle_count: i64,
    pub maintenance_count: i64,
    pub total_maintenance_cost: Decimal,
    pub recent_logs: Vec<RecentLogItem>,
    pub flash: Option<Flash>,
}

#[instrument(skip_all)]
pub async fn landing(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let (jar, flash) = crate::flash::take(jar);

    let mut conn = state.db.acquire().await?;
    let total_vehicles = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles")
        .fetch_one(&mut *conn)
        .await?;
    let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(&mut *conn)
        .await?;
    let total_maintenance_logs =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM maintenance_logs")
            .fetch_one(&mut *conn)
            .await?;

    let page = LandingPage {
        total_vehicles,
        total_users,
        total_maintenance_logs,
        flash,
    };
    Ok((jar, Json(page)).into_response())
}

#[instrument(skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let (jar, flash) = crate::flash::take(jar);

    let mut conn = state.db.acquire().await?;
    let fleet = Vehicle::stats_for_user(&mut *conn, user.id).await?;
    let maintenance_count = MaintenanceLog::count_for_user(&mut *conn, user.id).await?;
    let total_cost = MaintenanceLog::total_cost_for_user(&mut *conn, user.id)
        .await?
        .unwrap_or(Decimal::ZERO);
    let recent = MaintenanceLog::recent_for_user(&mut *conn, user.id, 5).await?;

    let page = DashboardPage {
        vehicle_count: fleet.total,
        maintenance_count,
        total_maintenance_cost: total_cost,
        recent_logs: recent.into_iter().map(RecentLogItem::from).collect(),
        flash,
    };
    Ok((jar, Json(page)).into_response())
}

pub async fn webmanifest() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(serde_json::json!({
            "name": "AutoTrack",
            "short_name": "AutoTrack",
            "start_url": "/",
            "display": "standalone",
            "background_color": "#ffffff",
            "theme_color": "#1f2937",
            "icons": []
        })),
    )
}

/// Unmatched paths answer 404 while pointing the browser back at the list.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::LOCATION, "/vehicles")],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unmatched_paths_get_a_404_pointing_home() {
        let response = not_found().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/vehicles");
    }

    #[tokio::test]
    async fn manifest_declares_its_content_type() {
        let response = webmanifest().await.into_response();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/manifest+json"
        );
    }
}
