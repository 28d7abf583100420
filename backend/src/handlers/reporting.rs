//! Reporting HTTP handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::DashboardMetrics;
use crate::services::ReportingService;
use crate::AppState;

/// Dashboard metrics for the current business
pub async fn get_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    let metrics = service
        .get_dashboard_metrics(current_user.0.business_id)
        .await?;
    Ok(Json(metrics))
}

/// Export the current price list as CSV
pub async fn export_price_list(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let rows = service.get_price_export(current_user.0.business_id).await?;
    let csv = ReportingService::export_to_csv(&rows)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"price-list.csv\"",
            ),
        ],
        csv,
    ))
}
