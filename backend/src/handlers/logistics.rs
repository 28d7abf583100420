//! Hub and transport route HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::logistics::{CreateHubInput, CreateRouteInput, LogisticsService, UpdateRouteInput};
use crate::AppState;
use shared::models::{Hub, TransportRoute};

/// List hubs for the current business
pub async fn list_hubs(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Hub>>> {
    let service = LogisticsService::new(state.db);
    let hubs = service.get_hubs(current_user.0.business_id).await?;
    Ok(Json(hubs))
}

/// Get a hub by ID
pub async fn get_hub(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(hub_id): Path<Uuid>,
) -> AppResult<Json<Hub>> {
    let service = LogisticsService::new(state.db);
    let hub = service.get_hub(current_user.0.business_id, hub_id).await?;
    Ok(Json(hub))
}

/// Create a new hub
pub async fn create_hub(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateHubInput>,
) -> AppResult<(StatusCode, Json<Hub>)> {
    let service = LogisticsService::new(state.db);
    let hub = service.create_hub(current_user.0.business_id, input).await?;
    Ok((StatusCode::CREATED, Json(hub)))
}

/// Delete a hub
pub async fn delete_hub(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(hub_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = LogisticsService::new(state.db);
    service
        .delete_hub(current_user.0.business_id, hub_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Query parameters for listing routes
#[derive(Debug, Deserialize)]
pub struct ListRoutesQuery {
    pub include_inactive: Option<bool>,
}

/// List transport routes for the current business
pub async fn list_routes(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListRoutesQuery>,
) -> AppResult<Json<Vec<TransportRoute>>> {
    let service = LogisticsService::new(state.db);
    let routes = service
        .get_routes(
            current_user.0.business_id,
            query.include_inactive.unwrap_or(false),
        )
        .await?;
    Ok(Json(routes))
}

/// Get a transport route by ID
pub async fn get_route(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(route_id): Path<Uuid>,
) -> AppResult<Json<TransportRoute>> {
    let service = LogisticsService::new(state.db);
    let route = service
        .get_route(current_user.0.business_id, route_id)
        .await?;
    Ok(Json(route))
}

/// Create a new transport route
pub async fn create_route(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateRouteInput>,
) -> AppResult<(StatusCode, Json<TransportRoute>)> {
    let service = LogisticsService::new(state.db);
    let route = service
        .create_route(current_user.0.business_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// Update a transport route
pub async fn update_route(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(route_id): Path<Uuid>,
    Json(input): Json<UpdateRouteInput>,
) -> AppResult<Json<TransportRoute>> {
    let service = LogisticsService::new(state.db);
    let route = service
        .update_route(current_user.0.business_id, route_id, input)
        .await?;
    Ok(Json(route))
}

/// Delete a transport route
pub async fn delete_route(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(route_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = LogisticsService::new(state.db);
    service
        .delete_route(current_user.0.business_id, route_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
