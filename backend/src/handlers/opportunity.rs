//! Opportunity HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::opportunity::{
    CreateOpportunityInput, OpportunityService, UpdateOpportunityInput,
};
use crate::AppState;
use shared::models::{Opportunity, OpportunityStatus};

/// Query parameters for listing opportunities
#[derive(Debug, Deserialize)]
pub struct ListOpportunitiesQuery {
    pub status: Option<OpportunityStatus>,
}

/// List opportunities for the current business
pub async fn list_opportunities(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListOpportunitiesQuery>,
) -> AppResult<Json<Vec<Opportunity>>> {
    let service = OpportunityService::new(state.db);
    let opportunities = service
        .get_opportunities(current_user.0.business_id, query.status)
        .await?;
    Ok(Json(opportunities))
}

/// Get an opportunity by ID
pub async fn get_opportunity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(opportunity_id): Path<Uuid>,
) -> AppResult<Json<Opportunity>> {
    let service = OpportunityService::new(state.db);
    let opportunity = service
        .get_opportunity(current_user.0.business_id, opportunity_id)
        .await?;
    Ok(Json(opportunity))
}

/// Create an opportunity for an open need
pub async fn create_opportunity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOpportunityInput>,
) -> AppResult<(StatusCode, Json<Opportunity>)> {
    let service = OpportunityService::new(state.db);
    let opportunity = service
        .create_opportunity(current_user.0.business_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(opportunity)))
}

/// Update an active opportunity
pub async fn update_opportunity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(opportunity_id): Path<Uuid>,
    Json(input): Json<UpdateOpportunityInput>,
) -> AppResult<Json<Opportunity>> {
    let service = OpportunityService::new(state.db);
    let opportunity = service
        .update_opportunity(current_user.0.business_id, opportunity_id, input)
        .await?;
    Ok(Json(opportunity))
}

/// Convert an active opportunity into a done deal
pub async fn convert_opportunity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(opportunity_id): Path<Uuid>,
) -> AppResult<Json<Opportunity>> {
    let service = OpportunityService::new(state.db);
    let opportunity = service
        .convert_opportunity(current_user.0.business_id, opportunity_id)
        .await?;
    Ok(Json(opportunity))
}

/// Cancel an active opportunity
pub async fn cancel_opportunity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(opportunity_id): Path<Uuid>,
) -> AppResult<Json<Opportunity>> {
    let service = OpportunityService::new(state.db);
    let opportunity = service
        .cancel_opportunity(current_user.0.business_id, opportunity_id)
        .await?;
    Ok(Json(opportunity))
}
