//! Supplier price list HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::pricing::{CreatePriceInput, PriceListFilter, PricingService, UpdatePriceInput};
use crate::AppState;
use shared::models::SupplierPrice;

/// List prices, filterable by supplier, product, currency and validity
pub async fn list_prices(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<PriceListFilter>,
) -> AppResult<Json<Vec<SupplierPrice>>> {
    let service = PricingService::new(state.db);
    let prices = service
        .get_prices(current_user.0.business_id, filter)
        .await?;
    Ok(Json(prices))
}

/// Get a price by ID
pub async fn get_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(price_id): Path<Uuid>,
) -> AppResult<Json<SupplierPrice>> {
    let service = PricingService::new(state.db);
    let price = service
        .get_price(current_user.0.business_id, price_id)
        .await?;
    Ok(Json(price))
}

/// Record a new supplier price
pub async fn create_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreatePriceInput>,
) -> AppResult<(StatusCode, Json<SupplierPrice>)> {
    let service = PricingService::new(state.db);
    let price = service
        .create_price(current_user.0.business_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(price)))
}

/// Update a supplier price
pub async fn update_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(price_id): Path<Uuid>,
    Json(input): Json<UpdatePriceInput>,
) -> AppResult<Json<SupplierPrice>> {
    let service = PricingService::new(state.db);
    let price = service
        .update_price(current_user.0.business_id, price_id, input)
        .await?;
    Ok(Json(price))
}

/// Delete a supplier price
pub async fn delete_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(price_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = PricingService::new(state.db);
    service
        .delete_price(current_user.0.business_id, price_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
