//! Supplier management HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::supplier::{CreateSupplierInput, SupplierService, UpdateSupplierInput};
use crate::AppState;
use shared::models::Supplier;

/// Query parameters for listing suppliers
#[derive(Debug, Deserialize)]
pub struct ListSuppliersQuery {
    pub include_inactive: Option<bool>,
}

/// List suppliers for the current business
pub async fn list_suppliers(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListSuppliersQuery>,
) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service
        .get_suppliers(
            current_user.0.business_id,
            query.include_inactive.unwrap_or(false),
        )
        .await?;
    Ok(Json(suppliers))
}

/// Get a supplier by ID
pub async fn get_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service
        .get_supplier(current_user.0.business_id, supplier_id)
        .await?;
    Ok(Json(supplier))
}

/// Create a new supplier
pub async fn create_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateSupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let service = SupplierService::new(state.db);
    let supplier = service
        .create_supplier(current_user.0.business_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Update a supplier
pub async fn update_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
    Json(input): Json<UpdateSupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service
        .update_supplier(current_user.0.business_id, supplier_id, input)
        .await?;
    Ok(Json(supplier))
}

/// Delete a supplier
pub async fn delete_supplier(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(supplier_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = SupplierService::new(state.db);
    service
        .delete_supplier(current_user.0.business_id, supplier_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
