//! Customer and customer-need HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::customer::{
    CreateCustomerInput, CreateNeedInput, CustomerService, UpdateCustomerInput, UpdateNeedInput,
};
use crate::AppState;
use shared::models::{Customer, CustomerNeed};

/// Query parameters for listing customers
#[derive(Debug, Deserialize)]
pub struct ListCustomersQuery {
    pub include_inactive: Option<bool>,
}

/// List customers for the current business
pub async fn list_customers(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListCustomersQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    let customers = service
        .get_customers(
            current_user.0.business_id,
            query.include_inactive.unwrap_or(false),
        )
        .await?;
    Ok(Json(customers))
}

/// Get a customer by ID
pub async fn get_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service
        .get_customer(current_user.0.business_id, customer_id)
        .await?;
    Ok(Json(customer))
}

/// Create a new customer
pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let service = CustomerService::new(state.db);
    let customer = service
        .create_customer(current_user.0.business_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<UpdateCustomerInput>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service
        .update_customer(current_user.0.business_id, customer_id, input)
        .await?;
    Ok(Json(customer))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = CustomerService::new(state.db);
    service
        .delete_customer(current_user.0.business_id, customer_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List needs for a customer
pub async fn list_needs(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Vec<CustomerNeed>>> {
    let service = CustomerService::new(state.db);
    let needs = service
        .get_needs(current_user.0.business_id, customer_id)
        .await?;
    Ok(Json(needs))
}

/// Record a new need for a customer
pub async fn create_need(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<CreateNeedInput>,
) -> AppResult<(StatusCode, Json<CustomerNeed>)> {
    let service = CustomerService::new(state.db);
    let need = service
        .create_need(current_user.0.business_id, customer_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(need)))
}

/// Update a customer need
pub async fn update_need(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((customer_id, need_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateNeedInput>,
) -> AppResult<Json<CustomerNeed>> {
    let service = CustomerService::new(state.db);
    let need = service
        .update_need(current_user.0.business_id, customer_id, need_id, input)
        .await?;
    Ok(Json(need))
}

/// Delete a customer need
pub async fn delete_need(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((customer_id, need_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let service = CustomerService::new(state.db);
    service
        .delete_need(current_user.0.business_id, customer_id, need_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
