//! Product catalogue HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::{
    CreatePackagingSpecInput, CreateProductInput, ProductService, UpdateProductInput,
};
use crate::AppState;
use shared::models::{PackagingSpec, Product};

/// Query parameters for listing products
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub include_inactive: Option<bool>,
}

/// List products for the current business
pub async fn list_products(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListProductsQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service
        .get_products(
            current_user.0.business_id,
            query.include_inactive.unwrap_or(false),
        )
        .await?;
    Ok(Json(products))
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .get_product(current_user.0.business_id, product_id)
        .await?;
    Ok(Json(product))
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = ProductService::new(state.db);
    let product = service
        .create_product(current_user.0.business_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service
        .update_product(current_user.0.business_id, product_id, input)
        .await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let service = ProductService::new(state.db);
    service
        .delete_product(current_user.0.business_id, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List packaging specs for a product
pub async fn list_packaging_specs(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<PackagingSpec>>> {
    let service = ProductService::new(state.db);
    let specs = service
        .get_packaging_specs(current_user.0.business_id, product_id)
        .await?;
    Ok(Json(specs))
}

/// Add a packaging spec to a product
pub async fn add_packaging_spec(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<CreatePackagingSpecInput>,
) -> AppResult<(StatusCode, Json<PackagingSpec>)> {
    let service = ProductService::new(state.db);
    let spec = service
        .add_packaging_spec(current_user.0.business_id, product_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(spec)))
}

/// Remove a packaging spec from a product
pub async fn remove_packaging_spec(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((product_id, spec_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    let service = ProductService::new(state.db);
    service
        .remove_packaging_spec(current_user.0.business_id, product_id, spec_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
