//! Route definitions for the Produce Trading Platform

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // WhatsApp webhook (public - called by the messaging gateway)
        .route("/whatsapp/webhook", post(handlers::handle_whatsapp_webhook))
        // Protected routes - master data
        .nest("/suppliers", supplier_routes())
        .nest("/customers", customer_routes())
        .nest("/products", product_routes())
        .nest("/hubs", hub_routes())
        .nest("/routes", route_routes())
        .nest("/prices", price_routes())
        // Protected routes - trading
        .nest("/opportunities", opportunity_routes())
        .nest("/trade-potentials", trade_potential_routes())
        // Protected routes - messaging
        .nest("/tasks", task_routes())
        .nest("/messages", message_routes())
        // Protected routes - reporting
        .nest("/reports", reporting_routes())
}

/// Authentication routes (public except /me)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route(
            "/me",
            get(handlers::me).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Supplier management routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer and need management routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route(
            "/:customer_id/needs",
            get(handlers::list_needs).post(handlers::create_need),
        )
        .route(
            "/:customer_id/needs/:need_id",
            put(handlers::update_need).delete(handlers::delete_need),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product catalogue routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/:product_id/packaging",
            get(handlers::list_packaging_specs).post(handlers::add_packaging_spec),
        )
        .route(
            "/:product_id/packaging/:spec_id",
            delete(handlers::remove_packaging_spec),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Hub management routes (protected)
fn hub_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_hubs).post(handlers::create_hub))
        .route(
            "/:hub_id",
            get(handlers::get_hub).delete(handlers::delete_hub),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Transport route management routes (protected)
fn route_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_routes).post(handlers::create_route))
        .route(
            "/:route_id",
            get(handlers::get_route)
                .put(handlers::update_route)
                .delete(handlers::delete_route),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Price list routes (protected)
fn price_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_prices).post(handlers::create_price))
        .route(
            "/:price_id",
            get(handlers::get_price)
                .put(handlers::update_price)
                .delete(handlers::delete_price),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Opportunity routes (protected)
fn opportunity_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_opportunities).post(handlers::create_opportunity),
        )
        .route(
            "/:opportunity_id",
            get(handlers::get_opportunity).put(handlers::update_opportunity),
        )
        .route(
            "/:opportunity_id/convert",
            post(handlers::convert_opportunity),
        )
        .route("/:opportunity_id/cancel", post(handlers::cancel_opportunity))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Trade potential routes (protected)
fn trade_potential_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_trade_potentials))
        .route("/summary", get(handlers::get_potential_summary))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Bot task routes (protected)
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_tasks))
        .route("/:task_id/complete", post(handlers::complete_task))
        .route("/:task_id/cancel", post(handlers::cancel_task))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Message ingestion and search routes (protected)
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(handlers::ingest_message))
        .route("/search", get(handlers::search_messages))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/prices/export", get(handlers::export_price_list))
        .route_layer(middleware::from_fn(auth_middleware))
}
