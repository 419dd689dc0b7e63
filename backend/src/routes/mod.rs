//! Route definitions for the Pharmacy Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::identity_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - catalog
        .nest("/categories", category_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/customers", customer_routes())
        .nest("/medicines", medicine_routes())
        // Protected routes - stock ledger
        .nest("/stock-logs", stock_log_routes())
        // Protected routes - trading
        .nest("/sales", sale_routes())
        .nest("/purchases", purchase_routes())
        .nest("/purchase-items", purchase_item_routes())
        // Protected routes - finance
        .nest("/debts", debt_routes())
        .nest("/payments", payment_routes())
        // Protected routes - reporting
        .nest("/reports", report_routes())
        .nest("/dashboard", dashboard_routes())
}

/// Category routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories).post(handlers::create_category))
        .route(
            "/:id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Supplier routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route(
            "/:id",
            put(handlers::update_supplier).delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Customer routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/:id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Medicine routes (protected)
fn medicine_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_medicines).post(handlers::create_medicine))
        .route(
            "/:id",
            get(handlers::get_medicine)
                .put(handlers::update_medicine)
                .delete(handlers::delete_medicine),
        )
        .route("/:id/stock", post(handlers::adjust_stock))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Stock ledger routes (protected)
fn stock_log_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock_logs))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Sale routes (protected)
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route("/:id", get(handlers::get_sale))
        .route("/customer/:customer_id", get(handlers::get_sales_by_customer))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Purchase routes (protected)
fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::create_purchase))
        .route(
            "/:id",
            get(handlers::get_purchase).put(handlers::update_purchase),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Purchase item routes (protected)
fn purchase_item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchase_items))
        .route(
            "/:id",
            put(handlers::update_purchase_item).delete(handlers::delete_purchase_item),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Debt routes (protected)
fn debt_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_debts))
        .route("/:id/pay", post(handlers::pay_debt))
        .route(
            "/:id",
            put(handlers::update_debt).delete(handlers::delete_debt),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Payment routes (protected)
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_payments).post(handlers::add_payment))
        .route("/stats", get(handlers::get_payment_stats))
        .route("/customer/:customer_id", get(handlers::get_payments_by_customer))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_reports).post(handlers::generate_report))
        .route("/:id", get(handlers::get_report))
        .route("/:id/export/csv", get(handlers::export_report_csv))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route_layer(middleware::from_fn(identity_middleware))
}
