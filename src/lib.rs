//! Sampletrack API Library
//!
//! Core of the field-sales sample tracking service: hierarchical stock
//! allocation, the consumption ledger, and vendor dispatch tracking.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod ids;
pub mod openapi;
pub mod purpose;
pub mod services;

use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use crate::auth::{AuthVerifier, Role};

/// Shared application state available to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Build the protected API surface.
///
/// Everything here sits behind the bearer-token `protect` middleware; the
/// admin, vendor and per-level routes additionally carry a role gate (admins
/// pass every gate).
pub fn api_routes(verifier: Arc<AuthVerifier>) -> Router<AppState> {
    let admin = Router::new()
        .route("/admin", post(handlers::allocations::create_root_allocation))
        .route("/history/admin", get(handlers::allocations::admin_history))
        .route(
            "/allocations/:id/purpose",
            put(handlers::allocations::update_purpose),
        )
        .route_layer(middleware::from_fn_with_state(
            Role::Admin,
            auth::require_role,
        ));

    let regional = Router::new()
        .route("/regional/stock", get(handlers::stock::regional_stock))
        .route("/allocate/rm", post(handlers::allocations::allocate_regional))
        .route_layer(middleware::from_fn_with_state(
            Role::RegionalManager,
            auth::require_role,
        ));

    let branch = Router::new()
        .route("/branch/stock", get(handlers::stock::branch_stock))
        .route("/allocate/bm", post(handlers::allocations::allocate_branch))
        .route_layer(middleware::from_fn_with_state(
            Role::BranchManager,
            auth::require_role,
        ));

    let manager = Router::new()
        .route("/manager/stock", get(handlers::stock::manager_stock))
        .route(
            "/allocate/manager",
            post(handlers::allocations::allocate_manager),
        )
        .route_layer(middleware::from_fn_with_state(
            Role::Manager,
            auth::require_role,
        ));

    let vendor = Router::new()
        .route("/vendor/list", get(handlers::vendor::vendor_list))
        .route_layer(middleware::from_fn_with_state(
            Role::Vendor,
            auth::require_role,
        ));

    Router::new()
        .route("/employee/:emp_code", get(handlers::stock::employee_stock))
        .route("/dispatch/:root_id", post(handlers::vendor::dispatch_lineage))
        .route("/vendor/lr/:root_id", put(handlers::vendor::update_lr))
        .route(
            "/assignments/used-sample",
            post(handlers::usage::record_used_sample),
        )
        .merge(admin)
        .merge(regional)
        .merge(branch)
        .merge(manager)
        .merge(vendor)
        .layer(middleware::from_fn_with_state(verifier, auth::protect))
}

/// Unauthenticated status and health endpoints.
pub fn system_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
}

async fn api_status() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    Json(json!({
        "status": "ok",
        "service": "sampletrack-api",
        "version": version,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };
    Json(json!({
        "status": db_status,
        "checks": { "database": db_status },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
