//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database)
//! GET  /                           - Redirect to the customer list
//!
//! # Customers
//! GET  /customers                  - Customer list (with flash notice)
//! POST /customers                  - Create or update (hidden `id` field)
//! GET  /customers/new              - Blank creation form
//! GET  /customers/{id}             - Customer detail
//! GET  /customers/{id}/edit        - Edit form
//! POST /customers/{id}/delete      - Delete, then redirect to the list
//! ```
//!
//! `/static` is mounted by the binary.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

pub mod customers;
pub mod health;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/", get(|| async { Redirect::to(customers::LIST_PATH) }))
        // Customers
        .route("/customers", get(customers::index).post(customers::save))
        .route("/customers/new", get(customers::new_form))
        .route("/customers/{id}", get(customers::show))
        .route("/customers/{id}/edit", get(customers::edit_form))
        .route("/customers/{id}/delete", post(customers::delete))
}
