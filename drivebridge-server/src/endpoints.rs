//! Contains all HTTP endpoint handlers.
//!
//! Use [`routes`] to create a router with all endpoints.

use axum::Router;

use crate::state::ServiceState;

pub mod common;
mod files;
pub mod health;

/// Creates a router with all endpoints of the service.
pub fn routes() -> Router<ServiceState> {
    Router::new().merge(health::router()).merge(files::router())
}
