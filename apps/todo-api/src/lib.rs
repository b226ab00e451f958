//! Todo API application wiring.
//!
//! `main` loads [`config::Config`], connects to MongoDB and hands an
//! [`state::AppState`] to [`build_router`]; tests use [`router_with`] to swap
//! the storage backend.

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

use axum::Router;
use axum_helpers::create_router;
use domain_todos::{TodoRepository, TodoService};

use state::AppState;

/// Full application router backed by MongoDB
pub fn build_router(state: &AppState) -> Router {
    router_with(api::todos::mongo_service(state), state)
}

/// Full application router around any todo service
pub fn router_with<R: TodoRepository + 'static>(
    service: TodoService<R>,
    state: &AppState,
) -> Router {
    create_router::<openapi::ApiDoc>(api::routes(service, state))
}
