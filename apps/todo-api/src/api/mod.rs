//! API routes module
//!
//! This module defines all HTTP routes of the todo service.

pub mod health;
pub mod home;
pub mod todos;

use axum::Router;
use domain_todos::{TodoRepository, TodoService};

use crate::state::AppState;

/// Create all API routes around an already built todo service
pub fn routes<R: TodoRepository + 'static>(service: TodoService<R>, state: &AppState) -> Router {
    Router::new()
        .merge(home::router())
        .nest("/todo", todos::router(service))
        .merge(health::router(state.clone()))
}
