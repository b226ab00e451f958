//! Todos API routes
//!
//! This module wires up the todos domain to HTTP routes.

use axum::Router;
use domain_todos::{MongoTodoRepository, TodoRepository, TodoService, handlers};

use crate::state::AppState;

/// Build the MongoDB-backed todo service for `state`
pub fn mongo_service(state: &AppState) -> TodoService<MongoTodoRepository> {
    let repository = MongoTodoRepository::new(&state.db, &state.config.collection);
    TodoService::new(repository)
}

/// Create todos router
pub fn router<R: TodoRepository + 'static>(service: TodoService<R>) -> Router {
    handlers::router(service)
}
