use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    ObjectIdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, DatabaseErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::TodoResult;
use crate::models::{CreateTodo, Todo, TodoList, TodoMutation, UpdateTodo};
use crate::repository::TodoRepository;
use crate::service::TodoService;

/// OpenAPI documentation for the Todo API
#[derive(OpenApi)]
#[openapi(
    paths(list_todos, create_todo, update_todo, delete_todo),
    components(
        schemas(Todo, TodoList, TodoMutation, CreateTodo, UpdateTodo),
        responses(
            BadRequestValidationResponse,
            BadRequestIdResponse,
            DatabaseErrorResponse
        )
    ),
    tags(
        (name = "Todos", description = "Todo management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the todos router with all HTTP endpoints
pub fn router<R: TodoRepository + 'static>(service: TodoService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_todos).post(create_todo))
        .route("/{id}", put(update_todo).delete(delete_todo))
        .with_state(shared_service)
}

/// List all todos
#[utoipa::path(
    get,
    path = "",
    tag = "Todos",
    responses(
        (status = 200, description = "All todos in storage order", body = TodoList),
        (status = 500, response = DatabaseErrorResponse)
    )
)]
async fn list_todos<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
) -> TodoResult<Json<TodoList>> {
    let data = service.list_todos().await?;
    Ok(Json(TodoList { data }))
}

/// Create a new todo
#[utoipa::path(
    post,
    path = "",
    tag = "Todos",
    request_body = CreateTodo,
    responses(
        (status = 201, description = "Todo created", body = TodoMutation),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = DatabaseErrorResponse)
    )
)]
async fn create_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateTodo>,
) -> TodoResult<impl IntoResponse> {
    let id = service.create_todo(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(TodoMutation::new("Todo created successfully", id.to_hex())),
    ))
}

/// Update a todo's title and mark it completed
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Todos",
    params(
        ("id" = String, Path, description = "Todo ObjectId (24 hex characters)")
    ),
    request_body = UpdateTodo,
    responses(
        (status = 200, description = "Todo updated", body = TodoMutation),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = DatabaseErrorResponse)
    )
)]
async fn update_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    ObjectIdPath { id, raw }: ObjectIdPath,
    ValidatedJson(input): ValidatedJson<UpdateTodo>,
) -> TodoResult<Json<TodoMutation>> {
    service.update_todo(id, input).await?;
    Ok(Json(TodoMutation::new("Todo updated successfully", raw)))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Todos",
    params(
        ("id" = String, Path, description = "Todo ObjectId (24 hex characters)")
    ),
    responses(
        (
            status = 200,
            description = "Todo deleted (also when it did not exist)",
            body = TodoMutation
        ),
        (status = 400, response = BadRequestIdResponse),
        (status = 500, response = DatabaseErrorResponse)
    )
)]
async fn delete_todo<R: TodoRepository>(
    State(service): State<Arc<TodoService<R>>>,
    ObjectIdPath { id, raw }: ObjectIdPath,
) -> TodoResult<Json<TodoMutation>> {
    service.delete_todo(id).await?;
    Ok(Json(TodoMutation::new("Todo deleted successfully", raw)))
}
