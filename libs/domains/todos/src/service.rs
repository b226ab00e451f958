//! Todo Service - Business logic layer

use axum_helpers::validation_message;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::error::{TodoError, TodoResult};
use crate::models::{CreateTodo, Todo, TodoDocument, UpdateTodo};
use crate::repository::TodoRepository;

/// Todo service providing business logic operations
///
/// Validates titles before any storage call and maps stored documents to
/// their wire form.
pub struct TodoService<R: TodoRepository> {
    repository: Arc<R>,
}

impl<R: TodoRepository> TodoService<R> {
    /// Create a new TodoService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List every todo in storage order
    #[instrument(skip(self))]
    pub async fn list_todos(&self) -> TodoResult<Vec<Todo>> {
        let docs = self.repository.list().await.map_err(|e| match e {
            TodoError::Storage(cause) => TodoError::FetchFailed(cause),
            other => other,
        })?;

        Ok(docs.into_iter().map(Todo::from).collect())
    }

    /// Create a todo and return its new id
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_todo(&self, input: CreateTodo) -> TodoResult<ObjectId> {
        input
            .validate()
            .map_err(|e| TodoError::Validation(validation_message(&e)))?;

        let todo = TodoDocument::new(input.title);
        let id = todo.id;
        self.repository.insert(todo).await?;

        info!(todo_id = %id, "Todo created");
        Ok(id)
    }

    /// Replace the title and mark the todo completed
    #[instrument(skip(self, input))]
    pub async fn update_todo(&self, id: ObjectId, input: UpdateTodo) -> TodoResult<ObjectId> {
        input
            .validate()
            .map_err(|e| TodoError::Validation(validation_message(&e)))?;

        self.repository.update_title(id, &input.title).await?;

        info!(todo_id = %id, "Todo updated");
        Ok(id)
    }

    /// Delete a todo; deleting an unknown id succeeds
    #[instrument(skip(self))]
    pub async fn delete_todo(&self, id: ObjectId) -> TodoResult<ObjectId> {
        self.repository.delete(id).await?;

        info!(todo_id = %id, "Todo deleted");
        Ok(id)
    }
}

impl<R: TodoRepository> Clone for TodoService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockTodoRepository;
    use mockall::predicate::*;

    fn title(t: &str) -> CreateTodo {
        CreateTodo {
            title: t.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_todo_inserts_fresh_document() {
        let mut repo = MockTodoRepository::new();
        repo.expect_insert()
            .withf(|doc| doc.title == "Buy milk" && !doc.completed)
            .times(1)
            .returning(|_| Ok(()));

        let service = TodoService::new(repo);
        let id = service.create_todo(title("Buy milk")).await.unwrap();
        assert_eq!(id.to_hex().len(), 24);
    }

    #[tokio::test]
    async fn test_create_todo_empty_title_skips_storage() {
        let mut repo = MockTodoRepository::new();
        repo.expect_insert().never();

        let service = TodoService::new(repo);
        let err = service.create_todo(title("")).await.unwrap_err();
        assert!(matches!(err, TodoError::Validation(ref m) if m == "The title is required"));
    }

    #[tokio::test]
    async fn test_update_todo_passes_title() {
        let id = ObjectId::new();
        let mut repo = MockTodoRepository::new();
        repo.expect_update_title()
            .withf(move |i, t| *i == id && t.to_string() == "Done")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = TodoService::new(repo);
        let updated = service
            .update_todo(
                id,
                UpdateTodo {
                    title: "Done".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated, id);
    }

    #[tokio::test]
    async fn test_update_todo_empty_title_skips_storage() {
        let mut repo = MockTodoRepository::new();
        repo.expect_update_title().never();

        let service = TodoService::new(repo);
        let result = service
            .update_todo(ObjectId::new(), UpdateTodo::default())
            .await;
        assert!(matches!(result, Err(TodoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_todo_returns_id() {
        let id = ObjectId::new();
        let mut repo = MockTodoRepository::new();
        repo.expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));

        let service = TodoService::new(repo);
        assert_eq!(service.delete_todo(id).await.unwrap(), id);
    }

    #[tokio::test]
    async fn test_list_todos_storage_error_becomes_fetch_failed() {
        let mut repo = MockTodoRepository::new();
        repo.expect_list()
            .times(1)
            .returning(|| Err(TodoError::Storage("no servers".to_string())));

        let service = TodoService::new(repo);
        let err = service.list_todos().await.unwrap_err();
        assert!(matches!(err, TodoError::FetchFailed(ref c) if c == "no servers"));
    }

    #[tokio::test]
    async fn test_list_todos_maps_documents() {
        let doc = TodoDocument::new("Read");
        let expected = doc.id.to_hex();
        let mut repo = MockTodoRepository::new();
        repo.expect_list()
            .times(1)
            .returning(move || Ok(vec![doc.clone()]));

        let service = TodoService::new(repo);
        let todos = service.list_todos().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, expected);
        assert!(!todos[0].completed);
    }
}
