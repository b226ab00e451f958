//! In-memory implementation of TodoRepository for local runs and tests

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TodoResult;
use crate::models::TodoDocument;
use crate::repository::TodoRepository;

/// Keeps todos in insertion order, mirroring MongoDB's natural order
#[derive(Debug, Default, Clone)]
pub struct InMemoryTodoRepository {
    todos: Arc<RwLock<Vec<TodoDocument>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self {
            todos: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> TodoResult<Vec<TodoDocument>> {
        Ok(self.todos.read().await.clone())
    }

    async fn insert(&self, todo: TodoDocument) -> TodoResult<()> {
        self.todos.write().await.push(todo);
        Ok(())
    }

    async fn update_title(&self, id: ObjectId, title: &str) -> TodoResult<()> {
        let mut todos = self.todos.write().await;
        if let Some(todo) = todos.iter_mut().find(|t| t.id == id) {
            todo.title = title.to_string();
            todo.completed = true;
        }
        Ok(())
    }

    async fn delete(&self, id: ObjectId) -> TodoResult<()> {
        self.todos.write().await.retain(|t| t.id != id);
        Ok(())
    }
}
