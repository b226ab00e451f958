use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::TodoResult;
use crate::models::TodoDocument;

/// Repository trait for todo persistence
///
/// Updates and deletes of an id that does not exist are silent no-ops.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos in natural storage order
    async fn list(&self) -> TodoResult<Vec<TodoDocument>>;

    /// Persist a new todo
    async fn insert(&self, todo: TodoDocument) -> TodoResult<()>;

    /// Set the title and mark the todo completed
    async fn update_title(&self, id: ObjectId, title: &str) -> TodoResult<()>;

    /// Remove a todo
    async fn delete(&self, id: ObjectId) -> TodoResult<()>;
}
