//! MongoDB implementation of TodoRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{doc, oid::ObjectId},
};
use tracing::instrument;

use crate::error::TodoResult;
use crate::models::TodoDocument;
use crate::repository::TodoRepository;

/// MongoDB implementation of the TodoRepository
pub struct MongoTodoRepository {
    collection: Collection<TodoDocument>,
}

impl MongoTodoRepository {
    /// Create a new MongoTodoRepository
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoTodoRepository::new(&client.database("just_todo"), "todo");
    /// ```
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<TodoDocument>(collection_name);
        Self { collection }
    }
}

#[async_trait]
impl TodoRepository for MongoTodoRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> TodoResult<Vec<TodoDocument>> {
        let cursor = self.collection.find(doc! {}).await?;
        let todos: Vec<TodoDocument> = cursor.try_collect().await?;
        Ok(todos)
    }

    #[instrument(skip(self, todo), fields(todo_id = %todo.id))]
    async fn insert(&self, todo: TodoDocument) -> TodoResult<()> {
        self.collection.insert_one(&todo).await?;
        Ok(())
    }

    #[instrument(skip(self, title))]
    async fn update_title(&self, id: ObjectId, title: &str) -> TodoResult<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "title": title, "completed": true } },
            )
            .await?;

        if result.matched_count == 0 {
            tracing::debug!(todo_id = %id, "Update matched no todo");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> TodoResult<()> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count == 0 {
            tracing::debug!(todo_id = %id, "Delete matched no todo");
        }
        Ok(())
    }
}
