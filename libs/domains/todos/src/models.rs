use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A todo as stored in MongoDB.
///
/// Field names follow the existing collection layout (`_id`, `createdat`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "createdat")]
    pub created_at: bson::DateTime,
}

impl TodoDocument {
    /// A fresh, not yet completed todo with a new id and the current time
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            title: title.into(),
            completed: false,
            created_at: bson::DateTime::now(),
        }
    }
}

/// A todo as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    /// 24 character hex ObjectId
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    #[schema(example = "Buy milk")]
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TodoDocument> for Todo {
    fn from(doc: TodoDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            completed: doc.completed,
            created_at: DateTime::from_timestamp_millis(doc.created_at.timestamp_millis())
                .unwrap_or_default(),
        }
    }
}

/// DTO for creating a todo
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTodo {
    /// A missing title decodes as empty and fails validation
    #[serde(default)]
    #[validate(length(min = 1, message = "The title is required"))]
    #[schema(example = "Buy milk")]
    pub title: String,
}

/// DTO for updating a todo; every update also marks it completed
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTodo {
    #[serde(default)]
    #[validate(length(min = 1, message = "The title is required"))]
    #[schema(example = "Buy oat milk")]
    pub title: String,
}

/// Body of the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodoList {
    pub data: Vec<Todo>,
}

/// Body returned by create, update and delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodoMutation {
    #[schema(example = "Todo created successfully")]
    pub message: String,
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub todo_id: String,
}

impl TodoMutation {
    pub fn new(message: &str, todo_id: impl Into<String>) -> Self {
        Self {
            message: message.to_string(),
            todo_id: todo_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_defaults() {
        let doc = TodoDocument::new("Buy milk");
        assert_eq!(doc.title, "Buy milk");
        assert!(!doc.completed);
    }

    #[test]
    fn test_document_bson_field_names() {
        let doc = TodoDocument::new("Buy milk");
        let raw = bson::to_document(&doc).unwrap();

        assert!(raw.get_object_id("_id").is_ok());
        assert!(raw.get_datetime("createdat").is_ok());
        assert_eq!(raw.get_str("title").unwrap(), "Buy milk");
        assert!(!raw.get_bool("completed").unwrap());
    }

    #[test]
    fn test_todo_from_document() {
        let doc = TodoDocument::new("Walk dog");
        let millis = doc.created_at.timestamp_millis();
        let todo = Todo::from(doc.clone());

        assert_eq!(todo.id, doc.id.to_hex());
        assert_eq!(todo.id.len(), 24);
        assert_eq!(todo.created_at.timestamp_millis(), millis);
    }

    #[test]
    fn test_todo_wire_format() {
        let todo = Todo::from(TodoDocument::new("Read"));
        let json = serde_json::to_value(&todo).unwrap();

        assert!(json["id"].is_string());
        assert_eq!(json["title"], "Read");
        assert_eq!(json["completed"], false);
        assert!(json["created_at"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_missing_title_is_invalid() {
        let input: CreateTodo = serde_json::from_str("{}").unwrap();
        assert!(input.validate().is_err());

        let input: UpdateTodo = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert!(input.validate().is_ok());
    }
}
