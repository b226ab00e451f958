//! MongoDB `ObjectId` path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;

/// Extractor for `ObjectId` path parameters.
///
/// Parses the single path parameter as a 24 character hex `ObjectId` and
/// rejects anything else with a 400 `INVALID_ID` envelope. Path extraction
/// runs before any body extractor, so a bad id is reported without reading
/// the request body.
///
/// The segment is kept exactly as received (`raw`), so responses can echo the
/// id in the caller's casing.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::delete;
/// use axum_helpers::extractors::ObjectIdPath;
///
/// async fn delete_todo(ObjectIdPath { id, raw }: ObjectIdPath) -> String {
///     format!("Deleting {} ({})", id.to_hex(), raw)
/// }
///
/// let app = Router::new().route("/todo/{id}", delete(delete_todo));
/// ```
pub struct ObjectIdPath {
    pub id: ObjectId,
    pub raw: String,
}

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        match ObjectId::parse_str(&raw) {
            Ok(id) => Ok(ObjectIdPath { id, raw }),
            Err(_) => Err(AppError::InvalidId(raw).into_response()),
        }
    }
}
