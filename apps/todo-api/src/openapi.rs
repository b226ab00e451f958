//! OpenAPI documentation configuration

use utoipa::{Modify, OpenApi};

use crate::api::health::HealthApiDoc;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "MongoDB-backed REST API for managing todos"
    ),
    servers(
        (url = "http://localhost:9000", description = "Local development server")
    ),
    nest(
        (path = "/todo", api = domain_todos::ApiDoc)
    ),
    modifiers(&HealthDocs),
    tags(
        (name = "Todos", description = "Todo management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Adds the root-level `/health` and `/ready` paths
struct HealthDocs;

impl Modify for HealthDocs {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(HealthApiDoc::openapi());
    }
}
