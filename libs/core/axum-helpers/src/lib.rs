//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router setup, the HTTP server loop, graceful shutdown
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (`ObjectId` path, validated JSON)
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_router, Server, ShutdownCoordinator};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let router = create_router::<ApiDoc>(Router::new());
//!
//!     let server = Server::bind(&ServerConfig::default()).await?;
//!     let coordinator = ShutdownCoordinator::new();
//!     let signals = coordinator.clone();
//!     tokio::spawn(async move { signals.wait_for_signal().await });
//!
//!     server.run(router, coordinator).await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod server;

// Re-export server types
pub use server::{Server, ServerState, ShutdownCoordinator, create_router};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse, validation_message};

// Re-export extractors
pub use extractors::{ObjectIdPath, ValidatedJson};
