//! Server infrastructure module.
//!
//! This module provides:
//! - Router setup with OpenAPI documentation and a JSON 404 fallback
//! - The HTTP server loop with per-connection timeouts
//! - Graceful shutdown coordination
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_router, Server, ShutdownCoordinator};
//! use core_config::server::ServerConfig;
//!
//! let router = create_router::<ApiDoc>(api_routes);
//!
//! let server = Server::bind(&ServerConfig::default()).await?;
//! server.run(router, ShutdownCoordinator::new()).await?;
//! ```

pub mod app;
pub mod shutdown;

pub use app::{Server, ServerState, create_router};
pub use shutdown::ShutdownCoordinator;
