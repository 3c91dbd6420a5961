//! Tool rental marketplace backend.
//!
//! Users list tools for rent, attach images, review each other and keep
//! favorites. Requests are authenticated with bearer tokens and every
//! failure reaches the client as one uniform JSON error envelope.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities
//! - **services**: Use cases behind the HTTP handlers
//! - **infra**: Database and object storage
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response shapes
//! - **errors**: Error kinds and the error envelope
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
