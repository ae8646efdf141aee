//! Auth portal - User registration, login and password reset.
//!
//! A JSON API under `/api` paired with the page shells of a single-page
//! front-end (`/`, `/register`, `/login`, `/dashboard`).
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **services**: Application use cases
//! - **infra**: Database, Redis, repositories
//! - **jobs**: Email queue and worker
//! - **api**: HTTP handlers, middleware, and routes
//! - **web**: Front-end route table and page shell
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! Entities and password/reset-token rules live in the `domain` crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Deliver queued email
//! cargo run -- jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;
pub mod web;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{Password, User, UserResponse};
pub use errors::{AppError, AppResult};
