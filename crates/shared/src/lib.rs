//! Shared types, errors, and configuration for Punchcard.
//!
//! This crate provides common types used across all other crates:
//! - Typed integer IDs for type-safe entity references
//! - Application-wide error types, including aggregated validation messages
//! - Configuration management
//! - Tracing subscriber bootstrap for the binaries

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ValidationErrors};
