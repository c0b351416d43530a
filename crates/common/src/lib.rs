//! Shared utilities, configuration, and error handling for Matchday
//!
//! This crate provides common functionality used across the league services:
//! - Configuration management following 12-factor principles
//! - Error types and their transport mapping
//! - Repository and state-machine error types
//! - Request extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod state;

pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use state::StateError;
