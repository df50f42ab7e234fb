//! Core library for Backlot
//!
//! Shared domain models, configuration, form parsing helpers, and error
//! types used by the database, processing, and API crates.

pub mod config;
pub mod error;
pub mod form;
pub mod models;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
