//! Backlot Admin API Library
//!
//! This crate provides the HTTP handlers, authentication middleware, and
//! application setup for the media administration service.

// Module declarations
mod api_doc;
mod handlers;
mod transaction;
mod upload;
pub mod setup;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
