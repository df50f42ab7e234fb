//! Data models for the application
//!
//! This module contains all data structures used throughout the
//! application, organized by domain.

mod media;
mod media_file;
mod media_ref;
mod status;
mod tag;

// Re-export all models for convenient imports
pub use media::*;
pub use media_file::*;
pub use media_ref::*;
pub use status::*;
pub use tag::*;
