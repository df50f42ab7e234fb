//! Database access layer
//!
//! Repository wrapping the PostgreSQL queries for media entries, their
//! files, and their tags. Multi-statement writes take an open
//! transaction so callers control atomicity.

pub mod media;

pub use media::MediaRepository;
