//! Media processing
//!
//! CPU-bound image work, kept free of HTTP and database concerns so the
//! API crate can run it on blocking threads.

pub mod album_art;
