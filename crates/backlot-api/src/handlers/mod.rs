//! HTTP request handlers for the admin API

pub mod media_album_art;
pub mod media_edit;
pub mod media_index;
pub mod media_save;
pub mod media_status;
