//! HTTP request handlers.
//!
//! - [`images`]: the image relay endpoint (`POST /api/send-image`)
//! - [`static_assets`]: embedded capture page serving
//!
//! Handlers return [`crate::errors::Error`], which converts to the JSON
//! envelope `{"success": false, "error": ...}` with an appropriate status code.

pub mod images;
pub mod static_assets;
