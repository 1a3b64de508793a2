//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod image_proxy;
mod metadata;

pub use image_proxy::*;
pub use metadata::*;
