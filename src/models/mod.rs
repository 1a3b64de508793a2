//! Data models for the parish backend.
//!
//! Wire names match the frontend exactly for seamless interoperability.

mod content_type;
mod metadata;

pub use content_type::*;
pub use metadata::*;
