//! HTTP surface: router, handlers, validation, and error mapping.

pub mod error;
pub mod handlers;
pub mod router;
pub mod validate;
