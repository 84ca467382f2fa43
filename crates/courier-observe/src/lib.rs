//! Observability setup for courier.

pub mod tracing_setup;
