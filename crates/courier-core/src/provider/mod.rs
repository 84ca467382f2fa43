//! Provider abstractions for Courier.
//!
//! - `ProviderAdapter`: object-safe trait concrete adapters implement
//! - `ProviderPool`: stateful round-robin selector over a fixed adapter list

pub mod adapter;
pub mod pool;
