//! Streaming chat orchestration core for Courier.
//!
//! This crate defines the "ports" (the `ProviderAdapter` and
//! `SessionHistoryStore` traits) that the infrastructure layer implements,
//! plus the orchestration logic itself: provider rotation, history
//! assembly, and the capture stream that persists a response once its
//! live delivery ends. It depends only on `courier-types` -- never on any
//! database or HTTP crate.

pub mod history;
pub mod orchestrator;
pub mod provider;
pub mod store;
pub mod stream;
