//! Shared domain types for Courier.
//!
//! This crate contains the core domain types used across the Courier relay:
//! chat messages, generation requests, the error taxonomy, and configuration.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
