//! Infrastructure implementations for courier.
//!
//! SQLite-backed session history, filesystem configuration loading, and the
//! OpenAI-compatible provider adapters behind the `courier-core` traits.

pub mod config;
pub mod llm;
pub mod sqlite;
