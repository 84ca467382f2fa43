//! SQLite persistence layer.

pub mod history;
pub mod pool;

pub use history::SqliteSessionHistoryStore;
pub use pool::DatabasePool;
