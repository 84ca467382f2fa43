//! Round-robin provider pool.
//!
//! The rotation cursor is explicit, injectable state rather than a process
//! global: the pool owns the fixed adapter list and an atomic index that
//! advances exactly once per selection, modulo the pool size. The atomic
//! makes rotation a strict round-robin even across concurrent runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::adapter::ProviderAdapter;

/// Stateful round-robin selector over a fixed list of provider adapters.
///
/// The list is set once at construction; an empty list is a configuration
/// error the caller surfaces at startup, and `select_next` simply returns
/// `None` for it. The cursor is never persisted -- a process restart
/// rotates from the first provider again.
pub struct ProviderPool {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    cursor: AtomicUsize,
}

impl ProviderPool {
    /// Create a pool over the given adapters, cursor at the first.
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self {
            adapters,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Return the adapter at the cursor and advance it by one position.
    ///
    /// Advances exactly once per call regardless of what the caller does
    /// with the adapter afterwards.
    pub fn select_next(&self) -> Option<Arc<dyn ProviderAdapter>> {
        if self.adapters.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.adapters.len();
        Some(Arc::clone(&self.adapters[index]))
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// True when no adapters are registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Names of all registered adapters, in rotation order.
    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }
}
