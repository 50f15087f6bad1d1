//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::UserMapStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the one store handle the whole process
/// shares; for `PostgreSQL` that handle owns the connection pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn UserMapStore>,
}

impl AppState {
    /// Create a new application state around a store.
    #[must_use]
    pub fn new(store: Arc<dyn UserMapStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the user map store.
    #[must_use]
    pub fn store(&self) -> &dyn UserMapStore {
        self.inner.store.as_ref()
    }
}
