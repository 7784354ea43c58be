//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::ListingCache;
use crate::db::CustomerGateway;
use crate::handler::CustomerHandler;

/// Application state shared across all handlers.
///
/// Cheaply cloneable; every clone shares the same gateway and listing cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    gateway: Arc<dyn CustomerGateway>,
    cache: ListingCache,
}

impl AppState {
    /// Create application state.
    #[must_use]
    pub fn new(gateway: Arc<dyn CustomerGateway>, cache: ListingCache) -> Self {
        Self {
            inner: Arc::new(AppStateInner { gateway, cache }),
        }
    }

    #[must_use]
    pub fn gateway(&self) -> &dyn CustomerGateway {
        self.inner.gateway.as_ref()
    }

    #[must_use]
    pub fn cache(&self) -> &ListingCache {
        &self.inner.cache
    }

    /// Request handler bound to this state's gateway and cache.
    #[must_use]
    pub fn customers(&self) -> CustomerHandler<'_> {
        CustomerHandler::new(self.gateway(), self.cache())
    }
}
