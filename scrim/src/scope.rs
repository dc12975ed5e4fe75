//! Named scopes mapping to explicit manager instances.
//!
//! Hosts that render several independent overlay containers (one per
//! window, route, or panel) keep one manager per scope. The registry makes
//! that relationship explicit: managers are constructed on mount and torn
//! down on unmount, never resolved from ambient context.

use std::collections::HashMap;

use thiserror::Error;

use crate::config::ManagerConfig;
use crate::manager::OverlayManager;

/// Error type for scope operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A scope with this name is already mounted.
    #[error("overlay scope already mounted: {0}")]
    AlreadyMounted(String),

    /// No scope with this name is mounted.
    #[error("overlay scope not mounted: {0}")]
    NotMounted(String),
}

/// Registry of overlay managers keyed by scope name.
pub struct ScopeRegistry<V> {
    scopes: HashMap<String, OverlayManager<V>>,
}

impl<V> ScopeRegistry<V> {
    /// Create an empty scope registry.
    pub fn new() -> Self {
        Self {
            scopes: HashMap::new(),
        }
    }

    /// Mount a scope, constructing its manager.
    pub fn mount(
        &mut self,
        name: impl Into<String>,
        config: ManagerConfig,
    ) -> Result<OverlayManager<V>, ScopeError> {
        let name = name.into();
        if self.scopes.contains_key(&name) {
            return Err(ScopeError::AlreadyMounted(name));
        }
        log::debug!("mounting overlay scope {name:?}");
        let manager = OverlayManager::new(config);
        self.scopes.insert(name, manager.clone());
        Ok(manager)
    }

    /// Get a handle to a mounted scope's manager.
    pub fn get(&self, name: &str) -> Option<OverlayManager<V>> {
        self.scopes.get(name).cloned()
    }

    /// Tear a scope down.
    ///
    /// Every overlay still registered in the scope is rejected with no
    /// payload, so callers awaiting results from it settle instead of
    /// hanging.
    pub fn unmount(&mut self, name: &str) -> Result<(), ScopeError> {
        let manager = self
            .scopes
            .remove(name)
            .ok_or_else(|| ScopeError::NotMounted(name.to_string()))?;
        log::debug!("unmounting overlay scope {name:?}");
        manager.reject_all();
        Ok(())
    }

    /// Names of all mounted scopes.
    pub fn names(&self) -> Vec<&str> {
        self.scopes.keys().map(String::as_str).collect()
    }

    /// Number of mounted scopes.
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no scopes are mounted.
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl<V> Default for ScopeRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}
