//! Overlay instance identity.

use uuid::Uuid;

/// Unique identifier for one overlay instance.
///
/// Tokens are the registry key and the open-order list element. They carry
/// no ordering semantics of their own; uniqueness across the process
/// lifetime is the only invariant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct OverlayToken(Uuid);

impl OverlayToken {
    /// Generate a fresh token.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OverlayToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OverlayToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
