//! Open-order list driving staged entry and exit.

use crate::token::OverlayToken;

/// Ordered list of tokens currently flagged open.
///
/// Membership, not position, determines openness; position gives the host
/// a stable stacking order with the newest promotion last. Every token in
/// the list must exist in the registry.
#[derive(Debug, Clone, Default)]
pub struct OpenStack {
    order: Vec<OverlayToken>,
}

impl OpenStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token. Returns false if it was already open.
    ///
    /// Idempotent: openness is membership, so a duplicate promotion would
    /// add nothing but a phantom entry.
    pub fn promote(&mut self, token: OverlayToken) -> bool {
        if self.order.contains(&token) {
            return false;
        }
        self.order.push(token);
        true
    }

    /// Remove a token. Returns whether it was present; absent is a no-op.
    pub fn demote(&mut self, token: OverlayToken) -> bool {
        let before = self.order.len();
        self.order.retain(|&t| t != token);
        self.order.len() < before
    }

    /// Membership test.
    pub fn is_open(&self, token: OverlayToken) -> bool {
        self.order.contains(&token)
    }

    /// The most recently promoted token still open.
    pub fn top(&self) -> Option<OverlayToken> {
        self.order.last().copied()
    }

    /// Current open order.
    pub fn snapshot(&self) -> Vec<OverlayToken> {
        self.order.clone()
    }

    /// Number of open tokens.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is open.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
