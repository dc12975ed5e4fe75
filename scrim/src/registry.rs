//! Overlay instance registry with explicit render order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::InsertOrder;
use crate::handle::HandleDyn;
use crate::props::Props;
use crate::token::OverlayToken;

/// Lifecycle phase of a registered overlay.
///
/// Purged has no variant: a purged token is simply absent from the
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Registered, enter delay still running.
    Pending,
    /// Present in the open-order list.
    Open,
    /// Settled and demoted, awaiting purge after the exit delay.
    Closing,
}

/// One registered overlay.
///
/// Owned exclusively by the registry from registration until purge.
pub struct OverlayEntry<V> {
    /// Registry key.
    pub token: OverlayToken,
    /// Host-supplied renderable unit. Opaque to the manager.
    pub view: V,
    /// Merged creation options and per-open props.
    pub props: Props,
    /// Delay before promotion into the open-order list.
    pub enter_delay: Duration,
    /// Delay between settlement and purge.
    pub exit_delay: Duration,
    /// Current lifecycle phase.
    pub phase: Phase,
    pub(crate) closer: Arc<dyn HandleDyn>,
}

impl<V> OverlayEntry<V> {
    pub(crate) fn new(
        token: OverlayToken,
        view: V,
        props: Props,
        enter_delay: Duration,
        exit_delay: Duration,
        closer: Arc<dyn HandleDyn>,
    ) -> Self {
        Self {
            token,
            view,
            props,
            enter_delay,
            exit_delay,
            phase: Phase::Pending,
            closer,
        }
    }
}

/// Mapping from token to overlay entry.
///
/// Storage order is not meaningful; render order is tracked explicitly so
/// new entries land first under [`InsertOrder::PrependNew`] and last under
/// [`InsertOrder::AppendNew`].
pub struct OverlayRegistry<V> {
    entries: HashMap<OverlayToken, OverlayEntry<V>>,
    render_order: Vec<OverlayToken>,
}

impl<V> OverlayRegistry<V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            render_order: Vec::new(),
        }
    }

    /// Insert an entry, placing it in the render order per `order`.
    pub fn register(&mut self, entry: OverlayEntry<V>, order: InsertOrder) {
        let token = entry.token;
        self.entries.insert(token, entry);
        match order {
            InsertOrder::PrependNew => self.render_order.insert(0, token),
            InsertOrder::AppendNew => self.render_order.push(token),
        }
    }

    /// Get an entry by token.
    pub fn get(&self, token: OverlayToken) -> Option<&OverlayEntry<V>> {
        self.entries.get(&token)
    }

    /// Get a mutable entry by token.
    pub fn get_mut(&mut self, token: OverlayToken) -> Option<&mut OverlayEntry<V>> {
        self.entries.get_mut(&token)
    }

    /// Remove an entry. Returns whether it was present.
    ///
    /// Absent tokens are a no-op, never an error: a concurrent path may
    /// already have removed the entry by the time a late timer fires.
    pub fn remove(&mut self, token: OverlayToken) -> bool {
        let removed = self.entries.remove(&token).is_some();
        self.render_order.retain(|&t| t != token);
        removed
    }

    /// Whether a token is registered.
    pub fn contains(&self, token: OverlayToken) -> bool {
        self.entries.contains_key(&token)
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tokens in render order.
    pub fn tokens(&self) -> Vec<OverlayToken> {
        self.render_order.clone()
    }

    /// Iterate entries in render order.
    pub fn iter(&self) -> impl Iterator<Item = &OverlayEntry<V>> {
        self.render_order
            .iter()
            .filter_map(|token| self.entries.get(token))
    }

    /// Snapshot the settlement interface of every entry.
    ///
    /// Bulk resolve/reject settles outside the registry lock, and settling
    /// mutates the registry, so callers iterate this snapshot instead of
    /// the live map.
    pub(crate) fn closers(&self) -> Vec<Arc<dyn HandleDyn>> {
        self.render_order
            .iter()
            .filter_map(|token| self.entries.get(token))
            .map(|entry| Arc::clone(&entry.closer))
            .collect()
    }
}

impl<V> Default for OverlayRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{OverlayHandle, SettleSink, Settlement};
    use std::sync::Weak;
    use tokio::sync::oneshot;

    struct NullSink;

    impl SettleSink for NullSink {
        fn overlay_settled(self: Arc<Self>, _token: OverlayToken) {}
    }

    fn entry(token: OverlayToken) -> OverlayEntry<&'static str> {
        let (tx, _rx) = oneshot::channel::<Settlement<()>>();
        let sink: Arc<dyn SettleSink> = Arc::new(NullSink);
        let weak: Weak<dyn SettleSink> = Arc::downgrade(&sink);
        // The rx side is dropped; these entries are never settled.
        let handle = OverlayHandle::new(token, tx, weak);
        OverlayEntry::new(
            token,
            "view",
            Props::new(),
            Duration::from_millis(50),
            Duration::from_millis(500),
            Arc::new(handle),
        )
    }

    #[test]
    fn prepend_new_renders_first() {
        let mut registry = OverlayRegistry::new();
        let (a, b) = (OverlayToken::new(), OverlayToken::new());
        registry.register(entry(a), InsertOrder::PrependNew);
        registry.register(entry(b), InsertOrder::PrependNew);
        assert_eq!(registry.tokens(), vec![b, a]);
    }

    #[test]
    fn append_new_renders_last() {
        let mut registry = OverlayRegistry::new();
        let (a, b) = (OverlayToken::new(), OverlayToken::new());
        registry.register(entry(a), InsertOrder::AppendNew);
        registry.register(entry(b), InsertOrder::AppendNew);
        assert_eq!(registry.tokens(), vec![a, b]);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut registry: OverlayRegistry<&'static str> = OverlayRegistry::new();
        assert!(!registry.remove(OverlayToken::new()));
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_drops_entry_and_order() {
        let mut registry = OverlayRegistry::new();
        let token = OverlayToken::new();
        registry.register(entry(token), InsertOrder::PrependNew);
        assert!(registry.contains(token));
        assert!(registry.remove(token));
        assert!(!registry.contains(token));
        assert!(registry.tokens().is_empty());
        // Second removal is tolerated.
        assert!(!registry.remove(token));
    }

    #[test]
    fn closers_snapshot_matches_len() {
        let mut registry = OverlayRegistry::new();
        registry.register(entry(OverlayToken::new()), InsertOrder::PrependNew);
        registry.register(entry(OverlayToken::new()), InsertOrder::PrependNew);
        assert_eq!(registry.closers().len(), 2);
    }
}
