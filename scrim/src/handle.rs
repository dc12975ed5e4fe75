//! Settlement handles for overlay results.
//!
//! Every overlay instance owns a oneshot channel whose receiving end backs
//! the future returned at open time. The [`OverlayHandle`] wraps the
//! sending end with a single-settlement guard: only the first resolve or
//! reject has any effect, so a double-clicked button settles once.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::oneshot;

use crate::token::OverlayToken;

/// Final outcome of one overlay, sent over the settlement channel.
///
/// `None` payloads come from bulk dismissal and the render-boundary
/// callbacks, which settle without a value.
#[derive(Debug)]
pub(crate) enum Settlement<R> {
    Resolved(Option<R>),
    Rejected(Option<R>),
}

/// Rejection delivered to the awaiting caller.
///
/// This is the normal "user cancelled" channel, not a system failure. The
/// payload is whatever the rejecting side supplied, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected<R>(pub Option<R>);

impl<R> std::fmt::Display for Rejected<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("overlay rejected")
    }
}

impl<R: std::fmt::Debug> std::error::Error for Rejected<R> {}

/// Manager-side hook invoked when a handle settles.
///
/// The handle holds only a weak reference and the token key, never a
/// direct reference to registry state; a settlement after the manager is
/// gone degrades to delivering the channel message and nothing else.
pub(crate) trait SettleSink: Send + Sync {
    fn overlay_settled(self: Arc<Self>, token: OverlayToken);
}

/// Type-erased settlement interface for bulk operations and the render
/// projection, where the result type parameter is unavailable.
///
/// The boxed variants carry a value across the erased boundary and
/// downcast it to the creator's result type. A value of the wrong type
/// still settles, just without a payload: the user's close action must
/// win over a host-side type slip.
pub(crate) trait HandleDyn: Send + Sync {
    fn resolve_empty(&self);
    fn reject_empty(&self);
    fn resolve_boxed(&self, value: Box<dyn Any + Send>);
    fn reject_boxed(&self, payload: Box<dyn Any + Send>);
    fn is_settled(&self) -> bool;
}

struct HandleShared<R> {
    token: OverlayToken,
    tx: Mutex<Option<oneshot::Sender<Settlement<R>>>>,
    settled: AtomicBool,
    sink: Weak<dyn SettleSink>,
}

/// Handle used to settle one overlay's result.
///
/// Cloneable; all clones share the single-settlement guard. Settling
/// demotes the overlay from the open-order list immediately and schedules
/// its registry purge after the exit delay.
pub struct OverlayHandle<R> {
    shared: Arc<HandleShared<R>>,
}

impl<R> OverlayHandle<R> {
    pub(crate) fn new(
        token: OverlayToken,
        tx: oneshot::Sender<Settlement<R>>,
        sink: Weak<dyn SettleSink>,
    ) -> Self {
        Self {
            shared: Arc::new(HandleShared {
                token,
                tx: Mutex::new(Some(tx)),
                settled: AtomicBool::new(false),
                sink,
            }),
        }
    }

    /// Token of the overlay this handle settles.
    pub fn token(&self) -> OverlayToken {
        self.shared.token
    }

    /// Resolve the overlay with a value.
    ///
    /// The awaiting future completes with `Ok(Some(value))` at this call,
    /// not when the instance is later purged.
    pub fn resolve(&self, value: R) {
        self.settle(Settlement::Resolved(Some(value)));
    }

    /// Reject the overlay with no payload.
    pub fn reject(&self) {
        self.settle(Settlement::Rejected(None));
    }

    /// Reject the overlay with a payload.
    pub fn reject_with(&self, payload: R) {
        self.settle(Settlement::Rejected(Some(payload)));
    }

    /// Whether this overlay has already been resolved or rejected.
    pub fn is_settled(&self) -> bool {
        self.shared.settled.load(Ordering::SeqCst)
    }

    fn settle(&self, settlement: Settlement<R>) {
        let taken = self
            .shared
            .tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        let Some(tx) = taken else {
            log::trace!("overlay {}: settle after settlement ignored", self.shared.token);
            return;
        };
        self.shared.settled.store(true, Ordering::SeqCst);
        // Receiver may be gone if the caller dropped the pending future.
        let _ = tx.send(settlement);
        if let Some(sink) = self.shared.sink.upgrade() {
            sink.overlay_settled(self.shared.token);
        }
    }
}

impl<R> Clone for OverlayHandle<R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: Send + 'static> HandleDyn for OverlayHandle<R> {
    fn resolve_empty(&self) {
        self.settle(Settlement::Resolved(None));
    }

    fn reject_empty(&self) {
        self.settle(Settlement::Rejected(None));
    }

    fn resolve_boxed(&self, value: Box<dyn Any + Send>) {
        match value.downcast::<R>() {
            Ok(value) => self.settle(Settlement::Resolved(Some(*value))),
            Err(_) => {
                log::warn!(
                    "overlay {}: close value of unexpected type dropped",
                    self.shared.token
                );
                self.settle(Settlement::Resolved(None));
            }
        }
    }

    fn reject_boxed(&self, payload: Box<dyn Any + Send>) {
        match payload.downcast::<R>() {
            Ok(payload) => self.settle(Settlement::Rejected(Some(*payload))),
            Err(_) => {
                log::warn!(
                    "overlay {}: reject payload of unexpected type dropped",
                    self.shared.token
                );
                self.settle(Settlement::Rejected(None));
            }
        }
    }

    fn is_settled(&self) -> bool {
        self.shared.settled.load(Ordering::SeqCst)
    }
}
